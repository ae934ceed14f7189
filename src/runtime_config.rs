// =============================================================================
// Scanner Configuration — symbol list, analysis parameters, link templates
// =============================================================================
//
// Everything the scanner needs besides secrets lives here.  Secrets (API key,
// bot token, channel id) come from the environment only.
//
// All fields carry `#[serde(default)]` so that a partial config file, or one
// written before a field was added, still loads.
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;
use crate::types::Instrument;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_short_window() -> usize {
    10
}

fn default_long_window() -> usize {
    100
}

fn default_band_std_multiplier() -> f64 {
    2.0
}

fn default_stoch_k_window() -> usize {
    5
}

fn default_stoch_k_smooth() -> usize {
    3
}

fn default_stoch_d_window() -> usize {
    3
}

fn default_stoch_high() -> f64 {
    0.8
}

fn default_stoch_low() -> f64 {
    0.2
}

fn default_ath_ratio() -> f64 {
    0.97
}

fn default_quote_template() -> String {
    "https://www.tradingview.com/chart/?symbol={symbol}".to_string()
}

fn default_listing_template() -> String {
    "https://www.nordnet.fi/markkinakatsaus/sertifikaatit?direction={direction}&underlyingName={name}"
        .to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_marketstack_url() -> String {
    "http://api.marketstack.com/v1/eod".to_string()
}

fn default_fetch_limit() -> u32 {
    1000
}

fn default_concurrency() -> usize {
    4
}

fn default_symbols() -> Vec<Instrument> {
    vec![
        Instrument::new("SLV", "SLV", "Silver"),
        Instrument::new("IAU", "IAU", "Gold"),
    ]
}

// =============================================================================
// AnalysisConfig
// =============================================================================

/// Window sizes and thresholds for one analysis run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisConfig {
    /// Window for `sma_short`, `stdev_short` and span for `ema_short`.
    #[serde(default = "default_short_window")]
    pub short_window: usize,

    /// Window for `sma_long` and span for the trend EMA.
    #[serde(default = "default_long_window")]
    pub long_window: usize,

    /// Band distance from the middle in standard deviations.
    #[serde(default = "default_band_std_multiplier")]
    pub band_std_multiplier: f64,

    /// Stochastic oscillator and all-time-high tracking.  When off, only the
    /// Bollinger rules are evaluated and the summary lists the band values.
    #[serde(default = "default_true")]
    pub extended: bool,

    #[serde(default = "default_stoch_k_window")]
    pub stoch_k_window: usize,

    #[serde(default = "default_stoch_k_smooth")]
    pub stoch_k_smooth: usize,

    #[serde(default = "default_stoch_d_window")]
    pub stoch_d_window: usize,

    /// Overbought level for %K and %D, as a fraction.
    #[serde(default = "default_stoch_high")]
    pub stoch_high: f64,

    /// Oversold level for %K and %D, as a fraction.
    #[serde(default = "default_stoch_low")]
    pub stoch_low: f64,

    /// A high above `ath * ath_ratio` counts as near the all-time high.
    #[serde(default = "default_ath_ratio")]
    pub ath_ratio: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
            band_std_multiplier: default_band_std_multiplier(),
            extended: true,
            stoch_k_window: default_stoch_k_window(),
            stoch_k_smooth: default_stoch_k_smooth(),
            stoch_d_window: default_stoch_d_window(),
            stoch_high: default_stoch_high(),
            stoch_low: default_stoch_low(),
            ath_ratio: default_ath_ratio(),
        }
    }
}

impl AnalysisConfig {
    /// Reject parameter sets that cannot produce meaningful series.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, window) in [
            ("short_window", self.short_window),
            ("long_window", self.long_window),
            ("stoch_k_window", self.stoch_k_window),
            ("stoch_k_smooth", self.stoch_k_smooth),
            ("stoch_d_window", self.stoch_d_window),
        ] {
            if window == 0 {
                return Err(ConfigError::ZeroWindow { name });
            }
        }

        check_range("band_std_multiplier", self.band_std_multiplier, 0.0, f64::MAX)?;
        check_range("stoch_high", self.stoch_high, 0.0, 1.0)?;
        check_range("stoch_low", self.stoch_low, 0.0, 1.0)?;
        if self.stoch_low >= self.stoch_high {
            return Err(ConfigError::InvertedLimits {
                low: self.stoch_low,
                high: self.stoch_high,
            });
        }

        if !self.ath_ratio.is_finite() || self.ath_ratio <= 0.0 || self.ath_ratio > 1.0 {
            return Err(ConfigError::OutOfRange {
                param: "ath_ratio",
                value: self.ath_ratio,
                min: f64::MIN_POSITIVE,
                max: 1.0,
            });
        }

        Ok(())
    }
}

fn check_range(param: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            param,
            value,
            min,
            max,
        })
    }
}

// =============================================================================
// LinkTemplates
// =============================================================================

/// URL templates appended to every summary.
///
/// Placeholders: `{symbol}` (chart symbol, quote link only), `{direction}`
/// and `{name}` (percent-escaped display name, listing link only).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkTemplates {
    #[serde(default = "default_quote_template")]
    pub quote: String,

    #[serde(default = "default_listing_template")]
    pub listing: String,
}

impl Default for LinkTemplates {
    fn default() -> Self {
        Self {
            quote: default_quote_template(),
            listing: default_listing_template(),
        }
    }
}

// =============================================================================
// ScannerConfig
// =============================================================================

/// Top-level configuration for a scan run.
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    // --- Bar source ---------------------------------------------------------

    /// Directory for the per-day raw response cache.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Marketstack end-of-day endpoint.
    #[serde(default = "default_marketstack_url")]
    pub marketstack_url: String,

    /// Number of most recent bars requested per symbol.
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u32,

    /// Symbols fetched and analysed at the same time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    // --- Analysis -----------------------------------------------------------

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub links: LinkTemplates,

    /// Symbols to scan, in reporting order.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<Instrument>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            marketstack_url: default_marketstack_url(),
            fetch_limit: default_fetch_limit(),
            concurrency: default_concurrency(),
            analysis: AnalysisConfig::default(),
            links: LinkTemplates::default(),
            symbols: default_symbols(),
        }
    }
}

impl ScannerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scanner config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scanner config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = config.symbols.len(),
            extended = config.analysis.extended,
            "scanner config loaded"
        );

        Ok(config)
    }

    /// Keep only the symbols whose `data_symbol` appears in the
    /// comma-separated `filter` (case-insensitive).  Order is preserved.
    pub fn retain_symbols(&mut self, filter: &str) {
        let wanted: Vec<String> = filter
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if wanted.is_empty() {
            return;
        }
        self.symbols
            .retain(|s| wanted.contains(&s.data_symbol.to_uppercase()));
    }
}
