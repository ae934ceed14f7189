// =============================================================================
// Indicator Pipeline
// =============================================================================
//
// Turns one validated bar series into every derived column, in dependency
// order:
//
//   1. hl2
//   2. sma_short, sma_long          (rolling mean of hl2)
//   3. ema_short, ema_long          (EMA of hl2, seeded with hl2[0])
//   4. ema_long_delta               (trend direction / magnitude)
//   5. stdev_short                  (rolling sample std of hl2)
//   6. bb_upper, bb_lower           (sma_short ± k * stdev_short)
//   7. stochastic %K / %D           (extended only)
//   8. ath, ath_lower               (extended only)
//
// Each column has exactly one entry per bar and never looks ahead.
// =============================================================================

use crate::error::ConfigError;
use crate::market_data::BarSeries;
use crate::runtime_config::AnalysisConfig;

use super::all_time_high::{running_high, scaled};
use super::bollinger::calculate_bands;
use super::ema::{calculate_ema, delta};
use super::rolling::{defined, rolling_mean, rolling_std, Series};
use super::stochastic::calculate_stochastic;

/// Columns produced only when the stochastic / all-time-high extension is on.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedSeries {
    pub stoch_k_highest: Series,
    pub stoch_k_lowest: Series,
    pub stoch_k_raw: Series,
    pub stoch_k: Series,
    pub stoch_d: Series,
    pub ath: Series,
    pub ath_lower: Series,
}

/// All derived columns for one bar series.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    pub hl2: Series,
    pub sma_short: Series,
    pub sma_long: Series,
    pub ema_short: Series,
    pub ema_long: Series,
    pub ema_long_delta: Series,
    pub stdev_short: Series,
    pub bb_upper: Series,
    pub bb_lower: Series,
    pub extended: Option<ExtendedSeries>,
}

impl DerivedSeries {
    /// Every present column by name, in pipeline order.
    pub fn columns(&self) -> Vec<(&'static str, &[Option<f64>])> {
        let mut cols: Vec<(&'static str, &[Option<f64>])> = vec![
            ("hl2", self.hl2.as_slice()),
            ("sma_short", self.sma_short.as_slice()),
            ("sma_long", self.sma_long.as_slice()),
            ("ema_short", self.ema_short.as_slice()),
            ("ema_long", self.ema_long.as_slice()),
            ("ema_long_delta", self.ema_long_delta.as_slice()),
            ("stdev_short", self.stdev_short.as_slice()),
            ("bb_upper", self.bb_upper.as_slice()),
            ("bb_lower", self.bb_lower.as_slice()),
        ];
        if let Some(ext) = &self.extended {
            cols.extend([
                ("stoch_k_highest", ext.stoch_k_highest.as_slice()),
                ("stoch_k_lowest", ext.stoch_k_lowest.as_slice()),
                ("stoch_k_raw", ext.stoch_k_raw.as_slice()),
                ("stoch_k", ext.stoch_k.as_slice()),
                ("stoch_d", ext.stoch_d.as_slice()),
                ("ath", ext.ath.as_slice()),
                ("ath_lower", ext.ath_lower.as_slice()),
            ]);
        }
        cols
    }
}

/// Compute every derived column for `bars`.
///
/// # Errors
/// Returns [`ConfigError`] when `config` fails validation.  Short history is
/// not an error: affected leading positions are `None`.
pub fn compute_indicators(
    bars: &BarSeries,
    config: &AnalysisConfig,
) -> Result<DerivedSeries, ConfigError> {
    config.validate()?;

    let hl2_values = bars.hl2();
    let hl2 = defined(&hl2_values);

    let sma_short = rolling_mean(&hl2, config.short_window);
    let sma_long = rolling_mean(&hl2, config.long_window);
    let ema_short = calculate_ema(&hl2_values, config.short_window);
    let ema_long = calculate_ema(&hl2_values, config.long_window);
    let ema_long_delta = delta(&ema_long);

    let stdev_short = rolling_std(&hl2, config.short_window);
    let bands = calculate_bands(&sma_short, &stdev_short, config.band_std_multiplier);

    let extended = config.extended.then(|| {
        let highs = bars.highs();
        let stoch = calculate_stochastic(
            &highs,
            &bars.lows(),
            &bars.closes(),
            config.stoch_k_window,
            config.stoch_k_smooth,
            config.stoch_d_window,
        );
        let ath = running_high(&highs);
        let ath_lower = scaled(&ath, config.ath_ratio);

        ExtendedSeries {
            stoch_k_highest: stoch.highest,
            stoch_k_lowest: stoch.lowest,
            stoch_k_raw: stoch.raw,
            stoch_k: stoch.k,
            stoch_d: stoch.d,
            ath,
            ath_lower,
        }
    });

    Ok(DerivedSeries {
        hl2,
        sma_short,
        sma_long,
        ema_short,
        ema_long,
        ema_long_delta,
        stdev_short,
        bb_upper: bands.upper,
        bb_lower: bands.lower,
        extended,
    })
}
