// =============================================================================
// Scanner — per-symbol fetch → indicators → signal, across the symbol list
// =============================================================================
//
// Pipeline per symbol:
//   1. Fetch bars from the bar source
//   2. Compute derived series
//   3. Evaluate breakout rules and render the summary
//
// Symbols share no state, so up to `concurrency` of them are in flight at
// once.  Results keep configuration order.  A symbol that fails at any step
// is recorded with its reason and the run continues with the rest.
// =============================================================================

use futures_util::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::delivery::SignalSink;
use crate::error::ConfigError;
use crate::indicators::{compute_indicators, DerivedSeries};
use crate::market_data::{BarSeries, BarSource, DailyBarCache};
use crate::runtime_config::ScannerConfig;
use crate::signals::{evaluate_signal, Signal};
use crate::types::Instrument;

// =============================================================================
// Results
// =============================================================================

/// Everything produced for one successfully analysed symbol.
#[derive(Debug, Clone)]
pub struct SymbolAnalysis {
    pub instrument: Instrument,
    pub bars: BarSeries,
    pub derived: DerivedSeries,
    pub signal: Signal,
}

/// A symbol that was skipped, with the reason.
#[derive(Debug, Error)]
#[error("{symbol}: {reason:#}")]
pub struct SymbolFailure {
    pub symbol: String,
    pub reason: anyhow::Error,
}

/// Outcome of a full scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub analyses: Vec<SymbolAnalysis>,
    pub failures: Vec<SymbolFailure>,
}

impl ScanReport {
    /// Analyses whose signal asked for attention, in configuration order.
    pub fn highlighted(&self) -> impl Iterator<Item = &SymbolAnalysis> {
        self.analyses.iter().filter(|a| a.signal.highlight)
    }
}

// =============================================================================
// Single symbol
// =============================================================================

/// Run the indicator pipeline and signal evaluator on already fetched bars.
pub fn analyze_symbol(
    instrument: &Instrument,
    bars: BarSeries,
    config: &ScannerConfig,
) -> Result<SymbolAnalysis, ConfigError> {
    let derived = compute_indicators(&bars, &config.analysis)?;
    let signal = evaluate_signal(&bars, &derived, instrument, &config.links, &config.analysis);

    debug!(
        symbol = %instrument.data_symbol,
        bars = bars.len(),
        from = %bars.bars()[0].date,
        to = %bars.last().date,
        highlight = signal.highlight,
        directions = ?signal.directions(),
        "symbol analysed"
    );

    Ok(SymbolAnalysis {
        instrument: instrument.clone(),
        bars,
        derived,
        signal,
    })
}

// =============================================================================
// Whole symbol list
// =============================================================================

/// Fetch and analyse every configured symbol.
pub async fn scan<S: BarSource>(source: &S, config: &ScannerConfig) -> ScanReport {
    let total = config.symbols.len();
    info!(symbols = total, "analysing stock data");

    let outcomes: Vec<Result<SymbolAnalysis, SymbolFailure>> =
        stream::iter(config.symbols.iter().enumerate())
            .map(|(index, instrument)| async move {
                info!("{} ({}/{})", instrument.name, index + 1, total);
                let failure = |reason: anyhow::Error| SymbolFailure {
                    symbol: instrument.data_symbol.clone(),
                    reason,
                };

                let bars = source.fetch_bars(instrument).await.map_err(failure)?;
                analyze_symbol(instrument, bars, config).map_err(|e| failure(e.into()))
            })
            .buffered(config.concurrency.max(1))
            .collect()
            .await;

    let mut report = ScanReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(analysis) => report.analyses.push(analysis),
            Err(failure) => {
                warn!(symbol = %failure.symbol, error = %format!("{:#}", failure.reason), "symbol skipped");
                report.failures.push(failure);
            }
        }
    }

    info!(
        analysed = report.analyses.len(),
        highlighted = report.highlighted().count(),
        failed = report.failures.len(),
        "scan complete"
    );
    report
}

/// Download today's data for every symbol without analysing it.
pub async fn warm_cache(cache: &DailyBarCache, config: &ScannerConfig) -> Vec<SymbolFailure> {
    let total = config.symbols.len();
    info!(symbols = total, "getting end-of-day data");

    let outcomes: Vec<Result<(), SymbolFailure>> = stream::iter(config.symbols.iter().enumerate())
        .map(|(index, instrument)| async move {
            let (path, existed) =
                cache
                    .ensure_cached(instrument)
                    .await
                    .map_err(|reason| SymbolFailure {
                        symbol: instrument.data_symbol.clone(),
                        reason,
                    })?;
            let note = if existed { "already exists " } else { "" };
            info!("{} => {} {}({}/{})", instrument.name, path.display(), note, index + 1, total);
            Ok::<(), SymbolFailure>(())
        })
        .buffered(config.concurrency.max(1))
        .collect()
        .await;

    let failures: Vec<SymbolFailure> = outcomes.into_iter().filter_map(Result::err).collect();
    for failure in &failures {
        warn!(symbol = %failure.symbol, error = %format!("{:#}", failure.reason), "download failed");
    }
    failures
}

/// Hand every highlighted analysis to `sink`.  Returns how many were delivered.
pub async fn deliver<K: SignalSink>(report: &ScanReport, sink: &K) -> usize {
    let mut delivered = 0;
    for analysis in report.highlighted() {
        match sink.deliver(analysis).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!(symbol = %analysis.instrument.data_symbol, error = %format!("{e:#}"), "delivery failed"),
        }
    }
    delivered
}
