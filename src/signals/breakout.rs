// =============================================================================
// Breakout Evaluator
// =============================================================================
//
// Reduces the last row of the derived series to a highlight decision.
//
// Upward breakout:
//   (close > bb_upper AND trend < 0)
//   OR (extended: %K > high AND %D > high AND trend > 0)
//
// Downward breakout:
//   (close < bb_lower AND trend > 0)
//   OR (extended: %K < low AND %D < low AND trend > 0)
//   OR (extended: high > ath_lower)
//
// where trend = ema_long_delta.  The first upward clause pairs a bullish
// price move with a falling trend; it is kept exactly as the rule set was
// defined.
//
// Any comparison involving an undefined value is false, so a rule that
// cannot be evaluated simply does not fire.
// =============================================================================

use crate::indicators::rolling::last_value;
use crate::indicators::DerivedSeries;
use crate::market_data::BarSeries;
use crate::runtime_config::{AnalysisConfig, LinkTemplates};
use crate::types::{BreakoutDirection, Instrument};

use super::summary::{render_summary, BandValues};

/// Outcome of evaluating one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub highlight: bool,
    pub upward_breakout: bool,
    pub downward_breakout: bool,
    pub summary: String,
}

impl Signal {
    /// Directions that fired, upward first.
    pub fn directions(&self) -> Vec<BreakoutDirection> {
        fired(self.upward_breakout, self.downward_breakout)
    }
}

fn fired(upward: bool, downward: bool) -> Vec<BreakoutDirection> {
    let mut dirs = Vec::with_capacity(2);
    if upward {
        dirs.push(BreakoutDirection::Upward);
    }
    if downward {
        dirs.push(BreakoutDirection::Downward);
    }
    dirs
}

/// Last-row values the rules look at.
#[derive(Debug, Clone, Copy)]
struct LastRow {
    close: f64,
    high: f64,
    trend: Option<f64>,
    bb_upper: Option<f64>,
    bb_lower: Option<f64>,
    stoch_k: Option<f64>,
    stoch_d: Option<f64>,
    ath_lower: Option<f64>,
}

fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

fn lt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

fn upward(row: &LastRow, config: &AnalysisConfig) -> bool {
    let high = Some(config.stoch_high);
    let zero = Some(0.0);

    let band_break = gt(Some(row.close), row.bb_upper) && lt(row.trend, zero);
    let overbought = gt(row.stoch_k, high) && gt(row.stoch_d, high) && gt(row.trend, zero);

    band_break || overbought
}

fn downward(row: &LastRow, config: &AnalysisConfig) -> bool {
    let low = Some(config.stoch_low);
    let zero = Some(0.0);

    let band_break = lt(Some(row.close), row.bb_lower) && gt(row.trend, zero);
    let oversold = lt(row.stoch_k, low) && lt(row.stoch_d, low) && gt(row.trend, zero);
    let near_ath = gt(Some(row.high), row.ath_lower);

    band_break || oversold || near_ath
}

/// Evaluate the breakout rules on the last bar and derived row.
///
/// `derived` must come from [`compute_indicators`](crate::indicators::compute_indicators)
/// on the same `bars`.  Without the extension the stochastic and all-time-high
/// clauses never fire and the summary lists the band values instead.
pub fn evaluate_signal(
    bars: &BarSeries,
    derived: &DerivedSeries,
    instrument: &Instrument,
    links: &LinkTemplates,
    config: &AnalysisConfig,
) -> Signal {
    let last = bars.last();
    let ext = derived.extended.as_ref();
    let row = LastRow {
        close: last.close,
        high: last.high,
        trend: last_value(&derived.ema_long_delta),
        bb_upper: last_value(&derived.bb_upper),
        bb_lower: last_value(&derived.bb_lower),
        stoch_k: ext.and_then(|e| last_value(&e.stoch_k)),
        stoch_d: ext.and_then(|e| last_value(&e.stoch_d)),
        ath_lower: ext.and_then(|e| last_value(&e.ath_lower)),
    };

    let upward_breakout = upward(&row, config);
    let downward_breakout = downward(&row, config);

    let directions = fired(upward_breakout, downward_breakout);

    let bands = derived.extended.is_none().then_some(BandValues {
        upper: row.bb_upper,
        lower: row.bb_lower,
    });
    let summary = render_summary(instrument, last, bands.as_ref(), &directions, links);

    Signal {
        highlight: upward_breakout || downward_breakout,
        upward_breakout,
        downward_breakout,
        summary,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::compute_indicators;
    use crate::market_data::bar_series::tests::{bar, flat};
    use crate::market_data::Bar;

    fn silver() -> Instrument {
        Instrument::new("SLV", "SLV", "Silver")
    }

    fn run(bars: Vec<Bar>, config: &AnalysisConfig) -> Signal {
        let bars = BarSeries::new(bars).unwrap();
        let derived = compute_indicators(&bars, config).unwrap();
        evaluate_signal(&bars, &derived, &silver(), &LinkTemplates::default(), config)
    }

    fn bands_only() -> AnalysisConfig {
        AnalysisConfig {
            extended: false,
            ..AnalysisConfig::default()
        }
    }

    fn row() -> LastRow {
        LastRow {
            close: 100.0,
            high: 101.0,
            trend: None,
            bb_upper: None,
            bb_lower: None,
            stoch_k: None,
            stoch_d: None,
            ath_lower: None,
        }
    }

    // ---- scenarios -----------------------------------------------------------

    #[test]
    fn short_history_never_highlights() {
        let bars: Vec<Bar> = (0..9)
            .map(|i| {
                let base = 10.0 + i as f64;
                bar(i, base, base + 1.0, base - 1.0, base + 0.5)
            })
            .collect();
        let signal = run(bars, &bands_only());
        assert!(!signal.highlight);
        assert!(signal.summary.contains("bb_upper  n/a"));
        assert!(!signal.summary.contains("direction="));
    }

    #[test]
    fn spike_above_flat_bands_with_falling_trend_fires_upward() {
        // 100 days at 300, 50 days at 100, then a jump to 130
        let mut bars: Vec<Bar> = (0..100).map(|i| flat(i, 300.0)).collect();
        bars.extend((100..150).map(|i| flat(i, 100.0)));
        bars.push(bar(150, 100.0, 130.0, 100.0, 130.0));

        let config = AnalysisConfig::default();
        let series = BarSeries::new(bars.clone()).unwrap();
        let derived = compute_indicators(&series, &config).unwrap();
        assert!(last_value(&derived.ema_long_delta).unwrap() < 0.0);
        assert!(last_value(&derived.bb_upper).unwrap() < 130.0);

        let signal = run(bars, &config);
        assert!(signal.upward_breakout);
        assert!(!signal.downward_breakout);
        assert!(signal.highlight);
        assert!(signal.summary.ends_with(
            "<https://www.nordnet.fi/markkinakatsaus/sertifikaatit?direction=D&underlyingName=Silver>"
        ));
    }

    #[test]
    fn high_near_all_time_high_fires_downward() {
        let mut bars: Vec<Bar> = (0..30).map(|i| flat(i, 150.0)).collect();
        bars[20] = bar(20, 150.0, 200.0, 150.0, 180.0);
        bars.push(bar(30, 186.0, 195.0, 185.0, 190.0));

        let signal = run(bars, &AnalysisConfig::default());
        assert!(signal.downward_breakout);
        assert!(!signal.upward_breakout);
        assert!(signal.summary.contains("direction=U"));
        assert!(!signal.summary.contains("bb_upper"));
    }

    #[test]
    fn all_time_high_rule_needs_extension() {
        let mut bars: Vec<Bar> = (0..30).map(|i| flat(i, 150.0)).collect();
        bars[20] = bar(20, 150.0, 200.0, 150.0, 180.0);
        bars.push(bar(30, 186.0, 195.0, 185.0, 190.0));

        let signal = run(bars, &bands_only());
        assert!(!signal.downward_breakout);
    }

    #[test]
    fn rules_read_the_final_derived_row() {
        // Quiet history, then force the last band and trend values so only the
        // upward band clause can fire.
        let bars: Vec<Bar> = (0..30).map(|i| bar(i, 100.0, 101.0, 99.0, 100.0)).collect();
        let series = BarSeries::new(bars).unwrap();
        let config = bands_only();
        let mut derived = compute_indicators(&series, &config).unwrap();

        let n = derived.bb_upper.len();
        derived.bb_upper[n - 1] = Some(99.5);
        derived.ema_long_delta[n - 1] = Some(-0.25);
        let signal = evaluate_signal(&series, &derived, &silver(), &LinkTemplates::default(), &config);
        assert!(signal.upward_breakout);
        assert!(!signal.downward_breakout);

        // Same override one row earlier has no effect.
        let mut derived = compute_indicators(&series, &config).unwrap();
        derived.bb_upper[n - 2] = Some(99.5);
        derived.ema_long_delta[n - 2] = Some(-0.25);
        let signal = evaluate_signal(&series, &derived, &silver(), &LinkTemplates::default(), &config);
        assert!(!signal.highlight);
    }

    #[test]
    fn extended_columns_feed_the_oscillator_rules() {
        let bars: Vec<Bar> = (0..30).map(|i| bar(i, 100.0, 101.0, 99.0, 100.0)).collect();
        let series = BarSeries::new(bars).unwrap();
        let config = AnalysisConfig {
            ath_ratio: 1.0,
            ..AnalysisConfig::default()
        };
        let mut derived = compute_indicators(&series, &config).unwrap();
        let n = derived.ema_long_delta.len();
        derived.ema_long_delta[n - 1] = Some(0.5);
        let ext = derived.extended.as_mut().unwrap();
        ext.stoch_k[n - 1] = Some(0.1);
        ext.stoch_d[n - 1] = Some(0.1);

        let signal = evaluate_signal(&series, &derived, &silver(), &LinkTemplates::default(), &config);
        assert!(signal.downward_breakout);
        assert!(!signal.upward_breakout);
    }

    // ---- individual clauses --------------------------------------------------

    #[test]
    fn undefined_values_never_trigger() {
        let config = AnalysisConfig::default();
        assert!(!upward(&row(), &config));
        assert!(!downward(&row(), &config));

        let mut r = row();
        r.bb_upper = Some(90.0);
        assert!(!upward(&r, &config), "trend undefined");
    }

    #[test]
    fn upward_band_clause_requires_negative_trend() {
        let config = AnalysisConfig::default();
        let mut r = row();
        r.bb_upper = Some(99.0);
        r.trend = Some(0.5);
        assert!(!upward(&r, &config));
        r.trend = Some(-0.5);
        assert!(upward(&r, &config));
    }

    #[test]
    fn downward_band_clause_requires_positive_trend() {
        let config = AnalysisConfig::default();
        let mut r = row();
        r.bb_lower = Some(101.0);
        r.trend = Some(-0.1);
        assert!(!downward(&r, &config));
        r.trend = Some(0.1);
        assert!(downward(&r, &config));
    }

    #[test]
    fn stochastic_clauses() {
        let config = AnalysisConfig::default();
        let mut r = row();
        r.trend = Some(0.2);

        r.stoch_k = Some(0.9);
        r.stoch_d = Some(0.85);
        assert!(upward(&r, &config));
        r.stoch_d = Some(0.7);
        assert!(!upward(&r, &config));

        r.stoch_k = Some(0.1);
        r.stoch_d = Some(0.15);
        assert!(downward(&r, &config));
        r.trend = Some(-0.2);
        assert!(!downward(&r, &config), "oversold needs a rising trend");
    }

    #[test]
    fn both_directions_can_fire() {
        let config = AnalysisConfig::default();
        let mut r = row();
        r.trend = Some(0.3);
        r.stoch_k = Some(0.95);
        r.stoch_d = Some(0.9);
        r.ath_lower = Some(100.5);
        assert!(upward(&r, &config));
        assert!(downward(&r, &config));
    }

    #[test]
    fn directions_follow_flags() {
        let signal = Signal {
            highlight: true,
            upward_breakout: false,
            downward_breakout: true,
            summary: String::new(),
        };
        assert_eq!(signal.directions(), vec![BreakoutDirection::Downward]);
    }
}
