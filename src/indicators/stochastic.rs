// =============================================================================
// Stochastic Oscillator (%K / %D)
// =============================================================================
//
// Locates the close within the trailing high/low range, then smooths twice:
//
//   raw_t = (close_t - lowest_low) / (highest_high - lowest_low)
//   %K    = SMA(raw, k_smooth)
//   %D    = SMA(%K, d_window)
//
// Values are fractions in [0, 1], not percentages.  A flat range (highest ==
// lowest) has no defined position and yields `None` rather than NaN/inf, and
// that `None` carries through both smoothing passes.
// =============================================================================

use super::rolling::{rolling_max, rolling_mean, rolling_min, Series};

/// Every intermediate column of the oscillator, index-aligned with the bars.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub highest: Series,
    pub lowest: Series,
    pub raw: Series,
    pub k: Series,
    pub d: Series,
}

/// Compute the smoothed stochastic oscillator.
///
/// `highs`, `lows` and `closes` must have the same length.
pub fn calculate_stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_window: usize,
    k_smooth: usize,
    d_window: usize,
) -> StochasticSeries {
    let highest = rolling_max(highs, k_window);
    let lowest = rolling_min(lows, k_window);

    let raw: Series = closes
        .iter()
        .zip(highest.iter().zip(lowest.iter()))
        .map(|(&close, (&hi, &lo))| raw_position(close, hi?, lo?))
        .collect();

    let k = rolling_mean(&raw, k_smooth);
    let d = rolling_mean(&k, d_window);

    StochasticSeries {
        highest,
        lowest,
        raw,
        k,
        d,
    }
}

fn raw_position(close: f64, highest: f64, lowest: f64) -> Option<f64> {
    let range = highest - lowest;
    if range <= 0.0 || !range.is_finite() {
        return None;
    }
    // Bars keep close within [low, high], so only rounding reaches the clamp.
    Some(((close - lowest) / range).clamp(0.0, 1.0))
}
