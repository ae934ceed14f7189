// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_0  = x_0
//   EMA_t  = x_t * alpha + EMA_{t-1} * (1 - alpha)
//
// Seeded with the first observation and never bias-adjusted, so the series is
// defined from index 0 onward.
// =============================================================================

use super::rolling::Series;

/// Compute the EMA of `values` with smoothing `span`.
///
/// The output has the same length as the input.
///
/// # Edge cases
/// - `span == 0` => all `None` (no meaningful smoothing factor)
/// - A non-finite intermediate value ends the defined part of the series;
///   later positions stay `None`.
pub fn calculate_ema(values: &[f64], span: usize) -> Series {
    let mut out = vec![None; values.len()];
    if span == 0 {
        return out;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;

    for (i, &value) in values.iter().enumerate() {
        let ema = match prev {
            None => value,
            Some(p) => value * alpha + p * (1.0 - alpha),
        };
        if !ema.is_finite() {
            break;
        }
        out[i] = Some(ema);
        prev = Some(ema);
    }

    out
}

/// First difference: `out[i] = series[i] - series[i - 1]`, undefined at 0.
pub fn delta(series: &[Option<f64>]) -> Series {
    let mut out = vec![None; series.len()];
    for i in 1..series.len() {
        if let (Some(cur), Some(prev)) = (series[i], series[i - 1]) {
            out[i] = Some(cur - prev);
        }
    }
    out
}
