// =============================================================================
// Trailing-window statistics
// =============================================================================
//
// Every function returns a series of the same length as its input.  Position
// `i` is computed from the `window` values ending at `i` (inclusive) and is
// `None` when:
//   - `i < window - 1` (not enough history yet), or
//   - any value inside the window is itself `None`.
//
// A zero window yields an all-`None` series.
// =============================================================================

/// An index-aligned indicator series; `None` marks an undefined position.
pub type Series = Vec<Option<f64>>;

/// Value at the final position, if defined.
pub fn last_value(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

/// Lift a fully defined column into a [`Series`].
pub fn defined(values: &[f64]) -> Series {
    values.iter().copied().map(Some).collect()
}

/// Arithmetic mean over the trailing `window`.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Series {
    rolling_apply(values, window, |w| Some(w.iter().sum::<f64>() / w.len() as f64))
}

/// Sample standard deviation (n - 1 divisor) over the trailing `window`.
///
/// A single-value window has no sample deviation and stays `None`.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Series {
    rolling_apply(values, window, |w| {
        if w.len() < 2 {
            return None;
        }
        let n = w.len() as f64;
        let mean = w.iter().sum::<f64>() / n;
        let variance = w.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(variance.sqrt())
    })
}

/// Highest value over the trailing `window`.
pub fn rolling_max(values: &[f64], window: usize) -> Series {
    rolling_apply(&defined(values), window, |w| {
        Some(w.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    })
}

/// Lowest value over the trailing `window`.
pub fn rolling_min(values: &[f64], window: usize) -> Series {
    rolling_apply(&defined(values), window, |w| {
        Some(w.iter().copied().fold(f64::INFINITY, f64::min))
    })
}

fn rolling_apply<F>(values: &[Option<f64>], window: usize, reduce: F) -> Series
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }

    let mut buf = Vec::with_capacity(window);
    for i in (window - 1)..values.len() {
        buf.clear();
        buf.extend(values[i + 1 - window..=i].iter().flatten().copied());
        if buf.len() == window {
            out[i] = reduce(&buf).filter(|v| v.is_finite());
        }
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Option<f64>, b: f64) {
        let a = a.expect("value should be defined");
        assert!((a - b).abs() < 1e-10, "got {a}, expected {b}");
    }

    // ---- warm-up -----------------------------------------------------------

    #[test]
    fn leading_positions_undefined_for_every_window() {
        let values: Vec<f64> = (1..=25).map(|x| x as f64 * 1.5).collect();
        for window in 1..=30 {
            let sma = rolling_mean(&defined(&values), window);
            assert_eq!(sma.len(), values.len());
            for (i, v) in sma.iter().enumerate() {
                if i + 1 < window {
                    assert!(v.is_none(), "window {window}, index {i} should be undefined");
                } else {
                    let direct = values[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
                    assert_close(*v, direct);
                }
            }
        }
    }

    #[test]
    fn zero_window_is_all_undefined() {
        let sma = rolling_mean(&defined(&[1.0, 2.0, 3.0]), 0);
        assert_eq!(sma, vec![None, None, None]);
    }

    #[test]
    fn undefined_inside_window_propagates() {
        let values = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        let sma = rolling_mean(&values, 2);
        assert_eq!(sma[0], None);
        assert_eq!(sma[1], None);
        assert_eq!(sma[2], None);
        assert_close(sma[3], 3.5);
        assert_close(sma[4], 4.5);
    }

    // ---- standard deviation ------------------------------------------------

    #[test]
    fn std_uses_sample_divisor() {
        // mean 5, squared deviations sum to 32, n - 1 = 7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = rolling_std(&defined(&values), 8);
        assert_close(std[7], (32.0_f64 / 7.0).sqrt());
    }

    #[test]
    fn std_of_flat_window_is_zero() {
        let std = rolling_std(&defined(&[100.0; 12]), 10);
        assert_close(std[11], 0.0);
    }

    #[test]
    fn std_single_value_window_is_undefined() {
        let std = rolling_std(&defined(&[1.0, 2.0]), 1);
        assert_eq!(std, vec![None, None]);
    }

    // ---- extremes ----------------------------------------------------------

    #[test]
    fn max_and_min_track_trailing_window() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0];
        let max = rolling_max(&values, 3);
        let min = rolling_min(&values, 3);
        assert_eq!(max, vec![None, None, Some(4.0), Some(4.0), Some(5.0), Some(9.0), Some(9.0)]);
        assert_eq!(min, vec![None, None, Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(2.0)]);
    }

    #[test]
    fn window_longer_than_input() {
        assert_eq!(rolling_max(&[1.0, 2.0], 5), vec![None, None]);
    }
}
