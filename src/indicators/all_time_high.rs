// =============================================================================
// All-Time High tracking
// =============================================================================

use super::rolling::Series;

/// Running maximum of `highs`: `out[i] = max(highs[0..=i])`.
///
/// Defined at every position and non-decreasing.
pub fn running_high(highs: &[f64]) -> Series {
    highs
        .iter()
        .scan(f64::NEG_INFINITY, |peak, &h| {
            *peak = peak.max(h);
            Some(Some(*peak))
        })
        .collect()
}

/// Multiply every defined value by `ratio` (e.g. the "near the high" floor).
pub fn scaled(series: &[Option<f64>], ratio: f64) -> Series {
    series.iter().map(|v| v.map(|x| x * ratio)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_high_is_non_decreasing() {
        let highs = [5.0, 3.0, 8.0, 7.0, 8.5, 1.0];
        let ath = running_high(&highs);
        assert_eq!(
            ath,
            vec![Some(5.0), Some(5.0), Some(8.0), Some(8.0), Some(8.5), Some(8.5)]
        );
        for w in ath.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn truncation_gives_same_prefix() {
        let highs: Vec<f64> = (0..50).map(|i| 100.0 + ((i * 37) % 23) as f64).collect();
        let full = running_high(&highs);
        for k in 1..=highs.len() {
            assert_eq!(running_high(&highs[..k]), full[..k].to_vec());
        }
    }

    #[test]
    fn scaled_floor() {
        let floor = scaled(&[Some(200.0), None], 0.97);
        assert!((floor[0].unwrap() - 194.0).abs() < 1e-10);
        assert_eq!(floor[1], None);
    }
}
