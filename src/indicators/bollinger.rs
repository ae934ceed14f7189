// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the rolling sample standard
// deviation over the same window as the SMA.

use super::rolling::Series;

/// Upper and lower envelope, index-aligned with the middle band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSeries {
    pub upper: Series,
    pub lower: Series,
}

/// Build the bands from an already computed middle band and deviation.
///
/// A position is defined only where both inputs are defined.
pub fn calculate_bands(middle: &[Option<f64>], stdev: &[Option<f64>], num_std: f64) -> BandSeries {
    let (upper, lower) = middle
        .iter()
        .zip(stdev.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => (Some(m + num_std * s), Some(m - num_std * s)),
            _ => (None, None),
        })
        .unzip();

    BandSeries { upper, lower }
}
