// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator series.  Every function returns one
// `Option<f64>` per input bar so callers are forced to handle insufficient
// history and degenerate windows explicitly.

pub mod all_time_high;
pub mod bollinger;
pub mod ema;
pub mod pipeline;
pub mod rolling;
pub mod stochastic;

pub use pipeline::{compute_indicators, DerivedSeries};
