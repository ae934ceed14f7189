// =============================================================================
// Signals Module
// =============================================================================
//
// Turns the last row of derived indicator series into a highlight decision
// and the summary text posted for it.

pub mod breakout;
pub mod summary;

pub use breakout::{evaluate_signal, Signal};
