pub mod bar_series;
pub mod daily_cache;

use anyhow::Result;

use crate::types::Instrument;

// Re-export the bar types for convenient access (e.g. `use crate::market_data::Bar`).
pub use bar_series::{Bar, BarSeries};
pub use daily_cache::DailyBarCache;

/// Supplies oldest-first bars for one instrument.
#[allow(async_fn_in_trait)]
pub trait BarSource {
    async fn fetch_bars(&self, instrument: &Instrument) -> Result<BarSeries>;
}
