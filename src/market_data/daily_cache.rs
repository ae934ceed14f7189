use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::marketstack::{parse_eod, MarketstackClient};
use crate::types::Instrument;

use super::{BarSeries, BarSource};

// ---------------------------------------------------------------------------
// DailyBarCache -- one raw vendor response per symbol per day
// ---------------------------------------------------------------------------

/// Bar source that downloads each symbol at most once per calendar day.
///
/// Raw Marketstack bodies are stored as `{data_dir}/{YYYY-MM-DD}-{data_symbol}.json`.
/// A file for today is reused as-is; otherwise the body is fetched, checked
/// to parse into a bar series, and written with a tmp + rename so a crash
/// never leaves a truncated file behind.  A body that does not parse is never
/// written, so the next run downloads it again.
pub struct DailyBarCache {
    client: MarketstackClient,
    data_dir: PathBuf,
    today: NaiveDate,
}

impl DailyBarCache {
    pub fn new(client: MarketstackClient, data_dir: impl Into<PathBuf>, today: NaiveDate) -> Self {
        Self {
            client,
            data_dir: data_dir.into(),
            today,
        }
    }

    /// Path of today's cache file for `data_symbol`.
    pub fn cache_path(&self, data_symbol: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}-{}.json", self.today, data_symbol))
    }

    /// Make sure today's file exists, downloading it if needed.
    ///
    /// Returns the path and whether the file was already present.
    pub async fn ensure_cached(&self, instrument: &Instrument) -> Result<(PathBuf, bool)> {
        let path = self.cache_path(&instrument.data_symbol);
        if tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("failed to stat {}", path.display()))?
        {
            debug!(symbol = %instrument.data_symbol, path = %path.display(), "cache hit");
            return Ok((path, true));
        }

        let body = self.client.get_eod(&instrument.data_symbol).await?;
        let series = parse_eod(&body).with_context(|| {
            format!("unusable end-of-day data for {}", instrument.data_symbol)
        })?;
        write_atomic(&path, &body).await?;
        debug!(symbol = %instrument.data_symbol, bars = series.len(), "response validated");
        info!(symbol = %instrument.data_symbol, path = %path.display(), "end-of-day data cached");
        Ok((path, false))
    }
}

impl BarSource for DailyBarCache {
    async fn fetch_bars(&self, instrument: &Instrument) -> Result<BarSeries> {
        let (path, _) = self.ensure_cached(instrument).await?;
        let body = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse_eod(&body).with_context(|| format!("invalid bar data in {}", path.display()))
    }
}

async fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, content)
        .await
        .with_context(|| format!("failed to write tmp file {}", tmp_path.display()))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("failed to rename tmp file to {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
