// =============================================================================
// Marketstack REST API Client — end-of-day bars
// =============================================================================
//
// SECURITY: The access key travels as a query parameter (Marketstack does not
// accept it as a header).  It is skipped in every traced span, and transport
// errors are stripped of their URL before they reach a log line.
// =============================================================================

use anyhow::{Context, Result};
use tracing::{debug, instrument};

/// Marketstack end-of-day API client.
#[derive(Clone)]
pub struct MarketstackClient {
    access_key: String,
    base_url: String,
    limit: u32,
    client: reqwest::Client,
}

impl MarketstackClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new `MarketstackClient`.
    ///
    /// # Arguments
    /// * `access_key` — Marketstack API key.
    /// * `base_url`   — end-of-day endpoint, e.g. `http://api.marketstack.com/v1/eod`.
    /// * `limit`      — number of most recent bars requested per symbol.
    pub fn new(
        access_key: impl Into<String>,
        base_url: impl Into<String>,
        limit: u32,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into();
        debug!(base_url = %base_url, limit, "MarketstackClient initialised");

        Ok(Self {
            access_key: access_key.into(),
            base_url,
            limit,
            client,
        })
    }

    // -------------------------------------------------------------------------
    // End-of-day data
    // -------------------------------------------------------------------------

    /// GET {base_url}?access_key=…&limit=…&symbols=… — raw response body.
    ///
    /// The body is returned unparsed so the caller can cache it verbatim.
    #[instrument(skip(self), name = "marketstack::get_eod")]
    pub async fn get_eod(&self, symbol: &str) -> Result<String> {
        let limit = self.limit.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("access_key", self.access_key.as_str()),
                ("limit", limit.as_str()),
                ("symbols", symbol),
            ])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("end-of-day request for {symbol} failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("failed to read end-of-day response body")?;

        if !status.is_success() {
            anyhow::bail!("Marketstack returned {} for {}: {}", status, symbol, body);
        }

        debug!(symbol, bytes = body.len(), "end-of-day data retrieved");
        Ok(body)
    }
}

impl std::fmt::Debug for MarketstackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketstackClient")
            .field("access_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("limit", &self.limit)
            .finish()
    }
}
