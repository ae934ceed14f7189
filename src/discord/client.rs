// =============================================================================
// Discord REST API Client — channel messages via a bot token
// =============================================================================
//
// SECURITY: The bot token is sent only in the Authorization header, marked
// sensitive so it never shows up in debug output.
// =============================================================================

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::{debug, instrument};

const API_BASE: &str = "https://discord.com/api/v10";

/// Discord rejects message content longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Posts plain-text messages to a single channel.
#[derive(Clone)]
pub struct DiscordClient {
    channel_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl DiscordClient {
    /// Create a client that posts to `channel_id` as the bot owning `token`.
    pub fn new(token: &str, channel_id: impl Into<String>) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bot {token}"))
            .context("bot token contains invalid header characters")?;
        auth.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            channel_id: channel_id.into(),
            base_url: API_BASE.to_string(),
            client,
        })
    }

    /// POST /channels/{id}/messages.
    #[instrument(skip(self, content), name = "discord::post_message")]
    pub async fn post_message(&self, content: &str) -> Result<()> {
        let url = format!("{}/channels/{}/messages", self.base_url, self.channel_id);
        let body = serde_json::json!({ "content": truncate_message(content) });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("POST /channels/{id}/messages request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Discord POST message returned {}: {}", status, text);
        }

        debug!(channel = %self.channel_id, "message posted");
        Ok(())
    }
}

/// Cut `content` to at most [`MAX_MESSAGE_CHARS`] characters.
pub fn truncate_message(content: &str) -> &str {
    match content.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}
