// =============================================================================
// Delivery — where highlighted summaries end up
// =============================================================================

use anyhow::Result;
use tracing::debug;

use crate::discord::DiscordClient;
use crate::indicators::rolling::last_value;
use crate::scanner::SymbolAnalysis;

/// Destination for highlighted analyses.
#[allow(async_fn_in_trait)]
pub trait SignalSink {
    async fn deliver(&self, analysis: &SymbolAnalysis) -> Result<()>;
}

/// Prints summaries to stdout.  The full last derived row goes to the debug log.
pub struct ConsoleSink;

impl SignalSink for ConsoleSink {
    async fn deliver(&self, analysis: &SymbolAnalysis) -> Result<()> {
        let row: Vec<String> = analysis
            .derived
            .columns()
            .into_iter()
            .map(|(name, col)| match last_value(col) {
                Some(v) => format!("{name}={v:.4}"),
                None => format!("{name}=n/a"),
            })
            .collect();
        debug!(
            instrument = %analysis.instrument,
            date = %analysis.bars.last().date,
            volume = analysis.bars.last().volume,
            row = %row.join(" "),
            "last derived row"
        );

        println!("{}\n", analysis.signal.summary);
        Ok(())
    }
}

/// Posts each summary as its own Discord message.
pub struct DiscordSink {
    client: DiscordClient,
}

impl DiscordSink {
    pub fn new(client: DiscordClient) -> Self {
        Self { client }
    }
}

impl SignalSink for DiscordSink {
    async fn deliver(&self, analysis: &SymbolAnalysis) -> Result<()> {
        self.client.post_message(&analysis.signal.summary).await
    }
}
