//! Long-polling update loop
//!
//! Fetches updates past the held offset, hands each message to a
//! [`CommandHandler`] and sends the reply back. The offset is advanced
//! before a message is dispatched, so a message whose handler fails is not
//! fetched again: delivery is at-most-once.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::application::errors::BotError;
use crate::application::state::BotState;
use crate::domain::traits::{Bot, CommandHandler};

/// Sent to the log chat once polling begins
pub const STARTUP_NOTICE: &str = "✅ Bot started (polling mode)";

/// Timing knobs for the poll loop
#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    /// Long-poll timeout passed to the platform, in seconds
    pub timeout_secs: u64,
    /// Pause between successful cycles
    pub idle_delay: Duration,
    /// Pause after a failed fetch
    pub retry_delay: Duration,
    /// Chat that gets [`STARTUP_NOTICE`]
    pub log_chat_id: Option<String>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 50,
            idle_delay: Duration::from_millis(500),
            retry_delay: Duration::from_secs(2),
            log_chat_id: None,
        }
    }
}

pub struct Poller<B, H> {
    bot: Arc<B>,
    handler: H,
    state: Arc<BotState>,
    settings: PollSettings,
}

impl<B, H> Poller<B, H>
where
    B: Bot + 'static,
    H: CommandHandler + 'static,
{
    pub fn new(bot: Arc<B>, handler: H, state: Arc<BotState>, settings: PollSettings) -> Self {
        Self {
            bot,
            handler,
            state,
            settings,
        }
    }

    /// Spawn the loop on the current runtime.
    ///
    /// Only the first call for a given [`BotState`] spawns anything; later
    /// calls return `None`.
    pub fn start(self) -> Option<JoinHandle<()>> {
        if !self.state.claim_poller() {
            tracing::debug!("Poller already started, ignoring");
            return None;
        }
        Some(tokio::spawn(self.run()))
    }

    /// Poll until the shared state is stopped. Fetch failures never end the loop.
    pub async fn run(mut self) {
        if let Err(e) = self.bot.start().await {
            tracing::warn!("Bot start hook failed: {}", e);
        }
        announce(self.bot.as_ref(), self.settings.log_chat_id.as_deref()).await;

        tracing::info!(
            timeout_secs = self.settings.timeout_secs,
            "Telegram poller started"
        );

        while self.state.is_running() {
            match self.poll_once().await {
                Ok(_) => tokio::time::sleep(self.settings.idle_delay).await,
                Err(e) => {
                    tracing::warn!(
                        "Failed to get updates, retrying in {:?}: {}",
                        self.settings.retry_delay,
                        e
                    );
                    tokio::time::sleep(self.settings.retry_delay).await;
                }
            }
        }

        tracing::info!("Telegram poller stopped");
    }

    /// One fetch-and-dispatch cycle. Returns the number of replies delivered.
    ///
    /// Only the fetch itself can fail; handler and send failures are logged
    /// and the batch carries on.
    pub async fn poll_once(&mut self) -> Result<usize, BotError> {
        let offset = self.state.next_offset();
        let updates = self
            .bot
            .get_updates(offset, self.settings.timeout_secs)
            .await?;

        if !updates.is_empty() {
            tracing::debug!("Received {} updates", updates.len());
        }

        let mut delivered = 0;
        for update in &updates {
            self.state.advance_offset(update.update_id);

            let Some((chat_id, text)) = update.dispatchable() else {
                continue;
            };

            let reply = match self.handler.handle(text) {
                Ok(Some(reply)) => reply,
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!(update_id = update.update_id, "Failed to handle message: {}", e);
                    continue;
                }
            };

            let chat_id = chat_id.to_string();
            match self.bot.send_message(&chat_id, &reply).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::error!(chat_id = %chat_id, "Failed to send message: {}", e);
                }
            }
        }

        Ok(delivered)
    }
}

async fn announce<B: Bot + ?Sized>(bot: &B, log_chat_id: Option<&str>) {
    let Some(chat_id) = log_chat_id else {
        return;
    };
    if let Err(e) = bot.send_message(chat_id, STARTUP_NOTICE).await {
        tracing::warn!("Failed to send startup notice: {}", e);
    }
}
