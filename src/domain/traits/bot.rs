use async_trait::async_trait;
use crate::domain::entities::Update;
use crate::application::errors::BotError;

/// Bot trait - abstraction over the messaging platform transport
#[async_trait]
pub trait Bot: Send + Sync {
    /// Announce the bot is about to start polling
    async fn start(&self) -> Result<(), BotError> {
        Ok(())
    }

    /// Long-poll for updates with an id of at least `offset`
    async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>, BotError>;

    /// Send a message to a chat
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), BotError>;
}
