use crate::application::errors::CommandError;

/// Turns one inbound message text into at most one reply.
pub trait CommandHandler: Send {
    fn handle(&mut self, text: &str) -> Result<Option<String>, CommandError>;
}
