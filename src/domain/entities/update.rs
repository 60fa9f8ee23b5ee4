/// An inbound update as seen by the poll loop.
///
/// Only message updates carry a payload; every other update kind arrives
/// with `message: None` but still advances the offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// Inbound chat message. Both fields are optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub chat_id: Option<i64>,
    pub text: Option<String>,
}

impl Update {
    pub fn new(update_id: i64, message: Option<Message>) -> Self {
        Self { update_id, message }
    }

    /// Update carrying a text message for `chat_id`
    pub fn text(update_id: i64, chat_id: i64, text: impl Into<String>) -> Self {
        Self::new(update_id, Some(Message::new(Some(chat_id), Some(text.into()))))
    }

    /// Chat id and text, if this update is something the interpreter can act on
    pub fn dispatchable(&self) -> Option<(i64, &str)> {
        let message = self.message.as_ref()?;
        let chat_id = message.chat_id?;
        let text = message.text.as_deref().filter(|t| !t.is_empty())?;
        Some((chat_id, text))
    }
}

impl Message {
    pub fn new(chat_id: Option<i64>, text: Option<String>) -> Self {
        Self { chat_id, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatchable_text_message() {
        let update = Update::text(5, 42, "/roll");
        assert_eq!(update.dispatchable(), Some((42, "/roll")));
    }

    #[test]
    fn test_non_message_update_is_not_dispatchable() {
        assert_eq!(Update::new(5, None).dispatchable(), None);
    }

    #[test]
    fn test_missing_chat_or_text_is_not_dispatchable() {
        let no_chat = Update::new(1, Some(Message::new(None, Some("/start".to_string()))));
        let no_text = Update::new(2, Some(Message::new(Some(7), None)));
        let empty_text = Update::new(3, Some(Message::new(Some(7), Some(String::new()))));

        assert_eq!(no_chat.dispatchable(), None);
        assert_eq!(no_text.dispatchable(), None);
        assert_eq!(empty_text.dispatchable(), None);
    }
}
