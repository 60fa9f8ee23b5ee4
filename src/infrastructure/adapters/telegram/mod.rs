//! Telegram adapter

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::errors::BotError;
use crate::domain::entities;
use crate::domain::traits::Bot;

/// Telegram API base URL
pub const API_BASE: &str = "https://api.telegram.org";

/// Added to the long-poll timeout to get the HTTP request timeout
const REQUEST_MARGIN: Duration = Duration::from_secs(10);

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub chat: Option<Chat>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: Option<i64>,
}

/// Envelope around every Bot API response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl From<Update> for entities::Update {
    fn from(update: Update) -> Self {
        let message = update.message.map(|msg| {
            entities::Message::new(msg.chat.and_then(|chat| chat.id), msg.text)
        });
        entities::Update::new(update.update_id, message)
    }
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    api_base: String,
    client: Client,
}

impl TelegramAdapter {
    /// `poll_timeout_secs` bounds how long a `getUpdates` call may hang.
    pub fn new(
        token: impl Into<String>,
        api_base: impl Into<String>,
        poll_timeout_secs: u64,
    ) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs) + REQUEST_MARGIN)
            .build()
            .map_err(|e| BotError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let api_base: String = api_base.into();
        Ok(Self {
            token: token.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// POST a JSON payload to a Bot API method and unwrap the envelope
    async fn call<P, T>(&self, method: &str, payload: &P) -> Result<T, BotError>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self.client
            .post(self.api_url(method))
            .json(payload)
            .send()
            .await
            .map_err(|e| BotError::Network(format!("{}: {}", method, e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BotError::Network(format!("{}: {}", method, e.without_url())))?;

        decode(method, status, &body)
    }
}

/// Interpret a Bot API response body.
///
/// Telegram answers errors with a JSON envelope too, so the body is read
/// before the status; the status only matters when the body is unreadable.
fn decode<T: DeserializeOwned>(method: &str, status: StatusCode, body: &str) -> Result<T, BotError> {
    let envelope: ApiResponse<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(BotError::Network(format!("{}: Telegram API error: {}", method, status)));
        }
        Err(e) => return Err(BotError::Parse(format!("{}: {}", method, e))),
    };

    if !envelope.ok {
        let reason = envelope.description.unwrap_or_else(|| status.to_string());
        return Err(BotError::Api(format!("{}: {}", method, reason)));
    }

    envelope
        .result
        .ok_or_else(|| BotError::Parse(format!("{}: response has no result", method)))
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        let prefix: String = self.token.chars().take(8).collect();
        tracing::info!("Starting Telegram bot (token: {}...)", prefix);
        Ok(())
    }

    async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<entities::Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            #[serde(skip_serializing_if = "Option::is_none")]
            offset: Option<i64>,
            timeout: u64,
            allowed_updates: Vec<&'static str>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message"],
        };

        let updates: Vec<Update> = self.call("getUpdates", &request).await?;
        Ok(updates.into_iter().map(Into::into).collect())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
        }

        tracing::debug!("Sending to {}: {}", chat_id, text);

        let request = SendMessageRequest { chat_id, text };
        let _sent: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        let adapter = TelegramAdapter::new("123:abc", "http://localhost:8081/", 50).unwrap();
        assert_eq!(adapter.api_url("getUpdates"), "http://localhost:8081/bot123:abc/getUpdates");
    }

    #[test]
    fn test_decode_updates() {
        let body = r#"{"ok":true,"result":[
            {"update_id":5,"message":{"message_id":1,"chat":{"id":42,"type":"private"},"text":"/roll 2d6"}},
            {"update_id":6,"edited_message":{"message_id":1,"chat":{"id":42}}},
            {"update_id":7,"message":{"message_id":2,"chat":{"id":42},"sticker":{}}}
        ]}"#;

        let updates: Vec<Update> = decode("getUpdates", StatusCode::OK, body).unwrap();
        let updates: Vec<entities::Update> = updates.into_iter().map(Into::into).collect();

        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0], entities::Update::text(5, 42, "/roll 2d6"));
        assert_eq!(updates[1], entities::Update::new(6, None));
        assert_eq!(
            updates[2],
            entities::Update::new(7, Some(entities::Message::new(Some(42), None)))
        );
    }

    #[test]
    fn test_decode_not_ok_is_api_error() {
        let body = r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#;
        let err = decode::<Vec<Update>>("getUpdates", StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert!(matches!(err, BotError::Api(ref m) if m.contains("Unauthorized")), "{err}");
    }

    #[test]
    fn test_decode_garbage_with_error_status_is_network_error() {
        let err = decode::<Vec<Update>>("getUpdates", StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert!(matches!(err, BotError::Network(_)), "{err}");
    }

    #[test]
    fn test_decode_garbage_with_ok_status_is_parse_error() {
        let err = decode::<Vec<Update>>("getUpdates", StatusCode::OK, "{\"ok\":true,\"result\":[{}]}").unwrap_err();
        assert!(matches!(err, BotError::Parse(_)), "{err}");
    }

    #[test]
    fn test_decode_missing_result() {
        let err = decode::<serde_json::Value>("sendMessage", StatusCode::OK, "{\"ok\":true}").unwrap_err();
        assert!(matches!(err, BotError::Parse(_)), "{err}");
    }
}
