//! dice-bot - a small Telegram bot that flips coins and rolls dice
//!
//! The bot long-polls the Bot API from a background task and serves a
//! health endpoint alongside it. Both share one [`BotState`].

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::errors::{BotError, CommandError, ConfigError};
pub use application::state::BotState;
