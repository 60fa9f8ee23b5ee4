//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Platform integrations (Telegram)
//! - Server: Health-check HTTP endpoint

pub mod adapters;
pub mod config;
pub mod server;
