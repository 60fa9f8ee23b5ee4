//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Errors: Domain-specific errors
//! - Messaging: Command parsing
//! - Services: Command interpretation, dice, the poll loop
//! - State: Offset and uptime shared with the health server

pub mod errors;
pub mod messaging;
pub mod services;
pub mod state;
