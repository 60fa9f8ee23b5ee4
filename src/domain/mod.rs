//! Domain layer - Core types with no I/O
//! 
//! This layer contains:
//! - Entities: Updates, messages, roll specifications
//! - Traits: Abstractions for infrastructure (Bot, CommandHandler, DiceSource)

pub mod entities;
pub mod traits;
