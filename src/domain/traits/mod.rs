//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod dice;
pub mod handler;

pub use bot::Bot;
pub use dice::DiceSource;
pub use handler::CommandHandler;
