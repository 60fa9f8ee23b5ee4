//! Application services - Business logic orchestration

pub mod command_service;
pub mod dice;
pub mod poller;

pub use command_service::CommandService;
pub use dice::RngDice;
pub use poller::{PollSettings, Poller};
