//! Domain entities

pub mod roll;
pub mod update;

pub use roll::{RollOutcome, RollSpec};
pub use update::{Message, Update};
