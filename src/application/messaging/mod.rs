//! Message handling - Command parsing

pub mod parser;

pub use parser::{parse_command, parse_roll_arg, BotCommand, INVALID_ROLL_FORMAT};
