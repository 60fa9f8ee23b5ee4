//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    /// The platform answered but reported `ok: false`.
    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_args_displays_bare_message() {
        let err = CommandError::InvalidArgs("bad roll".to_string());
        assert_eq!(err.to_string(), "bad roll");
    }

    #[test]
    fn test_command_error_converts_into_bot_error() {
        let err: BotError = CommandError::ExecutionFailed("boom".to_string()).into();
        assert!(matches!(err, BotError::Command(_)));
        assert_eq!(err.to_string(), "Command error: Execution failed: boom");
    }
}
