//! Message parser - Turns raw message text into a bot command

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::errors::CommandError;
use crate::domain::entities::RollSpec;

/// Reply text when a `/roll` argument cannot be parsed
pub const INVALID_ROLL_FORMAT: &str = "Invalid format. Use /roll, /roll 20, or /roll NdM e.g. 2d6";

// `/roll@SomeBot` in group chats
static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w+").expect("mention pattern"));
static DICE_NOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})d(\d{1,4})$").expect("dice pattern"));

/// Commands the bot understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Flip,
    /// Trimmed, lower-cased argument, possibly empty
    Roll(String),
    Unknown,
}

/// Parse message text. Returns `None` if nothing is left after mentions
/// are stripped.
///
/// Matching is by prefix and case-insensitive, so `/ROLL` and `/rolling`
/// both count as `/roll`.
pub fn parse_command(text: &str) -> Option<BotCommand> {
    let stripped = MENTION.replace_all(text.trim(), "");
    let normalized = stripped.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let command = if normalized.starts_with("/start") {
        BotCommand::Start
    } else if normalized.starts_with("/help") {
        BotCommand::Help
    } else if normalized.starts_with("/flip") || normalized.starts_with("/coin") {
        BotCommand::Flip
    } else if let Some(arg) = normalized.strip_prefix("/roll") {
        BotCommand::Roll(arg.trim().to_string())
    } else {
        BotCommand::Unknown
    };

    Some(command)
}

/// Parse a `/roll` argument: empty, a face count, or `NdM`.
pub fn parse_roll_arg(arg: &str) -> Result<RollSpec, CommandError> {
    let arg = arg.trim().to_lowercase();
    if arg.is_empty() {
        return Ok(RollSpec::default());
    }

    if arg.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(RollSpec::new(1, parse_saturating(&arg)));
    }

    let caps = DICE_NOTATION
        .captures(&arg)
        .ok_or_else(|| CommandError::InvalidArgs(INVALID_ROLL_FORMAT.to_string()))?;

    Ok(RollSpec::new(parse_saturating(&caps[1]), parse_saturating(&caps[2])))
}

// Digit strings only; anything that overflows clamps to the max anyway.
fn parse_saturating(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(count: u64, faces: u64) -> RollSpec {
        RollSpec::new(count, faces)
    }

    #[test]
    fn test_basic_commands() {
        assert_eq!(parse_command("/start"), Some(BotCommand::Start));
        assert_eq!(parse_command("/help"), Some(BotCommand::Help));
        assert_eq!(parse_command("/flip"), Some(BotCommand::Flip));
        assert_eq!(parse_command("/coin"), Some(BotCommand::Flip));
        assert_eq!(parse_command("/roll"), Some(BotCommand::Roll(String::new())));
        assert_eq!(parse_command("hello"), Some(BotCommand::Unknown));
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        assert_eq!(parse_command("/START"), Some(BotCommand::Start));
        assert_eq!(parse_command("/Roll 2D6"), Some(BotCommand::Roll("2d6".to_string())));
    }

    #[test]
    fn test_prefix_matching() {
        assert_eq!(parse_command("/starting"), Some(BotCommand::Start));
        assert_eq!(parse_command("/rollx"), Some(BotCommand::Roll("x".to_string())));
    }

    #[test]
    fn test_mentions_are_stripped_anywhere() {
        assert_eq!(
            parse_command("/roll@DiceBot 1d20"),
            Some(BotCommand::Roll("1d20".to_string()))
        );
        assert_eq!(parse_command("@DiceBot /flip"), Some(BotCommand::Flip));
        assert_eq!(parse_command("/help @someone"), Some(BotCommand::Help));
    }

    #[test]
    fn test_blank_text_has_no_command() {
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("@DiceBot"), None);
    }

    #[test]
    fn test_roll_arg_forms() {
        assert_eq!(parse_roll_arg(""), Ok(spec(1, 6)));
        assert_eq!(parse_roll_arg("20"), Ok(spec(1, 20)));
        assert_eq!(parse_roll_arg("2d6"), Ok(spec(2, 6)));
        assert_eq!(parse_roll_arg(" 1D20 "), Ok(spec(1, 20)));
    }

    #[test]
    fn test_roll_arg_clamps() {
        assert_eq!(parse_roll_arg("99d9999"), Ok(spec(20, 1000)));
        assert_eq!(parse_roll_arg("0d1"), Ok(spec(1, 2)));
        assert_eq!(parse_roll_arg("1"), Ok(spec(1, 2)));
        assert_eq!(parse_roll_arg("123456789012345678901234567890"), Ok(spec(1, 1000)));
    }

    #[test]
    fn test_roll_arg_rejects_bad_syntax() {
        for bad in ["abc", "1d", "d6", "0d0x", "123d6", "1d12345", "2 d6", "-3", "1.5"] {
            assert_eq!(
                parse_roll_arg(bad),
                Err(CommandError::InvalidArgs(INVALID_ROLL_FORMAT.to_string())),
                "{bad} should be rejected"
            );
        }
    }
}
