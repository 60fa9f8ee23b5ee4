//! Command interpreter - turns message text into a reply

use rand::rngs::StdRng;

use crate::application::errors::CommandError;
use crate::application::messaging::{parse_command, parse_roll_arg, BotCommand};
use crate::domain::traits::{CommandHandler, DiceSource};
use super::dice::{self, RngDice};

/// Reply to `/start` and `/help`
pub const USAGE: &str = "👋 Namaste! Main ek simple bot hoon.\n\n\
Commands:\n\
• /flip — flip a coin\n\
• /coin — same as /flip\n\
• /roll — roll 1–6\n\
• /roll NdM — e.g. 2d6, 1d20\n\
• /help — show commands\n";

pub const HEADS: &str = "🪙 HEADS";
pub const TAILS: &str = "🪙 TAILS";
pub const UNKNOWN_COMMAND: &str = "🤖 Unknown command. Type /help";

/// Interprets message text and produces the reply
pub struct CommandService<D> {
    dice: D,
}

impl CommandService<RngDice<StdRng>> {
    pub fn from_entropy() -> Self {
        Self::new(RngDice::from_entropy())
    }
}

impl<D: DiceSource> CommandService<D> {
    pub fn new(dice: D) -> Self {
        Self { dice }
    }

    pub fn dice(&self) -> &D {
        &self.dice
    }

    /// Reply for `text`, or `None` when there is nothing to answer
    pub fn interpret(&mut self, text: &str) -> Option<String> {
        let reply = match parse_command(text)? {
            BotCommand::Start | BotCommand::Help => USAGE.to_string(),
            BotCommand::Flip => {
                let side = if self.dice.flip() { HEADS } else { TAILS };
                side.to_string()
            }
            BotCommand::Roll(arg) => match parse_roll_arg(&arg) {
                Ok(spec) => dice::roll(spec, &mut self.dice).to_string(),
                Err(e) => format!("❌ {}", e),
            },
            BotCommand::Unknown => UNKNOWN_COMMAND.to_string(),
        };
        Some(reply)
    }
}

impl<D: DiceSource> CommandHandler for CommandService<D> {
    fn handle(&mut self, text: &str) -> Result<Option<String>, CommandError> {
        let reply = self.interpret(text);
        if let Some(reply) = &reply {
            tracing::debug!("Reply: {}", reply);
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::messaging::INVALID_ROLL_FORMAT;

    /// Always rolls the same value and counts how often it was asked
    struct FixedDice {
        value: u32,
        heads: bool,
        calls: usize,
    }

    impl FixedDice {
        fn new(value: u32) -> Self {
            Self { value, heads: true, calls: 0 }
        }
    }

    impl DiceSource for FixedDice {
        fn roll(&mut self, faces: u32) -> u32 {
            self.calls += 1;
            self.value.min(faces)
        }

        fn flip(&mut self) -> bool {
            self.calls += 1;
            self.heads
        }
    }

    fn invalid_format() -> String {
        format!("❌ {}", INVALID_ROLL_FORMAT)
    }

    #[test]
    fn test_start_and_help_return_usage() {
        let mut service = CommandService::new(FixedDice::new(1));
        assert_eq!(service.interpret("/start").as_deref(), Some(USAGE));
        assert_eq!(service.interpret("/help").as_deref(), Some(USAGE));
        assert_eq!(service.interpret("/start@DiceBot").as_deref(), Some(USAGE));
        assert_eq!(service.dice().calls, 0);
    }

    #[test]
    fn test_usage_lists_every_command() {
        for command in ["/flip", "/coin", "/roll", "/roll NdM", "/help"] {
            assert!(USAGE.contains(command), "usage is missing {command}");
        }
    }

    #[test]
    fn test_flip_and_coin() {
        let mut service = CommandService::new(FixedDice::new(1));
        assert_eq!(service.interpret("/flip").as_deref(), Some(HEADS));
        service.dice.heads = false;
        assert_eq!(service.interpret("/coin").as_deref(), Some(TAILS));
    }

    #[test]
    fn test_roll_2d6_with_fixed_dice() {
        let mut service = CommandService::new(FixedDice::new(3));
        assert_eq!(
            service.interpret("/roll 2d6").as_deref(),
            Some("🎲 2d6 → [3, 3] = 6")
        );
    }

    #[test]
    fn test_bare_roll_matches_1d6() {
        let mut service = CommandService::new(FixedDice::new(4));
        let bare = service.interpret("/roll");
        let explicit = service.interpret("/roll 1d6");
        assert_eq!(bare.as_deref(), Some("🎲 d6 → 4"));
        assert_eq!(bare, explicit);
    }

    #[test]
    fn test_roll_with_face_count() {
        let mut service = CommandService::new(FixedDice::new(20));
        assert_eq!(service.interpret("/roll 20").as_deref(), Some("🎲 d20 → 20"));
    }

    #[test]
    fn test_roll_clamps_silently() {
        let mut service = CommandService::new(FixedDice::new(1));
        let reply = service.interpret("/roll 99d9999").unwrap();
        assert!(reply.starts_with("🎲 20d1000 → "), "{reply}");
        assert_eq!(service.dice().calls, 20);
    }

    #[test]
    fn test_malformed_roll_consumes_no_entropy() {
        let mut service = CommandService::new(FixedDice::new(1));
        for bad in ["/roll abc", "/roll 1d", "/roll d6", "/roll 0d0x", "/roll xyz"] {
            assert_eq!(service.interpret(bad), Some(invalid_format()), "{bad}");
        }
        assert_eq!(service.dice().calls, 0);
    }

    #[test]
    fn test_unknown_command() {
        let mut service = CommandService::new(FixedDice::new(1));
        assert_eq!(service.interpret("/weather").as_deref(), Some(UNKNOWN_COMMAND));
        assert_eq!(service.interpret("hi there").as_deref(), Some(UNKNOWN_COMMAND));
    }

    #[test]
    fn test_blank_text_gets_no_reply() {
        let mut service = CommandService::new(FixedDice::new(1));
        assert_eq!(service.interpret("  @DiceBot  "), None);
    }

    #[test]
    fn test_real_flip_is_fair() {
        let mut service = CommandService::from_entropy();
        let mut heads = 0;
        for _ in 0..10_000 {
            match service.interpret("/flip").as_deref() {
                Some(HEADS) => heads += 1,
                Some(TAILS) => {}
                other => panic!("unexpected flip reply {:?}", other),
            }
        }
        // ~6 standard deviations either side
        assert!((4_700..=5_300).contains(&heads), "{heads} heads");
    }

    #[test]
    fn test_handle_never_fails() {
        let mut service = CommandService::new(FixedDice::new(2));
        assert_eq!(service.handle("/roll"), Ok(Some("🎲 d6 → 2".to_string())));
    }
}
