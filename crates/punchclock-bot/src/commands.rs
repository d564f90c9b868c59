//! Chat command parsing

/// Commands understood by the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ClockIn,
    ClockOut,
    TimeBudget,
    Status,
    Help,
    /// A slash command the bot does not know
    Unknown(String),
}

impl Command {
    /// Parse the first word of a message.
    ///
    /// Returns `None` for plain text. A `@botname` suffix is accepted, as
    /// group chats send `/clock_in@my_bot`.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name).to_ascii_lowercase();

        Some(match name.as_str() {
            "clock_in" => Command::ClockIn,
            "clock_out" => Command::ClockOut,
            "time_budget" => Command::TimeBudget,
            "status" => Command::Status,
            "help" | "start" => Command::Help,
            _ => Command::Unknown(name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(Command::parse("/clock_in"), Some(Command::ClockIn));
        assert_eq!(Command::parse("/clock_out"), Some(Command::ClockOut));
        assert_eq!(Command::parse("/time_budget"), Some(Command::TimeBudget));
        assert_eq!(Command::parse("/status"), Some(Command::Status));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("/start"), Some(Command::Help));
    }

    #[test]
    fn accepts_bot_suffix_and_trailing_text() {
        assert_eq!(Command::parse("/clock_in@punch_bot"), Some(Command::ClockIn));
        assert_eq!(Command::parse("  /Clock_Out now please"), Some(Command::ClockOut));
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn unknown_commands_keep_their_name() {
        assert_eq!(
            Command::parse("/get_entries"),
            Some(Command::Unknown("get_entries".into()))
        );
    }
}
