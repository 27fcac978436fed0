/// How an inbound text reads to this bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed {
    Command(Command),
    /// A known command meant for a different bot.
    OtherBot,
    Text,
}

/// Slash commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Languages,
    Lesson,
    Continue,
    Quiz,
    Exit,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::Start,
        Command::Help,
        Command::Languages,
        Command::Lesson,
        Command::Continue,
        Command::Quiz,
        Command::Exit,
    ];

    /// Recognises `/name`, `/name@botname` and `/name with args`.
    ///
    /// Anything else, including unknown slash commands, is free text. A
    /// `@botname` suffix that differs from `bot_username` (compared without
    /// case) addresses another bot in the same group. With no username
    /// configured every suffix is accepted.
    #[must_use]
    pub fn parse(text: &str, bot_username: Option<&str>) -> Parsed {
        let Some(name) = text
            .split_whitespace()
            .next()
            .and_then(|first| first.strip_prefix('/'))
        else {
            return Parsed::Text;
        };
        let (name, addressee) = match name.split_once('@') {
            Some((name, bot)) => (name, Some(bot)),
            None => (name, None),
        };
        let Some(command) = Self::ALL.into_iter().find(|cmd| cmd.name() == name) else {
            return Parsed::Text;
        };
        match (addressee, bot_username) {
            (Some(addressee), Some(ours)) if !addressee.eq_ignore_ascii_case(ours) => {
                Parsed::OtherBot
            }
            _ => Parsed::Command(command),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Languages => "languages",
            Command::Lesson => "lesson",
            Command::Continue => "continue",
            Command::Quiz => "quiz",
            Command::Exit => "exit",
        }
    }
}
