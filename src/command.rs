//! Command parsing
//!
//! Turns a raw input line into a closed `Command` variant so the lobby can
//! dispatch with an exhaustive match instead of prefix comparisons.

/// A recognized `/`-prefixed command
///
/// Arguments run from the first space to the end of the line, so room and
/// display names may contain spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/create <name>` - create a chat room
    Create(String),
    /// `/list` - list all chat rooms
    List,
    /// `/join <name>` - join a chat room
    Join(String),
    /// `/leave` - leave the current chat room
    Leave,
    /// `/name <name>` - change display name
    Name(String),
    /// `/help` - list all commands
    Help,
    /// `/quit` - disconnect from the server
    Quit,
}

impl Command {
    /// Parse a line into a command, or `None` if the line is chat text
    ///
    /// The first space-delimited token must match a command word exactly.
    /// A command that requires an argument but has none is not recognized
    /// and falls through to the chat path.
    pub fn parse(line: &str) -> Option<Command> {
        let (word, arg) = match line.split_once(' ') {
            Some((word, arg)) => (word, arg),
            None => (line, ""),
        };

        match word {
            "/create" => non_empty(arg).map(Command::Create),
            "/list" => Some(Command::List),
            "/join" => non_empty(arg).map(Command::Join),
            "/leave" => Some(Command::Leave),
            "/name" => non_empty(arg).map(Command::Name),
            "/help" => Some(Command::Help),
            "/quit" => Some(Command::Quit),
            _ => None,
        }
    }
}

fn non_empty(arg: &str) -> Option<String> {
    if arg.is_empty() {
        None
    } else {
        Some(arg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("/create news"),
            Some(Command::Create("news".to_string()))
        );
        assert_eq!(Command::parse("/list"), Some(Command::List));
        assert_eq!(
            Command::parse("/join news"),
            Some(Command::Join("news".to_string()))
        );
        assert_eq!(Command::parse("/leave"), Some(Command::Leave));
        assert_eq!(
            Command::parse("/name Bob"),
            Some(Command::Name("Bob".to_string()))
        );
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("/quit"), Some(Command::Quit));
    }

    #[test]
    fn test_argument_extends_to_end_of_line() {
        assert_eq!(
            Command::parse("/create the news room"),
            Some(Command::Create("the news room".to_string()))
        );
        assert_eq!(
            Command::parse("/name Bob the Builder"),
            Some(Command::Name("Bob the Builder".to_string()))
        );
    }

    #[test]
    fn test_missing_argument_is_not_a_command() {
        assert_eq!(Command::parse("/create"), None);
        assert_eq!(Command::parse("/join"), None);
        assert_eq!(Command::parse("/name"), None);
        assert_eq!(Command::parse("/create "), None);
    }

    #[test]
    fn test_unknown_words_are_chat_text() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse("/frobnicate"), None);
        // Exact token match only, no prefix matching.
        assert_eq!(Command::parse("/listfoo"), None);
        assert_eq!(Command::parse("/quitnow"), None);
    }
}
