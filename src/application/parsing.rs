//! # Command Parsing
//!
//! Turns an inbound chat message into a typed `Command`. A message is only a
//! command when it starts with the bot name followed by a single space.

use crate::domain::errors::CommandError;
use crate::domain::properties::GroupKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Scrape,
    Info,
    Help,
    /// `botprop`, `adpref` or `searchparam`. `value` is the rest of the line.
    Property {
        group: GroupKind,
        key: String,
        value: Option<String>,
    },
    Unknown(String),
}

impl Command {
    /// Commands hidden unless remote administration is enabled.
    pub fn is_admin(&self) -> bool {
        matches!(self, Command::Property { .. })
    }

    /// Keyword the command was invoked with.
    pub fn name(&self) -> &str {
        match self {
            Command::List => "list",
            Command::Scrape => "scrape",
            Command::Info => "info",
            Command::Help => "help",
            Command::Property { group, .. } => group.command(),
            Command::Unknown(name) => name.as_str(),
        }
    }
}

/// Keywords of the property commands.
pub const ADMIN_COMMANDS: [&str; 3] = ["botprop", "adpref", "searchparam"];

pub fn is_admin_keyword(name: &str) -> bool {
    ADMIN_COMMANDS.contains(&name)
}

/// Parses `message` if it is addressed to `bot_name`.
///
/// Returns `None` for ordinary chat. A recognised property command without a
/// key is a `CommandError`.
pub fn parse_command(message: &str, bot_name: &str) -> Option<Result<Command, CommandError>> {
    let rest = message.strip_prefix(bot_name)?.strip_prefix(' ')?;

    let (name, args) = next_token(rest);

    let simple = match name {
        "list" => Some(Command::List),
        "scrape" => Some(Command::Scrape),
        "info" => Some(Command::Info),
        "help" => Some(Command::Help),
        _ => None,
    };
    if let Some(command) = simple {
        if !args.trim().is_empty() {
            return Some(Err(CommandError::UnexpectedArguments {
                command: name.to_string(),
            }));
        }
        return Some(Ok(command));
    }

    let group = match name {
        "botprop" => GroupKind::Bot,
        "adpref" => GroupKind::Source,
        "searchparam" => GroupKind::Query,
        other => return Some(Ok(Command::Unknown(other.to_string()))),
    };

    let (key, value) = next_token(args);
    if key.is_empty() {
        return Some(Err(CommandError::MissingKey {
            command: name.to_string(),
        }));
    }
    // Rest of the line as typed, interior whitespace included
    let value = value.trim_start().to_string();

    Some(Ok(Command::Property {
        group,
        key: key.to_string(),
        value: (!value.is_empty()).then_some(value),
    }))
}

/// Splits off the first whitespace-delimited token. The remainder keeps its
/// leading separator.
fn next_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => s.split_at(i),
        None => (s, ""),
    }
}

/// Property values other than strings are a single token.
pub fn check_value_arity(command: &str, value: &str) -> Result<(), CommandError> {
    if value.split_whitespace().count() > 1 {
        return Err(CommandError::TooManyValues {
            command: command.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(message: &str) -> Option<Result<Command, CommandError>> {
        parse_command(message, "Bot")
    }

    #[test]
    fn test_prefix_required() {
        assert!(parse("list").is_none());
        assert!(parse("Botlist").is_none());
        assert!(parse("bot list").is_none());
        assert!(parse("hey Bot list").is_none());
        assert!(parse("Bot").is_none());
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("Bot list"), Some(Ok(Command::List)));
        assert_eq!(parse("Bot scrape"), Some(Ok(Command::Scrape)));
        assert_eq!(parse("Bot info"), Some(Ok(Command::Info)));
        assert_eq!(parse("Bot  help"), Some(Ok(Command::Help)));
    }

    #[test]
    fn test_simple_commands_take_no_arguments() {
        assert_eq!(
            parse("Bot scrape now please"),
            Some(Err(CommandError::UnexpectedArguments {
                command: "scrape".to_string()
            }))
        );
    }

    #[test]
    fn test_unknown_and_empty_command() {
        assert_eq!(
            parse("Bot unknownthing"),
            Some(Ok(Command::Unknown("unknownthing".to_string())))
        );
        assert_eq!(parse("Bot "), Some(Ok(Command::Unknown(String::new()))));
    }

    #[test]
    fn test_property_commands() {
        assert_eq!(
            parse("Bot botprop scrapeInterval 5000"),
            Some(Ok(Command::Property {
                group: GroupKind::Bot,
                key: "scrapeInterval".to_string(),
                value: Some("5000".to_string()),
            }))
        );
        assert_eq!(
            parse("Bot searchparam keywords  mountain   bike"),
            Some(Ok(Command::Property {
                group: GroupKind::Query,
                key: "keywords".to_string(),
                value: Some("mountain   bike".to_string()),
            }))
        );
        assert_eq!(
            parse("Bot searchparam  keywords 2  door   car"),
            Some(Ok(Command::Property {
                group: GroupKind::Query,
                key: "keywords".to_string(),
                value: Some("2  door   car".to_string()),
            }))
        );
        assert_eq!(
            parse("Bot adpref categoryId"),
            Some(Ok(Command::Property {
                group: GroupKind::Source,
                key: "categoryId".to_string(),
                value: None,
            }))
        );
    }

    #[test]
    fn test_property_without_key() {
        assert_eq!(
            parse("Bot botprop"),
            Some(Err(CommandError::MissingKey {
                command: "botprop".to_string()
            }))
        );
    }

    #[test]
    fn test_value_arity() {
        assert!(check_value_arity("botprop", "5000").is_ok());
        assert!(check_value_arity("botprop", "50 00").is_err());
    }
}
