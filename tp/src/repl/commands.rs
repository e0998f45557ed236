//! Slash command parsing

use std::path::PathBuf;

use crate::gateway::Backend;

/// Default file name for `/export`
pub const DEFAULT_EXPORT_FILE: &str = "travel_plan.txt";

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Quit,
    Back,
    Example,
    Summary,
    Reset,
    Choose(Backend),
    Export(PathBuf),
    Invalid(String),
    Unknown(String),
}

/// Parse a line starting with `/`
pub fn parse_slash(input: &str) -> SlashCommand {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next();

    match cmd {
        "/help" | "/h" => SlashCommand::Help,
        "/quit" | "/q" | "/exit" => SlashCommand::Quit,
        "/back" | "/b" => SlashCommand::Back,
        "/example" | "/e" => SlashCommand::Example,
        "/summary" | "/s" => SlashCommand::Summary,
        "/reset" | "/new" => SlashCommand::Reset,
        "/choose" => match arg.map(str::parse::<Backend>) {
            Some(Ok(backend)) => SlashCommand::Choose(backend),
            Some(Err(e)) => SlashCommand::Invalid(e),
            None => SlashCommand::Invalid("usage: /choose <hosted|local>".to_string()),
        },
        "/export" => SlashCommand::Export(PathBuf::from(arg.unwrap_or(DEFAULT_EXPORT_FILE))),
        other => SlashCommand::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_slash("/help"), SlashCommand::Help);
        assert_eq!(parse_slash("/q"), SlashCommand::Quit);
        assert_eq!(parse_slash("/back"), SlashCommand::Back);
        assert_eq!(parse_slash("/example"), SlashCommand::Example);
        assert_eq!(parse_slash("/summary"), SlashCommand::Summary);
        assert_eq!(parse_slash("/new"), SlashCommand::Reset);
    }

    #[test]
    fn test_choose() {
        assert_eq!(parse_slash("/choose local"), SlashCommand::Choose(Backend::Local));
        assert_eq!(parse_slash("/choose OpenAI"), SlashCommand::Choose(Backend::Hosted));
        assert!(matches!(parse_slash("/choose"), SlashCommand::Invalid(_)));
        assert!(matches!(parse_slash("/choose bard"), SlashCommand::Invalid(_)));
    }

    #[test]
    fn test_export_path() {
        assert_eq!(
            parse_slash("/export"),
            SlashCommand::Export(PathBuf::from("travel_plan.txt"))
        );
        assert_eq!(
            parse_slash("/export /tmp/rome.txt"),
            SlashCommand::Export(PathBuf::from("/tmp/rome.txt"))
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(parse_slash("/fly"), SlashCommand::Unknown("/fly".to_string()));
    }
}
