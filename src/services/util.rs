//! Slash-command parsing.

use crate::commands::LocalCommand;

/// Slash spelling to local command. Anything not listed goes to the server.
const SLASH_MAP: &[(&str, LocalCommand)] = &[
    ("/reset", LocalCommand::Reset),
    ("/new", LocalCommand::Reset),
    ("/clear", LocalCommand::Clear),
    ("/cls", LocalCommand::Clear),
    ("/logs", LocalCommand::Logs),
    ("/log", LocalCommand::Logs),
    ("/help", LocalCommand::Help),
    ("/h", LocalCommand::Help),
    ("/?", LocalCommand::Help),
    ("/quit", LocalCommand::Quit),
    ("/q", LocalCommand::Quit),
    ("/exit", LocalCommand::Quit),
];

/// Matches the first word only; trailing words are ignored.
pub fn parse_local_command(raw: &str) -> Option<LocalCommand> {
    let raw = raw.trim();
    if !raw.starts_with('/') {
        return None;
    }
    let head = raw
        .split_whitespace()
        .next()
        .unwrap_or(raw)
        .to_lowercase();
    SLASH_MAP
        .iter()
        .find(|(k, _)| *k == head)
        .map(|(_, cmd)| *cmd)
}
