//! Meta-command routing.
//!
//! Decides, before anything reaches bash or the engine, whether a line is
//! one of the game's own verbs. Matching is on the lowercased first token;
//! everything unrecognized passes through to the shell.

/// Game verbs recognized ahead of bash passthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Help(Option<String>),
    QuestLog,
    Cypher(Option<String>),
    Scan(Option<String>),
    Exit,
}

/// Classify a line. `None` means "this is a bash command".
pub fn parse_meta(line: &str) -> Option<MetaCommand> {
    let mut parts = line.trim().split_whitespace();
    let verb = parts.next()?.to_lowercase();
    let arg = parts.next().map(|s| s.to_lowercase());

    match verb.as_str() {
        "help" => Some(MetaCommand::Help(arg)),
        "quest" | "log" => Some(MetaCommand::QuestLog),
        "cypher" => Some(MetaCommand::Cypher(arg)),
        "scan" => Some(MetaCommand::Scan(arg)),
        "exit" | "quit" => Some(MetaCommand::Exit),
        _ => None,
    }
}
