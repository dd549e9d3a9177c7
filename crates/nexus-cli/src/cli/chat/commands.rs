//! Slash command parsing for the chat loop.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Exit,
    /// Start a fresh session and switch to it.
    New,
    /// List sessions with their positions.
    Sessions,
    /// Switch to the session at a 1-based position.
    Switch(usize),
    /// Reset the active session's log.
    Clear,
    /// Delete every session.
    ClearAll,
    /// Read the n-th most recent reply aloud (1 = latest).
    Speak(usize),
    /// Stop narration.
    Stop,
    /// Show voices, or select one by name.
    Voice(Option<String>),
    /// Toggle light/dark.
    Theme,
    /// Reprint the active session.
    History,
    /// Parse failure or unknown command, with a message for the user.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (trimmed.to_lowercase(), None),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/new" => ChatCommand::New,
        "/sessions" | "/ls" => ChatCommand::Sessions,
        "/switch" | "/s" => match arg.map(str::parse::<usize>) {
            Some(Ok(n)) if n > 0 => ChatCommand::Switch(n),
            _ => ChatCommand::Unknown("/switch needs a session number from /sessions".to_string()),
        },
        "/clear" => ChatCommand::Clear,
        "/clear-all" => ChatCommand::ClearAll,
        "/speak" | "/say" => match arg.map(str::parse::<usize>) {
            None => ChatCommand::Speak(1),
            Some(Ok(n)) if n > 0 => ChatCommand::Speak(n),
            _ => ChatCommand::Unknown("/speak takes an optional reply number (1 = latest)".to_string()),
        },
        "/stop" => ChatCommand::Stop,
        "/voice" => ChatCommand::Voice(arg.map(str::to_string)),
        "/theme" => ChatCommand::Theme,
        "/history" => ChatCommand::History,
        other => ChatCommand::Unknown(format!("Unknown command: {other}")),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/new", "Start a new session"),
        ("/sessions", "List saved sessions"),
        ("/switch <n>", "Switch to session n"),
        ("/clear", "Clear the current session"),
        ("/clear-all", "Delete all sessions"),
        ("/speak [n]", "Read the latest (or n-th latest) reply aloud; again to stop"),
        ("/stop", "Stop reading"),
        ("/voice [name]", "Show or pick the speech voice"),
        ("/theme", "Toggle light/dark rendering"),
        ("/history", "Show the current session"),
        ("/exit", "End the chat"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (cmd, help) in rows {
        println!("  {:<16} {}", style(cmd).cyan(), help);
    }
    println!();
    println!("  {}", style("Ctrl+D to exit, Ctrl+C safe (no message loss)").dim());
    println!();
}
