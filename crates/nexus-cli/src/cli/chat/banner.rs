//! Welcome banner display for chat sessions.

use console::style;

/// Print the banner shown when the chat loop starts.
pub fn print_welcome_banner(model: &str, session_title: &str, session_count: usize, voice: &str) {
    println!();
    println!("  {} {}", style("*").cyan().bold(), style("Nexus").cyan().bold());
    println!("  {}", style("Web-grounded answers, read aloud on request").dim());
    println!();
    println!("  {}  {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}  {} {}",
        style("Session:").bold(),
        style(session_title).dim(),
        style(format!("({session_count} saved)")).dim()
    );
    println!("  {}  {}", style("Voice:").bold(), style(voice).dim());
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
