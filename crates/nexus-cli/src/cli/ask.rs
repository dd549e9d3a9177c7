//! One-shot question: send a single message to the active session and
//! print the reply.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use nexus_core::chat::SendOutcome;

use super::chat::renderer::ChatRenderer;
use crate::state::AppState;

/// Ask one question in the active session.
///
/// A failed request is still recorded in the session as an apology and
/// printed like any other reply; only local errors make this return `Err`.
///
/// # Examples
///
/// ```bash
/// nexus ask what happened in the news today
/// nexus ask --json "summarize the latest Rust release"
/// ```
pub async fn ask(state: &AppState, text: &str, json: bool) -> Result<()> {
    let mut service = state.chat_service().await?;

    let spinner = if json { ProgressBar::hidden() } else { ProgressBar::new_spinner() };
    if !json {
        spinner.set_style(ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}")?);
        spinner.set_message("searching and thinking...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    }

    let outcome = service.send(text).await;
    spinner.finish_and_clear();
    let outcome = outcome?;

    if json {
        let (status, error) = match &outcome {
            SendOutcome::Replied(_) => ("ok", None),
            SendOutcome::Failed { error, .. } => ("error", Some(error.as_str())),
        };
        let message = outcome.message();
        let result = serde_json::json!({
            "status": status,
            "session": service.store().active_id(),
            "text": message.text,
            "sources": message.sources,
            "error": error,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let renderer = ChatRenderer::new(state.preferences.theme());
    println!();
    renderer.print_message(outcome.message(), "Nexus");
    if let SendOutcome::Failed { .. } = outcome {
        println!("  {}", style("The request failed; try again later.").dim());
        println!();
    }

    Ok(())
}
