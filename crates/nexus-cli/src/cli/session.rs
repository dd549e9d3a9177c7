//! Session management CLI commands: list and clear.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;
use serde::Serialize;

use nexus_types::chat::{Session, SessionId};

use crate::state::AppState;

/// Row of the session listing.
#[derive(Debug, Serialize)]
struct SessionSummary {
    position: usize,
    id: SessionId,
    title: String,
    messages: usize,
    active: bool,
}

fn summarize(sessions: &[Session], active: SessionId) -> Vec<SessionSummary> {
    sessions
        .iter()
        .enumerate()
        .map(|(i, s)| SessionSummary {
            position: i + 1,
            id: s.id,
            title: s.title.clone(),
            messages: s.messages.len(),
            active: s.id == active,
        })
        .collect()
}

/// List saved sessions, newest first.
///
/// # Examples
///
/// ```bash
/// nexus sessions
/// nexus ls --json
/// ```
pub async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    let store = state.session_store().await;
    let rows = summarize(store.sessions(), store.active_id());

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("").fg(Color::White),
    ]);

    for row in &rows {
        let marker = if row.active {
            Cell::new("active").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            Cell::new(row.position.to_string()).fg(Color::DarkGrey),
            Cell::new(&row.title).fg(Color::Cyan),
            Cell::new(row.messages.to_string()).fg(Color::White),
            marker,
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}. Switch inside chat with {}",
        style(rows.len()).bold(),
        if rows.len() == 1 { "" } else { "s" },
        style("/switch <n>").yellow()
    );
    println!();

    Ok(())
}

/// Clear the active session, or delete every session with `all`.
///
/// Deleting everything asks for confirmation unless `force` is set or
/// output is JSON.
pub async fn clear(state: &AppState, all: bool, force: bool, json: bool) -> Result<()> {
    let mut store = state.session_store().await;

    if all {
        if !force && !json {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Delete all {} sessions?",
                    style(store.sessions().len()).red().bold()
                ))
                .default(false)
                .interact()?;

            if !confirmed {
                println!("  Cancelled.");
                return Ok(());
            }
        }

        let id = store.clear_all_sessions().await;
        if json {
            println!("{}", serde_json::json!({"cleared": "all", "session": id}));
        } else {
            println!("  {} All sessions deleted.", style("✓").red().bold());
        }
        return Ok(());
    }

    let title = store.active().title.clone();
    store.clear_active_session().await;
    if json {
        println!(
            "{}",
            serde_json::json!({"cleared": "active", "session": store.active_id()})
        );
    } else {
        println!("  {} Cleared '{}'.", style("✓").green().bold(), title);
    }

    Ok(())
}
