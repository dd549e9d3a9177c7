//! Theme and voice preference commands.

use anyhow::Result;
use console::style;

use nexus_types::preferences::{Theme, Voice};

use super::ThemeArg;
use crate::state::AppState;

/// Show, set or toggle the display theme.
pub async fn theme(state: &mut AppState, mode: Option<ThemeArg>, json: bool) -> Result<()> {
    let theme = match mode {
        None => state.preferences.theme(),
        Some(ThemeArg::Toggle) => state.preferences.toggle_theme().await,
        Some(ThemeArg::Light) => {
            state.preferences.set_theme(Theme::Light).await;
            Theme::Light
        }
        Some(ThemeArg::Dark) => {
            state.preferences.set_theme(Theme::Dark).await;
            Theme::Dark
        }
    };

    if json {
        println!("{}", serde_json::json!({"theme": theme}));
    } else {
        println!("  Theme: {}", style(theme).cyan().bold());
    }
    Ok(())
}

/// List voices, or select one by name (case-insensitive).
pub async fn voice(state: &mut AppState, name: Option<String>, json: bool) -> Result<()> {
    let Some(name) = name else {
        let current = state.preferences.voice();
        if json {
            let voices: Vec<_> = Voice::ALL
                .iter()
                .map(|v| {
                    serde_json::json!({
                        "name": v.name(),
                        "tone": v.tone(),
                        "selected": *v == current,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&voices)?);
        } else {
            println!();
            for v in Voice::ALL {
                let marker = if v == current { style("*").green().bold() } else { style(" ") };
                println!("  {} {}", marker, v.label());
            }
            println!();
        }
        return Ok(());
    };

    let voice: Voice = name.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    state.preferences.set_voice(voice).await;

    if json {
        println!("{}", serde_json::json!({"voice": voice.name()}));
    } else {
        println!("  Voice set to {}.", style(voice.label()).cyan().bold());
    }
    Ok(())
}
