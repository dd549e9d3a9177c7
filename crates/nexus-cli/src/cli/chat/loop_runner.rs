//! Main chat loop orchestration.

use console::style;
use tracing::info;

use nexus_core::chat::{ChatProvider, SendOutcome};
use nexus_core::speech::NarrationOutcome;
use nexus_infra::filesystem::LAST_REPLY_WAV;
use nexus_types::chat::{Message, Role, Session};
use nexus_types::preferences::Voice;

use crate::state::{AppState, ConcreteChatService, ConcreteNarrator};

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

const MODEL_LABEL: &str = "Nexus";

/// Run the interactive chat loop until the user exits.
pub async fn run_chat_loop(mut state: AppState) -> anyhow::Result<()> {
    let mut service = state.chat_service().await?;
    let mut narrator = state.narrator()?;
    let mut renderer = ChatRenderer::new(state.preferences.theme());

    print_welcome_banner(
        service.provider().model(),
        &service.store().active().title,
        service.store().sessions().len(),
        &state.preferences.voice().label(),
    );
    print_session(&renderer, service.store().active());

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };
        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                cmd => {
                    handle_command(cmd, &mut state, &mut service, &mut narrator, &mut renderer).await;
                    continue;
                }
            }
        }

        send_and_render(&mut service, &renderer, &text).await;
    }

    narrator.stop();
    chat_input.flush();
    Ok(())
}

async fn send_and_render(service: &mut ConcreteChatService, renderer: &ChatRenderer, text: &str) {
    let spinner = indicatif::ProgressBar::new_spinner();
    if let Ok(spinner_style) =
        indicatif::ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}")
    {
        spinner.set_style(spinner_style);
    }
    spinner.set_message("searching and thinking...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let outcome = service.send(text).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(SendOutcome::Replied(message)) => {
            println!();
            renderer.print_message(&message, MODEL_LABEL);
        }
        Ok(SendOutcome::Failed { message, .. }) => {
            println!();
            renderer.print_message(&message, MODEL_LABEL);
            if let Some(error) = service.last_error() {
                eprintln!("  {} {}", style("Error:").red().bold(), style(error).red());
            }
            // Shown once; the apology stays in the log.
            service.dismiss_error();
            println!("  {}", style("Type a message to retry, /exit to quit.").dim());
            println!();
        }
        Err(e) => {
            println!("  {} {e}", style("?").yellow().bold());
        }
    }
}

async fn handle_command(
    cmd: ChatCommand,
    state: &mut AppState,
    service: &mut ConcreteChatService,
    narrator: &mut ConcreteNarrator,
    renderer: &mut ChatRenderer,
) {
    match cmd {
        ChatCommand::Help => commands::print_help(),
        ChatCommand::Exit => {}
        ChatCommand::New => {
            service.store_mut().create_session().await;
            notice("Started a new session.");
            print_session(renderer, service.store().active());
        }
        ChatCommand::Sessions => print_sessions(service.store().sessions(), service.store().active_id()),
        ChatCommand::Switch(position) => {
            let selected = service.store_mut().select_session_at(position).await;
            match selected {
                Some(_) => {
                    info!(position, "Switched session");
                    print_session(renderer, service.store().active());
                }
                None => warn_user(&format!(
                    "No session {position}. There are {} sessions; see /sessions.",
                    service.store().sessions().len()
                )),
            }
        }
        ChatCommand::Clear => {
            narrator.stop();
            service.store_mut().clear_active_session().await;
            print_session(renderer, service.store().active());
        }
        ChatCommand::ClearAll => {
            narrator.stop();
            service.store_mut().clear_all_sessions().await;
            notice("All sessions deleted.");
            print_session(renderer, service.store().active());
        }
        ChatCommand::Speak(nth) => {
            let Some(message) = nth_latest_reply(service.store().active(), nth) else {
                warn_user("There is no such reply to read.");
                return;
            };
            let (id, text) = (message.id, message.text.clone());
            match narrator.toggle(id, &text, state.preferences.voice()).await {
                NarrationOutcome::Started if state.config.player_command.is_none() => notice(&format!(
                    "Saved to {}. Set player_command in config.toml to play it.",
                    state.data_dir.join(LAST_REPLY_WAV).display()
                )),
                NarrationOutcome::Started => notice(&format!(
                    "Reading aloud with {}. /speak again or /stop to stop.",
                    state.preferences.voice().label()
                )),
                NarrationOutcome::Stopped => notice("Stopped reading."),
                NarrationOutcome::Failed { error } => warn_user(&format!("Speech failed: {error}")),
            }
        }
        ChatCommand::Stop => match narrator.stop() {
            Some(_) => notice("Stopped reading."),
            None => notice("Nothing is playing."),
        },
        ChatCommand::Voice(None) => print_voices(state.preferences.voice()),
        ChatCommand::Voice(Some(name)) => match name.parse::<Voice>() {
            Ok(voice) => {
                state.preferences.set_voice(voice).await;
                notice(&format!("Voice set to {}.", voice.label()));
            }
            Err(e) => warn_user(&e),
        },
        ChatCommand::Theme => {
            let theme = state.preferences.toggle_theme().await;
            renderer.set_theme(theme);
            notice(&format!("Theme set to {theme}."));
        }
        ChatCommand::History => print_session(renderer, service.store().active()),
        ChatCommand::Unknown(message) => {
            println!(
                "\n  {} {}. Type /help for available commands.\n",
                style("?").yellow().bold(),
                message
            );
        }
    }
}

/// The n-th most recent model message (1 = latest).
fn nth_latest_reply(session: &Session, nth: usize) -> Option<&Message> {
    session
        .messages
        .iter()
        .rev()
        .filter(|m| m.role == Role::Model)
        .nth(nth.checked_sub(1)?)
}

fn print_session(renderer: &ChatRenderer, session: &Session) {
    println!();
    println!("  {}", style(&session.title).bold().underlined());
    println!();
    for message in &session.messages {
        renderer.print_message(message, MODEL_LABEL);
    }
}

fn print_sessions(sessions: &[Session], active: nexus_types::chat::SessionId) {
    println!();
    for (i, session) in sessions.iter().enumerate() {
        let marker = if session.id == active { style("*").green().bold() } else { style(" ") };
        println!(
            "  {} {:>2}. {} {}",
            marker,
            i + 1,
            session.title,
            style(format!("({} messages)", session.messages.len())).dim()
        );
    }
    println!();
}

fn print_voices(current: Voice) {
    println!();
    for voice in Voice::ALL {
        let marker = if voice == current { style("*").green().bold() } else { style(" ") };
        println!("  {} {}", marker, voice.label());
    }
    println!();
}

fn notice(text: &str) {
    println!("\n  {} {}\n", style("*").cyan().bold(), text);
}

fn warn_user(text: &str) {
    println!("\n  {} {}\n", style("!").yellow().bold(), text);
}
