//! Interactive terminal chat.
//!
//! Reads lines with an async readline, dispatches slash commands, sends
//! everything else through the chat service and renders replies as
//! markdown. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
