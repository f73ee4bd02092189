//! Octoplay core: answers word-game broadcasts in a chat on the user's behalf.
//!
//! Game logic lives in [`game`], the message-driven machinery in [`actors`].

pub mod actors;
pub mod config;
pub mod console;
pub mod error;
pub mod game;
pub mod models;
pub mod pacing;
pub mod preflight;
pub mod session;
pub mod telemetry;

#[cfg(test)]
mod tests;
