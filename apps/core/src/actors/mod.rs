//! # Actors
//!
//! The event-driven half of the bot.
//!
//! ## Components
//! - `traits`: the `Transport` seam to the chat platform
//! - `messages`: dispatcher messages and actor errors
//! - `dispatcher`: single serialized loop with a handler table per event category
//! - `commands`: `/po`, `/eo`, `/time` handlers
//! - `turn`: the game-turn state machine

pub mod commands;
pub mod dispatcher;
pub mod messages;
pub mod traits;
pub mod turn;

pub use dispatcher::{Dispatcher, DispatcherHandle, EventCategory};
pub use messages::EventOutcome;
pub use traits::Transport;
pub use turn::{GameRules, TurnController, TurnOutcome};
