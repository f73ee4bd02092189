use crate::actors::commands::CommandOutcome;
use crate::actors::turn::TurnOutcome;
use crate::models::ChatEvent;
use serde::Serialize;
use tokio::sync::oneshot;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// The dispatcher is gone (channel closed).
    #[error("Dispatcher unavailable: {0}")]
    Unavailable(String),
    /// No handler is registered for the event category.
    #[error("No handler registered for {0}")]
    NoHandler(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// What the dispatcher did with one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event matched no category (e.g. an ordinary outgoing message).
    Unhandled,
    Command(CommandOutcome),
    Turn(TurnOutcome),
}

/// Messages that can be sent to the dispatcher.
#[derive(Debug)]
pub enum DispatchMessage {
    /// An inbound chat event to classify and handle.
    Event {
        event: ChatEvent,
        /// Optional channel to send the outcome back; `None` for fire-and-forget.
        responder: Option<oneshot::Sender<Result<EventOutcome, AppError>>>,
    },
    /// Stops the dispatch loop once every event queued before it is handled.
    Shutdown { responder: oneshot::Sender<()> },
}
