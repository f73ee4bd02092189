use crate::actors::messages::AppError;
use crate::models::{ChatEvent, ChatId, ControlRef, LatestMessage, MessageId};
use async_trait::async_trait;

/// Defines the public interface of the chat platform session.
///
/// This trait abstracts the concrete client (MTProto user session, bot API, console),
/// so the turn controller and command handlers can be driven by any backend.
/// Rate limiting is reported as `AppError::Throttled`.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends a text message and returns the identifier the platform assigned to it.
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, AppError>;

    /// Presses an inline control.
    async fn activate_control(&self, control: &ControlRef) -> Result<(), AppError>;

    /// Fetches the most recent message of a chat (`limit = 1`).
    async fn latest_message(&self, chat_id: ChatId) -> Result<Option<LatestMessage>, AppError>;

    /// Resolves the sender's username. Transports that already fill it on the event
    /// can rely on this default.
    async fn sender_username(&self, event: &ChatEvent) -> Result<Option<String>, AppError> {
        Ok(event.sender_username.clone())
    }

    /// Shows a "typing" indicator in the chat.
    async fn send_typing(&self, _chat_id: ChatId) -> Result<(), AppError> {
        Ok(())
    }

    /// Deletes one of our own messages.
    async fn delete_message(&self, _chat_id: ChatId, _message_id: MessageId) -> Result<(), AppError> {
        Ok(())
    }

    /// Sends a notification to the controlling user (their private saved-messages chat).
    async fn notify(&self, text: &str) -> Result<(), AppError>;
}
