//! Control commands typed by the logged-in user:
//!
//! - `/po` start playing in the current chat
//! - `/eo` stop playing in the current chat
//! - `/time <seconds>` set the delay between guesses

use crate::actors::messages::AppError;
use crate::actors::traits::Transport;
use crate::config::MAX_MESSAGE_DELAY_SECS;
use crate::models::{ChatEvent, ChatId};
use crate::session::SessionState;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Notification sent to the controlling user once the bot is up.
pub fn welcome_message(version: &str) -> String {
    format!(
        "🎉 Welcome to Octoplay v{version}! 🎉\n\n\
         The bot is now active. Available commands:\n\n\
         - /po – Start playing in the current group.\n\
         - /eo – Stop playing in the current group.\n\
         - /time <seconds> – Set a custom delay (in seconds) between messages."
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play,
    End,
    /// Raw argument; validated when handled so bad input can be reported.
    SetDelay(Option<String>),
}

/// Parses a command from the start of a message. Anything else is `None`.
pub fn parse_command(text: &str) -> Option<Command> {
    let mut parts = text.split_whitespace();
    match parts.next()? {
        "/po" => Some(Command::Play),
        "/eo" => Some(Command::End),
        "/time" => Some(Command::SetDelay(parts.next().map(str::to_string))),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    TargetSet(ChatId),
    TargetCleared(ChatId),
    /// `/eo` in a chat that is not the active target.
    TargetUnchanged,
    DelaySet(Duration),
    DelayRejected,
}

/// Applies commands to the shared session and tells the user what changed.
pub struct CommandHandler<T: Transport> {
    transport: Arc<T>,
    session: SessionState,
}

impl<T: Transport> CommandHandler<T> {
    pub fn new(transport: Arc<T>, session: SessionState) -> Self {
        Self { transport, session }
    }

    /// Handles a command message. Returns `Ok(None)` when the text is not a command.
    #[instrument(skip(self, event), fields(chat_id = event.chat_id))]
    pub async fn handle(&self, event: &ChatEvent) -> Result<Option<CommandOutcome>, AppError> {
        let Some(command) = parse_command(&event.text) else {
            return Ok(None);
        };

        let outcome = match command {
            Command::Play => {
                let title = event.display_title();
                self.session.set_target(event.chat_id, title.clone());
                info!("Octoplay is playing in {}", title);
                self.transport
                    .notify(&format!("Octoplay is now playing in {}", title))
                    .await?;
                CommandOutcome::TargetSet(event.chat_id)
            }
            Command::End => {
                if self.session.clear_target_if(event.chat_id) {
                    let title = event.display_title();
                    warn!("/eo command used in {}", title);
                    self.transport
                        .notify(&format!("Octoplay has stopped playing in {}", title))
                        .await?;
                    CommandOutcome::TargetCleared(event.chat_id)
                } else {
                    CommandOutcome::TargetUnchanged
                }
            }
            Command::SetDelay(raw) => {
                let outcome = self.set_delay(raw.as_deref()).await;
                self.transport
                    .delete_message(event.chat_id, event.message_id)
                    .await?;
                outcome?
            }
        };

        Ok(Some(outcome))
    }

    async fn set_delay(&self, raw: Option<&str>) -> Result<CommandOutcome, AppError> {
        let seconds = raw
            .and_then(|r| r.parse::<u64>().ok())
            .filter(|&s| s <= MAX_MESSAGE_DELAY_SECS);
        match seconds {
            Some(seconds) => {
                let delay = Duration::from_secs(seconds);
                self.session.set_delay(delay);
                info!("Custom delay set to {} seconds", seconds);
                self.transport
                    .notify(&format!("Custom delay set to {} seconds.", seconds))
                    .await?;
                Ok(CommandOutcome::DelaySet(delay))
            }
            None => {
                warn!("Rejected delay value {:?}", raw);
                self.transport
                    .notify("Invalid delay value. Please enter a valid number.")
                    .await?;
                Ok(CommandOutcome::DelayRejected)
            }
        }
    }
}
