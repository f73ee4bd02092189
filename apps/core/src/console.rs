//! JSON-lines transport for running the core without a live chat session.
//!
//! Each stdin line is a `ChatEvent`; each outbound action is printed to the
//! writer as one `OutboundAction` JSON object. The transport remembers the
//! newest message per chat, in arrival order, so staleness checks behave as
//! they would against the real platform.
//!
//! Inbound ids must be positive. Messages we send are numbered `-1, -2, ...`
//! so they can never be mistaken for a message the driver feeds in.

use crate::actors::dispatcher::DispatcherHandle;
use crate::actors::messages::AppError;
use crate::actors::traits::Transport;
use crate::models::{ChatEvent, ChatId, ControlRef, LatestMessage, MessageId, OutboundAction};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

#[derive(Debug, Default)]
struct ChatLog {
    sent: MessageId,
    latest: HashMap<ChatId, MessageId>,
}

impl ChatLog {
    fn observe(&mut self, chat_id: ChatId, message_id: MessageId) {
        self.latest.insert(chat_id, message_id);
    }

    fn allocate(&mut self, chat_id: ChatId) -> MessageId {
        self.sent += 1;
        let id = -self.sent;
        self.observe(chat_id, id);
        id
    }
}

pub struct ConsoleTransport<W: Write + Send + 'static> {
    out: Mutex<W>,
    log: Mutex<ChatLog>,
}

impl ConsoleTransport<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> ConsoleTransport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            log: Mutex::new(ChatLog::default()),
        }
    }

    /// Records an inbound message so later staleness checks see it.
    pub fn observe(&self, event: &ChatEvent) {
        self.log().observe(event.chat_id, event.message_id);
    }

    /// Gives back the writer, e.g. to inspect output in tests.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn log(&self) -> MutexGuard<'_, ChatLog> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, action: &OutboundAction) -> Result<(), AppError> {
        let line = serde_json::to_string(action)?;
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send + 'static> Transport for ConsoleTransport<W> {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, AppError> {
        let message_id = self.log().allocate(chat_id);
        self.emit(&OutboundAction::SendMessage {
            chat_id,
            message_id,
            text: text.to_string(),
        })?;
        Ok(message_id)
    }

    async fn activate_control(&self, control: &ControlRef) -> Result<(), AppError> {
        self.emit(&OutboundAction::ActivateControl {
            control: control.clone(),
        })
    }

    async fn latest_message(&self, chat_id: ChatId) -> Result<Option<LatestMessage>, AppError> {
        Ok(self
            .log()
            .latest
            .get(&chat_id)
            .map(|&message_id| LatestMessage { message_id }))
    }

    async fn send_typing(&self, chat_id: ChatId) -> Result<(), AppError> {
        self.emit(&OutboundAction::Typing { chat_id })
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), AppError> {
        self.emit(&OutboundAction::DeleteMessage { chat_id, message_id })
    }

    async fn notify(&self, text: &str) -> Result<(), AppError> {
        info!("Notification: {}", text);
        self.emit(&OutboundAction::Notify {
            text: text.to_string(),
        })
    }
}

/// Reads `ChatEvent` JSON lines until EOF and queues them on the dispatcher.
///
/// Malformed lines are logged and skipped. Returns the number of events queued.
pub async fn pump_events<R, W>(
    reader: R,
    transport: &ConsoleTransport<W>,
    dispatcher: &DispatcherHandle,
) -> Result<usize, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send + 'static,
{
    let mut lines = reader.lines();
    let mut queued = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ChatEvent>(line) {
            Ok(event) if event.message_id <= 0 => {
                warn!(message_id = event.message_id, "Skipping event with non-positive message id");
            }
            Ok(event) => {
                transport.observe(&event);
                dispatcher.submit(event).await?;
                queued += 1;
            }
            Err(e) => warn!("Skipping malformed event line: {}", e),
        }
    }

    Ok(queued)
}
