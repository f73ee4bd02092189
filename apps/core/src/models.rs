use serde::{Deserialize, Serialize};

/// Identifier of a chat (group, channel or private dialog) on the platform.
pub type ChatId = i64;

/// Identifier of a message inside a chat. Grows monotonically per chat.
pub type MessageId = i64;

/// An interactive control (inline button) attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    /// Label shown to the user, e.g. `Pass ♻️`.
    pub text: String,
    /// Row of the button grid the control sits in.
    #[serde(default)]
    pub row: usize,
    /// Column inside the row.
    #[serde(default)]
    pub column: usize,
}

/// Reference to one control on one message, enough for the transport to press it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub row: usize,
    pub column: usize,
}

/// An inbound chat event as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    /// The chat the message was posted in.
    pub chat_id: ChatId,
    /// Human readable chat title, used in notifications.
    #[serde(default)]
    pub chat_title: Option<String>,
    /// The message identifier.
    pub message_id: MessageId,
    /// Username of the sender when the platform exposes one.
    #[serde(default)]
    pub sender_username: Option<String>,
    /// Raw message text, decorations included.
    #[serde(default)]
    pub text: String,
    /// Whether the logged-in user wrote this message.
    #[serde(default)]
    pub outgoing: bool,
    /// Inline controls attached to the message, row-major.
    #[serde(default)]
    pub controls: Vec<Control>,
}

impl ChatEvent {
    /// Title for notifications, falling back to the numeric id.
    pub fn display_title(&self) -> String {
        self.chat_title
            .clone()
            .unwrap_or_else(|| self.chat_id.to_string())
    }

    /// Finds the first control whose trimmed label equals `label`.
    pub fn find_control(&self, label: &str) -> Option<ControlRef> {
        let wanted = label.trim();
        self.controls
            .iter()
            .find(|c| c.text.trim() == wanted)
            .map(|c| ControlRef {
                chat_id: self.chat_id,
                message_id: self.message_id,
                row: c.row,
                column: c.column,
            })
    }
}

/// Summary of the most recent message in a chat, used for staleness checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestMessage {
    pub message_id: MessageId,
}

/// Outbound actions, as emitted by the console transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OutboundAction {
    SendMessage {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    },
    Typing {
        chat_id: ChatId,
    },
    ActivateControl {
        control: ControlRef,
    },
    DeleteMessage {
        chat_id: ChatId,
        message_id: MessageId,
    },
    Notify {
        text: String,
    },
}
