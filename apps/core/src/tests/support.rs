//! Shared fixtures: a scriptable transport and broadcast builders.

use crate::actors::messages::AppError;
use crate::actors::traits::Transport;
use crate::models::{ChatEvent, ChatId, Control, ControlRef, LatestMessage, MessageId};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

pub const GAME_CHAT: ChatId = -100_123;
pub const OTHER_CHAT: ChatId = -100_999;
pub const BOT: &str = "OctopusEN_Bot";
pub const PASS: &str = "Pass ♻️";
/// Id used for a message posted by someone else after our guesses.
pub const FOREIGN_MESSAGE: MessageId = 9_999;

/// One `send_message` call as seen by the mock.
#[derive(Debug, Clone)]
pub struct SendAttempt {
    pub chat_id: ChatId,
    pub text: String,
    pub at: Instant,
    pub throttled: bool,
}

#[derive(Debug, Default)]
struct MockState {
    next_id: MessageId,
    latest: Option<MessageId>,
    attempts: Vec<SendAttempt>,
    sent_ok: usize,
    activated: Vec<(ControlRef, Instant)>,
    notifications: Vec<String>,
    deleted: Vec<(ChatId, MessageId)>,
    typing: usize,
    latest_checks: usize,
}

/// Transport double whose throttling and chat activity can be scripted.
pub struct MockTransport {
    state: Mutex<MockState>,
    /// Per send attempt: `Some(secs)` throttles that attempt.
    throttle_script: Mutex<VecDeque<Option<u64>>>,
    /// After this many successful sends, someone else posts in the chat.
    supersede_after: Option<usize>,
    /// Someone else posts as soon as a send is throttled.
    supersede_on_throttle: bool,
    /// Someone else posts right before this (1-based) latest-message lookup.
    supersede_on_check: Option<usize>,
    /// Pressing a control is throttled once for this many seconds.
    control_throttle: Mutex<Option<u64>>,
    failing_sends: bool,
    failing_notifications: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_id: 1_000,
                ..MockState::default()
            }),
            throttle_script: Mutex::new(VecDeque::new()),
            supersede_after: None,
            supersede_on_throttle: false,
            supersede_on_check: None,
            control_throttle: Mutex::new(None),
            failing_sends: false,
            failing_notifications: false,
        }
    }

    pub fn with_throttles(self, script: &[Option<u64>]) -> Self {
        *self.throttle_script.lock().unwrap() = script.iter().copied().collect();
        self
    }

    pub fn superseded_after(mut self, sends: usize) -> Self {
        self.supersede_after = Some(sends);
        self
    }

    pub fn superseded_on_throttle(mut self) -> Self {
        self.supersede_on_throttle = true;
        self
    }

    pub fn superseded_on_check(mut self, check: usize) -> Self {
        self.supersede_on_check = Some(check);
        self
    }

    pub fn with_control_throttle(self, secs: u64) -> Self {
        *self.control_throttle.lock().unwrap() = Some(secs);
        self
    }

    pub fn failing_sends(mut self) -> Self {
        self.failing_sends = true;
        self
    }

    pub fn failing_notifications(mut self) -> Self {
        self.failing_notifications = true;
        self
    }

    /// Marks `message_id` as the newest message, as an inbound broadcast would.
    pub fn observe(&self, message_id: MessageId) {
        self.state.lock().unwrap().latest = Some(message_id);
    }

    pub fn sent(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .attempts
            .iter()
            .filter(|a| !a.throttled)
            .map(|a| a.text.clone())
            .collect()
    }

    pub fn attempts(&self) -> Vec<SendAttempt> {
        self.state.lock().unwrap().attempts.clone()
    }

    pub fn activated(&self) -> Vec<(ControlRef, Instant)> {
        self.state.lock().unwrap().activated.clone()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.state.lock().unwrap().notifications.clone()
    }

    pub fn deleted(&self) -> Vec<(ChatId, MessageId)> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn typing_count(&self) -> usize {
        self.state.lock().unwrap().typing
    }

    pub fn latest_checks(&self) -> usize {
        self.state.lock().unwrap().latest_checks
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, AppError> {
        if self.failing_sends {
            return Err(AppError::Transport("connection reset".to_string()));
        }

        let throttle = self.throttle_script.lock().unwrap().pop_front().flatten();
        let mut state = self.state.lock().unwrap();
        state.attempts.push(SendAttempt {
            chat_id,
            text: text.to_string(),
            at: Instant::now(),
            throttled: throttle.is_some(),
        });

        if let Some(secs) = throttle {
            if self.supersede_on_throttle {
                state.latest = Some(FOREIGN_MESSAGE);
            }
            return Err(AppError::throttled_secs(secs));
        }

        let id = state.next_id;
        state.next_id += 1;
        state.sent_ok += 1;
        state.latest = Some(id);
        if self.supersede_after == Some(state.sent_ok) {
            state.latest = Some(FOREIGN_MESSAGE);
        }
        Ok(id)
    }

    async fn activate_control(&self, control: &ControlRef) -> Result<(), AppError> {
        if let Some(secs) = self.control_throttle.lock().unwrap().take() {
            return Err(AppError::throttled_secs(secs));
        }
        self.state
            .lock()
            .unwrap()
            .activated
            .push((control.clone(), Instant::now()));
        Ok(())
    }

    async fn latest_message(&self, _chat_id: ChatId) -> Result<Option<LatestMessage>, AppError> {
        let mut state = self.state.lock().unwrap();
        state.latest_checks += 1;
        if self.supersede_on_check == Some(state.latest_checks) {
            state.latest = Some(FOREIGN_MESSAGE);
        }
        Ok(state.latest.map(|message_id| LatestMessage { message_id }))
    }

    async fn send_typing(&self, _chat_id: ChatId) -> Result<(), AppError> {
        self.state.lock().unwrap().typing += 1;
        Ok(())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), AppError> {
        self.state.lock().unwrap().deleted.push((chat_id, message_id));
        Ok(())
    }

    async fn notify(&self, text: &str) -> Result<(), AppError> {
        if self.failing_notifications {
            return Err(AppError::Transport("notification channel closed".to_string()));
        }
        self.state.lock().unwrap().notifications.push(text.to_string());
        Ok(())
    }
}

/// A game broadcast from the bot in the game chat.
pub fn broadcast(message_id: MessageId, rack_line: &str, pattern_line: &str) -> ChatEvent {
    ChatEvent {
        chat_id: GAME_CHAT,
        chat_title: Some("Word Club".to_string()),
        message_id,
        sender_username: Some(BOT.to_string()),
        text: format!("🐙 New round! 🐙\n🔤 {}\n{}", rack_line, pattern_line),
        outgoing: false,
        controls: vec![
            Control { text: "Hint 💡".to_string(), row: 0, column: 0 },
            Control { text: PASS.to_string(), row: 0, column: 1 },
        ],
    }
}

/// A command typed by the logged-in user.
pub fn command(chat_id: ChatId, message_id: MessageId, text: &str) -> ChatEvent {
    ChatEvent {
        chat_id,
        chat_title: Some(format!("Chat {}", chat_id)),
        message_id,
        sender_username: Some("me".to_string()),
        text: text.to_string(),
        outgoing: true,
        controls: vec![],
    }
}
