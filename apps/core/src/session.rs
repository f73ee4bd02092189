//! Process-wide session state shared between command handlers and the turn controller.

use crate::models::ChatId;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// The chat the bot currently plays in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTarget {
    pub chat_id: ChatId,
    pub title: String,
}

#[derive(Debug)]
struct Inner {
    target: Option<ActiveTarget>,
    delay: Duration,
}

/// Cloneable handle over the active target and inter-message delay.
///
/// Only command handlers write; the turn controller reads fresh values on every call.
#[derive(Debug, Clone)]
pub struct SessionState {
    inner: Arc<Mutex<Inner>>,
}

impl SessionState {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                target: None,
                delay,
            })),
        }
    }

    // A poisoned lock still holds valid plain data.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn active_target(&self) -> Option<ActiveTarget> {
        self.lock().target.clone()
    }

    pub fn is_active(&self, chat_id: ChatId) -> bool {
        self.lock()
            .target
            .as_ref()
            .is_some_and(|t| t.chat_id == chat_id)
    }

    pub fn set_target(&self, chat_id: ChatId, title: impl Into<String>) {
        self.lock().target = Some(ActiveTarget {
            chat_id,
            title: title.into(),
        });
    }

    /// Clears the target only if it is `chat_id`. Returns whether anything changed.
    pub fn clear_target_if(&self, chat_id: ChatId) -> bool {
        let mut inner = self.lock();
        if inner.target.as_ref().is_some_and(|t| t.chat_id == chat_id) {
            inner.target = None;
            true
        } else {
            false
        }
    }

    pub fn delay(&self) -> Duration {
        self.lock().delay
    }

    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = delay;
    }
}
