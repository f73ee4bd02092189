use crate::actors::traits::Transport;
use crate::error::AppError;
use crate::models::ChatId;
use crate::session::SessionState;
use std::future::Future;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Pacing and throttle backoff for outbound chat actions.
///
/// The inter-message delay lives in `SessionState` and is read on every call,
/// so a `/time` change applies from the next submission on.
#[derive(Debug, Clone)]
pub struct Pacer {
    session: SessionState,
}

impl Pacer {
    pub fn new(session: SessionState) -> Self {
        Pacer { session }
    }

    /// Shows a typing indicator, then waits the currently configured delay.
    ///
    /// A failing typing indicator is only logged.
    pub async fn pace<T: Transport + ?Sized>(&self, transport: &T, chat_id: ChatId) {
        if let Err(e) = transport.send_typing(chat_id).await {
            debug!("Typing indicator failed: {}", e);
        }
        let delay = self.session.delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    /// Runs `action`. On `AppError::Throttled` waits exactly the requested duration
    /// and hands the same error back; retrying is the caller's decision.
    pub async fn submit_with_backoff<F, Fut, T>(&self, action: F) -> Result<T, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        match action().await {
            Err(AppError::Throttled { wait }) => {
                warn!("Flood wait: sleeping for {} seconds", wait.as_secs());
                sleep(wait).await;
                Err(AppError::Throttled { wait })
            }
            other => other,
        }
    }
}
