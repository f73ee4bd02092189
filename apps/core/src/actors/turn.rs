//! Turn controller: the per-broadcast state machine.
//!
//! `Idle → PatternDetected → Resolving → {Submitting | Skipping} → Idle`
//!
//! A turn runs to completion inside one dispatcher call. While submitting,
//! every guess is followed by a staleness check; a newer message in the chat
//! that we did not send means the question has moved on and the remaining
//! guesses are dropped.

use crate::actors::messages::AppError;
use crate::actors::traits::Transport;
use crate::game::{extract, BlankPattern, Dictionary, Rack};
use crate::models::{ChatEvent, ChatId, MessageId};
use crate::pacing::Pacer;
use crate::session::SessionState;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Game-specific knobs of the turn controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    /// Only broadcasts from this username start a turn (case-insensitive).
    pub bot_username: String,
    /// Label of the control that passes the turn.
    pub pass_label: String,
    /// Wait before pressing the pass control, so the provider UI has settled.
    pub skip_grace: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    PatternDetected,
    Resolving,
    Submitting,
    Skipping,
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TurnState::Idle => "idle",
            TurnState::PatternDetected => "pattern_detected",
            TurnState::Resolving => "resolving",
            TurnState::Submitting => "submitting",
            TurnState::Skipping => "skipping",
        };
        f.write_str(label)
    }
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Wrong chat, wrong sender, or no active target.
    Ignored,
    /// The broadcast carried no usable rack or pattern.
    NoPattern,
    /// Guesses went out. `stale` is set when a newer message than our guesses
    /// was seen, either mid-queue or by the check after the last guess.
    Submitted { sent: Vec<String>, stale: bool },
    /// No candidate. `passed` tells whether the pass control was pressed.
    Skipped { passed: bool },
    /// The provider throttled a retried guess; the rest of the queue was dropped.
    Throttled { sent: Vec<String> },
}

/// Everything known about the turn in flight.
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub turn_id: Uuid,
    pub chat_id: ChatId,
    pub origin: MessageId,
    pub rack: Rack,
    pub pattern: BlankPattern,
    pub candidates: Vec<String>,
    sent_ids: Vec<MessageId>,
    sent_words: Vec<String>,
}

impl TurnContext {
    fn new(chat_id: ChatId, origin: MessageId, rack: Rack, pattern: BlankPattern, candidates: Vec<String>) -> Self {
        Self {
            turn_id: Uuid::new_v4(),
            chat_id,
            origin,
            rack,
            pattern,
            candidates,
            sent_ids: Vec::new(),
            sent_words: Vec::new(),
        }
    }

    fn record_sent(&mut self, message_id: MessageId, word: &str) {
        self.sent_ids.push(message_id);
        self.sent_words.push(word.to_string());
    }

    /// A chat is stale once its newest message is neither the broadcast nor one of our guesses.
    fn is_superseded_by(&self, latest: Option<MessageId>) -> bool {
        match latest {
            Some(id) => id != self.origin && !self.sent_ids.contains(&id),
            None => true,
        }
    }
}

enum SendResult {
    Sent,
    Stale,
    Throttled,
}

/// Drives one game turn per qualifying broadcast.
pub struct TurnController<T: Transport> {
    transport: Arc<T>,
    dictionary: Arc<Dictionary>,
    session: SessionState,
    pacer: Pacer,
    rules: GameRules,
}

impl<T: Transport> TurnController<T> {
    pub fn new(transport: Arc<T>, dictionary: Arc<Dictionary>, session: SessionState, rules: GameRules) -> Self {
        let pacer = Pacer::new(session.clone());
        Self {
            transport,
            dictionary,
            session,
            pacer,
            rules,
        }
    }

    /// Plays one turn for `event`.
    ///
    /// Throttling never escapes: a stray throttle outside submission waits the
    /// requested time and ends the turn. Other errors are returned to the caller.
    #[instrument(skip(self, event), fields(chat_id = event.chat_id, message_id = event.message_id))]
    pub async fn handle(&self, event: &ChatEvent) -> Result<TurnOutcome, AppError> {
        match self.play(event).await {
            Err(AppError::Throttled { wait }) => {
                warn!("Flood wait: sleeping for {} seconds", wait.as_secs());
                sleep(wait).await;
                Ok(TurnOutcome::Throttled { sent: Vec::new() })
            }
            other => other,
        }
    }

    async fn play(&self, event: &ChatEvent) -> Result<TurnOutcome, AppError> {
        if !self.session.is_active(event.chat_id) {
            return Ok(TurnOutcome::Ignored);
        }
        let sender = self.transport.sender_username(event).await?;
        if !sender.is_some_and(|s| s.eq_ignore_ascii_case(&self.rules.bot_username)) {
            return Ok(TurnOutcome::Ignored);
        }

        transition(TurnState::Idle, TurnState::PatternDetected);
        let extraction = extract(&event.text);
        if extraction.is_empty() {
            debug!("No rack/pattern in broadcast");
            transition(TurnState::PatternDetected, TurnState::Idle);
            return Ok(TurnOutcome::NoPattern);
        }

        transition(TurnState::PatternDetected, TurnState::Resolving);
        let candidates = self.dictionary.lookup(&extraction.rack, &extraction.pattern);
        let ctx = TurnContext::new(
            event.chat_id,
            event.message_id,
            extraction.rack,
            extraction.pattern,
            candidates,
        );
        info!(
            turn_id = %ctx.turn_id,
            rack = %ctx.rack,
            pattern = %ctx.pattern,
            candidates = ctx.candidates.len(),
            "Turn detected"
        );

        if ctx.candidates.is_empty() {
            transition(TurnState::Resolving, TurnState::Skipping);
            let outcome = self.skip(event).await;
            transition(TurnState::Skipping, TurnState::Idle);
            outcome
        } else {
            transition(TurnState::Resolving, TurnState::Submitting);
            let outcome = self.submit(ctx).await;
            transition(TurnState::Submitting, TurnState::Idle);
            outcome
        }
    }

    async fn submit(&self, mut ctx: TurnContext) -> Result<TurnOutcome, AppError> {
        info!(turn_id = %ctx.turn_id, "Words found: {:?}", ctx.candidates);

        for word in ctx.candidates.clone() {
            self.pacer.pace(self.transport.as_ref(), ctx.chat_id).await;

            match self.send_guess(&mut ctx, &word).await? {
                SendResult::Sent => info!(turn_id = %ctx.turn_id, "Sent: {}", word),
                SendResult::Stale => return Ok(stale_outcome(ctx)),
                SendResult::Throttled => {
                    warn!(turn_id = %ctx.turn_id, "Throttled again, dropping remaining guesses");
                    return Ok(TurnOutcome::Throttled { sent: ctx.sent_words });
                }
            }

            if self.is_stale(&ctx).await? {
                return Ok(stale_outcome(ctx));
            }
        }

        let stale = self.is_stale(&ctx).await?;
        if stale {
            info!(turn_id = %ctx.turn_id, "New question detected after last guess");
        }
        Ok(TurnOutcome::Submitted {
            sent: ctx.sent_words,
            stale,
        })
    }

    /// Sends one guess. A throttled send is retried once, after the pacer's
    /// wait, if the turn is still current.
    async fn send_guess(&self, ctx: &mut TurnContext, word: &str) -> Result<SendResult, AppError> {
        let chat_id = ctx.chat_id;
        let send = || self.transport.send_message(chat_id, word);

        match self.pacer.submit_with_backoff(send).await {
            Ok(id) => {
                ctx.record_sent(id, word);
                return Ok(SendResult::Sent);
            }
            Err(AppError::Throttled { .. }) => {}
            Err(e) => return Err(e),
        }

        if self.is_stale(ctx).await? {
            return Ok(SendResult::Stale);
        }

        match self.pacer.submit_with_backoff(send).await {
            Ok(id) => {
                ctx.record_sent(id, word);
                Ok(SendResult::Sent)
            }
            Err(AppError::Throttled { .. }) => Ok(SendResult::Throttled),
            Err(e) => Err(e),
        }
    }

    async fn is_stale(&self, ctx: &TurnContext) -> Result<bool, AppError> {
        let latest = self.transport.latest_message(ctx.chat_id).await?;
        Ok(ctx.is_superseded_by(latest.map(|m| m.message_id)))
    }

    async fn skip(&self, event: &ChatEvent) -> Result<TurnOutcome, AppError> {
        warn!("No word found. Looking for '{}' control", self.rules.pass_label);

        let Some(control) = event.find_control(&self.rules.pass_label) else {
            warn!("No '{}' control on broadcast, leaving turn", self.rules.pass_label);
            return Ok(TurnOutcome::Skipped { passed: false });
        };

        sleep(self.rules.skip_grace).await;
        match self
            .pacer
            .submit_with_backoff(|| self.transport.activate_control(&control))
            .await
        {
            Ok(()) => {
                info!("'{}' control activated", self.rules.pass_label);
                Ok(TurnOutcome::Skipped { passed: true })
            }
            Err(AppError::Throttled { .. }) => Ok(TurnOutcome::Skipped { passed: false }),
            Err(e) => Err(e),
        }
    }
}

fn stale_outcome(ctx: TurnContext) -> TurnOutcome {
    info!(turn_id = %ctx.turn_id, "New message detected, ignoring remaining guesses");
    TurnOutcome::Submitted {
        sent: ctx.sent_words,
        stale: true,
    }
}

fn transition(from: TurnState, to: TurnState) {
    debug!(%from, %to, "Turn state");
}
