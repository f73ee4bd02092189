use crate::actors::commands::{parse_command, CommandHandler};
use crate::actors::messages::{ActorError, AppError, DispatchMessage, EventOutcome};
use crate::actors::traits::Transport;
use crate::actors::turn::{GameRules, TurnController};
use crate::game::Dictionary;
use crate::models::ChatEvent;
use crate::session::SessionState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument};

/// Upper bound for one synchronous `process_event` round trip.
/// Covers pacing for a long candidate list plus a throttle wait.
const PROCESS_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Routing key of the handler table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// A `/po`, `/eo` or `/time` message typed by the logged-in user.
    Command,
    /// Any message from someone else; the turn controller filters chat and sender.
    GameBroadcast,
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventCategory::Command => f.write_str("command"),
            EventCategory::GameBroadcast => f.write_str("game_broadcast"),
        }
    }
}

/// Classifies an event. Outgoing messages that are not commands have no category.
pub fn categorize(event: &ChatEvent) -> Option<EventCategory> {
    if event.outgoing {
        parse_command(&event.text).map(|_| EventCategory::Command)
    } else {
        Some(EventCategory::GameBroadcast)
    }
}

/// A handler plugged into the dispatcher for one event category.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    async fn handle(&self, event: &ChatEvent) -> Result<EventOutcome, AppError>;
}

#[async_trait]
impl<T: Transport> EventHandler for TurnController<T> {
    async fn handle(&self, event: &ChatEvent) -> Result<EventOutcome, AppError> {
        TurnController::handle(self, event).await.map(EventOutcome::Turn)
    }
}

#[async_trait]
impl<T: Transport> EventHandler for CommandHandler<T> {
    async fn handle(&self, event: &ChatEvent) -> Result<EventOutcome, AppError> {
        Ok(CommandHandler::handle(self, event)
            .await?
            .map_or(EventOutcome::Unhandled, EventOutcome::Command))
    }
}

/// The handler table plus the channel used to report failures to the user.
pub struct Dispatcher {
    handlers: HashMap<EventCategory, Arc<dyn EventHandler>>,
    notifier: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Transport>) -> Self {
        Self {
            handlers: HashMap::new(),
            notifier,
        }
    }

    /// Wires the command handler and the turn controller over one transport.
    pub fn for_game<T: Transport>(
        transport: Arc<T>,
        dictionary: Arc<Dictionary>,
        session: SessionState,
        rules: GameRules,
    ) -> Self {
        let commands = CommandHandler::new(transport.clone(), session.clone());
        let turns = TurnController::new(transport.clone(), dictionary, session, rules);
        Self::new(transport)
            .register(EventCategory::Command, Arc::new(commands))
            .register(EventCategory::GameBroadcast, Arc::new(turns))
    }

    /// Adds or replaces the handler for `category`.
    pub fn register(mut self, category: EventCategory, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.insert(category, handler);
        self
    }

    /// Routes one event to its handler.
    pub async fn dispatch(&self, event: &ChatEvent) -> Result<EventOutcome, AppError> {
        let Some(category) = categorize(event) else {
            return Ok(EventOutcome::Unhandled);
        };
        let handler = self
            .handlers
            .get(&category)
            .ok_or_else(|| ActorError::NoHandler(category.to_string()))?;
        handler.handle(event).await
    }

    /// Spawns the dispatch loop and returns a handle to it.
    pub fn spawn(self) -> DispatcherHandle {
        let (sender, receiver) = mpsc::channel(32);
        let runner = DispatcherRunner {
            receiver,
            dispatcher: self,
        };
        tokio::spawn(async move { runner.run().await });
        DispatcherHandle { sender }
    }
}

/// A handle to the running dispatch loop.
///
/// Events are handled strictly one at a time, in submission order.
#[derive(Clone)]
pub struct DispatcherHandle {
    sender: mpsc::Sender<DispatchMessage>,
}

impl DispatcherHandle {
    /// Queues an event without waiting for its outcome.
    pub async fn submit(&self, event: ChatEvent) -> Result<(), AppError> {
        self.sender
            .send(DispatchMessage::Event {
                event,
                responder: None,
            })
            .await
            .map_err(|e| ActorError::Unavailable(e.to_string()).into())
    }

    /// Queues an event and waits until it has been handled.
    #[instrument(skip(self, event), fields(chat_id = event.chat_id, message_id = event.message_id))]
    pub async fn process_event(&self, event: ChatEvent) -> Result<EventOutcome, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(DispatchMessage::Event {
                event,
                responder: Some(send),
            })
            .await
            .map_err(|e| ActorError::Unavailable(e.to_string()))?;
        timeout(PROCESS_TIMEOUT, recv)
            .await?
            .map_err(|e| ActorError::Unavailable(e.to_string()))?
    }

    /// Stops the loop after the events already queued, and waits for it.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(DispatchMessage::Shutdown { responder: send })
            .await
            .map_err(|e| ActorError::Unavailable(e.to_string()))?;
        recv.await
            .map_err(|e| ActorError::Unavailable(e.to_string()).into())
    }
}

// --- Actor Runner ---
struct DispatcherRunner {
    receiver: mpsc::Receiver<DispatchMessage>,
    dispatcher: Dispatcher,
}

impl DispatcherRunner {
    async fn run(mut self) {
        info!("Dispatcher started");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                DispatchMessage::Event { event, responder } => {
                    let result = self.dispatcher.dispatch(&event).await;
                    if let Err(e) = &result {
                        self.report(&event, e).await;
                    }
                    if let Some(responder) = responder {
                        let _ = responder.send(result);
                    }
                }
                DispatchMessage::Shutdown { responder } => {
                    info!("Dispatcher shutting down...");
                    let _ = responder.send(());
                    break;
                }
            }
        }
        info!("Dispatcher stopped");
    }

    async fn report(&self, event: &ChatEvent, err: &AppError) {
        error!(
            chat_id = event.chat_id,
            message_id = event.message_id,
            "Error handling event: {}",
            err
        );
        if let Err(e) = self
            .dispatcher
            .notifier
            .notify(&format!("An error occurred: {}", err))
            .await
        {
            error!("Failed to notify user: {}", e);
        }
    }
}
