//! Dispatcher Tests
//!
//! Command handling, routing and the error boundary of the dispatch loop.

use crate::actors::commands::{CommandHandler, CommandOutcome};
use crate::actors::dispatcher::{categorize, Dispatcher, EventCategory};
use crate::actors::messages::{AppError, EventOutcome};
use crate::actors::turn::{GameRules, TurnOutcome};
use crate::console::{pump_events, ConsoleTransport};
use crate::game::Dictionary;
use crate::models::OutboundAction;
use crate::session::SessionState;
use crate::tests::support::*;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn rules() -> GameRules {
    GameRules {
        bot_username: BOT.to_string(),
        pass_label: PASS.to_string(),
        skip_grace: Duration::from_secs(6),
    }
}

fn dictionary() -> Arc<Dictionary> {
    Arc::new(Dictionary::from_words(["cat", "car", "can"]))
}

fn game_dispatcher(transport: Arc<MockTransport>, session: SessionState) -> Dispatcher {
    Dispatcher::for_game(transport, dictionary(), session, rules())
}

// ============================================================================
// Routing
// ============================================================================

#[cfg(test)]
mod routing_tests {
    use super::*;

    #[test]
    fn test_categorize() {
        assert_eq!(categorize(&command(1, 1, "/po")), Some(EventCategory::Command));
        assert_eq!(categorize(&command(1, 1, "just chatting")), None);
        assert_eq!(
            categorize(&broadcast(1, "3 letter C A T", "c_t")),
            Some(EventCategory::GameBroadcast)
        );

        // Someone else typing a command is still just a group message.
        let mut foreign = command(1, 1, "/po");
        foreign.outgoing = false;
        assert_eq!(categorize(&foreign), Some(EventCategory::GameBroadcast));
    }

    #[tokio::test]
    async fn test_outgoing_chatter_is_unhandled() {
        let transport = Arc::new(MockTransport::new());
        let dispatcher = game_dispatcher(transport.clone(), SessionState::new(Duration::ZERO));

        let outcome = dispatcher.dispatch(&command(GAME_CHAT, 5, "gg everyone")).await.unwrap();
        assert_eq!(outcome, EventOutcome::Unhandled);
        assert!(transport.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_missing_handler_is_an_error() {
        let transport = Arc::new(MockTransport::new());
        let dispatcher = Dispatcher::new(transport);

        let result = dispatcher.dispatch(&command(GAME_CHAT, 5, "/po")).await;
        assert!(result.is_err());
    }
}

// ============================================================================
// Commands
// ============================================================================

#[cfg(test)]
mod command_tests {
    use super::*;

    #[tokio::test]
    async fn test_play_then_end() {
        let transport = Arc::new(MockTransport::new());
        let session = SessionState::new(Duration::ZERO);
        let handle = game_dispatcher(transport.clone(), session.clone()).spawn();

        let outcome = handle.process_event(command(GAME_CHAT, 1, "/po")).await.unwrap();
        assert_eq!(outcome, EventOutcome::Command(CommandOutcome::TargetSet(GAME_CHAT)));
        assert!(session.is_active(GAME_CHAT));

        // /eo in another chat leaves the game running.
        let outcome = handle.process_event(command(OTHER_CHAT, 2, "/eo")).await.unwrap();
        assert_eq!(outcome, EventOutcome::Command(CommandOutcome::TargetUnchanged));
        assert!(session.is_active(GAME_CHAT));

        let outcome = handle.process_event(command(GAME_CHAT, 3, "/eo")).await.unwrap();
        assert_eq!(outcome, EventOutcome::Command(CommandOutcome::TargetCleared(GAME_CHAT)));
        assert!(session.active_target().is_none());

        let notes = transport.notifications();
        assert_eq!(notes.len(), 2);
        assert!(notes[0].contains("now playing in Chat -100123"));
        assert!(notes[1].contains("stopped playing in Chat -100123"));
    }

    #[tokio::test]
    async fn test_time_sets_delay_and_deletes_command() {
        let transport = Arc::new(MockTransport::new());
        let session = SessionState::new(Duration::from_secs(5));
        let handle = game_dispatcher(transport.clone(), session.clone()).spawn();

        let outcome = handle.process_event(command(GAME_CHAT, 7, "/time 2")).await.unwrap();

        assert_eq!(
            outcome,
            EventOutcome::Command(CommandOutcome::DelaySet(Duration::from_secs(2)))
        );
        assert_eq!(session.delay(), Duration::from_secs(2));
        assert_eq!(transport.notifications(), vec!["Custom delay set to 2 seconds.".to_string()]);
        assert_eq!(transport.deleted(), vec![(GAME_CHAT, 7)]);
    }

    #[tokio::test]
    async fn test_time_rejects_non_numeric() {
        let transport = Arc::new(MockTransport::new());
        let session = SessionState::new(Duration::from_secs(5));
        let handle = game_dispatcher(transport.clone(), session.clone()).spawn();

        for text in ["/time soon", "/time -3", "/time"] {
            let outcome = handle.process_event(command(GAME_CHAT, 7, text)).await.unwrap();
            assert_eq!(outcome, EventOutcome::Command(CommandOutcome::DelayRejected));
        }

        assert_eq!(session.delay(), Duration::from_secs(5));
        assert!(transport
            .notifications()
            .iter()
            .all(|n| n == "Invalid delay value. Please enter a valid number."));
        assert_eq!(transport.notifications().len(), 3);
    }

    #[tokio::test]
    async fn test_time_rejects_delay_above_limit() {
        let transport = Arc::new(MockTransport::new());
        let session = SessionState::new(Duration::from_secs(5));
        let commands = CommandHandler::new(transport.clone(), session.clone());

        let outcome = commands.handle(&command(GAME_CHAT, 7, "/time 3601")).await.unwrap();
        assert_eq!(outcome, Some(CommandOutcome::DelayRejected));

        let outcome = commands.handle(&command(GAME_CHAT, 8, "/time 3600")).await.unwrap();
        assert_eq!(
            outcome,
            Some(CommandOutcome::DelaySet(Duration::from_secs(3600)))
        );
        assert_eq!(session.delay(), Duration::from_secs(3600));
    }

    #[tokio::test]
    async fn test_time_deletes_command_even_when_notify_fails() {
        let transport = Arc::new(MockTransport::new().failing_notifications());
        let session = SessionState::new(Duration::from_secs(5));
        let commands = CommandHandler::new(transport.clone(), session.clone());

        let result = commands.handle(&command(GAME_CHAT, 7, "/time 2")).await;

        assert!(matches!(result, Err(AppError::Transport(_))));
        assert_eq!(session.delay(), Duration::from_secs(2));
        assert_eq!(transport.deleted(), vec![(GAME_CHAT, 7)]);
    }
}

// ============================================================================
// Full flow
// ============================================================================

#[cfg(test)]
mod flow_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_play_command_then_broadcast() {
        let transport = Arc::new(MockTransport::new());
        let handle = game_dispatcher(transport.clone(), SessionState::new(Duration::from_secs(1))).spawn();

        handle.process_event(command(GAME_CHAT, 1, "/po")).await.unwrap();
        transport.observe(2);
        let outcome = handle
            .process_event(broadcast(2, "3 letter T A C R", "_ a _"))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            EventOutcome::Turn(TurnOutcome::Submitted { ref sent, stale: false }) if sent.len() == 2
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_error_is_reported_and_loop_survives() {
        let transport = Arc::new(MockTransport::new().failing_sends());
        let session = SessionState::new(Duration::ZERO);
        session.set_target(GAME_CHAT, "Word Club");
        let handle = game_dispatcher(transport.clone(), session).spawn();

        let result = handle.process_event(broadcast(2, "3 letter C A T", "c_t")).await;
        assert!(result.is_err());
        assert!(transport.notifications()[0].starts_with("An error occurred"));

        // The next event is still handled.
        let outcome = handle.process_event(command(GAME_CHAT, 3, "/time 4")).await.unwrap();
        assert_eq!(
            outcome,
            EventOutcome::Command(CommandOutcome::DelaySet(Duration::from_secs(4)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drains_queued_events() {
        let transport = Arc::new(MockTransport::new());
        let session = SessionState::new(Duration::ZERO);
        let handle = game_dispatcher(transport.clone(), session.clone()).spawn();

        handle.submit(command(GAME_CHAT, 1, "/po")).await.unwrap();
        handle.submit(command(GAME_CHAT, 2, "/time 9")).await.unwrap();
        handle.shutdown().await.unwrap();

        assert!(session.is_active(GAME_CHAT));
        assert_eq!(session.delay(), Duration::from_secs(9));
        assert!(handle.submit(command(GAME_CHAT, 3, "/eo")).await.is_err());
    }
}

// ============================================================================
// Console transport end to end
// ============================================================================

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod console_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_json_lines_drive_a_full_turn() {
        let buf = SharedBuf::default();
        let transport = Arc::new(ConsoleTransport::new(buf.clone()));
        let handle = Dispatcher::for_game(
            transport.clone(),
            dictionary(),
            SessionState::new(Duration::ZERO),
            rules(),
        )
        .spawn();

        let input = format!(
            "{}\nnot json\n\n{}\n",
            serde_json::to_string(&command(GAME_CHAT, 1, "/po")).unwrap(),
            serde_json::to_string(&broadcast(2, "3 letter T A C R", "_a_")).unwrap(),
        );

        let queued = pump_events(input.as_bytes(), &transport, &handle).await.unwrap();
        assert_eq!(queued, 2);
        handle.shutdown().await.unwrap();

        let raw = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let actions: Vec<OutboundAction> = raw.lines().map(|l| serde_json::from_str(l).unwrap()).collect();

        let sent: Vec<&str> = actions
            .iter()
            .filter_map(|a| match a {
                OutboundAction::SendMessage { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(sent.len(), 2);
        assert!(sent.contains(&"cat") && sent.contains(&"car"));
        assert!(matches!(actions[0], OutboundAction::Notify { .. }));
    }
}
