// Octoplay entry point
// Loads configuration, checks the wordlist, then feeds chat events to the dispatcher.

use anyhow::{bail, Context};
use octoplay_core::actors::commands::welcome_message;
use octoplay_core::actors::{Dispatcher, Transport};
use octoplay_core::config::Settings;
use octoplay_core::console::{pump_events, ConsoleTransport};
use octoplay_core::preflight::run_preflight_checks;
use octoplay_core::session::SessionState;
use octoplay_core::telemetry;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::from_env().context("Failed to load settings")?;
    telemetry::init_subscriber(settings.log_format).context("Failed to initialise logging")?;

    let preflight = run_preflight_checks(&settings);
    let dictionary = match preflight.dictionary {
        Some(dictionary) if preflight.report.ready_to_start => dictionary,
        _ => bail!("Preflight failed: {}", preflight.report.failures()),
    };

    let transport = Arc::new(ConsoleTransport::stdout());
    let session = SessionState::new(settings.message_delay());
    let dispatcher = Dispatcher::for_game(
        transport.clone(),
        Arc::new(dictionary),
        session,
        settings.game_rules(),
    )
    .spawn();

    if let Err(e) = transport.notify(&welcome_message(env!("CARGO_PKG_VERSION"))).await {
        warn!("Failed to send welcome message: {}", e);
    }
    info!("Listening for messages from {}...", settings.bot_username);

    let stdin = BufReader::new(tokio::io::stdin());
    let queued = pump_events(stdin, &transport, &dispatcher)
        .await
        .context("Event stream failed")?;

    dispatcher.shutdown().await?;
    info!("Input closed after {} events", queued);
    Ok(())
}
