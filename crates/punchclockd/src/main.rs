//! punchclockd - The punchclock service
//!
//! This is the main entry point for the punchclock service.
//! It wires together all the components:
//! - Configuration loading
//! - Store initialization
//! - Session tracker and reminder scheduler
//! - Bot API long polling and the command dispatcher
//! - Failure webhook

use anyhow::{bail, Context, Result};
use clap::Parser;
use punchclock_bot::{ChatTransport, Dispatcher, FailureNotifier, TelegramClient};
use punchclock_config::{load_config, Settings};
use punchclock_core::{ReminderScheduler, SessionTracker};
use punchclock_store::{SessionStore, SqliteStore};
use punchclock_util::{default_config_path, now_in, DATABASE_FILENAME};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Pause before polling again after a transport error
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// punchclockd - Work time tracking chat bot
#[derive(Parser, Debug)]
#[command(name = "punchclockd")]
#[command(about = "Work time tracking chat bot", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/punchclock/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Bot API token override (or set PUNCHCLOCK_BOT_TOKEN env var)
    #[arg(short, long, env = "PUNCHCLOCK_BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Data directory override (or set PUNCHCLOCK_DATA_DIR env var)
    #[arg(short, long, env = "PUNCHCLOCK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Main service state
struct Service {
    settings: Settings,
    dispatcher: Dispatcher,
    transport: Arc<dyn ChatTransport>,
    notifier: FailureNotifier,
    scheduler: Arc<ReminderScheduler>,
}

impl Service {
    fn new(args: &Args) -> Result<Self> {
        let settings = load_config(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        info!(
            config_path = %args.config.display(),
            authorized_chat_id = %settings.bot.authorized_chat_id,
            timezone = %settings.work.zone,
            daily_quota_hours = settings.work.daily_quota_hours,
            "Configuration loaded"
        );

        let Some(token) = args.token.clone().or_else(|| settings.bot.token.clone()) else {
            bail!("No bot token configured (set bot.token, --token or PUNCHCLOCK_BOT_TOKEN)");
        };

        let data_dir = args
            .data_dir
            .clone()
            .unwrap_or_else(|| settings.service.data_dir.clone());

        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        let db_path = data_dir.join(DATABASE_FILENAME);
        let store: Arc<dyn SessionStore> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?
                .with_zone(settings.work.zone),
        );

        info!(db_path = %db_path.display(), "Store initialized");

        let open_sessions = store.count_open()?;
        if open_sessions > 1 {
            warn!(
                open_sessions,
                "Store holds several open sessions, clock-out closes the newest first"
            );
        }

        let tracker = Arc::new(SessionTracker::new(
            store,
            settings.work.daily_quota_hours,
        ));
        let scheduler = Arc::new(ReminderScheduler::new());
        let transport: Arc<dyn ChatTransport> =
            Arc::new(TelegramClient::new(&settings.bot.api_url, &token));

        let dispatcher = Dispatcher::new(
            tracker,
            scheduler.clone(),
            transport.clone(),
            settings.bot.authorized_chat_id,
            settings.work.zone,
        );

        let notifier = FailureNotifier::new(settings.alerts.webhook_url.clone());
        if !notifier.is_enabled() {
            info!("No failure webhook configured, failures are only logged");
        }

        Ok(Self {
            settings,
            dispatcher,
            transport,
            notifier,
            scheduler,
        })
    }

    async fn run(self) -> Result<()> {
        let mut sigterm = signal(SignalKind::terminate())
            .context("Failed to create SIGTERM handler")?;
        let mut sigint = signal(SignalKind::interrupt())
            .context("Failed to create SIGINT handler")?;

        let poll_timeout = self.settings.bot.poll_timeout;
        let mut offset: Option<i64> = None;

        info!(
            started_at = %now_in(&self.settings.work.zone),
            "Service running"
        );

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully");
                    break;
                }

                result = self.transport.get_updates(offset, poll_timeout) => {
                    match result {
                        Ok(updates) => {
                            for update in updates {
                                offset = Some(update.update_id + 1);
                                if let Some(message) = &update.message {
                                    self.dispatcher.respond(message, &self.notifier).await;
                                }
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "Polling for updates failed");
                            self.notifier
                                .notify(&format!("Polling for updates failed: {}", e))
                                .await;
                            tokio::time::sleep(POLL_RETRY_DELAY).await;
                        }
                    }
                }
            }
        }

        let pending = self.scheduler.pending_count();
        if pending > 0 {
            info!(pending, "Dropping pending reminders, they are re-armed on next clock-in");
        }

        info!("Shutdown complete");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "punchclockd starting"
    );

    let service = Service::new(&args)?;
    service.run().await
}
