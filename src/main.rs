// src/main.rs

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use vigil::config::CONFIG;
use vigil::memory::cleanup_scheduler::spawn_cleanup_scheduler;
use vigil::memory::core::traits::MemoryStore;
use vigil::memory::core::types::MemoryKind;
use vigil::memory::storage::sqlite::SqliteMemoryStore;

#[derive(Parser)]
#[command(name = "vigil", about = "Conversational memory engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the memory daemon (periodic cleanup of expired exchanges).
    Run,
    /// Run one cleanup sweep and exit.
    Sweep,
    /// Delete a user's long-term memories.
    Forget {
        #[arg(long)]
        user: i64,
        /// Restrict deletion to "preference" or "fact".
        #[arg(long)]
        kind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let level = Level::from_str(&CONFIG.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    // Schema must exist before any operation.
    let options =
        SqliteConnectOptions::from_str(&CONFIG.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(CONFIG.sqlite_max_connections)
        .connect_with(options)
        .await?;

    let store = Arc::new(SqliteMemoryStore::with_ttl_hours(
        pool,
        CONFIG.short_term_ttl_hours,
    ));
    store.run_migrations().await?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_daemon(store).await,
        Command::Sweep => {
            let removed = store.purge_expired_short_term().await?;
            info!("Sweep removed {} expired exchanges", removed);
            Ok(())
        }
        Command::Forget { user, kind } => {
            let kind = match kind.as_deref() {
                None => None,
                Some("preference") => Some(MemoryKind::Preference),
                Some("fact") => Some(MemoryKind::Fact),
                Some(other) => {
                    anyhow::bail!("unknown kind '{other}' (expected 'preference' or 'fact')")
                }
            };
            let removed = store.delete_long_term(user, kind).await?;
            info!("Forgot {} long-term memories for user {}", removed, user);
            Ok(())
        }
    }
}

async fn run_daemon(store: Arc<SqliteMemoryStore>) -> anyhow::Result<()> {
    info!("Starting vigil memory daemon");
    info!("Database: {}", CONFIG.database_url);
    info!(
        "Cleanup sweep every {}h, short-term TTL {}h",
        CONFIG.cleanup_interval_hours, CONFIG.short_term_ttl_hours
    );

    let shutdown = CancellationToken::new();
    let sweeper = spawn_cleanup_scheduler(
        store,
        Duration::from_secs(CONFIG.cleanup_interval_hours * 3600),
        shutdown.clone(),
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping cleanup scheduler");

    // Stop scheduling new sweeps and wait out any in-flight sweep.
    shutdown.cancel();
    sweeper.await?;

    info!("Daemon shut down cleanly");
    Ok(())
}
