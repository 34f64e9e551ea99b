//! WILDCAT — Fantasy League Lineup & Wager Service
//!
//! Entry point. Loads configuration, initialises structured logging,
//! opens the league store (seeding the demo dataset on first boot),
//! and serves the HTTP/websocket API with graceful shutdown.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use wildcat::config::{AppConfig, StorageBackend};
use wildcat::league::LeagueService;
use wildcat::realtime::BroadcastNotifier;
use wildcat::server;
use wildcat::store::file::FileStore;
use wildcat::store::memory::MemoryStore;
use wildcat::store::{seed, LeagueStore};

const BANNER: &str = r#"
 __      _____ _    ___   ___   _ _____
 \ \    / /_ _| |  |   \ / __| /_\_   _|
  \ \/\/ / | || |__| |) | (__ / _ \| |
   \_/\_/ |___|____|___/ \___/_/ \_\_|

  Weekly Lineup Locks, Wagers & Adjusted Scoring
  v0.1.0 — League Service
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load_or_default("config.toml");

    // Initialise structured logging
    init_logging(&cfg);

    // Print startup banner
    println!("{BANNER}");
    info!(
        port = cfg.server.port,
        season = cfg.league.season,
        max_week = cfg.league.max_week,
        backend = %cfg.storage.backend,
        "WILDCAT starting up"
    );

    // -- Open the store ---------------------------------------------------

    let store: Arc<dyn LeagueStore> = match cfg.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::load(&cfg.storage.path)?),
    };

    if cfg.league.seed_demo && seed::seed_if_empty(store.as_ref()).await? {
        info!("Demo league seeded");
    }

    // -- Wire up the service and serve ------------------------------------

    let notifier = Arc::new(BroadcastNotifier::new());
    let service = Arc::new(LeagueService::new(
        store,
        notifier,
        cfg.league.season,
        cfg.league.max_week,
    ));

    server::serve(service, cfg.server.port).await?;

    info!("WILDCAT shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging(cfg: &AppConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wildcat=info"));

    let json_logging = std::env::var("WILDCAT_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }

    let _ = cfg;
}
