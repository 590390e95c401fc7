use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use gymbot_conversation::TurnRouter;
use gymbot_core::config::GymbotConfig;
use gymbot_push::{ActionsPushClient, Dispatcher};
use gymbot_schedule::Schedule;
use gymbot_subscriptions::SqliteSubscriberStore;
use tracing::{info, warn};

mod app;
mod http;

/// Fulfillment webhook for the Action Gym assistant.
#[derive(Debug, Parser)]
#[command(name = "gymbot-gateway", version)]
struct Args {
    /// Config file path (default: $GYMBOT_CONFIG, then ~/.gymbot/gymbot.toml)
    #[arg(long)]
    config: Option<String>,

    /// Override server.bind
    #[arg(long)]
    bind: Option<String>,

    /// Override server.port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gymbot_gateway=info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    // load config: --config > GYMBOT_CONFIG env > ~/.gymbot/gymbot.toml
    let config_path = args.config.or_else(|| std::env::var("GYMBOT_CONFIG").ok());
    let mut config = GymbotConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        GymbotConfig::default()
    });
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL;")?;
    gymbot_subscriptions::db::init_db(&db)?;
    let store = Arc::new(SqliteSubscriberStore::new(db));

    let schedule = match config.schedule.path.as_deref() {
        Some(path) => Schedule::load(path)?,
        None => Schedule::builtin()?,
    };
    info!(days = schedule.day_count(), "class schedule ready");

    // a broken key file should not keep the conversational side down
    let push = ActionsPushClient::from_config(&config.push).unwrap_or_else(|e| {
        warn!(error = %e, "push client misconfigured, notifications will fail");
        ActionsPushClient::new(config.push.endpoint.clone(), config.push.sandbox, None)
    });
    if config.push.key_file.is_none() {
        warn!("push.key_file not set, notification batches will abort");
    }

    let dispatcher = Arc::new(Dispatcher::new(
        store.clone(),
        Arc::new(push),
        config.push.title.clone(),
        config.push.locale.clone(),
    ));
    let router = TurnRouter::new(Arc::new(schedule), store, dispatcher);

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let state = Arc::new(app::AppState::new(config, router));
    let app = app::build_router(state);

    info!("Action Gym webhook listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
