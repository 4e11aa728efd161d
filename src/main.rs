use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use devconnector_api::{
    app,
    auth::CredentialCodec,
    config::config,
    database::{DatabaseManager, DocumentStore, MemoryStore, PgStore},
    is_production,
    services::GithubClient,
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Memory,
    Postgres,
}

#[derive(Parser)]
#[command(name = "devconnector-api")]
#[command(about = "Developer social network API server")]
#[command(version)]
struct Args {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, value_enum, help = "Document store backend; defaults to postgres when DATABASE_URL is set")]
    store: Option<StoreKind>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .init();

    let args = Args::parse();
    let config = config();
    tracing::info!("Starting DevConnector API in {:?} mode", config.environment);

    let kind = args.store.unwrap_or(if config.database.url.is_some() {
        StoreKind::Postgres
    } else {
        StoreKind::Memory
    });

    let store: Arc<dyn DocumentStore> = match kind {
        StoreKind::Postgres => {
            let pool = DatabaseManager::connect(&config.database).await?;
            let store = PgStore::new(pool);
            store.migrate().await?;
            Arc::new(store)
        }
        StoreKind::Memory => {
            if is_production!() {
                tracing::warn!("Running production with the in-memory store; data will not survive a restart");
            }
            Arc::new(MemoryStore::new())
        }
    };

    let codec = CredentialCodec::from_config(&config.security).context("credential codec (set JWT_SECRET)")?;
    let github = GithubClient::new(config.github.clone())?;
    let router = app(AppState::new(store, codec, github), &config.security);

    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("DevConnector API listening on http://{}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
