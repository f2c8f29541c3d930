use crate::api::{AppState, build_router};
use crate::auth::ClerkProvider;
use crate::cli::parser::Commands;
use crate::config::{Config, ServerSettings};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Serve { bind } = cmd else {
        return Ok(());
    };

    let mut cfg = cfg.clone();
    if let Some(b) = bind {
        cfg.bind = b.clone();
    }
    let settings = cfg.require_server_settings()?;
    init_tracing(&cfg);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(settings))
}

fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    let result = if cfg.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {e}");
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

async fn serve(settings: ServerSettings) -> AppResult<()> {
    {
        let pool = DbPool::new(&settings.database)?;
        let applied = init_db(&pool.conn)?;
        if !applied.is_empty() {
            info!(?applied, "database migrations applied");
        }
    }

    let identity = ClerkProvider::new(
        &settings.clerk_api_url,
        &settings.clerk_secret_key,
        &settings.clerk_publishable_key,
    )?;
    info!(issuer = identity.issuer(), "identity provider configured");

    let state = AppState::new(&settings.database, Arc::new(identity));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind).await?;
    info!(bind = %settings.bind, database = %settings.database, "rtimesheet listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Other(format!("server error: {e}")))?;

    info!("server stopped");
    Ok(())
}
