//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, cache setup, worker spawning, and Axum server lifecycle.

use crate::config::{Config, StorageBackend};
use crate::domain::entities::NewClientLogEntry;
use crate::domain::log_worker::run_log_worker;
use crate::domain::repositories::Repositories;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::memory::memory_repositories;
use crate::infrastructure::persistence::pg_repositories;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (PostgreSQL with migrations, or in-memory)
/// - Redis cache (or NullCache fallback)
/// - Background client log worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repos = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_pool(&config).await?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");
            pg_repositories(Arc::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            memory_repositories()
        }
    };

    let cache = connect_cache(&config).await;

    let (log_tx, log_rx) = mpsc::channel(config.log_queue_capacity);
    let log_worker = tokio::spawn(run_log_worker(
        log_rx,
        repos.client_logs.clone(),
        config.log_batch_size,
    ));
    tracing::info!(
        capacity = config.log_queue_capacity,
        batch_size = config.log_batch_size,
        "Client log worker started"
    );

    let state = build_state(repos, cache, log_tx, &config);
    let app = app_router(state, config.behind_proxy)?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it the last log sender) is gone; let the worker drain.
    if let Err(e) = log_worker.await {
        tracing::error!(error = %e, "Client log worker panicked");
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Opens a PostgreSQL pool using the `DB_*` pool settings.
///
/// # Errors
///
/// Returns an error if no database URL is configured or the connection fails.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not configured")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    Ok(pool)
}

async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

fn build_state(
    repos: Repositories,
    cache: Arc<dyn CacheService>,
    log_tx: mpsc::Sender<NewClientLogEntry>,
    config: &Config,
) -> AppState {
    AppState::new(repos, cache, log_tx, config.token_signing_secret.clone())
        .expose_error_details(config.is_development())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
