//! HTTP server initialization and runtime setup.
//!
//! Handles database connection, migrations, limiter selection, and the Axum
//! server lifecycle.

use crate::application::services::{CustomerService, SessionSigner};
use crate::config::Config;
use crate::infrastructure::limiter::{
    MemoryRateLimiter, RateLimitPolicy, RateLimiter, RedisRateLimiter,
};
use crate::infrastructure::persistence::PgCustomerRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use colored::Colorize;
use redis::{AsyncCommands, aio::ConnectionManager};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_retry::{Retry, strategy::FixedInterval};
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (bounded retries, then fail-fast)
/// - Embedded migrations
/// - Admission-control limiters (Redis store, or in-memory fallback)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails after retries
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let window = Duration::from_secs(config.rate_limit_window_secs);
    let global_policy = RateLimitPolicy::new(config.rate_limit_max, window);
    let login_policy =
        RateLimitPolicy::new(config.login_rate_limit_max, window).skip_successful();

    let (global_limiter, login_limiter): (Arc<dyn RateLimiter>, Arc<dyn RateLimiter>) =
        match connect_limiter_store(&config).await {
            Some(conn) => {
                tracing::info!("Admission counters shared via Redis");
                (
                    Arc::new(RedisRateLimiter::new(conn.clone(), "global", global_policy)),
                    Arc::new(RedisRateLimiter::new(conn, "login", login_policy)),
                )
            }
            None => {
                tracing::info!("Admission counters in-memory");
                let global = Arc::new(MemoryRateLimiter::new(global_policy));
                let login = Arc::new(MemoryRateLimiter::new(login_policy));
                spawn_window_pruner(vec![global.clone(), login.clone()]);
                (global, login)
            }
        };

    let repository = Arc::new(PgCustomerRepository::new(Arc::new(pool)));
    let sessions = SessionSigner::new(
        config.session_signing_secret.clone(),
        Duration::from_secs(config.session_ttl_secs),
    );
    let customer_service = Arc::new(CustomerService::new(repository, sessions));

    let port = config.port;
    let state = AppState::new(
        Arc::new(config),
        customer_service,
        global_limiter,
        login_limiter,
    );

    let app = NormalizePathLayer::trim_trailing_slash().layer(app_router(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    println!(
        "{}",
        format!("Blogify server running on port {}", port)
            .green()
            .bold()
            .underline()
    );
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Connects to PostgreSQL with a few spaced retries, then gives up.
///
/// The process must not enter a partial-start state: either the pool is
/// usable or startup fails with a non-zero exit.
async fn connect_database(config: &Config) -> Result<PgPool> {
    let strategy = FixedInterval::from_millis(2_000).take(4);

    Retry::spawn(strategy, || async {
        PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .connect(&config.database_url)
            .await
    })
    .await
    .context("Failed to connect to database")
}

/// Connects the shared limiter store when `REDIS_URL` is configured.
///
/// Falls back to `None` (in-memory counters) if the connection cannot be
/// established; admission control itself never becomes a startup failure.
async fn connect_limiter_store(config: &Config) -> Option<ConnectionManager> {
    let redis_url = config.redis_url.as_deref()?;

    let client = match redis::Client::open(redis_url) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Invalid REDIS_URL: {}. Using in-memory counters.", e);
            return None;
        }
    };

    match ConnectionManager::new(client).await {
        Ok(mut conn) => match conn.ping::<()>().await {
            Ok(_) => Some(conn),
            Err(e) => {
                tracing::warn!("Redis PING failed: {}. Using in-memory counters.", e);
                None
            }
        },
        Err(e) => {
            tracing::warn!(
                "Failed to connect to Redis: {}. Using in-memory counters.",
                e
            );
            None
        }
    }
}

/// Periodically evicts expired rate-limit windows from in-memory limiters.
fn spawn_window_pruner(limiters: Vec<Arc<MemoryRateLimiter>>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            for limiter in &limiters {
                limiter.prune(Instant::now());
            }
        }
    });
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
