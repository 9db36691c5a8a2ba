mod core;
mod features;
mod shared;

use crate::core::bootstrap::ensure_schema_and_seed;
use crate::core::config::{Config, StoreConfig};
use crate::core::database;
use crate::core::router::build_router;
use crate::features::home::HomeState;
use crate::features::issues::{IssueService, IssueStore, PgIssueStore, ReferenceIssueStore};
use crate::shared::templates::TemplateEngine;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Configuration loaded: tokio_worker_threads={}, missing_location_policy={:?}, default_radius_km={}",
        worker_threads,
        config.issues.missing_location,
        config.issues.default_radius_km
    );

    let store: Arc<dyn IssueStore> = match &config.store {
        StoreConfig::Postgres(db) => {
            let pool = database::create_pool(db).await?;
            tracing::info!("Database connection pool created");
            Arc::new(PgIssueStore::new(pool))
        }
        StoreConfig::Memory => {
            tracing::warn!("Using in-memory issue store, issues will not survive a restart");
            Arc::new(ReferenceIssueStore::new())
        }
    };

    // Schema and seed must be in place before the first request is accepted
    ensure_schema_and_seed(store.as_ref(), config.issues.seed_sample_data)
        .await
        .map_err(|e| anyhow::anyhow!("Bootstrap failed: {}", e))?;

    let issue_service = Arc::new(IssueService::new(store, config.issues.clone()));
    tracing::info!("Issue service initialized");

    let templates = TemplateEngine::from_dir(&config.landing.template_dir);
    if !templates.template_exists("index.html") {
        tracing::warn!(
            "Landing page template missing in {}, GET / will fail",
            config.landing.template_dir
        );
    }
    let home = HomeState {
        templates: Arc::new(templates),
        map_center: config.landing.map_center,
        default_radius_km: issue_service.default_radius_km(),
    };

    let app = build_router(&config, issue_service, home);

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
