use std::net::SocketAddr;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use collector::config::Config;
use collector::db;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    // Panics in spawned tasks are logged; the runtime keeps the process alive.
    std::panic::set_hook(Box::new(|info| {
        let detail = collector::panic_message(info.payload());
        match info.location() {
            Some(loc) => tracing::error!("Unhandled panic at {loc}: {detail}"),
            None => tracing::error!("Unhandled panic: {detail}"),
        }
    }));

    tracing::info!("Starting collector");

    let pool = db::connect(&config).await.map_err(|e| {
        tracing::error!(
            "Failed to open database at {}: {e}",
            config.database_path.display()
        );
        e
    })?;

    match db::submissions::count(&pool).await {
        Ok(count) => tracing::info!(
            "Database ready at {} ({count} submissions)",
            config.database_path.display()
        ),
        Err(e) => tracing::warn!("Could not count stored submissions: {e}"),
    }

    let addr = SocketAddr::new(config.host, config.port);
    let app = collector::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind {addr}: {e}");
        e
    })?;
    tracing::info!("Listening on {addr}");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Close exactly once, whichever way the server stopped.
    match db::close(&pool).await {
        Ok(()) => tracing::info!("Database connection closed"),
        Err(e) => tracing::error!("Error closing database: {e}"),
    }

    served?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
