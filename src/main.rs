use mood_queue::clock::SystemClock;
use mood_queue::{AppState, Config, router, store};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {err}");
            return Err(err.into());
        }
    };

    let log = match store::connect(&config.backend).await {
        Ok(log) => log,
        Err(err) => {
            error!(
                "Error connecting to Google Sheets. Make sure your credentials are configured correctly. ({err})"
            );
            return Err(err.into());
        }
    };

    let state = AppState::new(log, Arc::new(SystemClock), config.refresh_secs);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
