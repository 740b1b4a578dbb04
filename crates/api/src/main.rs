use std::sync::Arc;

use anyhow::Context;
use recipe_ai::OllamaClient;
use recipe_api::{
    app::{build_app, services::AppServices},
    config::AppConfig,
};
use recipe_events::{CancellationToken, EventBus, InMemoryEventBus};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    recipe_observability::init(&config.log_config());

    info!(
        environment = %config.environment,
        port = config.port,
        "starting application"
    );

    let shutdown = CancellationToken::new();

    let bus = Arc::new(InMemoryEventBus::with_config(config.event_bus.clone())?);
    let llm = Arc::new(OllamaClient::new(config.ollama.clone())?);
    let services = Arc::new(AppServices::new(bus.clone(), llm, shutdown.clone()));

    bus.start(&shutdown).context("failed to start event bus")?;

    let app = build_app(services, config.request_timeout);
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;

    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped; draining event bus");

    // Handler contexts stay live while the queue drains; cancel them only
    // once the drain is finished or has run out of time.
    match tokio::time::timeout(config.shutdown_timeout, bus.stop()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "event bus stopped with errors"),
        Err(_) => warn!(
            timeout_secs = config.shutdown_timeout.as_secs(),
            "event bus did not drain before the shutdown timeout"
        ),
    }
    shutdown.cancel();

    let stats = bus.stats();
    info!(
        events_published = stats.events_published,
        handlers_failed = stats.handlers_failed,
        "application exited"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
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

    info!("shutdown signal received");
}
