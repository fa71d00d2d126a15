use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use subtrack_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    subtrack_observability::init();

    let config = AppConfig::from_env();
    let services = subtrack_api::app::build_services(&config)
        .await
        .context("failed to wire services")?;
    let app = subtrack_api::app::build_app(Arc::new(services));

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let local = listener.local_addr()?;
    tracing::info!("listening on {local}");
    tracing::info!(
        "API docs at http://localhost:{}{}/",
        local.port(),
        subtrack_api::app::openapi::SWAGGER_PATH
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
