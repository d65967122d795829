//! HTTP API server for `laterlock serve`.

mod error;
mod handlers;
mod router;

use std::sync::Arc;

use crate::app::CliService;

pub use router::router;

/// Run the API until Ctrl-C on a fresh multi-thread runtime.
pub fn serve(service: CliService, bind: &str) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to start runtime: {}", e))?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(bind)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", bind, e))?;
        tracing::info!(addr = %listener.local_addr()?, "laterlock API listening");

        axum::serve(listener, router(Arc::new(service)))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("server stopped");
        Ok(())
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
