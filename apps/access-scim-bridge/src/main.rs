//! SCIM 2.0 server provisioning users into Cloudflare Access groups.

mod config;
mod logging;

use std::sync::Arc;

use access_client::AccessClient;
use access_scim::{scim_router, ProvisioningEngine};
use tokio::signal;
use tracing::info;

use crate::config::BridgeConfig;

#[tokio::main]
async fn main() {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = BridgeConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    });

    logging::init_logging(&config.log_filter);

    info!(
        listen_addr = %config.listen_addr,
        account_id = %config.account_id,
        api_base_url = %config.api_base_url,
        "Starting SCIM bridge"
    );

    let client = AccessClient::new(
        config.api_base_url.clone(),
        config.account_id.clone(),
        config.api_token.clone(),
        config.request_timeout,
    )
    .unwrap_or_else(|e| {
        tracing::error!("Failed to build Cloudflare client: {e}");
        std::process::exit(1);
    });

    match client.verify_token().await {
        Ok(token) => info!(token_id = %token.id, "Cloudflare API token verified"),
        Err(e) => {
            tracing::error!("Cloudflare API token verification failed: {e}");
            std::process::exit(1);
        }
    }

    let engine = Arc::new(ProvisioningEngine::new(Arc::new(client)));
    let app = scim_router(engine, config.bearer_token.clone());

    let listener = match tokio::net::TcpListener::bind(config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {e}", config.listen_addr);
            std::process::exit(1);
        }
    };

    info!(addr = %config.listen_addr, "Server listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
