/// Axum server setup and routing

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

use crate::handlers::*;
use crate::state::{MockLedger, SharedLedger};

pub fn create_router(ledger: SharedLedger) -> Router {
    Router::new()
        // rippled websocket API
        .route("/", get(websocket))
        // Faucet
        .route("/accounts", post(faucet))
        .with_state(ledger)
}

pub async fn run_server(ledger: SharedLedger, host: String, port: u16) -> anyhow::Result<()> {
    let app = create_router(ledger);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    log::info!("🚀 rippled mock listening on ws://{}", addr);
    log::info!("🚰 Faucet endpoint: POST http://{}/accounts", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// A mock bound to an ephemeral local port, served from a background task
pub struct MockServer {
    pub ws_url: String,
    pub faucet_url: String,
    pub ledger: SharedLedger,
}

impl MockServer {
    pub async fn start(ledger: MockLedger) -> anyhow::Result<Self> {
        let ledger = ledger.into_shared();
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let app = create_router(ledger.clone());
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log::error!("rippled mock stopped: {}", e);
            }
        });

        log::debug!("rippled mock started on {}", addr);
        Ok(Self {
            ws_url: format!("ws://{}/", addr),
            faucet_url: format!("http://{}/accounts", addr),
            ledger,
        })
    }
}
