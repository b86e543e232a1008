//! # Fixture Server
//!
//! Serves a [`CatalogFixture`] over HTTP with the same routes as the remote
//! catalog. Used by `rocketshoes serve` during development and by the
//! client tests.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /health          → "OK"                                            │
//! │  GET /products        → all products                                    │
//! │  GET /products/{id}   → one product, 404 if unknown                     │
//! │  GET /stock/{id}      → one stock entry, 404 if unknown                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use rocketshoes_core::{Product, ProductId, Stock};

use crate::error::{ApiError, ApiResult};
use crate::fixture::CatalogFixture;

/// HTTP server for a catalog fixture.
pub struct FixtureServer {
    fixture: Arc<CatalogFixture>,
}

/// Handle for a running fixture server.
#[derive(Debug, Clone)]
pub struct FixtureServerHandle {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
}

impl FixtureServerHandle {
    /// Address the server is listening on.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for [`HttpCatalog`](crate::HttpCatalog).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stops the server.
    pub async fn shutdown(&self) {
        if self.shutdown_tx.send(()).await.is_err() {
            debug!("Fixture server already stopped");
        }
    }
}

impl FixtureServer {
    /// Creates a server for `fixture`.
    pub fn new(fixture: CatalogFixture) -> Self {
        FixtureServer {
            fixture: Arc::new(fixture),
        }
    }

    /// Binds `bind_addr` and serves in a background task.
    ///
    /// Port 0 picks an ephemeral port; read it back from the handle.
    pub async fn start(self, bind_addr: &str) -> ApiResult<FixtureServerHandle> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let app = Router::new()
            .route("/health", get(health_handler))
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product))
            .route("/stock/{id}", get(get_stock))
            .with_state(self.fixture.clone());

        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| ApiError::BindFailed {
                addr: bind_addr.to_string(),
                reason: e.to_string(),
            })?;
        let addr = listener.local_addr().map_err(|e| ApiError::BindFailed {
            addr: bind_addr.to_string(),
            reason: e.to_string(),
        })?;

        info!(addr = %addr, products = self.fixture.products.len(), "Fixture server started");

        tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_rx.recv().await;
                    info!("Fixture server shutting down");
                })
                .await;
            if let Err(e) = result {
                warn!(error = %e, "Fixture server stopped with error");
            }
        });

        Ok(FixtureServerHandle { addr, shutdown_tx })
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn health_handler() -> impl IntoResponse {
    "OK"
}

async fn list_products(State(fixture): State<Arc<CatalogFixture>>) -> Json<Vec<Product>> {
    Json(fixture.products.clone())
}

async fn get_product(
    State(fixture): State<Arc<CatalogFixture>>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, StatusCode> {
    debug!(product_id = id, "GET /products/{id}");
    fixture
        .find_product(id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_stock(
    State(fixture): State<Arc<CatalogFixture>>,
    Path(id): Path<ProductId>,
) -> Result<Json<Stock>, StatusCode> {
    debug!(product_id = id, "GET /stock/{id}");
    fixture.find_stock(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}
