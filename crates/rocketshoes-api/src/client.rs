//! # HTTP Catalog Client
//!
//! reqwest-backed [`Catalog`] for the remote stock/product service.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stock(3)                                                               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  GET {base_url}/stock/3                                                │
//! │     │                                                                   │
//! │     ├── transport error ──────────► RequestFailed / Timeout            │
//! │     ├── 404 ──────────────────────► NotFound                           │
//! │     ├── other non-2xx ────────────► Status                             │
//! │     ├── body not {amount} ────────► Decode                             │
//! │     └── 200 {amount: 2} ──────────► Stock { id: 3, amount: 2 }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries. A timeout only applies when one is configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use rocketshoes_core::{Product, ProductId, Stock};

use crate::error::{ApiError, ApiResult};
use crate::Catalog;

/// Body of `GET /stock/{id}`. Only `amount` is required.
#[derive(Debug, Deserialize)]
struct StockPayload {
    amount: u32,
}

/// HTTP client for the catalog service.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpCatalog {
    /// Creates a client for `base_url`.
    ///
    /// ## Arguments
    /// * `base_url` - e.g. `http://localhost:3333` (a path prefix is allowed)
    /// * `timeout` - per-request timeout, `None` to wait indefinitely
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ApiResult<Self> {
        // A trailing slash keeps any path prefix when joining endpoints.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::RequestFailed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpCatalog { base_url, client })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: &str, id: ProductId) -> ApiResult<Url> {
        Ok(self.base_url.join(&format!("{}/{}", resource, id))?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        id: ProductId,
        path: &str,
    ) -> ApiResult<T> {
        let url = self.endpoint(path, id)?;
        debug!(url = %url, "Catalog request");

        let resp = self.client.get(url.clone()).send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { resource, id });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn stock(&self, id: ProductId) -> ApiResult<Stock> {
        let payload: StockPayload = self.get_json("stock", id, "stock").await?;
        Ok(Stock {
            id,
            amount: payload.amount,
        })
    }

    async fn product(&self, id: ProductId) -> ApiResult<Product> {
        self.get_json("product", id, "products").await
    }
}
