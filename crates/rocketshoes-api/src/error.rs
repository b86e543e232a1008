//! # Catalog Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │    Response     │  │     Fixture / Server    │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  RequestFailed  │  │  NotFound       │  │  FixtureLoadFailed      │ │
//! │  │  Timeout        │  │  Status         │  │  BindFailed             │ │
//! │  │  InvalidUrl     │  │  Decode         │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  The cart treats every lookup error the same way: no state change      │
//! │  and a generic failure toast.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use rocketshoes_core::ProductId;

/// Result type alias for catalog operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Catalog client and fixture server errors.
#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request could not be sent or the connection dropped.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Base URL or endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// The catalog has no such resource (HTTP 404).
    #[error("{resource} not found: {id}")]
    NotFound {
        resource: &'static str,
        id: ProductId,
    },

    /// Any other non-2xx status.
    #[error("Catalog returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // =========================================================================
    // Fixture / Server Errors
    // =========================================================================
    /// Fixture file could not be read or parsed.
    #[error("Failed to load fixture: {0}")]
    FixtureLoadFailed(String),

    /// Fixture server could not bind its listener.
    #[error("Failed to bind {addr}: {reason}")]
    BindFailed { addr: String, reason: String },
}

impl ApiError {
    /// Returns true for errors that happened before any response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::RequestFailed(_) | ApiError::Timeout | ApiError::InvalidUrl(_)
        )
    }

    /// Returns true when the catalog answered that the id does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            ApiError::RequestFailed(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}
