//! # Schema Setup
//!
//! The key-value slot needs a single table. It is created on open, so there
//! is no separate migration step to run.
//!
//! ```text
//! kv_store
//! ├── key         TEXT PRIMARY KEY   "@RocketShoes:cart"
//! ├── value       TEXT NOT NULL      serialized snapshot
//! └── updated_at  TEXT NOT NULL      RFC 3339 write time
//! ```

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{StorageError, StorageResult};

const CREATE_KV_STORE: &str = r#"
CREATE TABLE IF NOT EXISTS kv_store (
    key        TEXT PRIMARY KEY NOT NULL,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// Creates the key-value table if it does not exist.
///
/// Idempotent: safe to run on every open.
pub async fn ensure_schema(pool: &SqlitePool) -> StorageResult<()> {
    sqlx::query(CREATE_KV_STORE)
        .execute(pool)
        .await
        .map_err(|e| StorageError::SchemaFailed(e.to_string()))?;

    info!("Key-value schema ready");
    Ok(())
}
