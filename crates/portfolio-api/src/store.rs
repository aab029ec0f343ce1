use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::error;

use portfolio_db::Database;

use crate::error::ApiError;

/// Run a blocking store call off the async runtime.
pub(crate) async fn run_blocking<F, T>(
    db: &Arc<Database>,
    context: &'static str,
    f: F,
) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = db.clone();
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::store(context, anyhow::anyhow!("worker task failed: {}", e))
        })?
        .map_err(|e| ApiError::store(context, e))
}

/// Fixed-width UTC rendering; text order equals time order.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("corrupt timestamp '{}'", raw))?;
    Ok(parsed.with_timezone(&Utc))
}
