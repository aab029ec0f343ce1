use axum::{Extension, Json, extract::State};
use chrono::Utc;
use tracing::{info, warn};

use portfolio_types::api::{AdminStatus, Claims};
use portfolio_types::envelope::Envelope;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::store::run_blocking;

/// GET /api/admin/status — store reachability and record counts.
/// A failing store is reported in the payload rather than as an error response.
pub async fn status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Envelope<AdminStatus>>, ApiError> {
    let ping = run_blocking(&state.db, "Database ping failed", |db| db.ping()).await;

    let (database, contact_count, score_count) = match ping {
        Ok(()) => (
            "ok".to_string(),
            state.contacts.count().await?,
            state.leaderboard.count().await?,
        ),
        Err(e) => {
            let detail = match &e {
                ApiError::Store { detail, .. } => detail.clone(),
                other => other.to_string(),
            };
            warn!("Status check: database unavailable: {}", detail);
            (format!("error: {}", detail), 0, 0)
        }
    };

    info!("Status requested by {}", claims.sub);
    Ok(Json(Envelope::ok(
        "System status",
        AdminStatus {
            database,
            timestamp: Utc::now(),
            admin_password_configured: state.tokens.password_configured(),
            contact_count,
            score_count,
        },
    )))
}
