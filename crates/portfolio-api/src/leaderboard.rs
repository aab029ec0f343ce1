use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection, rejection::QueryRejection},
};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use portfolio_db::Database;
use portfolio_db::models::{ScoreAggregate, ScoreRow};
use portfolio_types::api::{NewScore, ScoreQuery};
use portfolio_types::envelope::Envelope;
use portfolio_types::models::{ScoreEntry, Stats};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::store::{format_timestamp, parse_timestamp, run_blocking};
use crate::validate;

pub const MAX_PAGE_SIZE: i64 = 100;

/// Game scores. Entries are append-only: there is no update or delete path.
#[derive(Clone)]
pub struct LeaderboardStore {
    db: Arc<Database>,
}

impl LeaderboardStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn submit_score(&self, input: NewScore) -> Result<ScoreEntry, ApiError> {
        let input = validate::score(input)?;

        let row = ScoreRow {
            id: Uuid::new_v4().to_string(),
            player_name: input.player_name,
            score: input.score,
            level: input.level,
            lines: input.lines,
            duration_seconds: input.duration_seconds,
            created_at: format_timestamp(Utc::now()),
        };

        run_blocking(&self.db, "Failed to save score", move |db| {
            db.insert_score(&row)?;
            score_from_row(row)
        })
        .await
    }

    /// Sorted descending by `query.sort`, then `skip` entries dropped and at
    /// most `limit` returned.
    pub async fn list_scores(&self, query: ScoreQuery) -> Result<Vec<ScoreEntry>, ApiError> {
        if !(1..=MAX_PAGE_SIZE).contains(&query.limit) {
            return Err(ApiError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if query.skip < 0 {
            return Err(ApiError::Validation("skip must not be negative".into()));
        }
        let limit = query.limit as u32;
        let skip = query.skip;

        debug!("Listing scores: sort={:?} limit={} skip={}", query.sort, limit, skip);

        run_blocking(&self.db, "Failed to fetch scores", move |db| {
            db.list_scores(query.sort, limit, skip)?
                .into_iter()
                .map(score_from_row)
                .collect()
        })
        .await
    }

    /// Aggregated over every stored score, independent of any listing page.
    pub async fn stats(&self) -> Result<Stats, ApiError> {
        let aggregate =
            run_blocking(&self.db, "Failed to compute stats", |db| db.score_aggregate()).await?;
        Ok(stats_from_aggregate(aggregate))
    }

    pub async fn count(&self) -> Result<u64, ApiError> {
        run_blocking(&self.db, "Failed to count scores", |db| db.count_scores()).await
    }
}

fn stats_from_aggregate(aggregate: ScoreAggregate) -> Stats {
    if aggregate.count == 0 {
        return Stats {
            total_players: 0,
            highest_score: None,
            average_score: 0.0,
        };
    }

    Stats {
        total_players: aggregate.count,
        highest_score: aggregate.max,
        average_score: aggregate.avg.map(round_to_cents).unwrap_or(0.0),
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn score_from_row(row: ScoreRow) -> anyhow::Result<ScoreEntry> {
    Ok(ScoreEntry {
        id: row.id.parse().with_context(|| format!("corrupt score id '{}'", row.id))?,
        created_at: parse_timestamp(&row.created_at)?,
        player_name: row.player_name,
        score: row.score,
        level: row.level,
        lines: row.lines,
        duration_seconds: row.duration_seconds,
    })
}

/// POST /api/tetris/scores
pub async fn submit_score(
    State(state): State<AppState>,
    payload: Result<Json<NewScore>, JsonRejection>,
) -> Result<Json<Envelope<ScoreEntry>>, ApiError> {
    let Json(input) = payload?;

    let entry = state.leaderboard.submit_score(input).await?;

    info!("Score {} recorded for '{}'", entry.score, entry.player_name);
    Ok(Json(Envelope::ok("Score saved", entry)))
}

/// GET /api/tetris/scores?limit=&skip=&sort=
pub async fn list_scores(
    State(state): State<AppState>,
    query: Result<Query<ScoreQuery>, QueryRejection>,
) -> Result<Json<Envelope<Vec<ScoreEntry>>>, ApiError> {
    let Query(query) = query?;

    let scores = state.leaderboard.list_scores(query).await?;
    Ok(Json(Envelope::ok("Scores fetched", scores)))
}

/// GET /api/tetris/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Envelope<Stats>>, ApiError> {
    let stats = state.leaderboard.stats().await?;
    Ok(Json(Envelope::ok("Stats fetched", stats)))
}
