use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- JWT Claims --

/// Claims carried by an admin token. `sub` is the username given at login;
/// `iat` and `exp` are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

// -- Contact --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

// -- Leaderboard --

/// Score submission. The game client historically sent `duration`, so that
/// name is still accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScore {
    pub player_name: String,
    pub score: i64,
    pub level: i64,
    pub lines: i64,
    #[serde(alias = "duration")]
    pub duration_seconds: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Score,
    Date,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default, alias = "sortBy")]
    pub sort: SortBy,
}

fn default_limit() -> i64 {
    10
}

impl Default for ScoreQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            skip: 0,
            sort: SortBy::default(),
        }
    }
}

// -- Service --

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatus {
    pub database: String,
    pub timestamp: DateTime<Utc>,
    pub admin_password_configured: bool,
    pub contact_count: u64,
    pub score_count: u64,
}
