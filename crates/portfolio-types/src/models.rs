use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State of a contact submission. Entries are never updated in place, so
/// `New` is the only state a stored entry can be in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            other => Err(format!("unknown contact status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: ContactStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A recorded game result. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub id: Uuid,
    pub player_name: String,
    pub score: i64,
    pub level: i64,
    pub lines: i64,
    pub duration_seconds: i64,
    pub created_at: DateTime<Utc>,
}

/// Aggregates over the whole leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_players: u64,
    pub highest_score: Option<i64>,
    pub average_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_its_own_rendering() {
        assert_eq!(ContactStatus::New.as_str().parse::<ContactStatus>().unwrap(), ContactStatus::New);
        assert_eq!(serde_json::to_value(ContactStatus::New).unwrap(), "new");
        assert!("read".parse::<ContactStatus>().is_err());
    }

    #[test]
    fn empty_stats_render_null_highest_score() {
        let stats = Stats {
            total_players: 0,
            highest_score: None,
            average_score: 0.0,
        };
        let value = serde_json::to_value(stats).unwrap();
        assert_eq!(value["totalPlayers"], 0);
        assert!(value["highestScore"].is_null());
        assert_eq!(value["averageScore"], 0.0);
    }
}
