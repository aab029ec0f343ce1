/// Database row types — these map directly to SQLite rows.
/// Distinct from portfolio-types models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct ContactRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: String,
    pub ip_address: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct ScoreRow {
    pub id: String,
    pub player_name: String,
    pub score: i64,
    pub level: i64,
    pub lines: i64,
    pub duration_seconds: i64,
    pub created_at: String,
}

/// Raw aggregate over the scores table. `max` and `avg` are `None` when the
/// table is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreAggregate {
    pub count: u64,
    pub max: Option<i64>,
    pub avg: Option<f64>,
}
