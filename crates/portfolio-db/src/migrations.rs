use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (contacts, scores)");
        // Timestamps are RFC 3339 UTC with fixed microsecond precision, so
        // text ordering matches chronological ordering.
        conn.execute_batch(
            "
            CREATE TABLE contacts (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                email       TEXT NOT NULL,
                message     TEXT NOT NULL,
                status      TEXT NOT NULL DEFAULT 'new',
                ip_address  TEXT,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );

            CREATE INDEX idx_contacts_created ON contacts(created_at);

            CREATE TABLE scores (
                id                TEXT PRIMARY KEY,
                player_name       TEXT NOT NULL,
                score             INTEGER NOT NULL,
                level             INTEGER NOT NULL,
                lines             INTEGER NOT NULL,
                duration_seconds  INTEGER NOT NULL,
                created_at        TEXT NOT NULL
            );

            CREATE INDEX idx_scores_score ON scores(score);
            CREATE INDEX idx_scores_created ON scores(created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    Ok(())
}
