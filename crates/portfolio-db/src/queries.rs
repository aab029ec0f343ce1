use crate::Database;
use crate::models::{ContactRow, ScoreAggregate, ScoreRow};
use anyhow::Result;
use portfolio_types::api::SortBy;
use rusqlite::{Connection, Row};

impl Database {
    // -- Contacts --

    pub fn insert_contact(&self, row: &ContactRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO contacts (id, name, email, message, status, ip_address, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    row.id,
                    row.name,
                    row.email,
                    row.message,
                    row.status,
                    row.ip_address,
                    row.created_at,
                    row.updated_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Newest first. Entries sharing a timestamp come back latest insert first.
    pub fn list_contacts(&self, limit: u32) -> Result<Vec<ContactRow>> {
        self.with_conn(|conn| query_contacts(conn, limit))
    }

    /// Returns false when no row had that id.
    pub fn delete_contact(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM contacts WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    pub fn count_contacts(&self) -> Result<u64> {
        self.with_conn(|conn| count_rows(conn, "contacts"))
    }

    // -- Scores --

    pub fn insert_score(&self, row: &ScoreRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO scores (id, player_name, score, level, lines, duration_seconds, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    row.id,
                    row.player_name,
                    row.score,
                    row.level,
                    row.lines,
                    row.duration_seconds,
                    row.created_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Sorted descending on the requested field, then paginated.
    pub fn list_scores(&self, sort: SortBy, limit: u32, skip: i64) -> Result<Vec<ScoreRow>> {
        self.with_conn(|conn| query_scores(conn, sort, limit, skip))
    }

    pub fn score_aggregate(&self) -> Result<ScoreAggregate> {
        self.with_conn(|conn| {
            let aggregate = conn.query_row(
                "SELECT COUNT(*), MAX(score), AVG(score) FROM scores",
                [],
                |row| {
                    Ok(ScoreAggregate {
                        count: row.get::<_, i64>(0)? as u64,
                        max: row.get(1)?,
                        avg: row.get(2)?,
                    })
                },
            )?;
            Ok(aggregate)
        })
    }

    pub fn count_scores(&self) -> Result<u64> {
        self.with_conn(|conn| count_rows(conn, "scores"))
    }

    // -- Health --

    pub fn ping(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }
}

fn query_contacts(conn: &Connection, limit: u32) -> Result<Vec<ContactRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, message, status, ip_address, created_at, updated_at
         FROM contacts
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?1",
    )?;

    let rows = stmt
        .query_map([limit], |row| {
            Ok(ContactRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                message: row.get(3)?,
                status: row.get(4)?,
                ip_address: row.get(5)?,
                created_at: row.get(6)?,
                updated_at: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_scores(conn: &Connection, sort: SortBy, limit: u32, skip: i64) -> Result<Vec<ScoreRow>> {
    // Equal scores keep insertion order; equal timestamps put the later insert first.
    let order_by = match sort {
        SortBy::Score => "score DESC, rowid ASC",
        SortBy::Date => "created_at DESC, rowid DESC",
    };
    let sql = format!(
        "SELECT id, player_name, score, level, lines, duration_seconds, created_at
         FROM scores
         ORDER BY {}
         LIMIT ?1 OFFSET ?2",
        order_by
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params![limit, skip], score_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn score_from_row(row: &Row<'_>) -> rusqlite::Result<ScoreRow> {
    Ok(ScoreRow {
        id: row.get(0)?,
        player_name: row.get(1)?,
        score: row.get(2)?,
        level: row.get(3)?,
        lines: row.get(4)?,
        duration_seconds: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn count_rows(conn: &Connection, table: &str) -> Result<u64> {
    let count: i64 =
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
    Ok(count as u64)
}
