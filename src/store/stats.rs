//! Aggregate statistics over the finished poems table

use rusqlite::Connection;
use serde::Serialize;

/// What the database actually holds after commit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    pub total_poems: u64,
    pub unique_authors: u64,

    /// Mean `content` length in characters, `None` for an empty table
    pub average_content_length: Option<f64>,
}

/// Run the aggregate queries against the poems table
pub fn collect_stats(conn: &Connection) -> rusqlite::Result<StoreStats> {
    let total_poems: i64 = conn.query_row("SELECT COUNT(*) FROM poems", [], |row| row.get(0))?;

    let unique_authors: i64 =
        conn.query_row("SELECT COUNT(DISTINCT author) FROM poems", [], |row| row.get(0))?;

    let average_content_length: Option<f64> =
        conn.query_row("SELECT AVG(LENGTH(content)) FROM poems", [], |row| row.get(0))?;

    Ok(StoreStats {
        total_poems: total_poems as u64,
        unique_authors: unique_authors as u64,
        average_content_length,
    })
}
