//! Table layout of the bundled poem database
//!
//! Column names and order are bound by name in the mobile app's Room entity,
//! so they must not change.

use rusqlite::Connection;
use tracing::debug;

pub const TABLE: &str = "poems";

pub const CREATE_TABLE: &str = "
    CREATE TABLE poems (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        author TEXT NOT NULL,
        content TEXT NOT NULL,
        firstLine TEXT NOT NULL,
        sourceType TEXT NOT NULL DEFAULT 'BUNDLED'
    )
";

/// Index name and indexed columns, named the way Room names them
pub const INDEXES: [(&str, &str); 5] = [
    ("index_poems_title", "title"),
    ("index_poems_author", "author"),
    ("index_poems_content", "content"),
    ("index_poems_firstLine", "firstLine"),
    ("index_poems_title_author", "title, author"),
];

pub const INSERT_POEM: &str = "
    INSERT INTO poems (id, title, author, content, firstLine, sourceType)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";

pub const REPLACE_POEM: &str = "
    INSERT OR REPLACE INTO poems (id, title, author, content, firstLine, sourceType)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";

/// Create the table and its five lookup indexes
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_TABLE)?;

    for (name, columns) in INDEXES {
        conn.execute_batch(&format!("CREATE INDEX {name} ON {TABLE}({columns})"))?;
    }

    debug!(indexes = INDEXES.len(), "Created database schema with search indexes");
    Ok(())
}

/// Names of the indexes defined on the poems table, sorted
#[cfg(test)]
pub fn index_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'index' AND tbl_name = ?1 AND sql IS NOT NULL
         ORDER BY name",
    )?;
    let names = stmt
        .query_map([TABLE], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

/// Column names of the poems table in declaration order
#[cfg(test)]
pub fn column_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let names = stmt
        .query_map([TABLE], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}
