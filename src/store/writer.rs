use crate::bundle::{BundleFlattener, FlattenCounts, PoemBundle, PoemRecord};
use crate::config::DuplicatePolicy;
use crate::error::OutputWriteError;
use crate::store::schema::{self, INSERT_POEM, REPLACE_POEM};
use crate::store::stats::{collect_stats, StoreStats};
use rusqlite::{ffi, params, CachedStatement, Connection, OptionalExtension};
use std::path::Path;
use tracing::warn;

/// Owns the connection to the poem database being built
pub struct PoemStore {
    conn: Connection,
    on_duplicate: DuplicatePolicy,
}

impl PoemStore {
    /// Open (creating if needed) a database file
    pub fn create<P: AsRef<Path>>(path: P, on_duplicate: DuplicatePolicy) -> Result<Self, OutputWriteError> {
        let conn = Connection::open(path)?;
        Ok(PoemStore { conn, on_duplicate })
    }

    #[cfg(test)]
    pub fn open_in_memory(on_duplicate: DuplicatePolicy) -> Result<Self, OutputWriteError> {
        let conn = Connection::open_in_memory()?;
        Ok(PoemStore { conn, on_duplicate })
    }

    /// Create the schema and insert every poem of the bundle.
    ///
    /// Everything happens in one transaction: on error nothing is committed.
    pub fn write_bundle(
        &mut self,
        bundle: &PoemBundle,
        flattener: &BundleFlattener,
    ) -> Result<FlattenCounts, OutputWriteError> {
        let on_duplicate = self.on_duplicate;
        let tx = self.conn.transaction()?;
        schema::create_schema(&tx)?;

        let counts = {
            let mut inserter = RowInserter::prepare(&tx, on_duplicate)?;
            flattener.flatten(bundle, |record| inserter.insert(&record))?
        };

        tx.commit()?;
        Ok(counts)
    }

    pub fn stats(&self) -> Result<StoreStats, OutputWriteError> {
        Ok(collect_stats(&self.conn)?)
    }

    #[cfg(test)]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, surfacing any error SQLite reports on close
    pub fn close(self) -> Result<(), OutputWriteError> {
        self.conn.close().map_err(|(_, err)| OutputWriteError::Sqlite(err))
    }
}

/// Prepared statements for one write pass
struct RowInserter<'conn> {
    insert: CachedStatement<'conn>,
    exists: Option<CachedStatement<'conn>>,
}

impl<'conn> RowInserter<'conn> {
    fn prepare(conn: &'conn Connection, on_duplicate: DuplicatePolicy) -> rusqlite::Result<Self> {
        match on_duplicate {
            DuplicatePolicy::Reject => Ok(RowInserter {
                insert: conn.prepare_cached(INSERT_POEM)?,
                exists: None,
            }),
            DuplicatePolicy::Replace => Ok(RowInserter {
                insert: conn.prepare_cached(REPLACE_POEM)?,
                exists: Some(conn.prepare_cached("SELECT 1 FROM poems WHERE id = ?1")?),
            }),
        }
    }

    fn insert(&mut self, record: &PoemRecord) -> Result<(), OutputWriteError> {
        if let Some(exists) = self.exists.as_mut() {
            let seen = exists
                .query_row([&record.id], |_| Ok(()))
                .optional()?
                .is_some();
            if seen {
                warn!(id = %record.id, "Replacing poem with duplicate id");
            }
        }

        self.insert
            .execute(params![
                record.id,
                record.title,
                record.author,
                record.content,
                record.first_line,
                record.source_type,
            ])
            .map_err(|err| classify_insert_error(err, &record.id))?;
        Ok(())
    }
}

fn classify_insert_error(err: rusqlite::Error, id: &str) -> OutputWriteError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            OutputWriteError::DuplicateId { id: id.to_string() }
        }
        _ => OutputWriteError::Sqlite(err),
    }
}
