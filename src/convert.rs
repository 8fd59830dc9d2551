//! The bundle-to-database conversion

use crate::bundle::{read_bundle, BundleFlattener};
use crate::config::ConvertConfig;
use crate::error::{ConvertError, OutputWriteError};
use crate::report::ConversionReport;
use crate::store::PoemStore;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// SQLite files that may sit next to a database from an earlier run
const SIDECAR_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

/// Converts a poem bundle into a freshly built poem database
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Converter { config }
    }

    /// Read `input`, replace whatever is at `output` with a new database and
    /// report what ended up in it.
    ///
    /// The input is fully parsed before the output is touched. A failed write
    /// leaves no database behind.
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<ConversionReport, ConvertError> {
        let input = input.as_ref();
        let output = output.as_ref();

        let loaded = read_bundle(input).map_err(|err| ConvertError::input(input, err))?;
        info!(
            path = %input.display(),
            size = %crate::report::format_mb(loaded.size_bytes as f64),
            "Loaded poem bundle"
        );

        prepare_output(output).map_err(|err| ConvertError::output(output, err))?;

        let flattener = BundleFlattener::new(self.config.progress_interval);
        let written = PoemStore::create(output, self.config.on_duplicate).and_then(|mut store| {
            let counts = store.write_bundle(&loaded.bundle, &flattener)?;
            let stats = store.stats()?;
            store.close()?;
            Ok((counts, stats))
        });

        let (counts, stats) = match written {
            Ok(result) => result,
            Err(err) => {
                discard_output(output);
                return Err(ConvertError::output(output, err));
            }
        };

        let output_bytes = std::fs::metadata(output)
            .map_err(|err| ConvertError::output(output, err))?
            .len();

        Ok(ConversionReport {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            total_poems: stats.total_poems,
            collections_processed: counts.collections,
            unique_authors: stats.unique_authors,
            average_content_length: stats.average_content_length,
            input_bytes: loaded.size_bytes,
            output_bytes,
            size_delta_bytes: loaded.size_bytes as i64 - output_bytes as i64,
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Converter::new(ConvertConfig::default())
    }
}

/// Create the parent directory and remove any earlier database at `output`
pub fn prepare_output(output: &Path) -> Result<(), OutputWriteError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    remove_if_exists(output)?;
    for path in sidecar_paths(output) {
        remove_if_exists(&path)?;
    }

    debug!(path = %output.display(), "Prepared output location");
    Ok(())
}

/// Best-effort removal of a partially written database
fn discard_output(output: &Path) {
    let _ = remove_if_exists(output);
    for path in sidecar_paths(output) {
        let _ = remove_if_exists(&path);
    }
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

fn sidecar_paths(output: &Path) -> Vec<PathBuf> {
    SIDECAR_SUFFIXES
        .iter()
        .map(|suffix| {
            let mut name = OsString::from(output.as_os_str());
            name.push(suffix);
            PathBuf::from(name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;
    use crate::error::InputReadError;
    use rusqlite::Connection;
    use serde_json::json;
    use std::fs;

    fn write_bundle(dir: &Path, value: serde_json::Value) -> PathBuf {
        let path = dir.join("poems_bundle.json");
        fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
        path
    }

    fn row_count(path: &Path) -> i64 {
        let conn = Connection::open(path).unwrap();
        conn.query_row("SELECT COUNT(*) FROM poems", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_single_poem_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_bundle(
            dir.path(),
            json!({"collections":[{"name":"C1","poems":[
                {"id":"p1","title":"T","author":"A","text":"Hello","first_line":"Hello"}
            ]}]}),
        );
        let output = dir.path().join("databases/poetica_poems.db");

        let report = Converter::default().convert(&input, &output).unwrap();

        assert_eq!(report.total_poems, 1);
        assert_eq!(report.collections_processed, 1);
        assert_eq!(report.unique_authors, 1);
        assert_eq!(report.average_content_length, Some(5.0));
        assert_eq!(report.output_bytes, fs::metadata(&output).unwrap().len());
        assert_eq!(
            report.size_delta_bytes,
            report.input_bytes as i64 - report.output_bytes as i64
        );
        assert_eq!(row_count(&output), 1);
    }

    #[test]
    fn test_row_count_sums_all_collections() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_bundle(
            dir.path(),
            json!({"collections": [
                {"name": "A", "poems": [{"id": "1", "author": "X"}, {"id": "2"}]},
                {"name": "B", "poems": []},
                {"name": "C", "poems": [{"id": "3", "author": "X"}]}
            ]}),
        );
        let output = dir.path().join("out.db");

        let report = Converter::default().convert(&input, &output).unwrap();
        assert_eq!(report.total_poems, 3);
        assert_eq!(report.collections_processed, 3);
        // "X" and the empty author of poem 2
        assert_eq!(report.unique_authors, 2);
    }

    #[test]
    fn test_absent_collections_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_bundle(dir.path(), json!({"version": 1}));
        let output = dir.path().join("out.db");

        let report = Converter::default().convert(&input, &output).unwrap();
        assert_eq!(report.total_poems, 0);
        assert_eq!(report.collections_processed, 0);
        assert_eq!(report.average_content_length, None);
        assert_eq!(row_count(&output), 0);
    }

    #[test]
    fn test_rerun_replaces_previous_database() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.db");

        let first = write_bundle(
            dir.path(),
            json!({"collections":[{"poems":[{"id":"a"},{"id":"b"}]}]}),
        );
        Converter::default().convert(&first, &output).unwrap();
        assert_eq!(row_count(&output), 2);

        let second = write_bundle(dir.path(), json!({"collections":[{"poems":[{"id":"c"}]}]}));
        let report = Converter::default().convert(&second, &output).unwrap();
        assert_eq!(report.total_poems, 1);

        let conn = Connection::open(&output).unwrap();
        let id: String = conn
            .query_row("SELECT id FROM poems", [], |row| row.get(0))
            .unwrap();
        assert_eq!(id, "c");
    }

    #[test]
    fn test_rerun_with_same_input_is_row_identical() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.db");
        let input = write_bundle(
            dir.path(),
            json!({"collections":[{"poems":[
                {"id":"a","title":"One","text":"x"},
                {"id":"b","title":"Two","text":"yy"}
            ]}]}),
        );

        let rows = |path: &Path| -> Vec<(String, String, String)> {
            let conn = Connection::open(path).unwrap();
            let mut stmt = conn
                .prepare("SELECT id, title, content FROM poems ORDER BY id")
                .unwrap();
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
                .unwrap()
                .collect::<rusqlite::Result<Vec<_>>>()
                .unwrap();
            rows
        };

        Converter::default().convert(&input, &output).unwrap();
        let before = rows(&output);
        Converter::default().convert(&input, &output).unwrap();
        assert_eq!(rows(&output), before);
    }

    #[test]
    fn test_missing_input_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.db");
        fs::write(&output, b"previous").unwrap();

        let err = Converter::default()
            .convert(dir.path().join("missing.json"), &output)
            .unwrap_err();

        assert!(err.is_missing_input());
        assert_eq!(fs::read(&output).unwrap(), b"previous");
    }

    #[test]
    fn test_malformed_input_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.json");
        fs::write(&input, b"{\"collections\": [{]").unwrap();
        let output = dir.path().join("out.db");

        let err = Converter::default().convert(&input, &output).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::InputRead { source: InputReadError::Json(_), .. }
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_duplicate_id_rejected_and_output_removed() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_bundle(
            dir.path(),
            json!({"collections":[{"poems":[{"id":"p1"},{"id":"p1"}]}]}),
        );
        let output = dir.path().join("out.db");

        let err = Converter::default().convert(&input, &output).unwrap_err();
        assert!(err.is_output());
        assert!(matches!(
            err,
            ConvertError::OutputWrite { source: OutputWriteError::DuplicateId { .. }, .. }
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_duplicate_id_replaced_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_bundle(
            dir.path(),
            json!({"collections":[{"poems":[
                {"id":"p1","author":"Old"},
                {"id":"p1","author":"New"}
            ]}]}),
        );
        let output = dir.path().join("out.db");

        let config = ConvertConfig {
            on_duplicate: DuplicatePolicy::Replace,
            ..ConvertConfig::default()
        };
        let report = Converter::new(config).convert(&input, &output).unwrap();

        assert_eq!(report.total_poems, 1);
        assert_eq!(report.unique_authors, 1);
    }

    #[test]
    fn test_unwritable_destination_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_bundle(dir.path(), json!({"collections": []}));

        // A regular file where the output directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let err = Converter::default()
            .convert(&input, blocker.join("out.db"))
            .unwrap_err();
        assert!(err.is_output());
    }

    #[test]
    fn test_prepare_output_removes_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.db");
        fs::write(&output, b"old").unwrap();
        fs::write(dir.path().join("out.db-journal"), b"old").unwrap();

        prepare_output(&output).unwrap();
        assert!(!output.exists());
        assert!(!dir.path().join("out.db-journal").exists());
    }
}
