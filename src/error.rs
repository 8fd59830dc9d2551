use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Terminal failure of a conversion run, split by the phase that failed
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("error reading {}: {source}", path.display())]
    InputRead {
        path: PathBuf,
        source: InputReadError,
    },
    #[error("error creating database {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        source: OutputWriteError,
    },
}

#[derive(Debug, Error)]
pub enum InputReadError {
    #[error("file not found")]
    NotFound,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum OutputWriteError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("duplicate poem id {id:?}")]
    DuplicateId { id: String },
}

impl ConvertError {
    pub fn input(path: impl Into<PathBuf>, source: impl Into<InputReadError>) -> Self {
        ConvertError::InputRead {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, source: impl Into<OutputWriteError>) -> Self {
        ConvertError::OutputWrite {
            path: path.into(),
            source: source.into(),
        }
    }

    /// True when the run failed before the output was touched
    pub fn is_input(&self) -> bool {
        matches!(self, ConvertError::InputRead { .. })
    }

    pub fn is_output(&self) -> bool {
        matches!(self, ConvertError::OutputWrite { .. })
    }

    /// True when the input document does not exist at all
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            ConvertError::InputRead {
                source: InputReadError::NotFound,
                ..
            }
        )
    }
}
