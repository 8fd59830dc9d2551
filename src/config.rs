//! Conversion settings and path conventions

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

/// Input bundle location relative to the project root
pub const DEFAULT_INPUT: &str = "app/src/main/assets/poems_bundle.json";

/// Output database location relative to the project root
pub const DEFAULT_OUTPUT: &str = "app/src/main/assets/databases/poetica_poems.db";

/// What to do when two poems carry the same `id`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Abort the whole run on the first duplicate
    #[default]
    Reject,
    /// Later poems overwrite earlier ones with the same id
    Replace,
}

/// Configuration for a conversion run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub on_duplicate: DuplicatePolicy,

    /// Emit a progress event every N poems (0 disables)
    pub progress_interval: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        ConvertConfig {
            on_duplicate: DuplicatePolicy::Reject,
            progress_interval: 1000,
        }
    }
}

/// The two fixed file locations of a project checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl DefaultPaths {
    pub fn under(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref();
        DefaultPaths {
            input: root.join(DEFAULT_INPUT),
            output: root.join(DEFAULT_OUTPUT),
        }
    }
}

/// How log lines are rendered on stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Install the global tracing subscriber. Logs go to stderr so stdout
    /// stays free for the report.
    pub fn init(&self) {
        let filter = EnvFilter::new(&self.level);

        match self.format {
            LogFormat::Json => {
                let _ = fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .try_init();
            }
            LogFormat::Pretty => {
                let _ = fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .try_init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}
