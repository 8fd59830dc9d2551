//! # Poetica Bundle - poem JSON to SQLite
//!
//! Converts the bundled poem collection (a JSON document of nested
//! collections) into a pre-populated SQLite database that ships with the
//! mobile app.
//!
//! ## Modules
//!
//! - **bundle**: Read the JSON document and flatten it into poem rows
//! - **store**: Write the rows into the indexed `poems` table and query statistics
//! - **convert**: Tie both together into one conversion run
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use poetica_bundle::{Converter, ConvertConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let converter = Converter::new(ConvertConfig::default());
//! let report = converter.convert("poems_bundle.json", "databases/poetica_poems.db")?;
//!
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

use std::path::Path;

pub mod bundle;
pub mod config;
pub mod convert;
pub mod error;
pub mod report;
pub mod store;

// Re-export commonly used types for convenience
pub use bundle::{PoemBundle, PoemRecord};
pub use config::{ConvertConfig, DefaultPaths, DuplicatePolicy, LogFormat, LoggingConfig};
pub use convert::Converter;
pub use error::{ConvertError, InputReadError, OutputWriteError};
pub use report::ConversionReport;
pub use store::{PoemStore, StoreStats};

/// Main entry point: convert a bundle file into a database with default settings
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<ConversionReport, ConvertError> {
    Converter::default().convert(input, output)
}
