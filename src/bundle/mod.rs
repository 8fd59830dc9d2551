//! Poem bundle input - the JSON document and its flattening into rows
//!
//! The bundle groups poems into collections. Collections only matter while
//! reading; every poem becomes one flat `PoemRecord` row.

pub mod types;
pub mod reader;
pub mod extractor;

pub use types::{Collection, PoemBundle, PoemRecord, PoemSource, SOURCE_TYPE_BUNDLED};
pub use reader::{parse_bundle, read_bundle, LoadedBundle};
pub use extractor::{BundleFlattener, FlattenCounts};
