//! SQLite output - the single indexed poems table
//!
//! `PoemStore` writes a whole bundle in one transaction and then answers
//! aggregate queries over what was persisted.

pub mod schema;
pub mod writer;
pub mod stats;

pub use writer::PoemStore;
pub use stats::{collect_stats, StoreStats};
