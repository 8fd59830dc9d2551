use crate::bundle::types::{PoemBundle, PoemRecord};
use tracing::info;

/// Running totals of a flattening pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenCounts {
    pub poems: u64,
    pub collections: u64,
}

/// Walks the collections of a bundle and turns every poem into a row
pub struct BundleFlattener {
    progress_interval: usize,
}

impl BundleFlattener {
    pub fn new(progress_interval: usize) -> Self {
        BundleFlattener { progress_interval }
    }

    /// Feed every poem to `sink` in document order.
    ///
    /// Stops at the first error returned by `sink`.
    pub fn flatten<F, E>(&self, bundle: &PoemBundle, mut sink: F) -> Result<FlattenCounts, E>
    where
        F: FnMut(PoemRecord) -> Result<(), E>,
    {
        let mut counts = FlattenCounts::default();

        for collection in &bundle.collections {
            info!(
                collection = collection.display_name(),
                poems = collection.poems.len(),
                "Processing collection"
            );

            for poem in &collection.poems {
                sink(PoemRecord::from_source(poem))?;
                counts.poems += 1;

                if self.progress_interval > 0 && counts.poems % self.progress_interval as u64 == 0 {
                    info!(processed = counts.poems, "Processed poems");
                }
            }

            counts.collections += 1;
        }

        Ok(counts)
    }
}

impl Default for BundleFlattener {
    fn default() -> Self {
        BundleFlattener::new(1000)
    }
}
