//! Loading the poem bundle from disk

use crate::bundle::types::PoemBundle;
use crate::error::InputReadError;
use std::io::ErrorKind;
use std::path::Path;

/// A parsed bundle together with the size of the document it came from
#[derive(Debug, Clone)]
pub struct LoadedBundle {
    pub bundle: PoemBundle,
    pub size_bytes: u64,
}

/// Read and parse a bundle file
pub fn read_bundle<P: AsRef<Path>>(path: P) -> Result<LoadedBundle, InputReadError> {
    let content = std::fs::read(path.as_ref()).map_err(|err| match err.kind() {
        ErrorKind::NotFound => InputReadError::NotFound,
        _ => InputReadError::Io(err),
    })?;

    let size_bytes = content.len() as u64;
    let bundle = parse_bundle(content)?;

    Ok(LoadedBundle { bundle, size_bytes })
}

/// Parse bundle bytes using SIMD-accelerated JSON parsing when possible
pub fn parse_bundle(content: Vec<u8>) -> Result<PoemBundle, InputReadError> {
    // simd-json parses in place, so keep the original bytes for the fallback
    let mut scratch = content.clone();

    match simd_json::serde::from_slice::<PoemBundle>(&mut scratch) {
        Ok(bundle) => Ok(bundle),
        Err(_) => {
            // serde_json reports line and column, which simd-json does not
            let bundle = serde_json::from_slice(&content)?;
            Ok(bundle)
        }
    }
}
