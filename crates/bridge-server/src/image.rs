//! Backing-memory images: raw little-endian `u32` words, no header.

use std::fs;
use std::path::Path;

use crate::ServerError;

/// Decodes little-endian words, or `None` when `bytes` has a partial word.
#[must_use]
pub fn words_from_le_bytes(bytes: &[u8]) -> Option<Vec<u32>> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
    )
}

/// Reads an image file into words.
///
/// # Errors
///
/// Returns [`ServerError::Image`] when the file cannot be read and
/// [`ServerError::ImageAlignment`] when its length is not a multiple of 4.
pub fn load_words(path: &Path) -> Result<Vec<u32>, ServerError> {
    let bytes = fs::read(path).map_err(|source| ServerError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    words_from_le_bytes(&bytes).ok_or_else(|| ServerError::ImageAlignment {
        path: path.to_path_buf(),
        len: bytes.len(),
    })
}
