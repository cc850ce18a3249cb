//! Content-hash descriptors attached to downloadable files

use crate::digest::{bytes_digest, file_digest, HashAlgorithm};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The hash descriptor carried by every downloadable file entity.
///
/// The value is a lowercase hex encoding of the digest; a well-formed
/// descriptor's decoded value is exactly as long as the algorithm's
/// digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileHash {
    /// Digest algorithm the value was computed with
    pub algorithm: HashAlgorithm,
    /// Hex-encoded digest value
    pub value: String,
}

impl FileHash {
    /// Compute a descriptor over in-memory content.
    #[must_use]
    pub fn of_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            value: hex::encode(bytes_digest(algorithm, bytes)),
        }
    }

    /// Compute a descriptor over a file's contents.
    ///
    /// # Errors
    ///
    /// I/O errors from reading the file are propagated unwrapped.
    pub fn of_file<P: AsRef<Path>>(algorithm: HashAlgorithm, path: P) -> Result<Self> {
        Ok(Self {
            algorithm,
            value: hex::encode(file_digest(algorithm, path)?),
        })
    }

    /// Whether the hex value decodes to the algorithm's digest length.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        match hex::decode(&self.value) {
            Ok(decoded) => decoded.len() == self.algorithm.digest_len(),
            Err(_) => false,
        }
    }

    /// Whether in-memory content matches this descriptor.
    ///
    /// Comparison is over decoded digest bytes, so value casing does not
    /// matter.
    #[must_use]
    pub fn matches(&self, bytes: &[u8]) -> bool {
        match hex::decode(&self.value) {
            Ok(decoded) => decoded == bytes_digest(self.algorithm, bytes),
            Err(_) => false,
        }
    }

    /// Whether a downloaded file's contents match this descriptor.
    ///
    /// # Errors
    ///
    /// I/O errors from reading the file are propagated unwrapped; a
    /// malformed hex value yields `Ok(false)`.
    pub fn matches_file<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        let Ok(decoded) = hex::decode(&self.value) else {
            return Ok(false);
        };
        Ok(decoded == file_digest(self.algorithm, path)?)
    }
}
