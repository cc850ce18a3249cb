//! Content-hash computation for manifests and deployed files
//!
//! Every downloadable file named in an add-in manifest carries a
//! [`FileHash`](crate::manifest::FileHash) descriptor; this module computes
//! the digests those descriptors are checked against, and the digests used
//! by document signing.
//!
//! Digesting is deterministic and stateless. No caching is performed;
//! callers are responsible for not re-hashing unnecessarily.

use crate::error::{ManifestError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::io::Read;
use std::path::Path;

/// Hash algorithms accepted for file and document digests.
///
/// MD5 and SHA-1 are deliberately absent; manifests only ever reference
/// collision-resistant algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-256, 32-byte digest
    #[serde(rename = "SHA256")]
    Sha256,
    /// SHA-384, 48-byte digest
    #[serde(rename = "SHA384")]
    Sha384,
    /// SHA-512, 64-byte digest
    #[serde(rename = "SHA512")]
    Sha512,
}

impl HashAlgorithm {
    /// Length in bytes of a digest produced by this algorithm.
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// The identifier used for this algorithm in manifest documents.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
        }
    }

    /// Resolve a manifest algorithm identifier.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::UnsupportedAlgorithm` if the identifier does
    /// not map to a known implementation.
    pub fn from_wire_name(name: &str) -> Result<Self> {
        match name {
            "SHA256" => Ok(Self::Sha256),
            "SHA384" => Ok(Self::Sha384),
            "SHA512" => Ok(Self::Sha512),
            other => Err(ManifestError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Compute the digest of an in-memory byte buffer.
#[must_use]
pub fn bytes_digest(algorithm: HashAlgorithm, bytes: &[u8]) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Sha256 => Sha256::digest(bytes).to_vec(),
        HashAlgorithm::Sha384 => Sha384::digest(bytes).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(bytes).to_vec(),
    }
}

/// Compute the digest of a stream, reading to end-of-stream.
///
/// Used for whole-file hashing without loading large files into one
/// buffer.
///
/// # Errors
///
/// I/O errors from the reader are propagated unwrapped.
pub fn reader_digest<R: Read>(algorithm: HashAlgorithm, reader: R) -> Result<Vec<u8>> {
    match algorithm {
        HashAlgorithm::Sha256 => digest_to_end::<Sha256, R>(reader),
        HashAlgorithm::Sha384 => digest_to_end::<Sha384, R>(reader),
        HashAlgorithm::Sha512 => digest_to_end::<Sha512, R>(reader),
    }
}

/// Compute the digest of a file's contents.
///
/// # Errors
///
/// I/O errors from opening or reading the file are propagated unwrapped.
pub fn file_digest<P: AsRef<Path>>(algorithm: HashAlgorithm, path: P) -> Result<Vec<u8>> {
    let file = std::fs::File::open(path)?;
    reader_digest(algorithm, std::io::BufReader::new(file))
}

fn digest_to_end<D: Digest, R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut hasher = D::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_vec())
}
