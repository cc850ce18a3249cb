//! Error types for manifest signing, verification, and validation
//!
//! The error taxonomy distinguishes three failure channels:
//!
//! - **Structural signature errors** (missing/duplicate signature block,
//!   unknown algorithm, key mismatch) are always surfaced as errors.
//! - **Cryptographic mismatch** (a signature that simply does not verify)
//!   is *not* an error; [`verify_document`](crate::verify_document)
//!   returns `Ok(false)` so callers can tell "tampered" apart from
//!   "malformed".
//! - **Validation errors** come in two scopes, one per manifest half, so
//!   callers can branch remediation on which document was at fault.

use crate::validation::ValidationError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ManifestError>;

/// All errors produced by the manifest subsystem.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// A verify operation found no signature block in the document.
    #[error("no <Signature> element was found in the document")]
    MissingSignature,

    /// A verify operation found more than one signature block.
    #[error("found {count} <Signature> elements; documents may carry only one")]
    MultipleSignatures {
        /// Number of signature blocks found
        count: usize,
    },

    /// A signature block exists but its internal structure is unusable.
    #[error("malformed signature block: {reason}")]
    MalformedSignature {
        /// What was missing or inconsistent
        reason: String,
    },

    /// An algorithm URI is not registered in the [`AlgorithmRegistry`](crate::AlgorithmRegistry).
    #[error("unknown signature algorithm '{0}'")]
    UnknownAlgorithm(String),

    /// A hash algorithm identifier does not map to a known implementation.
    #[error("unsupported hash algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    /// The supplied credential carries no usable private key.
    #[error("credential does not contain a usable private key")]
    NoPrivateKey,

    /// The credential's key kind does not match the signature algorithm.
    #[error("unsupported key kind: algorithm '{algorithm}' requires a {expected} key")]
    UnsupportedKeyKind {
        /// Algorithm URI that was being applied
        algorithm: String,
        /// Key kind the algorithm requires
        expected: &'static str,
    },

    /// An elliptic-curve key of the wrong size was supplied for an
    /// algorithm with a fixed key-size contract.
    #[error("key size mismatch: algorithm requires {required} bits, key has {actual}")]
    KeySizeMismatch {
        /// Required key size in bits
        required: u32,
        /// Declared key size in bits
        actual: u32,
    },

    /// The cryptographic backend failed while producing a signature.
    #[error("signing failed: {reason}")]
    Signing {
        /// Details from the underlying crypto library
        reason: String,
    },

    /// A deployment manifest violated a structural invariant.
    #[error("invalid deployment manifest\n{0}")]
    InvalidDeployment(ValidationError),

    /// An add-in manifest violated a structural invariant.
    #[error("invalid add-in manifest\n{0}")]
    InvalidAddIn(ValidationError),

    /// I/O failure while hashing a file or stream; propagated unwrapped.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ManifestError {
    /// The structured validation detail, if this is a validation error.
    #[must_use]
    pub fn validation_detail(&self) -> Option<&ValidationError> {
        match self {
            Self::InvalidDeployment(detail) | Self::InvalidAddIn(detail) => Some(detail),
            _ => None,
        }
    }
}
