//! Manifest authenticity and integrity for distributed add-ins
//!
//! A publisher describes a versioned add-in with a pair of manifest
//! documents (deployment policy + add-in contents) and signs them; a
//! client refuses to download or install anything until both gates pass:
//!
//! 1. **Authenticity** — the document's embedded signature block
//!    verifies against a trusted public key ([`verify_document`])
//! 2. **Integrity** — the deserialized entity graph satisfies every
//!    structural invariant ([`validate_deployment_and_add_in`]), and
//!    each downloaded file matches its [`FileHash`](manifest::FileHash)
//!    descriptor
//!
//! The two gates are independent: a valid signature over an inconsistent
//! manifest is rejected, and so is a consistent manifest with a bad
//! signature.
//!
//! # Example
//!
//! ```
//! use xlmanifest::{
//!     sign_document, verify_document, AlgorithmRegistry, Document, Element,
//!     SigningCredential,
//! };
//!
//! # fn main() -> xlmanifest::Result<()> {
//! let registry = AlgorithmRegistry::with_builtins();
//! let credential = SigningCredential::generate_ecdsa_p256();
//!
//! let mut document = Document::new(
//!     Element::new("Deployment")
//!         .with_child(Element::new("AddInUri").with_text("https://host/a.manifest.xml")),
//! );
//! sign_document(&mut document, &credential, &registry, false)?;
//!
//! let trusted = credential.verifying_credential();
//! assert!(verify_document(&document, &trusted, &registry)?);
//! # Ok(())
//! # }
//! ```

pub mod digest;
pub mod document;
pub mod error;
pub mod manifest;
pub mod signature;
pub mod validation;

pub use digest::{bytes_digest, file_digest, reader_digest, HashAlgorithm};
pub use document::{Document, Element, SIGNATURE_ELEMENT};
pub use error::{ManifestError, Result};
pub use signature::{
    sign_document, verify_document, AlgorithmDescriptor, AlgorithmRegistry, KeyKind,
    SigningCredential, VerifyingCredential,
};
pub use validation::{
    validate_add_in, validate_deployment, validate_deployment_and_add_in, ValidationError,
};
