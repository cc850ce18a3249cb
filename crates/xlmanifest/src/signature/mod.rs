//! Document signing and verification
//!
//! Implements the whole-document signature block that protects published
//! manifests from tampering:
//!
//! ```text
//! document --> enveloped-signature exclusion --> canonicalization
//!   --> digest --> sign (RSA or ECDSA P-256) --> <Signature> block
//! ```
//!
//! # Components
//!
//! - **Algorithm** ([`algorithm`]): descriptor and registry mapping
//!   algorithm URIs to concrete schemes
//! - **Credential** ([`credential`]): key-pair material for signing and
//!   verification
//! - **Signer** ([`signer`]): attaches one signature block to a document
//! - **Verifier** ([`verifier`]): structural checks plus cryptographic
//!   verification, kept strictly apart in the error channel
//!
//! # Security
//!
//! - A document carries at most one signature block; verification refuses
//!   ambiguous documents outright
//! - An embedded public key is a convenience for tooling, never an input
//!   to verification policy; trusted keys arrive out-of-band
//! - The ECDSA entry enforces a 256-bit key-size contract so a weaker
//!   curve cannot hide behind the same algorithm URI

pub mod algorithm;
pub mod credential;
pub mod signer;
pub mod verifier;

pub use algorithm::{
    digest_method_from_uri, digest_method_uri, AlgorithmDescriptor, AlgorithmRegistry,
    SignatureScheme, ECDSA_SHA256_URI, ENVELOPED_SIGNATURE_URI, EXC_C14N_URI, RSA_SHA256_URI,
};
pub use credential::{KeyKind, SigningCredential, VerifyingCredential};
pub use signer::sign_document;
pub use verifier::{extract_embedded_public_key, verify_document};
