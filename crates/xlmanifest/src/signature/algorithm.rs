//! Signature algorithm descriptors and the algorithm registry
//!
//! Algorithms are addressed by URI; the signer and verifier must resolve
//! the exact same identifier or verification fails structurally. The
//! registry is an explicit instance handed to both sides by reference:
//! populate it completely before sharing it, then only `&self` lookups
//! remain (single-writer-then-many-readers, enforced by the borrow
//! checker).

use crate::digest::{bytes_digest, HashAlgorithm};
use crate::error::{ManifestError, Result};
use crate::signature::credential::{
    KeyKind, SigningCredential, SigningKeyMaterial, VerifyingCredential, VerifyingKeyMaterial,
};
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use std::collections::HashMap;

/// ECDSA P-256 with SHA-256, the preferred signing scheme.
pub const ECDSA_SHA256_URI: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha256";

/// RSA PKCS#1 v1.5 with SHA-256.
pub const RSA_SHA256_URI: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";

/// Exclusive canonicalization, applied before digesting.
pub const EXC_C14N_URI: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

/// Enveloped-signature transform: the signature block itself is excluded
/// from the digested content.
pub const ENVELOPED_SIGNATURE_URI: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";

/// URI naming a digest method inside a signature block.
#[must_use]
pub fn digest_method_uri(algorithm: HashAlgorithm) -> &'static str {
    match algorithm {
        HashAlgorithm::Sha256 => "http://www.w3.org/2001/04/xmlenc#sha256",
        HashAlgorithm::Sha384 => "http://www.w3.org/2001/04/xmldsig-more#sha384",
        HashAlgorithm::Sha512 => "http://www.w3.org/2001/04/xmlenc#sha512",
    }
}

/// Resolve a digest-method URI back to an algorithm.
///
/// # Errors
///
/// Returns `ManifestError::UnsupportedAlgorithm` for unknown URIs.
pub fn digest_method_from_uri(uri: &str) -> Result<HashAlgorithm> {
    match uri {
        "http://www.w3.org/2001/04/xmlenc#sha256" => Ok(HashAlgorithm::Sha256),
        "http://www.w3.org/2001/04/xmldsig-more#sha384" => Ok(HashAlgorithm::Sha384),
        "http://www.w3.org/2001/04/xmlenc#sha512" => Ok(HashAlgorithm::Sha512),
        other => Err(ManifestError::UnsupportedAlgorithm(other.to_string())),
    }
}

/// The concrete signing schemes this crate implements.
///
/// Registering a descriptor maps an identifier URI onto one of these;
/// new URIs can alias an existing scheme (with its own key-size
/// contract) but cannot introduce arbitrary cryptography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// RSA PKCS#1 v1.5 over SHA-256
    RsaPkcs1v15Sha256,
    /// ECDSA on NIST P-256 over SHA-256
    EcdsaP256Sha256,
}

impl SignatureScheme {
    fn key_kind(self) -> KeyKind {
        match self {
            Self::RsaPkcs1v15Sha256 => KeyKind::Rsa,
            Self::EcdsaP256Sha256 => KeyKind::EcdsaP256,
        }
    }
}

/// An immutable description of one registered signature algorithm:
/// identifier URI, digest function, signing scheme, and the key
/// contract a credential must satisfy.
#[derive(Debug, Clone)]
pub struct AlgorithmDescriptor {
    identifier: String,
    digest: HashAlgorithm,
    scheme: SignatureScheme,
    required_key_bits: Option<u32>,
}

impl AlgorithmDescriptor {
    /// Describe an algorithm under the given identifier.
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        digest: HashAlgorithm,
        scheme: SignatureScheme,
        required_key_bits: Option<u32>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            digest,
            scheme,
            required_key_bits,
        }
    }

    /// The built-in ECDSA P-256 + SHA-256 descriptor.
    ///
    /// Carries a strict 256-bit key-size contract so a weaker curve can
    /// never be accepted under this identifier.
    #[must_use]
    pub fn ecdsa_p256_sha256() -> Self {
        Self::new(
            ECDSA_SHA256_URI,
            HashAlgorithm::Sha256,
            SignatureScheme::EcdsaP256Sha256,
            Some(256),
        )
    }

    /// The built-in RSA PKCS#1 v1.5 + SHA-256 descriptor.
    #[must_use]
    pub fn rsa_sha256() -> Self {
        Self::new(
            RSA_SHA256_URI,
            HashAlgorithm::Sha256,
            SignatureScheme::RsaPkcs1v15Sha256,
            None,
        )
    }

    /// The identifier URI this descriptor is registered under.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The digest algorithm this scheme applies.
    #[must_use]
    pub fn digest_algorithm(&self) -> HashAlgorithm {
        self.digest
    }

    /// The key kind a credential must bear.
    #[must_use]
    pub fn key_kind(&self) -> KeyKind {
        self.scheme.key_kind()
    }

    /// Compute this descriptor's digest over content bytes.
    #[must_use]
    pub fn digest(&self, content: &[u8]) -> Vec<u8> {
        bytes_digest(self.digest, content)
    }

    fn check_key_contract(&self, kind: KeyKind, bits: u32) -> Result<()> {
        if kind != self.key_kind() {
            return Err(ManifestError::UnsupportedKeyKind {
                algorithm: self.identifier.clone(),
                expected: self.key_kind().describe(),
            });
        }
        if let Some(required) = self.required_key_bits {
            if bits != required {
                return Err(ManifestError::KeySizeMismatch {
                    required,
                    actual: bits,
                });
            }
        }
        Ok(())
    }

    /// Produce a signature over content bytes with the given credential.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedKeyKind` or `KeySizeMismatch` when the
    /// credential violates the key contract, `Signing` on backend
    /// failure.
    pub fn sign(&self, credential: &SigningCredential, content: &[u8]) -> Result<Vec<u8>> {
        self.check_key_contract(credential.key_kind(), credential.key_bits())?;

        match (self.scheme, credential.material()) {
            (SignatureScheme::EcdsaP256Sha256, SigningKeyMaterial::EcdsaP256(key)) => {
                let signature: p256::ecdsa::Signature = key.sign(content);
                Ok(signature.to_vec())
            }
            (SignatureScheme::RsaPkcs1v15Sha256, SigningKeyMaterial::Rsa(key)) => {
                let signing_key = rsa::pkcs1v15::SigningKey::<Sha256>::new((**key).clone());
                let signature = signing_key
                    .try_sign(content)
                    .map_err(|e| ManifestError::Signing {
                        reason: format!("RSA signing failed: {e}"),
                    })?;
                Ok(signature.to_vec())
            }
            // check_key_contract already rejected mismatched material
            _ => unreachable!("key contract check admitted mismatched material"),
        }
    }

    /// Check a signature over content bytes with the given credential.
    ///
    /// A signature that is merely invalid yields `Ok(false)`; key
    /// contract violations are errors.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedKeyKind` or `KeySizeMismatch` when the
    /// credential violates the key contract.
    pub fn verify(
        &self,
        credential: &VerifyingCredential,
        content: &[u8],
        signature: &[u8],
    ) -> Result<bool> {
        self.check_key_contract(credential.key_kind(), credential.key_bits())?;

        match (self.scheme, credential.material()) {
            (SignatureScheme::EcdsaP256Sha256, VerifyingKeyMaterial::EcdsaP256(key)) => {
                let Ok(signature) = p256::ecdsa::Signature::from_slice(signature) else {
                    return Ok(false);
                };
                Ok(key.verify(content, &signature).is_ok())
            }
            (SignatureScheme::RsaPkcs1v15Sha256, VerifyingKeyMaterial::Rsa(key)) => {
                let Ok(signature) = rsa::pkcs1v15::Signature::try_from(signature) else {
                    return Ok(false);
                };
                let verifying_key = rsa::pkcs1v15::VerifyingKey::<Sha256>::new(key.clone());
                Ok(verifying_key.verify(content, &signature).is_ok())
            }
            _ => unreachable!("key contract check admitted mismatched material"),
        }
    }
}

/// Table mapping algorithm URIs to descriptors.
///
/// Construct one registry per process (or per test), register any
/// additional algorithms, then share it immutably with signers and
/// verifiers.
#[derive(Debug, Clone)]
pub struct AlgorithmRegistry {
    descriptors: HashMap<String, AlgorithmDescriptor>,
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl AlgorithmRegistry {
    /// A registry with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }

    /// A registry seeded with the built-in RSA and ECDSA P-256 schemes.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(AlgorithmDescriptor::rsa_sha256());
        registry.register(AlgorithmDescriptor::ecdsa_p256_sha256());
        registry
    }

    /// Add or overwrite the mapping for the descriptor's identifier.
    ///
    /// Must happen before the registry is shared with signers or
    /// verifiers.
    pub fn register(&mut self, descriptor: AlgorithmDescriptor) {
        self.descriptors
            .insert(descriptor.identifier().to_string(), descriptor);
    }

    /// Resolve a descriptor by its identifier URI.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::UnknownAlgorithm` if unregistered.
    pub fn resolve(&self, identifier: &str) -> Result<&AlgorithmDescriptor> {
        self.descriptors
            .get(identifier)
            .ok_or_else(|| ManifestError::UnknownAlgorithm(identifier.to_string()))
    }

    /// Resolve the descriptor to use for a credential's key kind.
    ///
    /// Prefers the built-in identifier for that kind, falling back to any
    /// registered descriptor with a matching key kind.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::UnknownAlgorithm` if no registered
    /// algorithm accepts the key kind.
    pub fn resolve_for_key_kind(&self, kind: KeyKind) -> Result<&AlgorithmDescriptor> {
        let canonical = match kind {
            KeyKind::Rsa => RSA_SHA256_URI,
            KeyKind::EcdsaP256 => ECDSA_SHA256_URI,
        };
        if let Some(descriptor) = self.descriptors.get(canonical) {
            return Ok(descriptor);
        }
        self.descriptors
            .values()
            .find(|descriptor| descriptor.key_kind() == kind)
            .ok_or_else(|| ManifestError::UnknownAlgorithm(canonical.to_string()))
    }
}
