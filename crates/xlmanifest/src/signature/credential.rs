//! Key-pair material for document signing and verification
//!
//! A [`SigningCredential`] bears a private key of one of the supported
//! kinds; a [`VerifyingCredential`] bears the matching public key. Key
//! material is accepted in PKCS#8 DER (private) and SPKI DER (public)
//! form; key storage and retrieval are the caller's concern.

use crate::error::{ManifestError, Result};
use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

/// RSA key size used for generated credentials.
const RSA_KEY_BITS: usize = 2048;

/// The kind of asymmetric key a credential bears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// RSA (PKCS#1 v1.5 signatures)
    Rsa,
    /// ECDSA over the NIST P-256 curve
    EcdsaP256,
}

impl KeyKind {
    /// Human-readable name used in error messages.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::EcdsaP256 => "ECDSA P-256",
        }
    }
}

/// A private-key-bearing credential used to sign documents.
pub struct SigningCredential {
    material: SigningKeyMaterial,
}

pub(crate) enum SigningKeyMaterial {
    Rsa(Box<RsaPrivateKey>),
    EcdsaP256(p256::ecdsa::SigningKey),
}

impl SigningCredential {
    /// Generate a fresh ECDSA P-256 key pair.
    #[must_use]
    pub fn generate_ecdsa_p256() -> Self {
        Self {
            material: SigningKeyMaterial::EcdsaP256(p256::ecdsa::SigningKey::random(&mut OsRng)),
        }
    }

    /// Generate a fresh RSA 2048-bit key pair.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Signing` if key generation fails.
    pub fn generate_rsa_2048() -> Result<Self> {
        let key = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS).map_err(|e| {
            ManifestError::Signing {
                reason: format!("RSA key generation failed: {e}"),
            }
        })?;
        Ok(Self {
            material: SigningKeyMaterial::Rsa(Box::new(key)),
        })
    }

    /// Load a private key from PKCS#8 DER bytes.
    ///
    /// Both supported key kinds are attempted.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::NoPrivateKey` if the bytes do not contain a
    /// usable private key of a supported kind.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        if let Ok(key) = p256::ecdsa::SigningKey::from_pkcs8_der(der) {
            return Ok(Self {
                material: SigningKeyMaterial::EcdsaP256(key),
            });
        }
        if let Ok(key) = RsaPrivateKey::from_pkcs8_der(der) {
            return Ok(Self {
                material: SigningKeyMaterial::Rsa(Box::new(key)),
            });
        }
        Err(ManifestError::NoPrivateKey)
    }

    /// The kind of key this credential bears.
    #[must_use]
    pub fn key_kind(&self) -> KeyKind {
        match &self.material {
            SigningKeyMaterial::Rsa(_) => KeyKind::Rsa,
            SigningKeyMaterial::EcdsaP256(_) => KeyKind::EcdsaP256,
        }
    }

    /// Declared key size in bits.
    #[must_use]
    pub fn key_bits(&self) -> u32 {
        match &self.material {
            SigningKeyMaterial::Rsa(key) => (key.size() * 8) as u32,
            SigningKeyMaterial::EcdsaP256(_) => 256,
        }
    }

    /// The matching public credential.
    #[must_use]
    pub fn verifying_credential(&self) -> VerifyingCredential {
        match &self.material {
            SigningKeyMaterial::Rsa(key) => VerifyingCredential {
                material: VerifyingKeyMaterial::Rsa(key.to_public_key()),
            },
            SigningKeyMaterial::EcdsaP256(key) => VerifyingCredential {
                material: VerifyingKeyMaterial::EcdsaP256(*key.verifying_key()),
            },
        }
    }

    /// Export the public key as DER-encoded SPKI bytes.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Signing` if the key cannot be encoded.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        self.verifying_credential().public_key_der()
    }

    pub(crate) fn material(&self) -> &SigningKeyMaterial {
        &self.material
    }
}

/// A public-key-bearing credential used to verify document signatures.
///
/// Trusted verification keys must arrive out-of-band; a key embedded in
/// a signed document is never an acceptable source of trust.
#[derive(Clone)]
pub struct VerifyingCredential {
    material: VerifyingKeyMaterial,
}

#[derive(Clone)]
pub(crate) enum VerifyingKeyMaterial {
    Rsa(RsaPublicKey),
    EcdsaP256(p256::ecdsa::VerifyingKey),
}

impl VerifyingCredential {
    /// Load a public key from DER-encoded SPKI bytes.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::MalformedSignature` if the bytes are not a
    /// supported public key.
    pub fn from_public_key_der(der: &[u8]) -> Result<Self> {
        if let Ok(key) = p256::ecdsa::VerifyingKey::from_public_key_der(der) {
            return Ok(Self {
                material: VerifyingKeyMaterial::EcdsaP256(key),
            });
        }
        if let Ok(key) = RsaPublicKey::from_public_key_der(der) {
            return Ok(Self {
                material: VerifyingKeyMaterial::Rsa(key),
            });
        }
        Err(ManifestError::MalformedSignature {
            reason: "public key bytes are not a supported SPKI encoding".to_string(),
        })
    }

    /// The kind of key this credential bears.
    #[must_use]
    pub fn key_kind(&self) -> KeyKind {
        match &self.material {
            VerifyingKeyMaterial::Rsa(_) => KeyKind::Rsa,
            VerifyingKeyMaterial::EcdsaP256(_) => KeyKind::EcdsaP256,
        }
    }

    /// Declared key size in bits.
    #[must_use]
    pub fn key_bits(&self) -> u32 {
        match &self.material {
            VerifyingKeyMaterial::Rsa(key) => (key.size() * 8) as u32,
            VerifyingKeyMaterial::EcdsaP256(_) => 256,
        }
    }

    /// Export the key as DER-encoded SPKI bytes.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Signing` if the key cannot be encoded.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        let der = match &self.material {
            VerifyingKeyMaterial::Rsa(key) => key.to_public_key_der(),
            VerifyingKeyMaterial::EcdsaP256(key) => key.to_public_key_der(),
        }
        .map_err(|e| ManifestError::Signing {
            reason: format!("failed to encode public key: {e}"),
        })?;
        Ok(der.as_bytes().to_vec())
    }

    pub(crate) fn material(&self) -> &VerifyingKeyMaterial {
        &self.material
    }
}
