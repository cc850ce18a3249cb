//! Checking the signature block of a manifest document
//!
//! Two failure channels are kept strictly apart: a document whose
//! signature block is missing, duplicated, or malformed is a structural
//! error (`Err`); a well-formed block whose cryptography does not check
//! out is an honest `Ok(false)`. Callers can therefore distinguish "this
//! document cannot be judged" from "this document is judged inauthentic".

use crate::document::{Document, Element};
use crate::error::{ManifestError, Result};
use crate::signature::algorithm::{
    digest_method_from_uri, AlgorithmRegistry, ENVELOPED_SIGNATURE_URI, EXC_C14N_URI,
};
use crate::signature::credential::VerifyingCredential;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::debug;

/// Verify the signature block of a document against a trusted credential.
///
/// The credential must come from an out-of-band trust decision; a public
/// key embedded in the document is never consulted here. Returns
/// `Ok(false)` when the digest or signature does not match the document
/// content.
///
/// # Errors
///
/// - `MissingSignature` / `MultipleSignatures` when the document does not
///   carry exactly one signature block
/// - `MalformedSignature` when the block is structurally incomplete or
///   names unexpected transforms
/// - `UnknownAlgorithm` when the signature method is not registered
/// - `UnsupportedKeyKind` / `KeySizeMismatch` when the credential violates
///   the resolved algorithm's key contract
pub fn verify_document(
    document: &Document,
    credential: &VerifyingCredential,
    registry: &AlgorithmRegistry,
) -> Result<bool> {
    let block = single_signature_block(document)?;
    let parsed = parse_signature_block(block)?;

    let descriptor = registry.resolve(&parsed.signature_method)?;

    let declared_digest_algorithm = digest_method_from_uri(&parsed.digest_method)?;
    if declared_digest_algorithm != descriptor.digest_algorithm() {
        return Err(ManifestError::MalformedSignature {
            reason: format!(
                "digest method {} does not match signature method {}",
                parsed.digest_method,
                descriptor.identifier()
            ),
        });
    }

    let content = document.canonical_bytes(true);
    let digest = descriptor.digest(&content);
    if digest != parsed.digest_value {
        debug!("document digest does not match signed digest");
        return Ok(false);
    }

    descriptor.verify(credential, &content, &parsed.signature_value)
}

/// Extract the public key embedded in a document's signature block.
///
/// Returns `Ok(None)` when the block carries no `KeyInfo`. The result is
/// a convenience for tooling (key rotation diagnostics, pre-flight
/// checks); it must never be fed back into [`verify_document`] as the
/// trusted credential without an independent trust decision.
///
/// # Errors
///
/// Same structural errors as [`verify_document`], plus
/// `MalformedSignature` when the embedded key bytes do not decode.
pub fn extract_embedded_public_key(document: &Document) -> Result<Option<VerifyingCredential>> {
    let block = single_signature_block(document)?;

    let Some(key_value) = block.child("KeyInfo").and_then(|info| info.child("KeyValue")) else {
        return Ok(None);
    };
    let text = key_value.text().unwrap_or_default();
    let der = BASE64
        .decode(text.trim())
        .map_err(|_| ManifestError::MalformedSignature {
            reason: "KeyValue is not valid base64".to_string(),
        })?;
    VerifyingCredential::from_public_key_der(&der).map(Some)
}

fn single_signature_block(document: &Document) -> Result<&Element> {
    let blocks = document.signature_blocks();
    match blocks.as_slice() {
        [] => Err(ManifestError::MissingSignature),
        [block] => Ok(block),
        more => Err(ManifestError::MultipleSignatures { count: more.len() }),
    }
}

struct ParsedSignature {
    signature_method: String,
    digest_method: String,
    digest_value: Vec<u8>,
    signature_value: Vec<u8>,
}

fn parse_signature_block(block: &Element) -> Result<ParsedSignature> {
    let signed_info = required_child(block, "SignedInfo")?;

    let c14n = required_attribute(required_child(signed_info, "CanonicalizationMethod")?)?;
    if c14n != EXC_C14N_URI {
        return Err(ManifestError::MalformedSignature {
            reason: format!("unexpected canonicalization method {c14n}"),
        });
    }

    let signature_method =
        required_attribute(required_child(signed_info, "SignatureMethod")?)?.to_string();

    let reference = required_child(signed_info, "Reference")?;
    if reference.attribute("URI") != Some("") {
        return Err(ManifestError::MalformedSignature {
            reason: "Reference must target the whole document (URI=\"\")".to_string(),
        });
    }

    let transforms: Vec<&str> = required_child(reference, "Transforms")?
        .children_named("Transform")
        .map(required_attribute)
        .collect::<Result<_>>()?;
    if transforms != [ENVELOPED_SIGNATURE_URI, EXC_C14N_URI] {
        return Err(ManifestError::MalformedSignature {
            reason: "Reference must apply the enveloped-signature transform \
                     followed by canonicalization"
                .to_string(),
        });
    }

    let digest_method = required_attribute(required_child(reference, "DigestMethod")?)?.to_string();
    let digest_value = decode_text(required_child(reference, "DigestValue")?)?;
    let signature_value = decode_text(required_child(block, "SignatureValue")?)?;

    Ok(ParsedSignature {
        signature_method,
        digest_method,
        digest_value,
        signature_value,
    })
}

fn required_child<'a>(parent: &'a Element, name: &str) -> Result<&'a Element> {
    parent
        .child(name)
        .ok_or_else(|| ManifestError::MalformedSignature {
            reason: format!("missing {name} element"),
        })
}

fn required_attribute(element: &Element) -> Result<&str> {
    element
        .attribute("Algorithm")
        .ok_or_else(|| ManifestError::MalformedSignature {
            reason: format!("{} carries no Algorithm attribute", element.name()),
        })
}

fn decode_text(element: &Element) -> Result<Vec<u8>> {
    let text = element.text().unwrap_or_default();
    BASE64
        .decode(text.trim())
        .map_err(|_| ManifestError::MalformedSignature {
            reason: format!("{} is not valid base64", element.name()),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::SIGNATURE_ELEMENT;
    use crate::signature::credential::SigningCredential;
    use crate::signature::signer::sign_document;

    fn signed_document(credential: &SigningCredential, embed_key: bool) -> Document {
        let mut doc = Document::new(
            Element::new("Deployment")
                .with_child(Element::new("AddInUri").with_text("https://host/a.manifest.xml")),
        );
        let registry = AlgorithmRegistry::with_builtins();
        sign_document(&mut doc, credential, &registry, embed_key).unwrap();
        doc
    }

    // -----------------------------------------------------------------------
    // Crypto channel: Ok(true) / Ok(false)
    // -----------------------------------------------------------------------

    #[test]
    fn ecdsa_signed_document_verifies() {
        let credential = SigningCredential::generate_ecdsa_p256();
        let doc = signed_document(&credential, false);
        let registry = AlgorithmRegistry::with_builtins();
        let verified =
            verify_document(&doc, &credential.verifying_credential(), &registry).unwrap();
        assert!(verified);
    }

    #[test]
    fn rsa_signed_document_verifies() {
        let credential = SigningCredential::generate_rsa_2048().unwrap();
        let doc = signed_document(&credential, false);
        let registry = AlgorithmRegistry::with_builtins();
        let verified =
            verify_document(&doc, &credential.verifying_credential(), &registry).unwrap();
        assert!(verified);
    }

    #[test]
    fn tampered_document_verifies_false() {
        let credential = SigningCredential::generate_ecdsa_p256();
        let doc = signed_document(&credential, false);

        // rebuild with altered content but the original block
        let block = doc.signature_blocks()[0].clone();
        let mut tampered = Document::new(
            Element::new("Deployment")
                .with_child(Element::new("AddInUri").with_text("https://evil/a.manifest.xml")),
        );
        tampered.append_signature_block(block);

        let registry = AlgorithmRegistry::with_builtins();
        let verified =
            verify_document(&tampered, &credential.verifying_credential(), &registry).unwrap();
        assert!(!verified);
    }

    #[test]
    fn wrong_key_verifies_false() {
        let signer = SigningCredential::generate_ecdsa_p256();
        let doc = signed_document(&signer, false);

        let other = SigningCredential::generate_ecdsa_p256();
        let registry = AlgorithmRegistry::with_builtins();
        let verified = verify_document(&doc, &other.verifying_credential(), &registry).unwrap();
        assert!(!verified);
    }

    // -----------------------------------------------------------------------
    // Structural channel: Err
    // -----------------------------------------------------------------------

    #[test]
    fn unsigned_document_is_missing_signature() {
        let doc = Document::new(Element::new("Deployment"));
        let credential = SigningCredential::generate_ecdsa_p256();
        let registry = AlgorithmRegistry::with_builtins();
        let result = verify_document(&doc, &credential.verifying_credential(), &registry);
        assert!(matches!(result, Err(ManifestError::MissingSignature)));
    }

    #[test]
    fn duplicated_block_is_rejected() {
        let credential = SigningCredential::generate_ecdsa_p256();
        let mut doc = signed_document(&credential, false);
        let block = doc.signature_blocks()[0].clone();
        doc.append_signature_block(block);

        let registry = AlgorithmRegistry::with_builtins();
        let result = verify_document(&doc, &credential.verifying_credential(), &registry);
        assert!(matches!(
            result,
            Err(ManifestError::MultipleSignatures { count: 2 })
        ));
    }

    #[test]
    fn incomplete_block_is_malformed() {
        let mut doc = Document::new(Element::new("Deployment"));
        doc.append_signature_block(
            Element::new(SIGNATURE_ELEMENT).with_child(Element::new("SignatureValue")),
        );

        let credential = SigningCredential::generate_ecdsa_p256();
        let registry = AlgorithmRegistry::with_builtins();
        let result = verify_document(&doc, &credential.verifying_credential(), &registry);
        assert!(matches!(
            result,
            Err(ManifestError::MalformedSignature { .. })
        ));
    }

    #[test]
    fn unregistered_signature_method_is_unknown() {
        let credential = SigningCredential::generate_ecdsa_p256();
        let doc = signed_document(&credential, false);

        let registry = AlgorithmRegistry::empty();
        let result = verify_document(&doc, &credential.verifying_credential(), &registry);
        assert!(matches!(result, Err(ManifestError::UnknownAlgorithm(_))));
    }

    #[test]
    fn wrong_key_kind_is_rejected_structurally() {
        let signer = SigningCredential::generate_ecdsa_p256();
        let doc = signed_document(&signer, false);

        let rsa = SigningCredential::generate_rsa_2048().unwrap();
        let registry = AlgorithmRegistry::with_builtins();
        let result = verify_document(&doc, &rsa.verifying_credential(), &registry);
        assert!(matches!(
            result,
            Err(ManifestError::UnsupportedKeyKind { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Embedded public key
    // -----------------------------------------------------------------------

    #[test]
    fn embedded_key_roundtrips() {
        let credential = SigningCredential::generate_ecdsa_p256();
        let doc = signed_document(&credential, true);

        let extracted = extract_embedded_public_key(&doc).unwrap().unwrap();
        assert_eq!(
            extracted.public_key_der().unwrap(),
            credential.public_key_der().unwrap()
        );

        // the embedded key happens to verify here, but only because it is
        // the signer's own key; trust still comes from the caller
        let registry = AlgorithmRegistry::with_builtins();
        assert!(verify_document(&doc, &extracted, &registry).unwrap());
    }

    #[test]
    fn absent_key_info_extracts_none() {
        let credential = SigningCredential::generate_ecdsa_p256();
        let doc = signed_document(&credential, false);
        assert!(extract_embedded_public_key(&doc).unwrap().is_none());
    }

    #[test]
    fn corrupt_embedded_key_is_malformed() {
        let credential = SigningCredential::generate_ecdsa_p256();
        let mut doc = signed_document(&credential, false);
        let mut block = doc.signature_blocks()[0].clone();
        block.push_child(
            Element::new("KeyInfo")
                .with_child(Element::new("KeyValue").with_text("!!not base64!!")),
        );
        doc.remove_signature_blocks();
        doc.append_signature_block(block);

        let result = extract_embedded_public_key(&doc);
        assert!(matches!(
            result,
            Err(ManifestError::MalformedSignature { .. })
        ));
    }
}
