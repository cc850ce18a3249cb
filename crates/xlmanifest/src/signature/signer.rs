//! Attaching a signature block to a manifest document

use crate::document::{Document, Element, SIGNATURE_ELEMENT};
use crate::error::Result;
use crate::signature::algorithm::{
    digest_method_uri, AlgorithmRegistry, ENVELOPED_SIGNATURE_URI, EXC_C14N_URI,
};
use crate::signature::credential::SigningCredential;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::debug;

/// Sign a manifest document in place.
///
/// Any pre-existing signature blocks are stripped first, so signing is
/// idempotent and re-signing after an edit never leaves a stale block
/// behind. The algorithm is chosen from the registry by the credential's
/// key kind. With `embed_public_key` set, the signer's public key is
/// included in the block for tooling convenience; verification never
/// trusts it.
///
/// # Errors
///
/// Returns `UnknownAlgorithm` if the registry has no entry for the
/// credential's key kind, `UnsupportedKeyKind` or `KeySizeMismatch` on a
/// key contract violation, and `Signing` on backend failure.
pub fn sign_document(
    document: &mut Document,
    credential: &SigningCredential,
    registry: &AlgorithmRegistry,
    embed_public_key: bool,
) -> Result<()> {
    document.remove_signature_blocks();

    let descriptor = registry.resolve_for_key_kind(credential.key_kind())?;

    let content = document.canonical_bytes(true);
    let digest = descriptor.digest(&content);
    let signature = descriptor.sign(credential, &content)?;

    debug!(
        algorithm = descriptor.identifier(),
        content_len = content.len(),
        "signed manifest document"
    );

    let signed_info = Element::new("SignedInfo")
        .with_child(Element::new("CanonicalizationMethod").with_attribute("Algorithm", EXC_C14N_URI))
        .with_child(
            Element::new("SignatureMethod").with_attribute("Algorithm", descriptor.identifier()),
        )
        .with_child(
            Element::new("Reference")
                .with_attribute("URI", "")
                .with_child(
                    Element::new("Transforms")
                        .with_child(
                            Element::new("Transform")
                                .with_attribute("Algorithm", ENVELOPED_SIGNATURE_URI),
                        )
                        .with_child(
                            Element::new("Transform").with_attribute("Algorithm", EXC_C14N_URI),
                        ),
                )
                .with_child(Element::new("DigestMethod").with_attribute(
                    "Algorithm",
                    digest_method_uri(descriptor.digest_algorithm()),
                ))
                .with_child(Element::new("DigestValue").with_text(BASE64.encode(&digest))),
        );

    let mut block = Element::new(SIGNATURE_ELEMENT)
        .with_child(signed_info)
        .with_child(Element::new("SignatureValue").with_text(BASE64.encode(&signature)));

    if embed_public_key {
        let der = credential.public_key_der()?;
        block.push_child(
            Element::new("KeyInfo")
                .with_child(Element::new("KeyValue").with_text(BASE64.encode(der))),
        );
    }

    document.append_signature_block(block);
    Ok(())
}
