//! Manifest document tree and canonical byte form
//!
//! A [`Document`] is the materialized form of one manifest: an ordered
//! tree of named elements with attributes and text content. The wire
//! (de)serializer that produces it lives outside this crate; the signing
//! subsystem treats the tree opaquely except for two concerns:
//!
//! - locating, removing, and inserting the single `Signature` block
//! - producing the **canonical byte form** that digests and signatures
//!   are computed over
//!
//! Canonicalization makes two structurally identical documents digest
//! identically regardless of incidental formatting: attributes are
//! ordered by name, text content is trimmed, and no insignificant
//! whitespace is emitted. The enveloped-signature transform excludes the
//! `Signature` element itself from the canonical form, breaking the
//! circular dependency between "digest the document" and "the document
//! now contains a digest".

/// Element name of the embedded signature block.
pub const SIGNATURE_ELEMENT: &str = "Signature";

/// An ordered tree of named elements; the root corresponds to one
/// manifest type (Deployment, AddIn, DeploymentRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

/// A single named node with attributes, optional text, and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes, text, or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Builder-style attribute insertion.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder-style text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder-style child insertion.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// The element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element's text content, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Value of the named attribute, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The element's children in document order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            child.collect_named(name, found);
        }
    }

    fn write_canonical(&self, out: &mut Vec<u8>, exclude_signature: bool) {
        if exclude_signature && self.name == SIGNATURE_ELEMENT {
            return;
        }

        out.push(b'<');
        out.extend_from_slice(self.name.as_bytes());

        let mut attributes: Vec<&(String, String)> = self.attributes.iter().collect();
        attributes.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, value) in attributes {
            out.push(b' ');
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b"=\"");
            escape_into(value, out);
            out.push(b'"');
        }
        out.push(b'>');

        if let Some(text) = &self.text {
            escape_into(text.trim(), out);
        }
        for child in &self.children {
            child.write_canonical(out, exclude_signature);
        }

        out.extend_from_slice(b"</");
        out.extend_from_slice(self.name.as_bytes());
        out.push(b'>');
    }
}

fn escape_into(value: &str, out: &mut Vec<u8>) {
    for ch in value.chars() {
        match ch {
            '&' => out.extend_from_slice(b"&amp;"),
            '<' => out.extend_from_slice(b"&lt;"),
            '>' => out.extend_from_slice(b"&gt;"),
            '"' => out.extend_from_slice(b"&quot;"),
            other => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
}

impl Document {
    /// Wrap a root element as a document.
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// The document root.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All `Signature` elements anywhere in the tree, in document order.
    #[must_use]
    pub fn signature_blocks(&self) -> Vec<&Element> {
        let mut found = Vec::new();
        self.root.collect_named(SIGNATURE_ELEMENT, &mut found);
        found
    }

    /// Whether the document carries at least one signature block.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        !self.signature_blocks().is_empty()
    }

    /// Remove every signature block from the tree.
    ///
    /// Signing is idempotent because it strips any pre-existing block
    /// before computing the new one.
    pub fn remove_signature_blocks(&mut self) {
        fn prune(element: &mut Element) {
            element.children.retain(|child| child.name != SIGNATURE_ELEMENT);
            for child in &mut element.children {
                prune(child);
            }
        }
        prune(&mut self.root);
    }

    /// Append a signature block as the last child of the root.
    pub fn append_signature_block(&mut self, block: Element) {
        self.root.push_child(block);
    }

    /// The canonical byte form of the document.
    ///
    /// With `exclude_signature` set, applies the enveloped-signature
    /// transform: `Signature` elements are omitted, so the result is the
    /// exact content that signatures are computed over.
    #[must_use]
    pub fn canonical_bytes(&self, exclude_signature: bool) -> Vec<u8> {
        let mut out = Vec::new();
        self.root.write_canonical(&mut out, exclude_signature);
        out
    }
}
