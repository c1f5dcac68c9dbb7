//! Secret manifest documents.
//!
//! A [`Document`] pairs two independent views of the same text: the
//! semantic parse from [`Manifest`] and the byte ranges found by
//! [`scan::locate_keys`]. Construction fails unless both agree on exactly
//! which keys exist, so the serializer can trust every recorded span.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml_ng::Value;
use tracing::debug;

use crate::core::manifest::Manifest;
use crate::core::scan;
use crate::core::types::{EncryptedValue, KeyLocation, Kind, Metadata, SecretKey, Span};
use crate::error::{InternalError, ParseError, Result};

/// The `kind:` token and, when present, the top-level `data:` block.
///
/// The data block runs from the `data:` line up to the next line that
/// starts a new top-level entry, or to the end of the document.
static DOCUMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?msR)",
        r"^kind:[ \t]+(EncryptedSecret|DecryptedSecret)\b",
        r"(?:.*?(^data:.*?)(?:\r?\n[^ \t#\r\n]|\z))?",
    ))
    .expect("document pattern is valid")
});

/// Values captured by the last successful decrypt.
///
/// Used to decide which values changed before re-encrypting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub(crate) decrypted: BTreeMap<SecretKey, String>,
    pub(crate) encrypted: BTreeMap<SecretKey, EncryptedValue>,
}

impl Snapshot {
    /// Plaintext values as decrypted.
    pub fn decrypted(&self) -> &BTreeMap<SecretKey, String> {
        &self.decrypted
    }

    /// Ciphertext values the plaintext was decrypted from.
    pub fn encrypted(&self) -> &BTreeMap<SecretKey, EncryptedValue> {
        &self.encrypted
    }
}

/// One secret manifest, parsed and located.
#[derive(Debug, Clone)]
pub struct Document {
    raw: String,
    pub(crate) kind: Kind,
    pub(crate) key_id: Option<String>,
    pub(crate) data: BTreeMap<SecretKey, String>,
    /// Values exactly as parsed from `raw`.
    pub(crate) source_data: BTreeMap<SecretKey, String>,
    metadata: Metadata,
    kind_span: Span,
    data_span: Span,
    key_locations: Vec<KeyLocation>,
    pub(crate) snapshot: Option<Snapshot>,
}

impl Document {
    /// Parse a document and locate its data values.
    ///
    /// Documents that are not `EncryptedSecret` or `DecryptedSecret` come
    /// back as [`Kind::Other`] and pass through every later operation
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - `Error::Parse` for input that is not UTF-8 or not valid YAML
    /// - `Error::Internal` if the byte layout disagrees with the parse;
    ///   such a document must not be rewritten
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let raw = std::str::from_utf8(raw)
            .map_err(ParseError::from)?
            .to_owned();
        let manifest = Manifest::parse(&raw)?;

        let mut doc = Self {
            raw,
            kind: manifest.kind,
            key_id: None,
            data: BTreeMap::new(),
            source_data: BTreeMap::new(),
            metadata: manifest.metadata,
            kind_span: Span::default(),
            data_span: Span::default(),
            key_locations: Vec::new(),
            snapshot: None,
        };
        if !doc.kind.is_secret() {
            return Ok(doc);
        }

        let (kind_span, data_span) = locate_sections(&doc.raw, doc.kind, &manifest.data)?;
        let key_locations = if manifest.data.is_empty() {
            Vec::new()
        } else {
            scan::locate_keys(&doc.raw[data_span.range()], data_span.start)
                .map_err(InternalError::from)?
        };

        if key_locations.len() != manifest.data.len() {
            return Err(InternalError::KeyCountMismatch {
                parsed: manifest.data.len(),
                located: key_locations.len(),
            }
            .into());
        }
        if let Some(loc) = key_locations
            .iter()
            .find(|loc| !manifest.data.contains_key(&loc.key))
        {
            return Err(InternalError::UnknownKey(loc.key.clone()).into());
        }
        verify_spans(&doc.raw, &key_locations, &manifest.data)?;

        debug!(
            kind = %doc.kind,
            keys = key_locations.len(),
            data_start = data_span.start,
            data_end = data_span.end,
            "document located"
        );

        doc.kind_span = kind_span;
        doc.data_span = data_span;
        doc.key_locations = key_locations;
        doc.source_data = manifest.data.clone();
        doc.data = manifest.data;
        Ok(doc)
    }

    /// Current document kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Whether this is an encrypted or decrypted secret manifest.
    pub fn is_secret(&self) -> bool {
        self.kind.is_secret()
    }

    /// Key id covering all values, once known.
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    /// Supply the key id to encrypt with when none was learned by decrypting.
    ///
    /// When set before [`Document::decrypt`], every value must have been
    /// encrypted under this key.
    pub fn set_key_id(&mut self, key_id: impl Into<String>) {
        self.key_id = Some(key_id.into());
    }

    /// Current data values.
    pub fn data(&self) -> &BTreeMap<SecretKey, String> {
        &self.data
    }

    /// Mutable access to the data values.
    ///
    /// Only existing values may be changed. Adding or removing keys makes
    /// [`Document::serialize`] fail.
    pub fn data_mut(&mut self) -> &mut BTreeMap<SecretKey, String> {
        &mut self.data
    }

    /// Current value of one key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The original, unmodified text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind_span(&self) -> Span {
        self.kind_span
    }

    pub fn data_span(&self) -> Span {
        self.data_span
    }

    /// Value locations in document order.
    pub fn key_locations(&self) -> &[KeyLocation] {
        &self.key_locations
    }

    /// Values from the last decrypt, if any.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Carry decrypt history over from an earlier version of this document.
    ///
    /// After an edit round trip the edited text is parsed into a fresh
    /// document. Inheriting the snapshot and key id of the document it was
    /// decrypted from lets [`Document::encrypt`] keep the ciphertext of
    /// every value that was not touched.
    pub fn inherit(&mut self, previous: &Document) {
        if !self.kind.is_secret() {
            return;
        }
        if self.key_id.is_none() {
            self.key_id = previous.key_id.clone();
        }
        if let Some(snapshot) = &previous.snapshot {
            debug!(keys = snapshot.decrypted.len(), "inherited decrypt snapshot");
            self.snapshot = Some(snapshot.clone());
        }
    }
}

/// Find the kind token and the data block.
fn locate_sections(
    raw: &str,
    kind: Kind,
    data: &BTreeMap<SecretKey, String>,
) -> std::result::Result<(Span, Span), InternalError> {
    let mismatch = || InternalError::StructureMismatch { kind: kind.name() };

    let caps = DOCUMENT_PATTERN.captures(raw).ok_or_else(mismatch)?;
    let kind_span = caps.get(1).map(|m| Span::from(m.range())).ok_or_else(mismatch)?;
    let data_span = match caps.get(2) {
        Some(m) => Span::from(m.range()),
        None if data.is_empty() => Span::new(raw.len(), raw.len()),
        None => return Err(mismatch()),
    };
    Ok((kind_span, data_span))
}

/// Check that every single-line span holds the whole value.
///
/// A plain or quoted scalar that continues on the next lines is located by
/// its first line only; read back on its own it no longer equals the parsed
/// value. Block spans always cover their full body and are skipped.
fn verify_spans(
    raw: &str,
    locations: &[KeyLocation],
    data: &BTreeMap<SecretKey, String>,
) -> std::result::Result<(), InternalError> {
    for loc in locations {
        let text = &raw[loc.span.range()];
        if text.starts_with('|') {
            continue;
        }
        let matches = match serde_yaml_ng::from_str::<Value>(text) {
            Ok(Value::String(value)) => data.get(&loc.key) == Some(&value),
            _ => false,
        };
        if !matches {
            return Err(InternalError::SpanMismatch(loc.key.clone()));
        }
    }
    Ok(())
}
