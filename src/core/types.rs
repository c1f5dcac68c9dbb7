//! Shared value types for documents and their byte layout.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::core::constants::{DECRYPTED_KIND, ENCRYPTED_KIND};

/// A data key name (e.g. `DATABASE_URL`).
pub type SecretKey = String;

/// A base64-encoded KMS ciphertext as stored in an encrypted manifest.
pub type EncryptedValue = String;

/// Classification of a parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    /// `EncryptedSecret`: data values are base64 ciphertext.
    Encrypted,
    /// `DecryptedSecret`: data values are plaintext.
    Decrypted,
    /// Anything else. Passed through untouched.
    Other,
}

impl Kind {
    /// Classify a manifest `kind` field.
    pub fn from_name(name: &str) -> Self {
        match name {
            ENCRYPTED_KIND => Self::Encrypted,
            DECRYPTED_KIND => Self::Decrypted,
            _ => Self::Other,
        }
    }

    /// The literal kind name written into documents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Encrypted => ENCRYPTED_KIND,
            Self::Decrypted => DECRYPTED_KIND,
            Self::Other => "other",
        }
    }

    /// Whether this is one of the two secret kinds.
    pub fn is_secret(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Half-open byte range `[start, end)` into a document's original buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start after end");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Move the span by `offset` bytes.
    pub fn shift(self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Where the value of one data key sits in the original buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyLocation {
    pub key: SecretKey,
    pub span: Span,
}

impl KeyLocation {
    pub fn new(key: impl Into<SecretKey>, span: Span) -> Self {
        Self {
            key: key.into(),
            span,
        }
    }
}

/// Object metadata carried through for callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub api_version: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
}
