//! Error types for reseal.
//!
//! Recoverable failures (bad input, service errors, configuration) are kept
//! apart from [`InternalError`], which signals that the semantic parse and
//! the byte scan disagree. Internal errors must never be turned into output.

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("internal error: {0}")]
    Internal(#[from] InternalError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is a consistency fault rather than a user error.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    /// The data key this error is attributed to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Crypto(e) => e.key(),
            _ => None,
        }
    }
}

/// Malformed input documents.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("error parsing YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("data value for {key} is not a string")]
    NonStringValue { key: String },
}

/// Failures of the byte-level data scanner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("unable to locate any keys in data block")]
    NoKeys,

    #[error("only | block scalars are supported (key {key} uses {indicator})")]
    UnsupportedBlockIndicator { key: String, indicator: char },

    #[error("block scalar for {key} must be indented four spaces past the key")]
    ShallowBlock { key: String },
}

/// Disagreement between the parsed document and the located byte ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("{kind} was parsed but its kind/data layout was not recognised")]
    StructureMismatch { kind: &'static str },

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("key count mismatch: parsed {parsed}, located {located}")]
    KeyCountMismatch { parsed: usize, located: usize },

    #[error("located key {0} is not present in parsed data")]
    UnknownKey(String),

    #[error("key {0} from locations not found in data")]
    MissingValue(String),

    #[error("located value of {0} does not read back as its parsed value")]
    SpanMismatch(String),
}

/// Key-attributed failures while decrypting or encrypting values.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("error base64 decoding value for {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("error decrypting value for {key}: {source}")]
    Decrypt {
        key: String,
        #[source]
        source: ServiceError,
    },

    #[error("error encrypting value for {key}: {source}")]
    Encrypt {
        key: String,
        #[source]
        source: ServiceError,
    },

    #[error("key mismatch between {expected} and {actual} for {key}")]
    KeyMismatch {
        expected: String,
        actual: String,
        key: String,
    },

    #[error("key ID cannot be blank")]
    MissingKey,

    #[error("expected a {expected} document, found {actual}")]
    WrongKind {
        expected: &'static str,
        actual: &'static str,
    },
}

impl CryptoError {
    /// The data key this error is attributed to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Decode { key, .. }
            | Self::Decrypt { key, .. }
            | Self::Encrypt { key, .. }
            | Self::KeyMismatch { key, .. } => Some(key),
            Self::MissingKey | Self::WrongKind { .. } => None,
        }
    }
}

/// Errors reported by an envelope-encryption service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("no key service available: {0}")]
    NoBackend(String),
}

pub type Result<T> = std::result::Result<T, Error>;
