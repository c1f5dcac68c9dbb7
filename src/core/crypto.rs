//! Decrypting and re-encrypting document values.
//!
//! Both operations work on a copy of the data and only commit once every
//! value has gone through the service, so a failure on any key leaves the
//! document exactly as it was.

use std::borrow::Cow;
use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, trace};

use crate::core::constants::{DECRYPTED_KIND, EMPTY_VALUE_SENTINEL, ENCRYPTED_KIND};
use crate::core::document::{Document, Snapshot};
use crate::core::kms::{encryption_context, KeyService};
use crate::core::types::{EncryptedValue, Kind, SecretKey};
use crate::error::{CryptoError, Result, ServiceError};

/// How [`Document::encrypt`] picks keys and decides what to re-encrypt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptOptions {
    /// Key used when the document has none, or when `force_key_id` is set.
    pub default_key_id: Option<String>,
    /// Use `default_key_id` even if the document already has a key id.
    pub force_key_id: bool,
    /// Encrypt every value again, even unchanged ones.
    pub re_encrypt_all: bool,
}

impl EncryptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.default_key_id = Some(key_id.into());
        self
    }

    pub fn force_key_id(mut self, force: bool) -> Self {
        self.force_key_id = force;
        self
    }

    pub fn re_encrypt_all(mut self, re_encrypt: bool) -> Self {
        self.re_encrypt_all = re_encrypt;
        self
    }
}

impl Document {
    /// Decrypt every data value through `service`.
    ///
    /// All values must report the same key id, and it must match the
    /// document's key id when one was already set; it becomes the document's
    /// key id. The plaintext is remembered so [`Document::encrypt`] can tell
    /// which values were edited. A no-op for non-secret documents.
    ///
    /// # Errors
    ///
    /// - `CryptoError::WrongKind` unless the document is encrypted
    /// - `CryptoError::Decode` for values that are not base64
    /// - `CryptoError::Decrypt` when the service fails
    /// - `CryptoError::KeyMismatch` when values use different keys
    pub fn decrypt<S: KeyService + ?Sized>(&mut self, service: &S) -> Result<()> {
        if !self.kind.is_secret() {
            return Ok(());
        }
        if self.kind != Kind::Encrypted {
            return Err(CryptoError::WrongKind {
                expected: ENCRYPTED_KIND,
                actual: self.kind.name(),
            }
            .into());
        }

        debug!(service = service.name(), keys = self.data.len(), "decrypting document");

        let context = encryption_context();
        // a key id already set on the document is the one every value must use
        let mut key_id = self.key_id.clone();
        let mut decrypted = BTreeMap::new();

        for (key, value) in &self.data {
            let ciphertext = STANDARD
                .decode(strip_line_breaks(value).as_bytes())
                .map_err(|source| CryptoError::Decode {
                    key: key.clone(),
                    source,
                })?;

            let result = service
                .decrypt(&ciphertext, &context)
                .map_err(|source| CryptoError::Decrypt {
                    key: key.clone(),
                    source,
                })?;

            match &key_id {
                Some(expected) if *expected != result.key_id => {
                    return Err(CryptoError::KeyMismatch {
                        expected: expected.clone(),
                        actual: result.key_id,
                        key: key.clone(),
                    }
                    .into());
                }
                Some(_) => {}
                None => key_id = Some(result.key_id.clone()),
            }

            let plaintext = std::str::from_utf8(&result.plaintext).map_err(|_| {
                CryptoError::Decrypt {
                    key: key.clone(),
                    source: ServiceError::InvalidResponse(
                        "plaintext is not valid UTF-8".to_string(),
                    ),
                }
            })?;
            let plaintext = if plaintext == EMPTY_VALUE_SENTINEL {
                ""
            } else {
                plaintext
            };

            trace!(key = %key, "decrypted value");
            decrypted.insert(key.clone(), plaintext.to_string());
        }

        let encrypted = std::mem::replace(&mut self.data, decrypted.clone());
        self.snapshot = Some(Snapshot {
            decrypted,
            encrypted,
        });
        if key_id.is_some() {
            self.key_id = key_id;
        }
        self.kind = Kind::Decrypted;

        debug!(key_id = ?self.key_id, "document decrypted");
        Ok(())
    }

    /// Encrypt the data values through `service`.
    ///
    /// Values that still equal what the last decrypt produced keep their
    /// original ciphertext, so unchanged secrets stay byte-identical. A
    /// no-op for non-secret documents.
    ///
    /// # Errors
    ///
    /// - `CryptoError::WrongKind` unless the document is decrypted
    /// - `CryptoError::MissingKey` if no key id resolves
    /// - `CryptoError::Encrypt` when the service fails
    pub fn encrypt<S: KeyService + ?Sized>(
        &mut self,
        service: &S,
        options: &EncryptOptions,
    ) -> Result<()> {
        if !self.kind.is_secret() {
            return Ok(());
        }
        if self.kind != Kind::Decrypted {
            return Err(CryptoError::WrongKind {
                expected: DECRYPTED_KIND,
                actual: self.kind.name(),
            }
            .into());
        }

        let key_id = resolve_key_id(self.key_id.as_deref(), options)?.to_string();
        let context = encryption_context();
        let history = if options.re_encrypt_all {
            None
        } else {
            self.snapshot.as_ref()
        };

        debug!(
            service = service.name(),
            key_id = %key_id,
            keys = self.data.len(),
            "encrypting document"
        );

        let mut encrypted: BTreeMap<SecretKey, EncryptedValue> = BTreeMap::new();
        let mut reused = 0usize;

        for (key, value) in &self.data {
            if let Some(previous) = history.and_then(|s| unchanged_ciphertext(s, key, value)) {
                trace!(key = %key, "value unchanged, reusing ciphertext");
                encrypted.insert(key.clone(), previous.clone());
                reused += 1;
                continue;
            }

            let plaintext = if value.is_empty() {
                EMPTY_VALUE_SENTINEL
            } else {
                value.as_str()
            };
            let ciphertext = service
                .encrypt(plaintext.as_bytes(), &key_id, &context)
                .map_err(|source| CryptoError::Encrypt {
                    key: key.clone(),
                    source,
                })?;

            trace!(key = %key, "encrypted value");
            encrypted.insert(key.clone(), STANDARD.encode(ciphertext));
        }

        debug!(
            reused,
            encrypted = encrypted.len() - reused,
            "document encrypted"
        );

        self.data = encrypted;
        self.kind = Kind::Encrypted;
        self.key_id = Some(key_id);
        Ok(())
    }
}

/// Pick the key to encrypt with.
///
/// The document's own key wins unless `force_key_id` is set.
fn resolve_key_id<'a>(current: Option<&'a str>, options: &'a EncryptOptions) -> Result<&'a str> {
    let key_id = match current {
        Some(key) if !key.is_empty() && !options.force_key_id => Some(key),
        _ => options.default_key_id.as_deref(),
    };
    key_id
        .filter(|key| !key.is_empty())
        .ok_or_else(|| CryptoError::MissingKey.into())
}

/// The previous ciphertext for `key` if its plaintext is unchanged.
fn unchanged_ciphertext<'a>(
    snapshot: &'a Snapshot,
    key: &str,
    value: &str,
) -> Option<&'a EncryptedValue> {
    match snapshot.decrypted.get(key) {
        Some(previous) if previous == value => snapshot.encrypted.get(key),
        _ => None,
    }
}

/// Base64 values may be wrapped across lines in a block scalar.
fn strip_line_breaks(value: &str) -> Cow<'_, str> {
    if value.contains(['\r', '\n']) {
        Cow::Owned(value.chars().filter(|c| !matches!(c, '\r' | '\n')).collect())
    } else {
        Cow::Borrowed(value)
    }
}
