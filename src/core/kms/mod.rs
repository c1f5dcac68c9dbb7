//! Envelope-encryption services.
//!
//! Documents never talk to a KMS directly; they go through the
//! [`KeyService`] trait so the transport stays outside the core.
//!
//! - `aws`: AWS KMS (feature-gated)
//! - `stub`: hex-encoding stand-in for tests (`test-kms` feature)

use std::collections::BTreeMap;

use zeroize::Zeroizing;

use crate::core::constants::{CONTEXT_KEY, CONTEXT_VALUE};
use crate::error::ServiceError;

#[cfg(feature = "aws")]
pub mod aws;

#[cfg(any(test, feature = "test-kms"))]
pub mod stub;

/// Key/value tag bound to every ciphertext for access-policy checks.
///
/// Must be identical between encrypt and decrypt.
pub type EncryptionContext = BTreeMap<String, String>;

/// The fixed context used for every secret value.
pub fn encryption_context() -> EncryptionContext {
    BTreeMap::from([(CONTEXT_KEY.to_string(), CONTEXT_VALUE.to_string())])
}

/// Result of a successful decrypt call.
pub struct Decrypted {
    /// Plaintext bytes, wiped on drop.
    pub plaintext: Zeroizing<Vec<u8>>,
    /// Identifier of the key that produced the ciphertext.
    pub key_id: String,
}

impl Decrypted {
    pub fn new(plaintext: Vec<u8>, key_id: impl Into<String>) -> Self {
        Self {
            plaintext: Zeroizing::new(plaintext),
            key_id: key_id.into(),
        }
    }
}

/// An external envelope-encryption service.
///
/// Implemented by the AWS adapter and by test doubles.
pub trait KeyService {
    /// Decrypt `ciphertext`, reporting the key that was used.
    fn decrypt(
        &self,
        ciphertext: &[u8],
        context: &EncryptionContext,
    ) -> Result<Decrypted, ServiceError>;

    /// Encrypt `plaintext` under `key_id`.
    fn encrypt(
        &self,
        plaintext: &[u8],
        key_id: &str,
        context: &EncryptionContext,
    ) -> Result<Vec<u8>, ServiceError>;

    /// Service name for logs.
    fn name(&self) -> &'static str;
}

impl<T: KeyService + ?Sized> KeyService for &T {
    fn decrypt(
        &self,
        ciphertext: &[u8],
        context: &EncryptionContext,
    ) -> Result<Decrypted, ServiceError> {
        (**self).decrypt(ciphertext, context)
    }

    fn encrypt(
        &self,
        plaintext: &[u8],
        key_id: &str,
        context: &EncryptionContext,
    ) -> Result<Vec<u8>, ServiceError> {
        (**self).encrypt(plaintext, key_id, context)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: KeyService + ?Sized> KeyService for Box<T> {
    fn decrypt(
        &self,
        ciphertext: &[u8],
        context: &EncryptionContext,
    ) -> Result<Decrypted, ServiceError> {
        (**self).decrypt(ciphertext, context)
    }

    fn encrypt(
        &self,
        plaintext: &[u8],
        key_id: &str,
        context: &EncryptionContext,
    ) -> Result<Vec<u8>, ServiceError> {
        (**self).encrypt(plaintext, key_id, context)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
