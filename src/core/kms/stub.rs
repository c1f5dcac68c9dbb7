//! In-process key service for tests.
//!
//! Uses simple hex encoding with a prefix and a per-call nonce. NOT
//! cryptographically secure; it only exercises the plumbing. Built into
//! the binary with the `test-kms` feature so CLI tests can run full
//! decrypt and encrypt cycles.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Decrypted, EncryptionContext, KeyService};
use crate::error::ServiceError;

#[derive(Debug, Default)]
pub struct StubKms {
    nonce: AtomicUsize,
    encrypt_calls: AtomicUsize,
    decrypt_calls: AtomicUsize,
    reject_plaintext: Option<Vec<u8>>,
    reject_key: Option<String>,
}

impl StubKms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every encrypt call for this plaintext.
    pub fn rejecting_plaintext(mut self, plaintext: &str) -> Self {
        self.reject_plaintext = Some(plaintext.as_bytes().to_vec());
        self
    }

    /// Fail every decrypt call for ciphertext made under this key.
    pub fn rejecting_key(mut self, key_id: &str) -> Self {
        self.reject_key = Some(key_id.to_string());
        self
    }

    pub fn encrypt_calls(&self) -> usize {
        self.encrypt_calls.load(Ordering::SeqCst)
    }

    pub fn decrypt_calls(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn unhex(text: &str) -> Result<Vec<u8>, ServiceError> {
    if text.len() % 2 != 0 {
        return Err(ServiceError::Rejected("odd-length hex".to_string()));
    }
    (0..text.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&text[i..i + 2], 16)
                .map_err(|e| ServiceError::Rejected(format!("invalid hex: {}", e)))
        })
        .collect()
}

fn context_tag(context: &EncryptionContext) -> String {
    let joined: Vec<String> = context.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    hex(joined.join(",").as_bytes())
}

impl KeyService for StubKms {
    fn decrypt(
        &self,
        ciphertext: &[u8],
        context: &EncryptionContext,
    ) -> Result<Decrypted, ServiceError> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);

        let invalid = || ServiceError::Rejected("not a stub ciphertext".to_string());
        let text = std::str::from_utf8(ciphertext).map_err(|_| invalid())?;
        let rest = text.strip_prefix("stub:").ok_or_else(invalid)?;
        // key ids may contain colons (ARNs), so split from the right
        let parts: Vec<&str> = rest.rsplitn(4, ':').collect();
        let [body, tag, _nonce, key_id] = parts.as_slice() else {
            return Err(invalid());
        };
        if *tag != context_tag(context) {
            return Err(ServiceError::Rejected("encryption context mismatch".to_string()));
        }
        if self.reject_key.as_deref() == Some(*key_id) {
            return Err(ServiceError::Rejected(format!("access denied for {}", key_id)));
        }
        Ok(Decrypted::new(unhex(body)?, *key_id))
    }

    fn encrypt(
        &self,
        plaintext: &[u8],
        key_id: &str,
        context: &EncryptionContext,
    ) -> Result<Vec<u8>, ServiceError> {
        self.encrypt_calls.fetch_add(1, Ordering::SeqCst);

        if self.reject_plaintext.as_deref() == Some(plaintext) {
            return Err(ServiceError::Transport("connection reset".to_string()));
        }
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "stub:{}:{}:{}:{}",
            key_id,
            nonce,
            context_tag(context),
            hex(plaintext)
        )
        .into_bytes())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
