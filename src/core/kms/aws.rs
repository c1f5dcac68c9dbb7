//! AWS KMS key service.
//!
//! Enable with `--features aws`. Credentials come from the environment
//! (`AWS_ACCESS_KEY_ID`, etc.) or the default credential provider chain.
//! The region is taken from the configuration when set, otherwise from the
//! usual AWS sources.

use aws_sdk_kms::config::Region;
use aws_sdk_kms::error::{DisplayErrorContext, SdkError};
use aws_sdk_kms::primitives::Blob;
use tracing::trace;

use super::{Decrypted, EncryptionContext, KeyService};
use crate::error::ServiceError;

/// AWS KMS client driven by its own single-threaded runtime.
///
/// KMS records the key in the ciphertext blob, so decrypt needs no key id
/// and reports the one it used.
pub struct AwsKms {
    runtime: tokio::runtime::Runtime,
    client: aws_sdk_kms::Client,
}

impl AwsKms {
    /// Build a client from the default AWS configuration.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Transport` if the runtime cannot be created.
    pub fn new(region: Option<&str>) -> Result<Self, ServiceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ServiceError::Transport(format!("failed to create runtime: {}", e)))?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let config = runtime.block_on(loader.load());
        let client = aws_sdk_kms::Client::new(&config);

        Ok(Self { runtime, client })
    }
}

/// Service-side failures are rejections; everything else is transport.
fn classify<E, R>(operation: &str, err: SdkError<E, R>) -> ServiceError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = format!("KMS {} failed: {}", operation, DisplayErrorContext(&err));
    match err {
        SdkError::ServiceError(_) => ServiceError::Rejected(message),
        _ => ServiceError::Transport(message),
    }
}

impl KeyService for AwsKms {
    fn decrypt(
        &self,
        ciphertext: &[u8],
        context: &EncryptionContext,
    ) -> Result<Decrypted, ServiceError> {
        trace!(ciphertext_len = ciphertext.len(), "decrypting with AWS KMS");

        let mut request = self
            .client
            .decrypt()
            .ciphertext_blob(Blob::new(ciphertext));
        for (k, v) in context {
            request = request.encryption_context(k, v);
        }

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(|e| classify("decrypt", e))?;

        let plaintext = output
            .plaintext()
            .ok_or_else(|| ServiceError::InvalidResponse("no plaintext returned".into()))?;
        let key_id = output
            .key_id()
            .ok_or_else(|| ServiceError::InvalidResponse("no key id returned".into()))?;

        trace!(key_id, plaintext_len = plaintext.as_ref().len(), "decrypted with AWS KMS");
        Ok(Decrypted::new(plaintext.as_ref().to_vec(), key_id))
    }

    fn encrypt(
        &self,
        plaintext: &[u8],
        key_id: &str,
        context: &EncryptionContext,
    ) -> Result<Vec<u8>, ServiceError> {
        trace!(key_id, plaintext_len = plaintext.len(), "encrypting with AWS KMS");

        let mut request = self
            .client
            .encrypt()
            .key_id(key_id)
            .plaintext(Blob::new(plaintext));
        for (k, v) in context {
            request = request.encryption_context(k, v);
        }

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(|e| classify("encrypt", e))?;

        let blob = output
            .ciphertext_blob()
            .ok_or_else(|| ServiceError::InvalidResponse("no ciphertext returned".into()))?;

        trace!(ciphertext_len = blob.as_ref().len(), "encrypted with AWS KMS");
        Ok(blob.as_ref().to_vec())
    }

    fn name(&self) -> &'static str {
        "aws-kms"
    }
}
