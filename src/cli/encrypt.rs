//! Encrypt command.
//!
//! With `--original`, the encrypted manifest the input was decrypted from
//! is decrypted again and its history inherited, so only edited values
//! are sent to KMS.

use std::path::PathBuf;

use tracing::debug;

use crate::cli::{key_service, load_document, output, write_document, OutputArgs};
use crate::core::config::Config;
use crate::core::crypto::EncryptOptions;
use crate::core::types::Kind;
use crate::error::Result;

/// Arguments of `reseal encrypt`.
#[derive(Debug, Clone)]
pub struct EncryptArgs {
    pub file: PathBuf,
    pub original: Option<PathBuf>,
    pub key_id: Option<String>,
    pub force_key_id: bool,
    pub re_encrypt: bool,
    pub output: OutputArgs,
}

impl EncryptArgs {
    /// Encryption options, falling back to the configured key.
    fn options(&self, config: &Config) -> EncryptOptions {
        let mut options = EncryptOptions::new()
            .force_key_id(self.force_key_id)
            .re_encrypt_all(self.re_encrypt);
        if let Some(key_id) = self.key_id.as_deref().or(config.key_id()) {
            options = options.default_key_id(key_id);
        }
        options
    }
}

/// Encrypt a `DecryptedSecret` manifest.
pub fn execute(config: &Config, args: &EncryptArgs) -> Result<()> {
    let mut doc = load_document(&args.file)?;

    if !doc.is_secret() {
        output::warn("not a secret manifest, writing it unchanged");
        write_document(&doc, &args.file, &args.output)?;
        return Ok(());
    }

    let service = key_service(config)?;

    if let Some(path) = &args.original {
        let mut original = load_document(path)?;
        if original.kind() == Kind::Encrypted {
            original.decrypt(service.as_ref())?;
            doc.inherit(&original);
            debug!(original = %path.display(), "reusing ciphertext of original");
        } else {
            output::warn(&format!(
                "{} is not an EncryptedSecret, every value will be encrypted",
                path.display()
            ));
        }
    }

    let total = doc.data().len();
    doc.encrypt(service.as_ref(), &args.options(config))?;

    let dest = write_document(&doc, &args.file, &args.output)?;
    output::success(&format!(
        "encrypted {} value{} with {} to {}",
        total,
        if total == 1 { "" } else { "s" },
        doc.key_id().unwrap_or("unknown key"),
        dest
    ));
    Ok(())
}
