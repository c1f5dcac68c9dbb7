//! Decrypt command.

use std::path::Path;

use crate::cli::{key_service, load_document, output, write_document, OutputArgs};
use crate::core::config::Config;
use crate::error::Result;

/// Decrypt an `EncryptedSecret` manifest.
///
/// Documents of other kinds are written back unchanged.
pub fn execute(config: &Config, file: &Path, out: &OutputArgs) -> Result<()> {
    let mut doc = load_document(file)?;

    if !doc.is_secret() {
        output::warn("not a secret manifest, writing it unchanged");
        write_document(&doc, file, out)?;
        return Ok(());
    }

    let service = key_service(config)?;
    doc.decrypt(service.as_ref())?;

    let dest = write_document(&doc, file, out)?;
    output::success(&format!(
        "decrypted {} value{} to {}",
        doc.data().len(),
        if doc.data().len() == 1 { "" } else { "s" },
        dest
    ));
    Ok(())
}
