//! Reseal - a format-preserving editor for KMS-encrypted secret manifests.
//!
//! A manifest is a YAML document of kind `EncryptedSecret` (values are
//! base64 ciphertext) or `DecryptedSecret` (values are plaintext). Reseal
//! decrypts one into the other and back, re-encrypting only what changed
//! and leaving every other byte of the file as it was.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── check         # Inspect a manifest
//! │   ├── decrypt       # EncryptedSecret -> DecryptedSecret
//! │   ├── encrypt       # DecryptedSecret -> EncryptedSecret
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # .reseal.toml management
//!     ├── document      # Parsed document with byte spans
//!     ├── manifest      # Semantic YAML parse
//!     ├── scan          # Byte-level key location
//!     ├── crypto        # Decrypt/encrypt with value reuse
//!     ├── render        # Splicing serializer
//!     └── kms/          # Key service trait and AWS adapter
//! ```
//!
//! # Example
//!
//! ```no_run
//! use reseal::{Document, EncryptOptions, KeyService};
//!
//! fn rotate(raw: &[u8], kms: &dyn KeyService) -> reseal::error::Result<Vec<u8>> {
//!     let mut doc = Document::parse(raw)?;
//!     doc.decrypt(kms)?;
//!     doc.data_mut().insert("API_KEY".into(), "new-value".into());
//!     doc.encrypt(kms, &EncryptOptions::new())?;
//!     doc.serialize()
//! }
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::config::Config;
pub use crate::core::crypto::EncryptOptions;
pub use crate::core::document::{Document, Snapshot};
pub use crate::core::kms::{encryption_context, Decrypted, EncryptionContext, KeyService};
pub use crate::core::render::render_value;
pub use crate::core::scan::locate_keys;
pub use crate::core::types::{Kind, KeyLocation, Span};
