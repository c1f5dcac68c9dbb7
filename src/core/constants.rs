//! Constants used throughout reseal.
//!
//! Centralizes magic strings and configuration values.

/// Kind name of a manifest whose data values are KMS ciphertext.
pub const ENCRYPTED_KIND: &str = "EncryptedSecret";

/// Kind name of a manifest whose data values are plaintext.
pub const DECRYPTED_KIND: &str = "DecryptedSecret";

/// Plaintext stored in place of an empty value.
///
/// Not every KMS backend accepts zero-length plaintext, so an empty value is
/// encrypted as this marker and mapped back to `""` on decrypt.
pub const EMPTY_VALUE_SENTINEL: &str = "__reseal_empty_value__";

/// Encryption context key bound to every ciphertext.
pub const CONTEXT_KEY: &str = "scope";

/// Encryption context value bound to every ciphertext.
pub const CONTEXT_VALUE: &str = "secret";

/// Indentation of block literal continuation lines.
pub const BLOCK_INDENT: &str = "    ";

/// Project-local configuration file name.
pub const CONFIG_FILE: &str = ".reseal.toml";

/// Directory under the user config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "reseal";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RESEAL_CONFIG";

/// Environment variable overriding the default KMS key id.
pub const KEY_ID_ENV: &str = "RESEAL_KMS_KEY_ID";

/// Environment variable overriding the KMS region.
pub const REGION_ENV: &str = "RESEAL_KMS_REGION";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "RESEAL_LOG";
