//! Command-line interface.

pub mod check;
pub mod completions;
pub mod decrypt;
pub mod encrypt;
pub mod output;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::core::config::Config;
use crate::core::document::Document;
use crate::core::kms::KeyService;
use crate::error::Result;

/// Reseal - edit KMS-encrypted secret manifests without reformatting them.
#[derive(Parser)]
#[command(
    name = "reseal",
    about = "Edit KMS-encrypted secret manifests without reformatting them",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: $RESEAL_CONFIG, .reseal.toml, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Parse a manifest and report its keys without decrypting
    Check {
        /// Manifest to inspect (`-` for stdin)
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Turn an EncryptedSecret into a DecryptedSecret
    Decrypt {
        /// Manifest to decrypt (`-` for stdin)
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Turn a DecryptedSecret into an EncryptedSecret
    Encrypt {
        /// Manifest to encrypt (`-` for stdin)
        file: PathBuf,
        /// Encrypted manifest the input was decrypted from; unchanged values
        /// keep its ciphertext
        #[arg(long, value_name = "FILE")]
        original: Option<PathBuf>,
        /// Key for values that have no key yet
        #[arg(long, value_name = "ID")]
        key_id: Option<String>,
        /// Use --key-id even when the manifest already has a key
        #[arg(long)]
        force_key_id: bool,
        /// Encrypt every value again, even unchanged ones
        #[arg(long)]
        re_encrypt: bool,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Where a rewritten manifest goes.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,
    /// Overwrite the input file
    #[arg(short, long)]
    pub in_place: bool,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Check { file, json } => check::execute(&file, json),
        Command::Decrypt { file, output } => {
            let config = Config::load(config_path)?;
            decrypt::execute(&config, &file, &output)
        }
        Command::Encrypt {
            file,
            original,
            key_id,
            force_key_id,
            re_encrypt,
            output,
        } => {
            let config = Config::load(config_path)?;
            let args = encrypt::EncryptArgs {
                file,
                original,
                key_id,
                force_key_id,
                re_encrypt,
                output,
            };
            encrypt::execute(&config, &args)
        }
        Command::Completions { shell } => completions::execute(shell),
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read a manifest from a file, or stdin for `-`.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    if is_stdio(path) {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    debug!(path = %path.display(), "reading manifest");
    Ok(std::fs::read(path)?)
}

/// Read and parse a manifest.
pub(crate) fn load_document(path: &Path) -> Result<Document> {
    Document::parse(&read_input(path)?)
}

/// Serialize `doc` and write it where `output` says.
///
/// Returns a description of the destination for status messages.
pub(crate) fn write_document(doc: &Document, input: &Path, output: &OutputArgs) -> Result<String> {
    let bytes = doc.serialize()?;

    let target = match (&output.output, output.in_place && !is_stdio(input)) {
        (Some(path), _) => Some(path.as_path()),
        (None, true) => Some(input),
        (None, false) => None,
    };

    match target {
        Some(path) => {
            debug!(path = %path.display(), bytes = bytes.len(), "writing manifest");
            std::fs::write(path, &bytes)?;
            Ok(path.display().to_string())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
            Ok("stdout".to_string())
        }
    }
}

/// Build the key service for commands that talk to KMS.
#[cfg(feature = "test-kms")]
pub(crate) fn key_service(_config: &Config) -> Result<Box<dyn KeyService>> {
    debug!("using stub key service");
    Ok(Box::new(crate::core::kms::stub::StubKms::new()))
}

/// Build the key service for commands that talk to KMS.
#[cfg(all(feature = "aws", not(feature = "test-kms")))]
pub(crate) fn key_service(config: &Config) -> Result<Box<dyn KeyService>> {
    let kms = crate::core::kms::aws::AwsKms::new(config.region())
        .map_err(|e| crate::error::ConfigError::NoBackend(e.to_string()))?;
    debug!(service = kms.name(), region = ?config.region(), "key service ready");
    Ok(Box::new(kms))
}

/// Build the key service for commands that talk to KMS.
#[cfg(not(any(feature = "aws", feature = "test-kms")))]
pub(crate) fn key_service(_config: &Config) -> Result<Box<dyn KeyService>> {
    Err(crate::error::ConfigError::NoBackend(
        "reseal was built without a KMS backend (rebuild with --features aws)".to_string(),
    )
    .into())
}
