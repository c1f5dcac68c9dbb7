//! Reseal - edit KMS-encrypted secret manifests without reformatting them.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reseal::cli::output;
use reseal::cli::{execute, Cli};
use reseal::core::constants::LOG_ENV;
use reseal::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("reseal=debug")
        } else {
            EnvFilter::new("reseal=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::NoBackend(_)) => {
                Some("install a build with the aws feature: cargo install reseal --features aws")
            }
            Error::Crypto(reseal::error::CryptoError::MissingKey) => {
                Some("pass --key-id or set RESEAL_KMS_KEY_ID")
            }
            Error::Internal(_) => Some("this is a bug in reseal; no output was written"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(if e.is_internal() { 2 } else { 1 });
    }
}
