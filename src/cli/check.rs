//! Check command.
//!
//! Parses a manifest without decrypting it and reports what reseal sees:
//! kind, metadata, located keys and whether an unedited write would be
//! byte-identical. Values are never printed.

use std::path::Path;

use serde::Serialize;

use crate::cli::{output, read_input};
use crate::core::document::Document;
use crate::error::Result;

#[derive(Serialize)]
struct Report<'a> {
    path: String,
    kind: &'static str,
    api_version: Option<&'a str>,
    name: Option<&'a str>,
    namespace: Option<&'a str>,
    keys: Vec<KeyReport<'a>>,
    round_trip: bool,
}

#[derive(Serialize)]
struct KeyReport<'a> {
    key: &'a str,
    start: usize,
    end: usize,
    multiline: bool,
}

/// Inspect a manifest.
///
/// # Errors
///
/// Returns the parse error if the manifest cannot be read, or an internal
/// error if its layout is not understood.
pub fn execute(file: &Path, json: bool) -> Result<()> {
    let raw = read_input(file)?;
    let doc = Document::parse(&raw)?;
    let round_trip = doc.serialize()? == raw;

    let metadata = doc.metadata();
    let report = Report {
        path: file.display().to_string(),
        kind: doc.kind().name(),
        api_version: metadata.api_version.as_deref(),
        name: metadata.name.as_deref(),
        namespace: metadata.namespace.as_deref(),
        keys: doc
            .key_locations()
            .iter()
            .map(|loc| KeyReport {
                key: &loc.key,
                start: loc.span.start,
                end: loc.span.end,
                multiline: doc.raw()[loc.span.range()].contains('\n'),
            })
            .collect(),
        round_trip,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report).map_err(std::io::Error::other)?);
        return Ok(());
    }

    output::section(&output::path(&report.path));
    output::kv("kind", report.kind);
    if let Some(name) = report.name {
        output::kv("name", name);
    }
    if let Some(namespace) = report.namespace {
        output::kv("namespace", namespace);
    }
    if !doc.is_secret() {
        output::kv("status", "not a secret manifest, passed through unchanged");
        return Ok(());
    }

    output::kv("keys", report.keys.len());
    for key in &report.keys {
        let layout = if key.multiline { "block" } else { "inline" };
        output::list_item(&format!(
            "{} {}",
            output::key(key.key),
            output::dimmed(&format!("bytes {}..{} {}", key.start, key.end, layout))
        ));
    }
    output::kv(
        "round trip",
        if report.round_trip { "byte-identical" } else { "differs" },
    );
    Ok(())
}
