//! Splicing serializer.
//!
//! Output is rebuilt from the original text: everything outside the kind
//! token and the recorded value spans is copied byte for byte, so comments,
//! ordering and indentation survive. Only values that differ from what was
//! parsed are re-rendered.

use std::borrow::Cow;
use std::io::Write;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml_ng::Value;
use tracing::debug;

use crate::core::constants::BLOCK_INDENT;
use crate::core::document::Document;
use crate::error::{InternalError, Result};

/// Plain scalars YAML would read as something other than a string.
static NON_STRING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(\.\d+)?|true|false|null|\[.*\]|)$").expect("non-string pattern is valid")
});

impl Document {
    /// Rebuild the document text with the current kind and values.
    ///
    /// Non-secret documents are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` if keys were added to or removed from the
    /// data map since parsing. Nothing is written in that case.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let raw = self.raw();
        if !self.kind.is_secret() {
            return Ok(raw.as_bytes().to_vec());
        }
        if self.data.len() != self.key_locations().len() {
            return Err(InternalError::KeyCountMismatch {
                parsed: self.data.len(),
                located: self.key_locations().len(),
            }
            .into());
        }

        let kind_span = self.kind_span();
        let mut out = String::with_capacity(raw.len());
        out.push_str(&raw[..kind_span.start]);
        out.push_str(self.kind.name());

        let mut cursor = kind_span.end;
        let mut rewritten = 0usize;
        for loc in self.key_locations() {
            let value = self
                .data
                .get(&loc.key)
                .ok_or_else(|| InternalError::MissingValue(loc.key.clone()))?;

            out.push_str(&raw[cursor..loc.span.start]);
            cursor = loc.span.end;
            if self.source_data.get(&loc.key) == Some(value) {
                out.push_str(&raw[loc.span.range()]);
                continue;
            }

            let rendered = render_value(value);
            rewritten += 1;
            match rendered.split_once('\n') {
                // A trailing comment after a single-line value moves up to
                // the block header instead of landing inside the body.
                Some((header, body)) => {
                    let line_end = raw[cursor..]
                        .find(['\r', '\n'])
                        .map_or(raw.len(), |i| cursor + i);
                    out.push_str(header);
                    out.push_str(&raw[cursor..line_end]);
                    out.push('\n');
                    out.push_str(body);
                    cursor = line_end;
                }
                None => out.push_str(&rendered),
            }
        }
        out.push_str(&raw[cursor..]);

        debug!(kind = %self.kind, rewritten, "document serialized");
        Ok(out.into_bytes())
    }

    /// Serialize into `writer`.
    ///
    /// The whole document is built before anything is written.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let bytes = self.serialize()?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}

/// Render a value for the right-hand side of `key: `.
///
/// Multi-line values become `|` block literals indented four spaces;
/// single-line values are double-quoted when a plain scalar would not read
/// back as the same string.
pub fn render_value(value: &str) -> Cow<'_, str> {
    if value.contains('\n') {
        // nothing but line breaks: a block would read back as ""
        if value.trim_end_matches('\n').is_empty() {
            return Cow::Owned(quote(value));
        }
        return Cow::Owned(block_literal(value));
    }
    if needs_quotes(value) {
        return Cow::Owned(quote(value));
    }
    Cow::Borrowed(value)
}

/// Whether a single-line value must be quoted to stay a string.
pub fn needs_quotes(value: &str) -> bool {
    if NON_STRING_PATTERN.is_match(value) {
        return true;
    }
    !matches!(
        serde_yaml_ng::from_str::<Value>(value),
        Ok(Value::String(ref parsed)) if parsed == value
    )
}

fn block_literal(value: &str) -> String {
    // Trailing line breaks collapse to one; the block's own chomping
    // indicator records whether there was one at all.
    let body = value.trim_end_matches('\n');
    let mut header = String::from("|");
    if body.lines().find(|line| !line.is_empty()).is_some_and(|line| line.starts_with(' ')) {
        header.push('2');
    }
    if body.len() == value.len() {
        header.push('-');
    }

    let mut out = header;
    for line in body.split('\n') {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(BLOCK_INDENT);
            out.push_str(line);
        }
    }
    out
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
