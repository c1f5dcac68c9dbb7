//! Byte-level location of data values.
//!
//! The semantic parser knows *what* each value is but not *where* it sits in
//! the original text. This scanner finds the byte range of every value in
//! the `data:` block so the serializer can splice new values in without
//! touching anything else.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::core::types::{KeyLocation, Span};
use crate::error::ScanError;

/// One `key: value` entry of the data block.
///
/// Group 1 is the key token. Group 2 is a block scalar: a `|` or `>` header
/// followed by continuation lines indented four spaces, blank lines allowed
/// between them. Group 3 is a single-line value without trailing blanks or
/// a trailing `# comment`; quoted values may contain ` #`.
static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?mR)",
        r"^[ \t]+([^:\r\n]+):",
        r"[ \t]+",
        r"(?:",
        r"([|>][^\r\n]*(?:\r?\n(?:[ \t]*\r?\n)*    [^\r\n]+)+)",
        r"|",
        r#"("(?:[^"\\\r\n]|\\[^\r\n])*"|'(?:[^'\r\n]|'')*'|[^\r\n]+?)"#,
        r"[ \t]*(?:[ \t]#[^\r\n]*)?$",
        r")",
    ))
    .expect("key pattern is valid")
});

/// Locate every data value inside `block`.
///
/// `offset` is the position of `block` inside the full document; returned
/// spans are expressed in full-document coordinates. Keys starting with `#`
/// are commented out and skipped.
///
/// # Errors
///
/// - `ScanError::NoKeys` if no entry matches at all
/// - `ScanError::UnsupportedBlockIndicator` for block scalars other than `|`
/// - `ScanError::ShallowBlock` for a `|` block whose body is not indented
///   four spaces, or is empty
pub fn locate_keys(block: &str, offset: usize) -> Result<Vec<KeyLocation>, ScanError> {
    let mut matched = false;
    let mut locations = Vec::new();

    for caps in KEY_PATTERN.captures_iter(block) {
        matched = true;

        let Some(token) = caps.get(1) else { continue };
        let token = token.as_str().trim();
        if token.starts_with('#') {
            trace!(token, "skipping commented key");
            continue;
        }
        let key = unquote(token);

        let value = match (caps.get(2), caps.get(3)) {
            (Some(block_value), _) => {
                let indicator = block_value.as_str().chars().next().unwrap_or('|');
                if indicator != '|' {
                    return Err(ScanError::UnsupportedBlockIndicator {
                        key: key.to_string(),
                        indicator,
                    });
                }
                block_value
            }
            (None, Some(plain)) => {
                // A header the block branch could not extend: its body is
                // missing or indented less than four spaces.
                match plain.as_str().chars().next() {
                    Some('>') => {
                        return Err(ScanError::UnsupportedBlockIndicator {
                            key: key.to_string(),
                            indicator: '>',
                        })
                    }
                    Some('|') => {
                        return Err(ScanError::ShallowBlock {
                            key: key.to_string(),
                        })
                    }
                    _ => plain,
                }
            }
            (None, None) => continue,
        };

        let span = Span::from(value.range()).shift(offset);
        trace!(key, start = span.start, end = span.end, "located value");
        locations.push(KeyLocation::new(key, span));
    }

    if !matched {
        return Err(ScanError::NoKeys);
    }
    Ok(locations)
}

/// Strip one pair of matching quotes from a key token.
fn unquote(token: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = token
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    token
}
