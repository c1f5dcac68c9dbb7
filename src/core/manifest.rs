//! Semantic view of a secret manifest.
//!
//! Thin adapter over `serde_yaml_ng`: validates the YAML, classifies the
//! `kind` and extracts the typed data map. It knows nothing about byte
//! positions; see [`crate::core::scan`] for that.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_yaml_ng::Value;
use tracing::debug;

use crate::core::types::{Kind, Metadata, SecretKey};
use crate::error::ParseError;

/// Typed form of `EncryptedSecret` and `DecryptedSecret` manifests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretManifest {
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    data: Option<BTreeMap<SecretKey, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct ObjectMeta {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
}

/// Result of the semantic parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub kind: Kind,
    pub metadata: Metadata,
    pub data: BTreeMap<SecretKey, String>,
}

impl Manifest {
    /// Parse and classify a YAML document.
    ///
    /// Documents of any other kind are accepted as [`Kind::Other`] with no
    /// data, provided they are valid YAML.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Yaml` if the text is not valid YAML, or
    /// `ParseError::NonStringValue` if a secret manifest has a data value
    /// that is not a string.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let value: Value = serde_yaml_ng::from_str(raw)?;
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .map(Kind::from_name)
            .unwrap_or(Kind::Other);

        if !kind.is_secret() {
            debug!("document is not a secret manifest");
            return Ok(Self {
                kind,
                metadata: Metadata::default(),
                data: BTreeMap::new(),
            });
        }

        let manifest: SecretManifest = serde_yaml_ng::from_value(value)?;
        let data = manifest
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => Ok((key, s)),
                _ => Err(ParseError::NonStringValue { key }),
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        debug!(kind = %kind, keys = data.len(), "parsed secret manifest");

        Ok(Self {
            kind,
            metadata: Metadata {
                api_version: manifest.api_version,
                name: manifest.metadata.name,
                namespace: manifest.metadata.namespace,
            },
            data,
        })
    }
}
