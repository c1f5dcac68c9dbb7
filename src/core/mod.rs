//! Core library components.
//!
//! Parsing, key location, encryption and serialization of secret manifests.
//! Nothing in here touches the terminal.

pub mod config;
pub mod constants;
pub mod crypto;
pub mod document;
pub mod kms;
pub mod manifest;
pub mod render;
pub mod scan;
pub mod types;
