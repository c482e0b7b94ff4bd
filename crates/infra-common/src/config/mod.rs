//! TOML configuration loading
//!
//! Config structs in the other crates derive `Deserialize` with
//! `#[serde(default)]`, so a file only needs to name the fields it overrides.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::errors::{Error, ErrorExt, Result};

/// Deserialize a config struct from TOML text
pub fn load_toml_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
}

/// Read and deserialize a config struct from a TOML file.
///
/// Read failures surface as [`Error::Io`]; syntax errors as [`Error::Config`]
/// naming the file.
pub fn load_toml_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    load_toml_str(&text).with_context("config", format!("load {}", path.display()))
}
