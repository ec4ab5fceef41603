//! Template manifest handling.
//!
//! The manifest (`stencil.json` in the templates directory) declares the
//! supported languages, their standards (ordered newest first), the template
//! kinds and modes available per language, the optional features per mode,
//! and the wildcard markers substituted into generated files.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Manifest file name, looked up in the templates directory.
pub const MANIFEST_FILE: &str = "stencil.json";

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub languages: IndexMap<String, Language>,
    pub wildcards: WildcardKeys,
}

#[derive(Debug, Deserialize)]
pub struct Language {
    /// Available standards, newest first; `latest` resolves to the first.
    pub standards: Vec<String>,
    pub templates: IndexMap<String, Kind>,
}

#[derive(Debug, Deserialize)]
pub struct Kind {
    pub modes: IndexMap<String, Mode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Mode {
    #[serde(default)]
    pub features: Vec<String>,
}

/// The markers replaced by the wildcard substitution passes.
#[derive(Debug, Deserialize)]
pub struct WildcardKeys {
    pub name: String,
    pub language: String,
    pub standard: String,
}

/// Loads and parses the manifest from `templates_dir`.
pub fn load_manifest(templates_dir: &Path) -> Result<Manifest> {
    let path = templates_dir.join(MANIFEST_FILE);
    debug!("loading manifest from {}", path.display());

    let content = fs::read_to_string(&path)
        .map_err(|_| Error::Config(format!("Couldn't open {}.", path.display())))?;
    parse_manifest(&content)
}

/// Parses manifest text.
pub fn parse_manifest(content: &str) -> Result<Manifest> {
    serde_json::from_str(content)
        .map_err(|err| Error::Config(format!("Invalid manifest: {err}.")))
}
