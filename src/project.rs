//! Project resolution and metadata.
//!
//! Validates the requested language, standard, kind, mode, and features
//! against the template manifest, and derives everything the generation
//! pipeline needs from the result: the preprocessor environment, the wildcard
//! substitution map, the on-disk project info file, and the final summary.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::warn;

use crate::cli::Args;
use crate::config::{Manifest, WildcardKeys};
use crate::error::{Error, Result};
use crate::interpreter::InterpreterContext;

/// File written into every generated project describing how it was created.
pub const PROJECT_INFO_FILE: &str = ".stencil-project";

/// A fully resolved set of project parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub language: String,
    pub standard: String,
    pub kind: String,
    pub mode: String,
    pub features: Vec<String>,
}

impl Project {
    /// Resolves and validates the command-line parameters against the
    /// manifest.
    pub fn resolve(args: &Args, manifest: &Manifest) -> Result<Project> {
        let language = manifest.languages.get(&args.language).ok_or_else(|| {
            Error::Project(format!("Language \"{}\" isn't supported.", args.language))
        })?;

        let standard = if args.standard == "latest" {
            language.standards.first().cloned().ok_or_else(|| {
                Error::Project(format!(
                    "Language \"{}\" declares no standards.",
                    args.language
                ))
            })?
        } else if language.standards.contains(&args.standard) {
            args.standard.clone()
        } else {
            return Err(Error::Project(format!(
                "Standard \"{}\" is not available for {}.",
                args.standard, args.language
            )));
        };

        let kind = language.templates.get(&args.kind).ok_or_else(|| {
            Error::Project(format!(
                "Kind \"{}\" is not available for {}.",
                args.kind, args.language
            ))
        })?;

        let mode = kind.modes.get(&args.mode).ok_or_else(|| {
            Error::Project(format!(
                "Kind \"{}\" in mode \"{}\" is not available for {}.",
                args.kind, args.mode, args.language
            ))
        })?;

        let features = args
            .features
            .iter()
            .filter(|feature| {
                let available = mode.features.contains(feature);
                if !available {
                    warn!("Feature \"{feature}\" is unavailable.");
                }
                available
            })
            .cloned()
            .collect();

        Ok(Project {
            name: args.name.clone(),
            language: args.language.clone(),
            standard,
            kind: args.kind.clone(),
            mode: args.mode.clone(),
            features,
        })
    }

    /// The read-only variable tables handed to the preprocessor. The local
    /// table is reserved and currently empty.
    pub fn context(&self) -> InterpreterContext {
        InterpreterContext {
            local_variables: IndexMap::new(),
            environment_variables: IndexMap::from([
                ("ENV:LANGUAGE".to_string(), self.language.clone()),
                ("ENV:STANDARD".to_string(), self.standard.clone()),
                ("ENV:KIND".to_string(), self.kind.clone()),
                ("ENV:MODE".to_string(), self.mode.clone()),
                ("ENV:FEATURES".to_string(), self.features.join(",")),
            ]),
        }
    }

    /// The literal marker→value map used by the wildcard passes.
    pub fn wildcards(&self, keys: &WildcardKeys) -> IndexMap<String, String> {
        IndexMap::from([
            (keys.name.clone(), self.name.clone()),
            (keys.language.clone(), self.language.clone()),
            (keys.standard.clone(), self.standard.clone()),
        ])
    }

    /// Writes the project info file into `destination`.
    pub fn save_info(&self, destination: &Path) -> Result<()> {
        let info = serde_json::json!({
            "project": self.name,
            "language": [self.language, self.standard],
            "kind": [self.kind, self.mode],
            "features": self.features,
        });

        let content = serde_json::to_string_pretty(&info)
            .map_err(|err| Error::Internal(err.to_string()))?;
        fs::write(destination.join(PROJECT_INFO_FILE), content)?;
        Ok(())
    }

    /// Prints the end-of-run summary box.
    pub fn print_summary(&self) {
        println!("┌– [stencil] –––");
        println!("| name.......: {}", self.name);
        println!("| language...: {} ({})", self.language, self.standard);
        println!("| kind.......: {} ({})", self.kind, self.mode);
        println!("| features...: [{}]", self.features.join(","));
        println!("└–––––––––––––");
    }
}
