//! Filesystem passes over template trees.
//!
//! Tree copy plus the two literal wildcard substitution passes (filenames and
//! file contents). Wildcard substitution is a plain find/replace, distinct
//! from the preprocessor's `<name>` interpolation.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Recursively copies the tree at `source` into `destination`, creating
/// directories as needed and overwriting existing files.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|err| Error::Io(err.into()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|err| Error::Internal(err.to_string()))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

/// Replaces wildcard markers in every file and directory name under `root`.
/// Entries are visited contents first so a directory's children are renamed
/// before the directory itself.
pub fn rename_all(root: &Path, wildcards: &IndexMap<String, String>) -> Result<()> {
    for entry in WalkDir::new(root).contents_first(true) {
        let entry = entry.map_err(|err| Error::Io(err.into()))?;
        if entry.path() == root {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };

        let mut renamed = file_name.to_string();
        for (marker, value) in wildcards {
            renamed = renamed.replace(marker, value);
        }

        if renamed != file_name {
            debug!("renaming {} to {renamed}", entry.path().display());
            fs::rename(entry.path(), entry.path().with_file_name(renamed))?;
        }
    }

    Ok(())
}

/// Replaces wildcard markers inside every regular file under `root`.
pub fn replace_all(root: &Path, wildcards: &IndexMap<String, String>) -> Result<()> {
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|err| Error::Io(err.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let content = fs::read_to_string(entry.path())?;
        let mut replaced = content.clone();
        for (marker, value) in wildcards {
            replaced = replaced.replace(marker, value);
        }

        if replaced != content {
            debug!("substituting wildcards in {}", entry.path().display());
            fs::write(entry.path(), replaced)?;
        }
    }

    Ok(())
}
