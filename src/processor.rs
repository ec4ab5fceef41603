//! Per-file preprocessing pipeline and the batch driver.
//!
//! One file at a time: read the full text, run Lexer → Parser → Interpreter,
//! and overwrite the file with the produced text. The transform happens fully
//! in memory before the overwrite, so no file is left partially rewritten.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::interpreter::{Interpreter, InterpreterContext};
use crate::lexer;
use crate::parser;

/// Expands the directives in `source` against `context`. `%PRINT` output
/// goes to stderr.
pub fn preprocess(source: &str, context: &InterpreterContext) -> Result<String> {
    let tokens = lexer::tokenize(source)?;
    match parser::parse(tokens)? {
        Some(root) => Interpreter::new(context, io::stderr()).traverse(&root),
        None => Ok(String::new()),
    }
}

/// Preprocesses every regular file under `root` in place. The first failing
/// file aborts the batch.
pub fn process_all(root: &Path, context: &InterpreterContext) -> Result<()> {
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|err| Error::Io(err.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        debug!("preprocessing {}", entry.path().display());
        let source = fs::read_to_string(entry.path())?;
        let output = preprocess(&source, context)?;
        fs::write(entry.path(), output)?;
    }

    Ok(())
}
