//! Error handling for the Stencil application.
//! Defines the error types and result alias used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for Stencil operations.
///
/// Covers every stage of a run: the preprocessor pipeline (lexical,
/// syntactic, evaluation errors), the template manifest, and project
/// resolution. Implements the standard Error trait through thiserror's
/// derive macro.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    Io(#[from] io::Error),

    /// Represents errors raised while tokenizing a template file
    #[error("Lexical error: {0}")]
    Lexical(String),

    /// Represents errors raised while parsing a token stream
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Represents errors raised while interpreting a template tree
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Represents errors in the template manifest
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents invalid project parameters (language, standard, kind, mode)
    #[error("Project error: {0}")]
    Project(String),

    /// Represents defects that should not be reachable from template input
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for Results with stencil's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{}", err);
    std::process::exit(1);
}
