//! Stencil is a project scaffolding tool built around a directive template
//! preprocessor: templates carry `%IF`/`%SWITCH`/`%PRINT` directives and
//! `<name>` references that are expanded once, at generation time, into
//! plain text.

/// AST node model for the template preprocessor
pub mod ast;

/// Command-line interface module for the Stencil application
pub mod cli;

/// Template manifest handling (stencil.json)
pub mod config;

/// Error types and handling for the Stencil application
pub mod error;

/// Template tree copy and wildcard substitution passes
pub mod files;

/// Tree-walking interpreter and variable-resolution context
pub mod interpreter;

/// Lexer turning template text into a token sequence
pub mod lexer;

/// Logger initialisation
pub mod logger;

/// Recursive-descent parser building one tree per file
pub mod parser;

/// Per-file preprocessing pipeline and batch driver
pub mod processor;

/// Project parameter resolution and metadata
pub mod project;
