/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for tokenc-core.

use std::path::PathBuf;

use thiserror::Error;
use tokenc_error_reporting::DiagnosticMessage;

/// Errors raised by a platform export.
///
/// Per-token problems are collected while the export runs; only the
/// orchestration entry points return these.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The requested platform name is empty or not configured.
    #[error("Please supply a valid platform (got {platform:?})")]
    InvalidPlatform { platform: String },

    /// Property-reference warnings remained after the convergence loop settled.
    #[error(
        "Problems were found when trying to resolve property references:\n{}",
        render_warnings(warnings)
    )]
    UnresolvedReferences { warnings: Vec<DiagnosticMessage> },
}

fn render_warnings(warnings: &[DiagnosticMessage]) -> String {
    warnings
        .iter()
        .map(|w| w.title.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors raised while resolving a platform configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A platform names a transform that is not registered.
    #[error("Unknown transform '{name}' in platform '{platform}'")]
    UnknownTransform { platform: String, name: String },

    /// A platform names a transform group that is not registered.
    #[error("Unknown transform group '{name}' in platform '{platform}'")]
    UnknownTransformGroup { platform: String, name: String },

    /// The configuration file could not be parsed.
    #[error("Could not parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// I/O error reading the configuration file.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading token source files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O error reading a source file.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON source file is malformed.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A YAML source file is malformed.
    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A source glob pattern is malformed.
    #[error("Invalid source pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A source file does not contain an object at its root.
    #[error("Token source {path} must contain an object at its root")]
    NotAnObject { path: PathBuf },
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
