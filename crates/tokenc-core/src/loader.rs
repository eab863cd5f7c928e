/*
 * loader.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Token source loading.
//!
//! Source patterns are globs relative to a base directory (normally the
//! directory holding the config file). Each pattern's matches are taken in
//! sorted order, patterns in the order given; a file matched twice is read
//! once. Files are deep-merged in that order, so later files win. Replacing a
//! token or a scalar that an earlier file defined is reported as a property
//! collision but is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde_json::{Map, Value};
use tokenc_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};

use crate::context::{DiagnosticCollector, WarningGroup};
use crate::dictionary::{Dictionary, VALUE_KEY, path_name};
use crate::error::LoadError;
use crate::platform::is_yaml;

/// The merged result of loading every source file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSources {
    pub dictionary: Dictionary,
    /// Files read, in merge order.
    pub files: Vec<PathBuf>,
    /// Property collisions found while merging.
    pub diagnostics: Vec<DiagnosticMessage>,
}

/// Expand `patterns` under `base_dir`, then read and merge every matched file.
pub fn load_sources<S: AsRef<str>>(patterns: &[S], base_dir: &Path) -> Result<LoadedSources, LoadError> {
    let files = expand_patterns(patterns, base_dir)?;
    let mut diagnostics = DiagnosticCollector::new();
    let mut merged = Map::new();

    for file in &files {
        let map = read_source(file)?;
        let mut path = Vec::new();
        deep_merge(&mut merged, map, &mut path, file, &mut diagnostics);
    }

    tracing::debug!(files = files.len(), "loaded token sources");
    Ok(LoadedSources {
        dictionary: Dictionary::from_map(merged),
        files,
        diagnostics: diagnostics.into_diagnostics(),
    })
}

fn expand_patterns<S: AsRef<str>>(patterns: &[S], base_dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = IndexSet::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let full = if Path::new(pattern).is_absolute() {
            PathBuf::from(pattern)
        } else {
            base_dir.join(pattern)
        };
        let entries = glob::glob(&full.to_string_lossy()).map_err(|source| LoadError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut matched = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| LoadError::Io {
                path: err.path().to_path_buf(),
                source: err.into(),
            })?;
            if path.is_file() {
                matched.push(path);
            }
        }
        if matched.is_empty() {
            tracing::warn!(pattern, "source pattern matched no files");
        }
        matched.sort();
        files.extend(matched);
    }
    Ok(files.into_iter().collect())
}

/// Read one source file; its root must be an object.
pub fn read_source(path: &Path) -> Result<Map<String, Value>, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = if is_yaml(path) {
        serde_yaml::from_str(&text).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_json::from_str(&text).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?
    };
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(LoadError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

fn is_namespace(value: &Value) -> bool {
    value.as_object().is_some_and(|map| !map.contains_key(VALUE_KEY))
}

fn deep_merge(
    target: &mut Map<String, Value>,
    source: Map<String, Value>,
    path: &mut Vec<String>,
    file: &Path,
    diagnostics: &mut DiagnosticCollector,
) {
    for (key, incoming) in source {
        path.push(key.clone());
        match target.get_mut(&key) {
            Some(existing) => {
                if is_namespace(existing) && is_namespace(&incoming) {
                    if let (Value::Object(existing), Value::Object(incoming)) = (existing, incoming) {
                        deep_merge(existing, incoming, path, file, diagnostics);
                    }
                } else {
                    if *existing != incoming {
                        report_collision(path, file, diagnostics);
                    }
                    *existing = incoming;
                }
            }
            None => {
                target.insert(key, incoming);
            }
        }
        path.pop();
    }
}

fn report_collision(path: &[String], file: &Path, diagnostics: &mut DiagnosticCollector) {
    let name = path_name(path);
    tracing::warn!(path = %name, file = %file.display(), "property collision");
    diagnostics.add(
        WarningGroup::Sources,
        DiagnosticMessageBuilder::warning(format!("Property collision at {name}"))
            .with_code("T-3-1")
            .problem(format!(
                "{} redefines `{name}`, which an earlier source already defined",
                file.display()
            ))
            .add_hint("Later files win; remove one of the definitions if this is unintended")
            .build(),
    );
}
