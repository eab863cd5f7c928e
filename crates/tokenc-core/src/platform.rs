/*
 * platform.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Platform configuration and the transform registry.
 */

//! Platform configuration.
//!
//! A config file names the token sources and, per platform, the transforms to
//! run. Transform names are looked up in a [`TransformRegistry`], which turns a
//! declarative [`PlatformSpec`] into a runnable [`PlatformConfig`]:
//!
//! ```yaml
//! source:
//!   - "tokens/**/*.json"
//! platforms:
//!   css:
//!     transformGroup: css
//!     transforms: [content/quote]
//!     buildPath: build/css
//!     prefix: acme
//! ```
//!
//! Every key other than `transformGroup` and `transforms` is a free-form option
//! readable by transformers through [`TransformOptions::option`](crate::TransformOptions::option).

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::transform::Transform;

/// Option key holding the output directory.
pub const BUILD_PATH_KEY: &str = "buildPath";

/// A resolved, runnable platform: ordered transforms plus free-form options.
#[derive(Debug, Clone, Default)]
pub struct PlatformConfig {
    name: String,
    transforms: Vec<Transform>,
    options: Map<String, Value>,
}

impl PlatformConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append one transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Append several transforms, keeping their order.
    pub fn with_transforms(mut self, transforms: impl IntoIterator<Item = Transform>) -> Self {
        self.transforms.extend(transforms);
        self
    }

    /// Set a free-form option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// The `buildPath` option, if set to a string.
    pub fn build_path(&self) -> Option<&str> {
        self.option(BUILD_PATH_KEY).and_then(Value::as_str)
    }
}

/// The config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Glob patterns for token source files, relative to the config file.
    #[serde(default)]
    pub source: Vec<String>,

    /// Platforms by name, in declaration order.
    #[serde(default)]
    pub platforms: IndexMap<String, PlatformSpec>,
}

/// One platform as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSpec {
    /// Named transform group expanded before `transforms`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_group: Option<String>,

    /// Transform names appended after the group's.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<String>,

    /// Additional options passed through to transformers
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl Config {
    /// Read a config file; `.yaml`/`.yml` are parsed as YAML, anything else as JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = if is_yaml(path) {
            serde_yaml::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }
}

pub(crate) fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

/// Registry of named transforms and transform groups.
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    transforms: IndexMap<String, Transform>,
    groups: IndexMap<String, Vec<String>>,
}

impl TransformRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in transforms and groups.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::transforms::register_builtins(&mut registry);
        registry
    }

    /// Register a transform under its own name, replacing any previous one.
    pub fn register(&mut self, transform: Transform) {
        self.transforms
            .insert(transform.transform_name().to_string(), transform);
    }

    /// Register a transform group: an ordered list of transform names.
    pub fn register_group<I, S>(&mut self, name: impl Into<String>, transforms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .insert(name.into(), transforms.into_iter().map(Into::into).collect());
    }

    pub fn transform(&self, name: &str) -> Option<&Transform> {
        self.transforms.get(name)
    }

    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Registered transforms in registration order.
    pub fn transforms(&self) -> impl Iterator<Item = &Transform> {
        self.transforms.values()
    }

    /// Registered groups in registration order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    /// Build the runnable platform `name` from its config entry.
    ///
    /// The group's transforms come first, then the explicit `transforms`.
    pub fn resolve_platform(
        &self,
        name: &str,
        spec: &PlatformSpec,
    ) -> Result<PlatformConfig, ConfigError> {
        let mut names: Vec<&str> = Vec::new();
        if let Some(group) = &spec.transform_group {
            let members = self
                .group(group)
                .ok_or_else(|| ConfigError::UnknownTransformGroup {
                    platform: name.to_string(),
                    name: group.clone(),
                })?;
            names.extend(members.iter().map(String::as_str));
        }
        names.extend(spec.transforms.iter().map(String::as_str));

        let transforms = names
            .into_iter()
            .map(|transform| {
                self.transform(transform)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownTransform {
                        platform: name.to_string(),
                        name: transform.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PlatformConfig {
            name: name.to_string(),
            transforms,
            options: spec.options.clone(),
        })
    }

    /// Resolve every platform of `config`, in declaration order.
    pub fn resolve_all(&self, config: &Config) -> Result<IndexMap<String, PlatformConfig>, ConfigError> {
        config
            .platforms
            .iter()
            .map(|(name, spec)| Ok((name.clone(), self.resolve_platform(name, spec)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> TransformRegistry {
        let mut registry = TransformRegistry::new();
        registry.register(Transform::name("name/a", |_, _| "a".into()));
        registry.register(Transform::name("name/b", |_, _| "b".into()));
        registry.register(Transform::value("value/c", |t, _| t.value.clone()));
        registry.register_group("both", ["name/a", "name/b"]);
        registry
    }

    fn spec(value: Value) -> PlatformSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_group_then_explicit_transforms() {
        let platform = registry()
            .resolve_platform(
                "web",
                &spec(json!({ "transformGroup": "both", "transforms": ["value/c"] })),
            )
            .unwrap();
        let names: Vec<_> = platform.transforms().iter().map(|t| t.transform_name()).collect();
        assert_eq!(names, vec!["name/a", "name/b", "value/c"]);
        assert_eq!(platform.name(), "web");
    }

    #[test]
    fn test_free_form_options_are_kept() {
        let platform = registry()
            .resolve_platform(
                "web",
                &spec(json!({ "transforms": [], "buildPath": "out/", "prefix": "acme" })),
            )
            .unwrap();
        assert_eq!(platform.build_path(), Some("out/"));
        assert_eq!(platform.option("prefix"), Some(&json!("acme")));
        assert!(platform.option("transforms").is_none());
    }

    #[test]
    fn test_unknown_names_are_errors() {
        let err = registry()
            .resolve_platform("web", &spec(json!({ "transforms": ["nope"] })))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTransform { ref name, .. } if name == "nope"));

        let err = registry()
            .resolve_platform("web", &spec(json!({ "transformGroup": "nope" })))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTransformGroup { .. }));
    }

    #[test]
    fn test_config_from_yaml_text() {
        let config: Config = serde_yaml::from_str(
            "source: ['tokens/*.json']\nplatforms:\n  css:\n    transformGroup: css\n    prefix: acme\n",
        )
        .unwrap();
        assert_eq!(config.source, vec!["tokens/*.json".to_string()]);
        let css = &config.platforms["css"];
        assert_eq!(css.transform_group.as_deref(), Some("css"));
        assert_eq!(css.options.get("prefix"), Some(&json!("acme")));
    }

    #[test]
    fn test_is_yaml() {
        assert!(is_yaml(Path::new("config.yml")));
        assert!(is_yaml(Path::new("dir/config.yaml")));
        assert!(!is_yaml(Path::new("config.json")));
    }
}
