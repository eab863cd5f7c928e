/*
 * config_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for config files, source loading and built-in transforms
 * using test fixtures.
 */

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokenc_core::{
    Config, ConfigError, Dictionary, ExportOptions, LoadError, StyleDictionary, TransformRegistry,
    load_sources,
};

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir).join("test-fixtures").join(name)
}

fn fixture_dir() -> PathBuf {
    fixture_path("")
}

/// Load the fixture config and its sources into a ready-to-export dictionary.
fn load_fixture_project() -> StyleDictionary {
    let config = Config::from_file(&fixture_path("config.json")).unwrap();
    let sources = load_sources(&config.source, &fixture_dir()).unwrap();
    let platforms = TransformRegistry::with_builtins()
        .resolve_all(&config)
        .unwrap();
    StyleDictionary {
        tokens: sources.dictionary,
        platforms,
    }
}

fn token_json(dict: &Dictionary, path: &[&str]) -> Value {
    dict.token_at(path).map(|t| t.to_value()).unwrap_or(Value::Null)
}

#[test]
fn test_config_file() {
    let config = Config::from_file(&fixture_path("config.json")).unwrap();
    assert_eq!(config.source, vec!["tokens/*.json", "tokens/*.yaml"]);
    let names: Vec<_> = config.platforms.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["css", "js"]);
    assert_eq!(config.platforms["css"].options.get("prefix"), Some(&json!("acme")));
}

#[test]
fn test_missing_config_file() {
    let err = Config::from_file(&fixture_path("nope.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_sources_merge_json_and_yaml() {
    let sources = load_sources(&["tokens/*.json", "tokens/*.yaml"], &fixture_dir()).unwrap();
    let files: Vec<_> = sources
        .files
        .iter()
        .filter_map(|f| f.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(files, vec!["color.json", "size.yaml"]);
    assert!(sources.dictionary.token_at(&["size", "base"]).is_some());
    assert!(sources.dictionary.token_at(&["color", "brand"]).is_some());
    assert!(sources.diagnostics.is_empty());
}

#[test]
fn test_duplicate_matches_are_read_once() {
    let sources = load_sources(&["tokens/color.json", "tokens/*.json"], &fixture_dir()).unwrap();
    assert_eq!(sources.files.len(), 1);
}

#[test]
fn test_source_collisions_are_warnings() {
    let sources = load_sources(&["collision/a.json", "collision/b.json"], &fixture_dir()).unwrap();
    assert_eq!(
        sources.dictionary.token_at(&["color", "red"]).unwrap().value,
        json!("#ee0000")
    );
    assert_eq!(sources.diagnostics.len(), 1);
    assert_eq!(sources.diagnostics[0].code.as_deref(), Some("T-3-1"));
    assert_eq!(sources.diagnostics[0].title, "Property collision at color.red");
}

#[test]
fn test_source_root_must_be_object() {
    let err = load_sources(&["collision/not-an-object.json"], &fixture_dir()).unwrap_err();
    assert!(matches!(err, LoadError::NotAnObject { .. }));
}

#[test]
fn test_css_platform() {
    let sd = load_fixture_project();
    let outcome = sd
        .export_platform_with_diagnostics("css", &ExportOptions::default())
        .unwrap();
    let out = &outcome.dictionary;

    assert_eq!(
        token_json(out, &["size", "padding", "base"]),
        json!({
            "value": "16rem",
            "name": "acme-size-padding-base",
            "attributes": { "category": "size", "type": "padding", "item": "base" },
            "path": ["size", "padding", "base"]
        })
    );
    assert_eq!(
        token_json(out, &["color", "link"]),
        json!({
            "value": "#ff0000",
            "comment": "Links follow the brand colour",
            "name": "acme-color-link",
            "attributes": { "category": "color", "type": "link" },
            "path": ["color", "link"]
        })
    );
    assert_eq!(out.token_at(&["time", "fast"]).unwrap().value, json!("0.15s"));
    assert_eq!(out.token_at(&["content", "icon"]).unwrap().value, json!("'\\e900'"));
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_apply_and_group_in_fixture() {
    let sd = load_fixture_project();
    let out = sd.export_platform("css").unwrap();

    let radius = out.token_at(&["button", "radius"]).unwrap();
    assert_eq!(radius.value, json!(4));
    assert_eq!(radius.attributes.get("component"), Some(&json!("button")));

    let padding = out.token_at(&["button", "padding"]).unwrap();
    assert_eq!(padding.value, json!("16rem"));
    assert_eq!(padding.attributes.get("component"), Some(&json!("button")));

    let border = out.token_at(&["button", "border"]).unwrap();
    assert_eq!(border.value, json!("1px solid #ff0000"));
}

#[test]
fn test_js_platform() {
    let sd = load_fixture_project();
    let out = sd.export_platform("js").unwrap();
    let base = out.token_at(&["size", "base"]).unwrap();
    assert_eq!(base.name.as_deref(), Some("SizeBase"));
    assert_eq!(base.value, json!("16px"));
}

