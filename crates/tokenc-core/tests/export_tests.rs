/*
 * export_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end tests of platform export.
 */

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokenc_core::{
    Dictionary, ExportError, ExportOptions, PlatformConfig, StyleDictionary, Transform,
};

fn dictionary(value: Value) -> Dictionary {
    Dictionary::try_from(value).unwrap()
}

fn export(tokens: Value, platform: PlatformConfig) -> Result<Dictionary, ExportError> {
    let name = platform.name().to_string();
    StyleDictionary::new(dictionary(tokens))
        .with_platform(platform)
        .export_platform(&name)
}

fn value_at(dict: &Dictionary, path: &[&str]) -> Value {
    dict.token_at(path).map(|t| t.value.clone()).unwrap_or(Value::Null)
}

#[test]
fn test_end_to_end_reference() {
    let out = export(
        json!({
            "color": {
                "brand": { "value": "#ff0000" },
                "link": { "value": "{color.brand}" }
            }
        }),
        PlatformConfig::new("web"),
    )
    .unwrap();
    assert_eq!(value_at(&out, &["color", "link"]), json!("#ff0000"));
}

#[test]
fn test_chain_converges_within_depth_plus_one() {
    let tokens = json!({
        "a": { "value": "x" },
        "b": { "value": "{a}" },
        "c": { "value": "{b}-{a}" },
        "d": { "value": "[{c}]" }
    });
    let sd = StyleDictionary::new(dictionary(tokens)).with_platform(PlatformConfig::new("web"));
    let outcome = sd
        .export_platform_with_diagnostics("web", &ExportOptions::default())
        .unwrap();

    assert!(outcome.passes <= 4, "took {} passes", outcome.passes);
    assert_eq!(value_at(&outcome.dictionary, &["d"]), json!("[x-x]"));
    for (_, token) in outcome.dictionary.tokens() {
        assert!(!token.uses_reference(), "{} still references", token.path_name());
    }
}

#[test]
fn test_deferred_value_transform_runs_after_resolution() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let platform = PlatformConfig::new("web").with_transform(Transform::value("upper", move |t, _| {
        log.lock().unwrap().push((t.path_name(), t.value.clone()));
        json!(t.value.as_str().unwrap_or_default().to_uppercase())
    }));

    let out = export(
        json!({
            "a": { "b": { "value": "red" } },
            "c": { "value": "{a.b} !" }
        }),
        platform,
    )
    .unwrap();

    assert_eq!(value_at(&out, &["c"]), json!("RED !"));
    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            ("a.b".to_string(), json!("red")),
            ("c".to_string(), json!("RED !")),
        ]
    );
}

#[test]
fn test_group_inheritance() {
    let platform = PlatformConfig::new("web").with_transform(Transform::group("meta", |mut t, o| {
        if let Some(meta) = o.group_meta {
            t.attributes.extend(meta.clone());
        }
        t
    }));

    let out = export(
        json!({
            "@group": { "theme": "light", "density": "normal" },
            "button": {
                "@group": { "theme": "dark" },
                "text": { "value": "#fff" }
            }
        }),
        platform,
    )
    .unwrap();

    let text = out.token_at(&["button", "text"]).unwrap();
    assert_eq!(
        Value::Object(text.attributes.clone()),
        json!({ "theme": "dark", "density": "normal" })
    );
}

#[test]
fn test_cycle_fails_export() {
    let err = export(
        json!({
            "color": {
                "a": { "value": "{color.b}" },
                "b": { "value": "{color.a}" }
            }
        }),
        PlatformConfig::new("web"),
    )
    .unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Problems were found when trying to resolve property references"));
    assert!(message.contains("Circular definition cycle"));
}

#[test]
fn test_missing_reference_fails_export() {
    let err = export(
        json!({ "a": { "value": "{nope}" }, "b": { "value": 1 } }),
        PlatformConfig::new("web"),
    )
    .unwrap_err();
    let ExportError::UnresolvedReferences { warnings } = err else {
        panic!("expected unresolved references");
    };
    assert_eq!(
        warnings[0].title,
        "Reference doesn't exist: a.value tries to reference nope, which is not defined"
    );
}

#[test]
fn test_invalid_platform_fails_before_processing() {
    let sd = StyleDictionary::new(dictionary(json!({ "a": { "value": "{a}" } })))
        .with_platform(PlatformConfig::new("web"));
    assert!(matches!(
        sd.export_platform("android"),
        Err(ExportError::InvalidPlatform { .. })
    ));
}

#[test]
fn test_input_is_not_mutated() {
    let tokens = dictionary(json!({
        "mixin": { "value": { "x": 1 } },
        "node": { "@apply": { "value": "{mixin}" } },
        "a": { "value": 1 },
        "b": { "value": "{a}" }
    }));
    let before = tokens.clone();
    let sd = StyleDictionary::new(tokens).with_platform(
        PlatformConfig::new("web").with_transform(Transform::name("n", |t, _| t.path_name())),
    );

    let out = sd.export_platform("web").unwrap();
    assert_eq!(sd.tokens, before);
    assert_eq!(out.to_value()["node"]["x"], json!(1));
}

#[test]
fn test_platforms_export_independently() {
    let tokens = dictionary(json!({ "size": { "base": { "value": 2 } } }));
    let sd = StyleDictionary::new(tokens)
        .with_platform(PlatformConfig::new("double").with_transform(Transform::value("x2", |t, _| {
            json!(t.value.as_i64().unwrap_or(0) * 2)
        })))
        .with_platform(PlatformConfig::new("plain"));

    let (double, plain) = std::thread::scope(|scope| {
        let double = scope.spawn(|| sd.export_platform("double"));
        let plain = scope.spawn(|| sd.export_platform("plain"));
        (double.join().unwrap().unwrap(), plain.join().unwrap().unwrap())
    });
    assert_eq!(value_at(&double, &["size", "base"]), json!(4));
    assert_eq!(value_at(&plain, &["size", "base"]), json!(2));
}

#[test]
fn test_apply_mixin_with_value_exports_as_token() {
    let platform = PlatformConfig::new("web")
        .with_transform(Transform::name("path", |t, _| t.path.join("-")));
    let out = export(
        json!({
            "color": { "white": { "value": "#fff" } },
            "mixin": { "value": { "value": "{color.white}", "comment": "c" } },
            "node": { "@apply": { "value": "{mixin}" } }
        }),
        platform,
    )
    .unwrap();

    let node = out.token_at(&["node"]).unwrap();
    assert_eq!(node.value, json!("#fff"));
    assert_eq!(node.name.as_deref(), Some("node"));
    assert_eq!(node.path, vec!["node".to_string()]);
}
