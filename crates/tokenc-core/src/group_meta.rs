/*
 * group_meta.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `@group` metadata propagation.
//!
//! Every namespace may carry a `@group` object. Walking the tree top-down, each
//! namespace's metadata is the shallow merge of its ancestors' metadata with its
//! own `@group` entries, the nearer entry winning. Tokens see the metadata of
//! the namespace that declares them through [`TransformOptions::group_meta`],
//! and only `group` transforms run at this stage.

use serde_json::{Map, Value};
use tokenc_error_reporting::DiagnosticMessageBuilder;

use crate::context::{DiagnosticCollector, WarningGroup};
use crate::dictionary::{Dictionary, Namespace, Node, json_type_name, path_name};
use crate::platform::PlatformConfig;
use crate::transform::{TransformOptions, TransformScope, transform_token};

/// Key of the group-metadata decorator.
pub const GROUP_KEY: &str = "@group";

/// Metadata inherited from enclosing `@group` decorators.
pub type GroupMeta = Map<String, Value>;

/// Run the platform's group transforms over every token, each with the
/// metadata accumulated along its ancestry.
pub fn propagate_group_meta(
    dictionary: &mut Dictionary,
    platform: &PlatformConfig,
    diagnostics: &mut DiagnosticCollector,
) {
    let mut path = Vec::new();
    propagate(dictionary, platform, &GroupMeta::new(), &mut path, diagnostics);
}

fn propagate(
    namespace: &mut Namespace,
    platform: &PlatformConfig,
    inherited: &GroupMeta,
    path: &mut Vec<String>,
    diagnostics: &mut DiagnosticCollector,
) {
    let meta = merged_meta(namespace, inherited, path, diagnostics);
    let options = TransformOptions::new(platform).with_group_meta(&meta);

    for (key, node) in namespace.iter_mut() {
        path.push(key.clone());
        match node {
            Node::Token(token) => {
                let mut input = token.clone();
                input.path = path.clone();
                *token = transform_token(&input, &options, TransformScope::Group);
            }
            Node::Namespace(child) => propagate(child, platform, &meta, path, diagnostics),
            Node::Decorator(_) | Node::Literal(_) => {}
        }
        path.pop();
    }
}

/// `inherited` overlaid with this namespace's own `@group` entries.
fn merged_meta(
    namespace: &Namespace,
    inherited: &GroupMeta,
    path: &[String],
    diagnostics: &mut DiagnosticCollector,
) -> GroupMeta {
    let mut meta = inherited.clone();
    match namespace.get(GROUP_KEY) {
        Some(Node::Decorator(Value::Object(own))) => {
            for (key, value) in own {
                meta.insert(key.clone(), value.clone());
            }
        }
        Some(Node::Decorator(other)) => {
            let location = location(path);
            tracing::warn!(location = %location, "@group is not an object; ignoring it");
            diagnostics.add(
                WarningGroup::Decorators,
                DiagnosticMessageBuilder::warning("Malformed @group")
                    .with_code("T-2-3")
                    .problem(format!(
                        "`@group` on {location} should be an object, but it contained {}",
                        json_type_name(other)
                    ))
                    .add_hint("Write the group metadata as a mapping of keys to values")
                    .build(),
            );
        }
        _ => {}
    }
    meta
}

fn location(path: &[String]) -> String {
    if path.is_empty() {
        "the dictionary root".to_string()
    } else {
        format!("`{}`", path_name(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Copies the inherited metadata into `attributes.meta`.
    fn capture_platform() -> PlatformConfig {
        PlatformConfig::new("test").with_transform(Transform::group("capture", |mut t, options| {
            let meta = options.group_meta.cloned().unwrap_or_default();
            t.attributes.insert("meta".into(), Value::Object(meta));
            t
        }))
    }

    fn meta_of(dict: &Dictionary, path: &[&str]) -> Value {
        dict.token_at(path)
            .and_then(|t| t.attributes.get("meta").cloned())
            .unwrap_or(Value::Null)
    }

    #[test]
    fn test_child_overrides_and_inherits() {
        let mut dict = Dictionary::try_from(json!({
            "button": {
                "@group": { "component": "button", "state": "default" },
                "base": { "value": "#fff" },
                "hover": {
                    "@group": { "state": "hover" },
                    "background": { "value": "#eee" }
                }
            }
        }))
        .unwrap();
        let mut diagnostics = DiagnosticCollector::new();

        propagate_group_meta(&mut dict, &capture_platform(), &mut diagnostics);

        assert_eq!(
            meta_of(&dict, &["button", "base"]),
            json!({ "component": "button", "state": "default" })
        );
        assert_eq!(
            meta_of(&dict, &["button", "hover", "background"]),
            json!({ "component": "button", "state": "hover" })
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut dict = Dictionary::try_from(json!({
            "@group": { "theme": { "mode": "dark", "contrast": "high" } },
            "inner": {
                "@group": { "theme": { "mode": "light" } },
                "token": { "value": 1 }
            }
        }))
        .unwrap();

        propagate_group_meta(&mut dict, &capture_platform(), &mut DiagnosticCollector::new());

        assert_eq!(
            meta_of(&dict, &["inner", "token"]),
            json!({ "theme": { "mode": "light" } })
        );
    }

    #[test]
    fn test_tokens_without_group_see_empty_meta() {
        let mut dict = Dictionary::try_from(json!({ "size": { "base": { "value": 16 } } })).unwrap();
        propagate_group_meta(&mut dict, &capture_platform(), &mut DiagnosticCollector::new());
        assert_eq!(meta_of(&dict, &["size", "base"]), json!({}));
    }

    #[test]
    fn test_sets_token_path() {
        let platform = PlatformConfig::new("test").with_transform(Transform::group("path", |mut t, _| {
            t.name = Some(t.path_name());
            t
        }));
        let mut dict = Dictionary::try_from(json!({ "a": { "b": { "value": 1 } } })).unwrap();
        propagate_group_meta(&mut dict, &platform, &mut DiagnosticCollector::new());
        assert_eq!(dict.token_at(&["a", "b"]).unwrap().name.as_deref(), Some("a.b"));
    }

    #[test]
    fn test_non_object_group_is_reported() {
        let mut dict = Dictionary::try_from(json!({
            "color": { "@group": "brand", "red": { "value": "#f00" } }
        }))
        .unwrap();
        let mut diagnostics = DiagnosticCollector::new();

        propagate_group_meta(&mut dict, &capture_platform(), &mut diagnostics);

        assert_eq!(diagnostics.count(WarningGroup::Decorators), 1);
        let message = &diagnostics.messages(WarningGroup::Decorators)[0];
        assert_eq!(message.code.as_deref(), Some("T-2-3"));
        assert_eq!(meta_of(&dict, &["color", "red"]), json!({}));
    }

    #[test]
    fn test_non_group_transforms_do_not_run() {
        let platform = PlatformConfig::new("test")
            .with_transform(Transform::value("bump", |_, _| json!("changed")));
        let mut dict = Dictionary::try_from(json!({ "a": { "value": 1 } })).unwrap();
        propagate_group_meta(&mut dict, &platform, &mut DiagnosticCollector::new());
        assert_eq!(dict.token_at(&["a"]).unwrap().value, json!(1));
    }
}
