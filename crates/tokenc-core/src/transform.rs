/*
 * transform.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Token transformation infrastructure.
 */

//! Token transformation infrastructure.
//!
//! - [`Transform`] - one named, typed operation (name/value/attribute/group)
//! - [`transform_token`] - applies an ordered list of transforms to one token
//! - [`transform_dictionary`] - one pass of the export loop over the whole tree
//!
//! # Architecture
//!
//! Transforms run in the order the platform lists them; the pipeline never
//! reorders them. Each kind writes to a different part of the token:
//!
//! | kind        | result                 | applied when                               |
//! |-------------|------------------------|--------------------------------------------|
//! | `name`      | replaces `name`        | matcher passes                             |
//! | `value`     | replaces `value`       | matcher passes and the raw value has no reference |
//! | `attribute` | merged into attributes | matcher passes                             |
//! | `group`     | replaces the token     | matcher passes and group metadata is present |
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tokenc_core::{PlatformConfig, Token, Transform, TransformOptions, TransformScope, transform_token};
//!
//! let platform = PlatformConfig::new("css").with_transform(Transform::name("upper", |token, _| {
//!     token.path.join("_").to_uppercase()
//! }));
//! let mut token = Token::new(json!("#ff0000"));
//! token.path = vec!["color".into(), "brand".into()];
//!
//! let out = transform_token(&token, &TransformOptions::new(&platform), TransformScope::Pass);
//! assert_eq!(out.name.as_deref(), Some("COLOR_BRAND"));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::context::TransformationContext;
use crate::dictionary::{Dictionary, Namespace, Node, Token, path_name};
use crate::group_meta::GroupMeta;
use crate::platform::PlatformConfig;

/// Predicate deciding whether a transform applies to a token.
pub type Matcher = Arc<dyn Fn(&Token) -> bool + Send + Sync>;

/// The four transform kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Name,
    Value,
    Attribute,
    Group,
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransformKind::Name => "name",
            TransformKind::Value => "value",
            TransformKind::Attribute => "attribute",
            TransformKind::Group => "group",
        })
    }
}

/// The transformer function, one variant per kind.
#[derive(Clone)]
pub enum Transformer {
    Name(Arc<dyn Fn(&Token, &TransformOptions) -> String + Send + Sync>),
    Value(Arc<dyn Fn(&Token, &TransformOptions) -> Value + Send + Sync>),
    Attribute(Arc<dyn Fn(&Token, &TransformOptions) -> Map<String, Value> + Send + Sync>),
    Group(Arc<dyn Fn(Token, &TransformOptions) -> Token + Send + Sync>),
}

impl Transformer {
    pub fn kind(&self) -> TransformKind {
        match self {
            Transformer::Name(_) => TransformKind::Name,
            Transformer::Value(_) => TransformKind::Value,
            Transformer::Attribute(_) => TransformKind::Attribute,
            Transformer::Group(_) => TransformKind::Group,
        }
    }
}

/// A named transform with an optional matcher.
#[derive(Clone)]
pub struct Transform {
    name: String,
    matcher: Option<Matcher>,
    transformer: Transformer,
}

impl Transform {
    pub fn new(name: impl Into<String>, transformer: Transformer) -> Self {
        Self {
            name: name.into(),
            matcher: None,
            transformer,
        }
    }

    /// A transform computing the token's `name`.
    pub fn name<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Token, &TransformOptions) -> String + Send + Sync + 'static,
    {
        Self::new(name, Transformer::Name(Arc::new(f)))
    }

    /// A transform computing the token's `value`.
    pub fn value<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Token, &TransformOptions) -> Value + Send + Sync + 'static,
    {
        Self::new(name, Transformer::Value(Arc::new(f)))
    }

    /// A transform contributing attributes.
    pub fn attribute<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Token, &TransformOptions) -> Map<String, Value> + Send + Sync + 'static,
    {
        Self::new(name, Transformer::Attribute(Arc::new(f)))
    }

    /// A transform that sees inherited group metadata and may replace the whole token.
    pub fn group<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Token, &TransformOptions) -> Token + Send + Sync + 'static,
    {
        Self::new(name, Transformer::Group(Arc::new(f)))
    }

    /// Restrict the transform to tokens for which `matcher` returns true.
    pub fn with_matcher<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&Token) -> bool + Send + Sync + 'static,
    {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    pub fn transform_name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TransformKind {
        self.transformer.kind()
    }

    pub fn matches(&self, token: &Token) -> bool {
        self.matcher.as_ref().is_none_or(|matcher| matcher(token))
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("matcher", &self.matcher.is_some())
            .finish()
    }
}

/// Options handed to every transformer.
#[derive(Debug, Clone, Copy)]
pub struct TransformOptions<'a> {
    /// The platform being exported.
    pub platform: &'a PlatformConfig,
    /// Metadata inherited from enclosing `@group` decorators. Only set while
    /// group metadata is being propagated.
    pub group_meta: Option<&'a GroupMeta>,
}

impl<'a> TransformOptions<'a> {
    pub fn new(platform: &'a PlatformConfig) -> Self {
        Self {
            platform,
            group_meta: None,
        }
    }

    pub fn with_group_meta(mut self, group_meta: &'a GroupMeta) -> Self {
        self.group_meta = Some(group_meta);
        self
    }

    /// A free-form platform option (`prefix`, `basePxFontSize`, ...).
    pub fn option(&self, key: &str) -> Option<&'a Value> {
        self.platform.option(key)
    }
}

/// Which transforms a call to [`transform_token`] considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformScope {
    /// Only group transforms. Used while propagating group metadata.
    Group,
    /// Every kind. Used by each pass of the export loop.
    Pass,
}

/// Apply the platform's transforms to `token`, returning a new token.
///
/// The input is never mutated. Value transforms are skipped while the input's
/// raw value still contains a reference; the caller is responsible for
/// recording such tokens as deferred.
pub fn transform_token(token: &Token, options: &TransformOptions, scope: TransformScope) -> Token {
    let is_referencing = token.uses_reference();
    let mut result = token.clone();

    for transform in options.platform.transforms() {
        let kind = transform.kind();
        if scope == TransformScope::Group && kind != TransformKind::Group {
            continue;
        }
        if !transform.matches(&result) {
            continue;
        }

        match &transform.transformer {
            Transformer::Name(f) => {
                result.name = Some(f(&result, options));
            }
            Transformer::Value(f) => {
                if !is_referencing {
                    result.value = f(&result, options);
                }
            }
            Transformer::Attribute(f) => {
                let attributes = f(&result, options);
                result.attributes.extend(attributes);
            }
            Transformer::Group(f) => {
                if options.group_meta.is_some() {
                    result = f(result, options);
                }
            }
        }
    }

    result
}

/// Run one transform pass over every token of `dictionary`.
///
/// Tokens already recorded as transformed are copied unchanged. Every other
/// token gets its `path` set and is passed through [`transform_token`]; it is
/// then recorded as transformed, or as deferred if its value still holds a
/// reference.
pub fn transform_dictionary(
    dictionary: &Dictionary,
    platform: &PlatformConfig,
    context: &mut TransformationContext,
) -> Dictionary {
    let options = TransformOptions::new(platform);
    let mut path = Vec::new();
    transform_namespace(dictionary, &options, context, &mut path)
}

fn transform_namespace(
    namespace: &Namespace,
    options: &TransformOptions,
    context: &mut TransformationContext,
    path: &mut Vec<String>,
) -> Namespace {
    let mut out = Namespace::new();
    for (key, node) in namespace.iter() {
        path.push(key.clone());
        let node = match node {
            Node::Token(token) => Node::Token(transform_one(token, options, context, path)),
            Node::Namespace(child) => {
                Node::Namespace(transform_namespace(child, options, context, path))
            }
            other => other.clone(),
        };
        out.insert(key.clone(), node);
        path.pop();
    }
    out
}

fn transform_one(
    token: &Token,
    options: &TransformOptions,
    context: &mut TransformationContext,
    path: &[String],
) -> Token {
    let name = path_name(path);
    if context.is_transformed(&name) {
        return token.clone();
    }

    let deferred = token.uses_reference();
    if deferred {
        context.mark_deferred(&name);
    }

    let mut input = token.clone();
    input.path = path.to_vec();
    let result = transform_token(&input, options, TransformScope::Pass);

    if !deferred {
        context.mark_transformed(&name);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;

    fn token(path: &[&str], value: Value) -> Token {
        let mut token = Token::new(value);
        token.path = path.iter().map(|s| s.to_string()).collect();
        token
    }

    fn platform(transforms: Vec<Transform>) -> PlatformConfig {
        PlatformConfig::new("test").with_transforms(transforms)
    }

    #[test]
    fn test_transforms_run_in_declared_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = order.clone();
        let second = order.clone();
        let platform = platform(vec![
            Transform::name("second-name", move |_, _| {
                second.lock().unwrap().push("b");
                "b".to_string()
            }),
            Transform::name("first-name", move |_, _| {
                first.lock().unwrap().push("a");
                "a".to_string()
            }),
        ]);

        let out = transform_token(
            &token(&["x"], json!(1)),
            &TransformOptions::new(&platform),
            TransformScope::Pass,
        );
        assert_eq!(out.name.as_deref(), Some("a"));
        assert_eq!(*order.lock().unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn test_value_transform_skipped_for_reference() {
        let platform = platform(vec![Transform::value("px", |t, _| {
            json!(format!("{}px", t.value))
        })]);
        let options = TransformOptions::new(&platform);

        let literal = transform_token(&token(&["a"], json!(4)), &options, TransformScope::Pass);
        assert_eq!(literal.value, json!("4px"));

        let referencing =
            transform_token(&token(&["b"], json!("{a}")), &options, TransformScope::Pass);
        assert_eq!(referencing.value, json!("{a}"));
    }

    #[test]
    fn test_matcher_restricts_transform() {
        let platform = platform(vec![
            Transform::value("double", |t, _| json!(t.value.as_i64().unwrap_or(0) * 2))
                .with_matcher(|t| t.path.first().is_some_and(|p| p == "size")),
        ]);
        let options = TransformOptions::new(&platform);

        let size = transform_token(&token(&["size", "a"], json!(2)), &options, TransformScope::Pass);
        let other = transform_token(&token(&["time", "a"], json!(2)), &options, TransformScope::Pass);
        assert_eq!(size.value, json!(4));
        assert_eq!(other.value, json!(2));
    }

    #[test]
    fn test_attribute_transforms_merge_later_wins() {
        let platform = platform(vec![
            Transform::attribute("first", |_, _| {
                let mut m = Map::new();
                m.insert("category".into(), json!("color"));
                m.insert("type".into(), json!("base"));
                m
            }),
            Transform::attribute("second", |_, _| {
                let mut m = Map::new();
                m.insert("type".into(), json!("font"));
                m
            }),
        ]);
        let out = transform_token(
            &token(&["x"], json!(1)),
            &TransformOptions::new(&platform),
            TransformScope::Pass,
        );
        assert_eq!(
            Value::Object(out.attributes),
            json!({ "category": "color", "type": "font" })
        );
    }

    #[test]
    fn test_group_transform_requires_group_meta() {
        let platform = platform(vec![Transform::group("tag", |mut t, options| {
            let meta = options.group_meta.cloned().unwrap_or_default();
            t.attributes.insert("meta".into(), Value::Object(meta));
            t
        })]);
        let input = token(&["x"], json!(1));

        let without = transform_token(&input, &TransformOptions::new(&platform), TransformScope::Pass);
        assert!(without.attributes.is_empty());

        let meta = GroupMeta::new();
        let options = TransformOptions::new(&platform).with_group_meta(&meta);
        let with = transform_token(&input, &options, TransformScope::Group);
        assert_eq!(with.attributes.get("meta"), Some(&json!({})));
    }

    #[test]
    fn test_group_scope_runs_only_group_transforms() {
        let platform = platform(vec![
            Transform::name("name", |_, _| "named".to_string()),
            Transform::group("group", |mut t, _| {
                t.fields.insert("grouped".into(), json!(true));
                t
            }),
        ]);
        let meta = GroupMeta::new();
        let options = TransformOptions::new(&platform).with_group_meta(&meta);
        let out = transform_token(&token(&["x"], json!(1)), &options, TransformScope::Group);
        assert_eq!(out.name, None);
        assert_eq!(out.fields.get("grouped"), Some(&json!(true)));
    }

    #[test]
    fn test_input_token_is_not_mutated() {
        let platform = platform(vec![Transform::name("n", |_, _| "n".to_string())]);
        let input = token(&["x"], json!(1));
        let _ = transform_token(&input, &TransformOptions::new(&platform), TransformScope::Pass);
        assert_eq!(input.name, None);
    }

    #[test]
    fn test_transform_dictionary_tracks_deferred() {
        let dictionary = Dictionary::try_from(json!({
            "color": {
                "brand": { "value": "#f00" },
                "link": { "value": "{color.brand}" }
            }
        }))
        .unwrap();
        let platform = platform(vec![Transform::name("path", |t, _| t.path.join("-"))]);
        let mut context = TransformationContext::new();

        let out = transform_dictionary(&dictionary, &platform, &mut context);

        assert!(context.is_transformed("color.brand"));
        assert_eq!(context.deferred().collect::<Vec<_>>(), vec!["color.link"]);
        let link = out.token_at(&["color", "link"]).unwrap();
        assert_eq!(link.name.as_deref(), Some("color-link"));
        assert_eq!(link.path, vec!["color".to_string(), "link".to_string()]);
    }

    #[test]
    fn test_transform_dictionary_skips_transformed_tokens() {
        let dictionary = Dictionary::try_from(json!({ "a": { "value": 1 } })).unwrap();
        let platform = platform(vec![Transform::value("inc", |t, _| {
            json!(t.value.as_i64().unwrap_or(0) + 1)
        })]);
        let mut context = TransformationContext::new();

        let once = transform_dictionary(&dictionary, &platform, &mut context);
        let twice = transform_dictionary(&once, &platform, &mut context);
        assert_eq!(twice.token_at(&["a"]).unwrap().value, json!(2));
    }
}
