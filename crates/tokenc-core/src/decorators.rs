/*
 * decorators.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `@apply` mixins.
//!
//! A namespace may declare `"@apply": { "value": "{path.to.mixin}" }`. The
//! mixin's entries are copied into the namespace, except that an entry the
//! namespace declares *after* `@apply` is an intentional override and is kept.
//! Entries declared before `@apply`, and entries the namespace lacks, take the
//! mixin's value.
//!
//! The walk is pre-order: a namespace is merged before its children are
//! visited, and each lookup sees the tree as merged so far. A mixin that
//! carries a `value` key turns the namespace into a token, whose children are
//! then not visited.

use serde_json::{Map, Value};
use tokenc_error_reporting::DiagnosticMessageBuilder;

use crate::context::{DiagnosticCollector, WarningGroup};
use crate::dictionary::{
    Dictionary, Namespace, Node, VALUE_KEY, is_decorator_key, json_type_name, path_name,
};
use crate::reference::{lookup, parse_target};

/// Key of the mixin decorator.
pub const APPLY_KEY: &str = "@apply";

/// Merge every `@apply` mixin in `dictionary`, in place.
///
/// Malformed directives are reported under [`WarningGroup::Decorators`] and
/// skipped; the walk always continues.
pub fn apply_decorators(dictionary: &mut Dictionary, diagnostics: &mut DiagnosticCollector) {
    let mut path = Vec::new();
    visit(dictionary, &mut path, diagnostics);
}

fn visit(dictionary: &mut Dictionary, path: &mut Vec<String>, diagnostics: &mut DiagnosticCollector) {
    if let Some(plan) = plan_merge(dictionary, path, diagnostics) {
        merge_into(dictionary, path, plan);
    }

    // A node that became a token has no children to visit.
    let children = dictionary
        .namespace_at(path)
        .map(|namespace| namespace.namespace_keys())
        .unwrap_or_default();
    for key in children {
        path.push(key);
        visit(dictionary, path, diagnostics);
        path.pop();
    }
}

/// Splice `plan` into the namespace at `path`. A namespace that gains a
/// `value` entry is a token from then on and is reclassified in its parent.
fn merge_into(dictionary: &mut Dictionary, path: &[String], plan: Vec<(String, Value)>) {
    let Some(namespace) = dictionary.namespace_at_mut(path) else {
        return;
    };
    for (key, value) in plan {
        let node = Node::from_entry(&key, value);
        namespace.insert(key, node);
    }
    if !namespace.contains_key(VALUE_KEY) {
        return;
    }

    // The root stays a namespace.
    let Some((key, parent)) = path.split_last() else {
        return;
    };
    let merged = namespace.to_value();
    if let Some(parent) = dictionary.namespace_at_mut(parent) {
        parent.insert(key.clone(), Node::from_entry(key, merged));
    }
}

/// The entries the namespace at `path` should receive from its mixin.
fn plan_merge(
    dictionary: &Dictionary,
    path: &[String],
    diagnostics: &mut DiagnosticCollector,
) -> Option<Vec<(String, Value)>> {
    let namespace = dictionary.namespace_at(path)?;
    let Some(Node::Decorator(directive)) = namespace.get(APPLY_KEY) else {
        return None;
    };

    let Some(target) = directive_target(directive) else {
        report_malformed(path, directive, diagnostics);
        return None;
    };
    let Some(segments) = parse_target(target) else {
        report_malformed(path, directive, diagnostics);
        return None;
    };

    let mixin = match lookup(dictionary, &segments) {
        Some(found) => match found.value {
            Value::Object(map) => map,
            other => {
                report_not_object(path, target, Some(&other), diagnostics);
                return None;
            }
        },
        None => {
            report_not_object(path, target, None, diagnostics);
            return None;
        }
    };

    Some(overriding_entries(namespace, mixin))
}

fn overriding_entries(namespace: &Namespace, mixin: Map<String, Value>) -> Vec<(String, Value)> {
    let apply_at = namespace.position(APPLY_KEY);
    mixin
        .into_iter()
        .filter(|(key, _)| !is_decorator_key(key))
        .filter(|(key, _)| match namespace.position(key) {
            Some(declared_at) => apply_at.is_some_and(|apply_at| apply_at > declared_at),
            None => true,
        })
        .collect()
}

/// The path string of a well-formed `{ "value": "<path>" }` directive.
fn directive_target(directive: &Value) -> Option<&str> {
    directive.as_object()?.get(VALUE_KEY)?.as_str()
}

fn location(path: &[String]) -> String {
    if path.is_empty() {
        "the dictionary root".to_string()
    } else {
        format!("`{}`", path_name(path))
    }
}

fn report_malformed(path: &[String], directive: &Value, diagnostics: &mut DiagnosticCollector) {
    let location = location(path);
    tracing::warn!(location = %location, "@apply should contain {{value: string}}");
    diagnostics.add(
        WarningGroup::Decorators,
        DiagnosticMessageBuilder::warning("Malformed @apply")
            .with_code("T-2-1")
            .problem(format!(
                "`@apply` on {location} should contain {{value: string}}, but it contained {directive}"
            ))
            .add_hint("Write the directive as `\"@apply\": { \"value\": \"{path.to.mixin}\" }`")
            .build(),
    );
}

fn report_not_object(
    path: &[String],
    target: &str,
    found: Option<&Value>,
    diagnostics: &mut DiagnosticCollector,
) {
    let location = location(path);
    let found = match found {
        Some(value) => json_type_name(value).to_string(),
        None => "nothing".to_string(),
    };
    tracing::warn!(location = %location, mixin = target, "@apply did not reference an object");
    diagnostics.add(
        WarningGroup::Decorators,
        DiagnosticMessageBuilder::warning("@apply did not reference an object")
            .with_code("T-2-2")
            .problem(format!(
                "`@apply` on {location} references `{target}`, which resolves to {found}"
            ))
            .add_hint("Point `@apply` at a namespace or at a token whose value is an object")
            .build(),
    );
}
