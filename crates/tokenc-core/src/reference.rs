/*
 * reference.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Reference resolution.
//!
//! A token value may embed placeholders of the form `{path.to.token}`. The
//! resolver replaces every placeholder with the literal found at that path:
//!
//! - `"{color.brand}"` alone takes the referenced value as-is, keeping its type
//! - `"1px solid {color.border}"` splices the referenced value's text into the string
//! - chains (`a -> b -> c`) are followed until a literal is reached
//!
//! Problems never abort resolution. Missing targets and cycles are filed under
//! [`WarningGroup::PropertyReferences`] and the offending placeholder is left in
//! place, so the export loop can decide what to do once it settles.

use std::collections::HashSet;
use std::ops::Range;

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tokenc_error_reporting::DiagnosticMessageBuilder;

use crate::context::{DiagnosticCollector, WarningGroup};
use crate::dictionary::{Dictionary, Node, VALUE_KEY, path_name};

/// Marker whose presence makes a value "referencing".
pub const REFERENCE_START: char = '{';

static REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("reference pattern is valid"));

/// True if any string inside `value` contains a reference marker.
pub fn uses_reference(value: &Value) -> bool {
    match value {
        Value::String(s) => s.contains(REFERENCE_START),
        Value::Array(items) => items.iter().any(uses_reference),
        Value::Object(map) => map.values().any(uses_reference),
        _ => false,
    }
}

/// The reference paths named by the placeholders in `text`, in order.
pub fn reference_paths(text: &str) -> Vec<String> {
    REFERENCE_RE
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// Parse a directive target written either as `{a.b}` or as a bare `a.b`.
pub fn parse_target(text: &str) -> Option<Vec<String>> {
    let text = text.trim();
    let inner = match text.strip_prefix(REFERENCE_START) {
        Some(rest) => rest.strip_suffix('}')?,
        None => text,
    };
    let inner = inner.trim();
    if inner.is_empty() || inner.contains(['{', '}']) {
        return None;
    }
    Some(inner.split('.').map(|s| s.trim().to_string()).collect())
}

/// What a reference path points at.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// The referenced value, copied out of the tree.
    pub value: Value,
    /// Set when the value is (part of) a token's value; names that token.
    pub token: Option<String>,
}

/// Find what `segments` addresses in `dictionary`.
///
/// Reaching a token with no remaining segments yields its `value`. Remaining
/// segments address a token field (`value`, `name`, `attributes`, declared
/// keys) and then descend into nested JSON. Reaching a namespace yields the
/// namespace itself as an object.
pub fn lookup<S: AsRef<str>>(dictionary: &Dictionary, segments: &[S]) -> Option<Target> {
    let mut current = dictionary;
    for (index, segment) in segments.iter().enumerate() {
        let rest = &segments[index + 1..];
        match current.get(segment.as_ref())? {
            Node::Namespace(namespace) => {
                if rest.is_empty() {
                    return Some(Target {
                        value: namespace.to_value(),
                        token: None,
                    });
                }
                current = namespace;
            }
            Node::Token(token) => {
                let token_path = path_name(&segments[..=index]);
                let Some((field, more)) = rest.split_first() else {
                    return Some(Target {
                        value: token.value.clone(),
                        token: Some(token_path),
                    });
                };
                let field = field.as_ref();
                let field_value = token.field(field)?;
                let value = descend(&field_value, more)?.clone();
                let token = (field == VALUE_KEY).then_some(token_path);
                return Some(Target { value, token });
            }
            Node::Decorator(value) | Node::Literal(value) => {
                return descend(value, rest).map(|value| Target {
                    value: value.clone(),
                    token: None,
                });
            }
        }
    }
    None
}

fn descend<'v, S: AsRef<str>>(value: &'v Value, segments: &[S]) -> Option<&'v Value> {
    segments.iter().try_fold(value, |current, segment| {
        let segment = segment.as_ref();
        match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}

/// Text spliced into a string when a placeholder is only part of it.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Resolve every placeholder in every token value of `dictionary`.
///
/// Placeholders pointing at a path in `ignore_paths` (spelled `a.b.value`) are
/// left untouched: those tokens still await a value transform and must not be
/// copied into other tokens yet. The returned tree is a new value; the input is
/// read only.
pub fn resolve_references(
    dictionary: &Dictionary,
    ignore_paths: &IndexSet<String>,
    diagnostics: &mut DiagnosticCollector,
) -> Dictionary {
    let mut resolved = dictionary.clone();
    let mut resolver = Resolver {
        dictionary,
        ignore_paths,
        diagnostics,
        reported_cycles: HashSet::new(),
    };

    for (path, token) in dictionary.tokens() {
        if !uses_reference(&token.value) {
            continue;
        }
        let name = path_name(&path);
        let mut stack = vec![name.clone()];
        let value = resolver.resolve_value(&token.value, &name, &mut stack);
        if let Some(target) = resolved.token_at_mut(&path) {
            target.value = value;
        }
    }

    resolved
}

struct Resolver<'a> {
    dictionary: &'a Dictionary,
    ignore_paths: &'a IndexSet<String>,
    diagnostics: &'a mut DiagnosticCollector,
    reported_cycles: HashSet<Vec<String>>,
}

impl Resolver<'_> {
    fn resolve_value(&mut self, value: &Value, context: &str, stack: &mut Vec<String>) -> Value {
        match value {
            Value::String(s) => self.resolve_string(s, context, stack),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_value(item, context, stack))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.resolve_value(item, context, stack)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn resolve_string(&mut self, text: &str, context: &str, stack: &mut Vec<String>) -> Value {
        let placeholders: Vec<(Range<usize>, String)> = REFERENCE_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some((whole.range(), caps[1].trim().to_string()))
            })
            .collect();

        if placeholders.is_empty() {
            return Value::String(text.to_string());
        }

        if let [(range, reference)] = placeholders.as_slice() {
            if *range == (0..text.len()) {
                return self
                    .resolve_reference(reference, context, stack)
                    .unwrap_or_else(|| Value::String(text.to_string()));
            }
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for (range, reference) in &placeholders {
            out.push_str(&text[last..range.start]);
            match self.resolve_reference(reference, context, stack) {
                Some(value) => out.push_str(&value_to_text(&value)),
                None => out.push_str(&text[range.clone()]),
            }
            last = range.end;
        }
        out.push_str(&text[last..]);
        Value::String(out)
    }

    /// The literal for one placeholder, or `None` to leave it in place.
    fn resolve_reference(
        &mut self,
        reference: &str,
        context: &str,
        stack: &mut Vec<String>,
    ) -> Option<Value> {
        if self.is_ignored(reference) {
            return None;
        }

        let segments: Vec<&str> = reference.split('.').collect();
        let Some(target) = lookup(self.dictionary, &segments) else {
            self.report_missing(context, reference);
            return None;
        };

        let Some(token) = target.token else {
            return Some(target.value);
        };
        if !uses_reference(&target.value) {
            return Some(target.value);
        }

        if let Some(start) = stack.iter().position(|entry| *entry == token) {
            self.report_cycle(&stack[start..], &token);
            return None;
        }

        stack.push(token.clone());
        let resolved = self.resolve_value(&target.value, &token, stack);
        stack.pop();

        // A target that is still referencing hit a cycle or a missing path
        // further down; keep this placeholder rather than copy a partial chain.
        (!uses_reference(&resolved)).then_some(resolved)
    }

    fn is_ignored(&self, reference: &str) -> bool {
        if reference.ends_with(".value") {
            self.ignore_paths.contains(reference)
        } else {
            self.ignore_paths.contains(&format!("{reference}.value"))
        }
    }

    fn report_missing(&mut self, context: &str, reference: &str) {
        let diagnostic = DiagnosticMessageBuilder::warning(format!(
            "Reference doesn't exist: {context}.value tries to reference {reference}, which is not defined"
        ))
        .with_code("T-1-1")
        .add_hint("Check the spelling of the referenced path?")
        .build();
        self.diagnostics.add(WarningGroup::PropertyReferences, diagnostic);
    }

    fn report_cycle(&mut self, members: &[String], closing: &str) {
        let mut key = members.to_vec();
        key.sort();
        if !self.reported_cycles.insert(key) {
            return;
        }

        let mut chain = members.to_vec();
        chain.push(closing.to_string());
        let diagnostic = DiagnosticMessageBuilder::warning(format!(
            "Circular definition cycle: {}",
            chain.join(", ")
        ))
        .with_code("T-1-2")
        .add_hint("Give one of the tokens in the cycle a literal value?")
        .build();
        self.diagnostics.add(WarningGroup::PropertyReferences, diagnostic);
    }
}
