/*
 * dictionary.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The token tree.
//!
//! A dictionary is a tree of named nodes. Every node is classified once, when it
//! is read, into one of four variants:
//!
//! - [`Node::Token`]: an object carrying a `value` key
//! - [`Node::Namespace`]: any other object; purely structural
//! - [`Node::Decorator`]: an entry whose key starts with `@` (`@apply`, `@group`)
//! - [`Node::Literal`]: a non-object entry sitting directly in a namespace
//!
//! Namespaces preserve declaration order, which `@apply` relies on to decide
//! which keys a mixin may override.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix reserved for decorator keys.
pub const DECORATOR_PREFIX: char = '@';

/// Key that marks an object as a token.
pub const VALUE_KEY: &str = "value";

/// Returns true if `key` names a decorator (`@apply`, `@group`, ...).
pub fn is_decorator_key(key: &str) -> bool {
    key.starts_with(DECORATOR_PREFIX)
}

/// Render a token path the way references spell it (`color.brand.primary`).
pub fn path_name<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|segment| segment.as_ref())
        .collect::<Vec<_>>()
        .join(".")
}

/// A design token: a leaf of the dictionary carrying a value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Token {
    /// Literal value, or a string containing `{path}` placeholders.
    pub value: Value,

    /// Platform-specific identifier; absent until a name transform runs.
    pub name: Option<String>,

    /// Position of the token in the tree. Filled in by the export pipeline.
    pub path: Vec<String>,

    /// Auxiliary metadata built up by attribute transforms.
    pub attributes: Map<String, Value>,

    /// Every other declared key (`comment`, `type`, ...), in declaration order.
    pub fields: Map<String, Value>,
}

impl Token {
    /// Create a token with the given value and nothing else.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Build a token from a JSON object. Returns `None` if there is no `value` key.
    pub fn from_map(mut map: Map<String, Value>) -> Option<Self> {
        let value = map.shift_remove(VALUE_KEY)?;
        Some(Self::from_parts(value, map))
    }

    /// Build from a value and the remaining declared keys, lifting out
    /// `name`, `attributes` and `path` when they have the expected shape.
    pub fn from_parts(value: Value, mut map: Map<String, Value>) -> Self {
        let name = match map.shift_remove("name") {
            Some(Value::String(name)) => Some(name),
            Some(other) => {
                map.insert("name".to_string(), other);
                None
            }
            None => None,
        };
        let attributes = match map.shift_remove("attributes") {
            Some(Value::Object(attributes)) => attributes,
            Some(other) => {
                map.insert("attributes".to_string(), other);
                Map::new()
            }
            None => Map::new(),
        };
        let path = match map.shift_remove("path") {
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(other) => {
                map.insert("path".to_string(), other);
                Vec::new()
            }
            None => Vec::new(),
        };

        Self {
            value,
            name,
            path,
            attributes,
            fields: map,
        }
    }

    /// Convert back to a JSON object.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(VALUE_KEY.to_string(), self.value.clone());
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.clone());
        }
        if let Some(name) = &self.name {
            map.insert("name".to_string(), Value::String(name.clone()));
        }
        if !self.attributes.is_empty() {
            map.insert("attributes".to_string(), Value::Object(self.attributes.clone()));
        }
        if !self.path.is_empty() {
            map.insert(
                "path".to_string(),
                Value::Array(self.path.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(map)
    }

    /// Look up a named field the way a reference would address it.
    pub fn field(&self, key: &str) -> Option<Value> {
        match key {
            VALUE_KEY => Some(self.value.clone()),
            "name" => self.name.clone().map(Value::String),
            "attributes" => Some(Value::Object(self.attributes.clone())),
            "path" => Some(Value::Array(
                self.path.iter().cloned().map(Value::String).collect(),
            )),
            other => self.fields.get(other).cloned(),
        }
    }

    /// True if the token's value still contains a reference placeholder.
    pub fn uses_reference(&self) -> bool {
        crate::reference::uses_reference(&self.value)
    }

    /// The token's path in reference notation.
    pub fn path_name(&self) -> String {
        path_name(&self.path)
    }
}

/// A node of the dictionary tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Structural grouping with no value of its own.
    Namespace(Namespace),
    /// A value-bearing token.
    Token(Token),
    /// A decorator entry (`@apply`, `@group`), kept verbatim.
    Decorator(Value),
    /// Any other non-object entry.
    Literal(Value),
}

impl Node {
    /// Classify a JSON value found under `key`.
    pub fn from_entry(key: &str, value: Value) -> Self {
        if is_decorator_key(key) {
            return Node::Decorator(value);
        }
        match value {
            Value::Object(mut map) => match map.shift_remove(VALUE_KEY) {
                Some(value) => Node::Token(Token::from_parts(value, map)),
                None => Node::Namespace(Namespace::from_map(map)),
            },
            other => Node::Literal(other),
        }
    }

    /// Convert back to a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Namespace(namespace) => namespace.to_value(),
            Node::Token(token) => token.to_value(),
            Node::Decorator(value) | Node::Literal(value) => value.clone(),
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Node::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Node::Namespace(namespace) => Some(namespace),
            _ => None,
        }
    }
}

/// An ordered mapping from key to node. The dictionary root is a namespace.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Namespace {
    entries: IndexMap<String, Node>,
}

/// The whole token tree.
pub type Dictionary = Namespace;

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object, classifying each entry.
    pub fn from_map(map: Map<String, Value>) -> Self {
        let entries = map
            .into_iter()
            .map(|(key, value)| {
                let node = Node::from_entry(&key, value);
                (key, node)
            })
            .collect();
        Self { entries }
    }

    /// Convert back to a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, node)| (key.clone(), node.to_value()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    /// Insert a node. An existing key keeps its declaration position.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> Option<Node> {
        self.entries.insert(key.into(), node)
    }

    /// Declaration index of `key`, if present.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Node)> {
        self.entries.iter_mut()
    }

    /// Keys of the child namespaces, in declaration order.
    pub fn namespace_keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, node)| matches!(node, Node::Namespace(_)))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// The node at `path`, walking through namespaces.
    pub fn node_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let node = self.entries.get(first.as_ref())?;
        if rest.is_empty() {
            return Some(node);
        }
        match node {
            Node::Namespace(child) => child.node_at(rest),
            _ => None,
        }
    }

    /// The namespace at `path`; the empty path is `self`.
    pub fn namespace_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&Namespace> {
        if path.is_empty() {
            return Some(self);
        }
        self.node_at(path).and_then(Node::as_namespace)
    }

    /// Mutable access to the namespace at `path`; the empty path is `self`.
    pub fn namespace_at_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Namespace> {
        let Some((first, rest)) = path.split_first() else {
            return Some(self);
        };
        match self.entries.get_mut(first.as_ref())? {
            Node::Namespace(child) => child.namespace_at_mut(rest),
            _ => None,
        }
    }

    /// The token at `path`, if that node is a token.
    pub fn token_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&Token> {
        self.node_at(path).and_then(Node::as_token)
    }

    /// Mutable access to the token at `path`.
    pub fn token_at_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Token> {
        let (last, parent) = path.split_last()?;
        match self.namespace_at_mut(parent)?.entries.get_mut(last.as_ref())? {
            Node::Token(token) => Some(token),
            _ => None,
        }
    }

    /// Every token with its tree path, depth-first in declaration order.
    pub fn tokens(&self) -> Vec<(Vec<String>, &Token)> {
        let mut out = Vec::new();
        self.collect_tokens(&mut Vec::new(), &mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, path: &mut Vec<String>, out: &mut Vec<(Vec<String>, &'a Token)>) {
        for (key, node) in &self.entries {
            path.push(key.clone());
            match node {
                Node::Token(token) => out.push((path.clone(), token)),
                Node::Namespace(child) => child.collect_tokens(path, out),
                Node::Decorator(_) | Node::Literal(_) => {}
            }
            path.pop();
        }
    }
}

impl TryFrom<Value> for Namespace {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Namespace::from_map(map)),
            other => Err(format!(
                "a token dictionary must be an object, found {}",
                json_type_name(&other)
            )),
        }
    }
}

impl From<Namespace> for Value {
    fn from(namespace: Namespace) -> Self {
        namespace.to_value()
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
