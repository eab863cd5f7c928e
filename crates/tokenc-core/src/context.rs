/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Per-export state.
//!
//! Both types here are created fresh by one export call and dropped when it
//! returns. Nothing is shared between exports, so several platforms can be
//! exported from the same source dictionary concurrently.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use tokenc_error_reporting::DiagnosticMessage;

/// Named groups of collected messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningGroup {
    /// Missing, circular or unresolvable references. Fatal at the end of an export.
    PropertyReferences,
    /// Malformed `@apply` / `@group` decorators. Never fatal.
    Decorators,
    /// Problems merging source files. Never fatal.
    Sources,
}

impl fmt::Display for WarningGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WarningGroup::PropertyReferences => "Property Reference Errors",
            WarningGroup::Decorators => "Decorator Warnings",
            WarningGroup::Sources => "Source Warnings",
        })
    }
}

/// Collector for diagnostics raised while compiling a dictionary.
///
/// Messages are filed under a [`WarningGroup`]. Adding a message identical to
/// one already in its group is a no-op, because successive loop passes tend to
/// rediscover the same broken reference.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    groups: IndexMap<WarningGroup, Vec<DiagnosticMessage>>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// File a message under `group`.
    pub fn add(&mut self, group: WarningGroup, diagnostic: DiagnosticMessage) {
        let messages = self.groups.entry(group).or_default();
        if !messages.contains(&diagnostic) {
            messages.push(diagnostic);
        }
    }

    /// Number of messages in `group`.
    pub fn count(&self, group: WarningGroup) -> usize {
        self.groups.get(&group).map_or(0, Vec::len)
    }

    /// Messages in `group`, in the order they were first added.
    pub fn messages(&self, group: WarningGroup) -> &[DiagnosticMessage] {
        self.groups.get(&group).map_or(&[][..], Vec::as_slice)
    }

    /// Remove and return every message in `group`.
    pub fn flush(&mut self, group: WarningGroup) -> Vec<DiagnosticMessage> {
        self.groups.shift_remove(&group).unwrap_or_default()
    }

    /// True if no group holds any message.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// Consume the collector, returning every message grouped in first-seen group order.
    pub fn into_diagnostics(self) -> Vec<DiagnosticMessage> {
        self.groups.into_values().flatten().collect()
    }
}

/// Bookkeeping for the transform/resolve convergence loop.
///
/// Paths are stored in reference notation (`color.brand`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransformationContext {
    transformed: IndexSet<String>,
    deferred: IndexSet<String>,
}

impl TransformationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the token's value transforms have run.
    pub fn is_transformed(&self, path: &str) -> bool {
        self.transformed.contains(path)
    }

    /// Record that the token's value transforms ran; it will not be revisited.
    pub fn mark_transformed(&mut self, path: &str) {
        self.deferred.shift_remove(path);
        self.transformed.insert(path.to_string());
    }

    /// Record that the token's value transforms are blocked on a reference.
    pub fn mark_deferred(&mut self, path: &str) {
        self.deferred.insert(path.to_string());
    }

    /// Paths whose value transforms are still blocked.
    pub fn deferred(&self) -> impl Iterator<Item = &str> {
        self.deferred.iter().map(String::as_str)
    }

    pub fn deferred_count(&self) -> usize {
        self.deferred.len()
    }

    pub fn transformed_count(&self) -> usize {
        self.transformed.len()
    }

    /// The value paths the reference resolver must not substitute into other tokens.
    pub fn ignore_paths(&self) -> IndexSet<String> {
        self.deferred.iter().map(|path| format!("{path}.value")).collect()
    }
}
