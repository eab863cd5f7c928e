/*
 * export.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Platform export orchestration.
 */

//! Platform export.
//!
//! Exporting a platform runs, on a private copy of the token tree:
//!
//! 1. `@apply` merge ([`apply_decorators`])
//! 2. `@group` propagation ([`propagate_group_meta`])
//! 3. the convergence loop: a transform pass ([`transform_dictionary`]) then a
//!    resolve pass ([`resolve_references`]), repeated until no token waits on a
//!    reference for its value transforms
//! 4. the warning check: any property-reference warning fails the export
//!
//! Transforms need literal values and references need transformed values, so
//! neither step can finish first. Each loop pass unblocks at least one deferred
//! token when the references are acyclic; a pass that changes nothing, or
//! reaching [`ExportOptions::max_passes`], ends the loop with a warning naming
//! the tokens that never resolved.

use indexmap::{IndexMap, IndexSet};
use tokenc_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};

use crate::context::{DiagnosticCollector, TransformationContext, WarningGroup};
use crate::decorators::apply_decorators;
use crate::dictionary::Dictionary;
use crate::error::{ExportError, Result};
use crate::group_meta::propagate_group_meta;
use crate::platform::PlatformConfig;
use crate::reference::resolve_references;
use crate::transform::transform_dictionary;

/// Default bound on convergence-loop passes.
pub const DEFAULT_MAX_PASSES: usize = 100;

/// Tuning for one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Maximum number of transform/resolve passes. At least one pass always
    /// runs, so 0 behaves like 1.
    pub max_passes: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

/// A successful export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    /// The fully transformed and resolved tree.
    pub dictionary: Dictionary,
    /// Non-fatal diagnostics (malformed decorators), in the order raised.
    pub diagnostics: Vec<DiagnosticMessage>,
    /// Transform/resolve passes the loop ran.
    pub passes: usize,
}

/// A token dictionary and the platforms it can be exported to.
///
/// Exports never modify `tokens`; each works on its own copy.
#[derive(Debug, Clone, Default)]
pub struct StyleDictionary {
    pub tokens: Dictionary,
    pub platforms: IndexMap<String, PlatformConfig>,
}

impl StyleDictionary {
    pub fn new(tokens: Dictionary) -> Self {
        Self {
            tokens,
            platforms: IndexMap::new(),
        }
    }

    /// Add a platform under its own name.
    pub fn with_platform(mut self, platform: PlatformConfig) -> Self {
        self.platforms.insert(platform.name().to_string(), platform);
        self
    }

    pub fn platform(&self, name: &str) -> Option<&PlatformConfig> {
        self.platforms.get(name)
    }

    /// Export `platform`, returning the resolved tree.
    pub fn export_platform(&self, platform: &str) -> Result<Dictionary> {
        self.export_platform_with_diagnostics(platform, &ExportOptions::default())
            .map(|outcome| outcome.dictionary)
    }

    /// Export `platform`, also returning non-fatal diagnostics and the pass count.
    pub fn export_platform_with_diagnostics(
        &self,
        platform: &str,
        options: &ExportOptions,
    ) -> Result<ExportOutcome> {
        let config = self
            .platforms
            .get(platform)
            .filter(|_| !platform.is_empty())
            .ok_or_else(|| ExportError::InvalidPlatform {
                platform: platform.to_string(),
            })?;
        export_pipeline(&self.tokens, config, options)
    }
}

/// How a convergence loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopEnd {
    /// No token is waiting on a reference.
    Converged,
    /// A pass left the tree and the deferred set unchanged.
    Stalled,
    /// `max_passes` ran out with tokens still deferred.
    PassLimit,
}

/// Run the whole export pipeline for one platform over a copy of `tokens`.
pub fn export_pipeline(
    tokens: &Dictionary,
    platform: &PlatformConfig,
    options: &ExportOptions,
) -> Result<ExportOutcome> {
    let mut diagnostics = DiagnosticCollector::new();
    let mut working = tokens.clone();

    apply_decorators(&mut working, &mut diagnostics);
    propagate_group_meta(&mut working, platform, &mut diagnostics);

    let mut context = TransformationContext::new();
    let mut passes = 0;
    let end = loop {
        passes += 1;
        let before = context.clone();

        let transformed = transform_dictionary(&working, platform, &mut context);
        let ignore_paths = context.ignore_paths();
        let resolved = resolve_references(&transformed, &ignore_paths, &mut diagnostics);

        tracing::debug!(
            platform = platform.name(),
            pass = passes,
            deferred = context.deferred_count(),
            transformed = context.transformed_count(),
            "export pass"
        );

        let stalled = resolved == working && context == before;
        working = resolved;

        if context.deferred_count() == 0 {
            break LoopEnd::Converged;
        }
        if stalled {
            break LoopEnd::Stalled;
        }
        if passes >= options.max_passes {
            break LoopEnd::PassLimit;
        }
    };

    if end != LoopEnd::Converged {
        // Deferred tokens ignore each other, so a cycle among them is only
        // visible to a resolve with nothing ignored.
        resolve_references(&working, &IndexSet::new(), &mut diagnostics);
        report_unconverged(&context, passes, end, &mut diagnostics);
    }

    if diagnostics.count(WarningGroup::PropertyReferences) > 0 {
        let warnings = diagnostics.flush(WarningGroup::PropertyReferences);
        tracing::warn!(
            platform = platform.name(),
            count = warnings.len(),
            "property reference errors"
        );
        return Err(ExportError::UnresolvedReferences { warnings });
    }

    tracing::info!(platform = platform.name(), passes, "exported platform");
    Ok(ExportOutcome {
        dictionary: working,
        diagnostics: diagnostics.into_diagnostics(),
        passes,
    })
}

fn report_unconverged(
    context: &TransformationContext,
    passes: usize,
    end: LoopEnd,
    diagnostics: &mut DiagnosticCollector,
) {
    let paths: Vec<&str> = context.deferred().collect();
    let reason = match end {
        LoopEnd::PassLimit => format!("the pass limit of {passes} was reached"),
        _ => format!("pass {passes} made no progress"),
    };
    diagnostics.add(
        WarningGroup::PropertyReferences,
        DiagnosticMessageBuilder::warning(format!(
            "Unresolved references: {}",
            paths.join(", ")
        ))
        .with_code("T-1-3")
        .problem(format!("Reference resolution stopped because {reason}"))
        .add_hint("Look for circular references or stray `{` characters in these values")
        .build(),
    );
}
