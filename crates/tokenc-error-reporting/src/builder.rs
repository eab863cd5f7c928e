//! Builder API for diagnostic messages.
//!
//! The builder encourages a four-part message structure:
//! 1. **Title**: Brief message (via `.error()`, `.warning()`, etc.)
//! 2. **Problem**: What went wrong (via `.problem()`)
//! 3. **Details**: Specific information (via `.add_detail()`, `.add_info()`, `.add_note()`)
//! 4. **Hints**: Optional guidance (via `.add_hint()`)

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};

/// Builder for creating diagnostic messages.
///
/// # Example
///
/// ```
/// use tokenc_error_reporting::DiagnosticMessageBuilder;
///
/// let warning = DiagnosticMessageBuilder::warning("Reference doesn't exist")
///     .with_code("T-1-1")
///     .problem("`color.link` references `color.missing`, which is not defined")
///     .add_hint("Check the spelling of the referenced path?")
///     .build();
///
/// assert_eq!(warning.code, Some("T-1-1".to_string()));
/// assert_eq!(warning.hints.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    kind: DiagnosticKind,
    title: String,
    code: Option<String>,
    problem: Option<String>,
    details: Vec<DetailItem>,
    hints: Vec<String>,
}

impl DiagnosticMessageBuilder {
    /// Create a new builder with the specified kind and title.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            code: None,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// Create an error diagnostic builder.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    /// Create a warning diagnostic builder.
    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Create an info diagnostic builder.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the problem statement.
    pub fn problem(mut self, stmt: impl Into<String>) -> Self {
        self.problem = Some(stmt.into());
        self
    }

    /// Add an error detail (displayed with ✖ bullet).
    pub fn add_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Error,
            content: detail.into(),
        });
        self
    }

    /// Add an info detail (displayed with ℹ bullet).
    pub fn add_info(mut self, info: impl Into<String>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Info,
            content: info.into(),
        });
        self
    }

    /// Add a note detail (displayed with plain bullet).
    pub fn add_note(mut self, note: impl Into<String>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Note,
            content: note.into(),
        });
        self
    }

    /// Add a hint for fixing the problem.
    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Build the diagnostic message.
    pub fn build(self) -> DiagnosticMessage {
        DiagnosticMessage {
            code: self.code,
            title: self.title,
            kind: self.kind,
            problem: self.problem,
            details: self.details,
            hints: self.hints,
        }
    }
}
