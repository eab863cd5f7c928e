//! Core diagnostic message types.
//!
//! This module defines the structures used to represent diagnostic messages
//! (errors, warnings, info) produced while compiling a token dictionary.

use serde::{Deserialize, Serialize};

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// An error that prevents completion
    Error,
    /// A warning that doesn't prevent completion but indicates a problem
    Warning,
    /// Informational message
    Info,
    /// A note providing additional context
    Note,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
            DiagnosticKind::Note => "Note",
        }
    }
}

/// How detail items should be presented (x/i bullet style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// Error detail (✖ bullet)
    Error,
    /// Info detail (ℹ bullet)
    Info,
    /// Note detail (plain bullet)
    Note,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
            DetailKind::Note => "•",
        }
    }
}

/// A detail item in a diagnostic message.
///
/// Details provide specific information about the problem: which token,
/// which reference, which file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetailItem {
    /// The kind of detail (error, info, note)
    pub kind: DetailKind,
    /// The content of the detail
    pub content: String,
}

/// A structured diagnostic message.
///
/// Structure:
/// 1. **Code**: Optional error code (e.g., "T-1-1") for searchability
/// 2. **Title**: Brief message
/// 3. **Kind**: Error, Warning, Info
/// 4. **Problem**: What went wrong (the "must" or "can't" statement)
/// 5. **Details**: Specific information (bulleted)
/// 6. **Hints**: Optional guidance for fixing (ends with ?)
///
/// Two messages are equal when every field is equal; collectors rely on this
/// to drop repeats of the same problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    /// Optional error code (e.g., "T-1-1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Brief title for the message
    pub title: String,

    /// The kind of diagnostic (Error, Warning, Info)
    pub kind: DiagnosticKind,

    /// The problem statement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,

    /// Specific details
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DetailItem>,

    /// Optional hints for fixing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

impl DiagnosticMessage {
    /// Create a new diagnostic message with just a title and kind.
    ///
    /// Note: Consider using [`crate::DiagnosticMessageBuilder`] instead for better structure.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// Create an error diagnostic.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    /// Create a warning diagnostic.
    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Create an info diagnostic.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    /// Set the error code.
    ///
    /// Error codes follow the format `T-<subsystem>-<number>` (e.g., "T-1-1").
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Get the documentation URL for this message, if it has a known error code.
    pub fn docs_url(&self) -> Option<&str> {
        self.code
            .as_ref()
            .and_then(|code| crate::catalog::get_docs_url(code))
    }

    /// Render this diagnostic message as text.
    ///
    /// Format:
    /// ```text
    /// Warning [T-1-1]: title
    /// Problem statement here
    /// ✖ Error detail
    /// ℹ Info detail
    /// • Note detail
    /// ? Hint
    /// ```
    ///
    /// # Example
    ///
    /// ```
    /// use tokenc_error_reporting::DiagnosticMessageBuilder;
    ///
    /// let msg = DiagnosticMessageBuilder::error("Invalid input")
    ///     .problem("Values must be numeric")
    ///     .add_detail("Found text in `size.small`")
    ///     .add_hint("Convert to numbers first?")
    ///     .build();
    /// let text = msg.to_text();
    /// assert!(text.starts_with("Error: Invalid input"));
    /// assert!(text.contains("Values must be numeric"));
    /// ```
    pub fn to_text(&self) -> String {
        let mut lines = Vec::with_capacity(2 + self.details.len() + self.hints.len());

        match &self.code {
            Some(code) => lines.push(format!("{} [{}]: {}", self.kind.label(), code, self.title)),
            None => lines.push(format!("{}: {}", self.kind.label(), self.title)),
        }

        if let Some(problem) = &self.problem {
            lines.push(problem.clone());
        }

        for detail in &self.details {
            lines.push(format!("{} {}", detail.kind.bullet(), detail.content));
        }

        for hint in &self.hints {
            lines.push(format!("? {}", hint));
        }

        lines.join("\n")
    }

    /// Render this diagnostic message as a JSON value.
    ///
    /// ```
    /// use tokenc_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::warning("Something looks off");
    /// let json = msg.to_json();
    /// assert_eq!(json["kind"], "warning");
    /// assert_eq!(json["title"], "Something looks off");
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({ "title": self.title }))
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}
