//! Structured diagnostic messages for tokenc.
//!
//! Every non-fatal problem found while compiling a token dictionary (a missing
//! reference, a malformed decorator, a source-file collision) is reported as a
//! [`DiagnosticMessage`] rather than a bare string, so the CLI can render it as
//! text or JSON and link to documentation through its error code.
//!
//! - [`DiagnosticMessage`]: the message structure
//! - [`DiagnosticMessageBuilder`]: builder for well-structured messages
//! - [`catalog`]: error codes (`T-<subsystem>-<number>`) and their metadata

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_docs_url, get_error_info};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};
