//! Command implementations for the tokenc CLI
//!
//! Each command module handles the CLI interface and delegates to
//! tokenc-core for the actual work.

pub mod build;
pub mod transforms;
