/*
 * build.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Build command implementation
 */

//! Build command implementation.
//!
//! `tokenc build` reads the config file, loads and merges the token sources it
//! names, and exports each selected platform. Every platform is attempted even
//! if an earlier one fails; the command fails if any did.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::{debug, info};

use tokenc_core::{
    Config, ExportError, ExportOptions, ExportOutcome, StyleDictionary, TransformRegistry,
    load_sources,
};
use tokenc_error_reporting::DiagnosticMessage;

/// Arguments for the build command
#[derive(Debug)]
pub struct BuildArgs {
    /// Config file path
    pub config: PathBuf,
    /// Platforms to export; empty means all
    pub platforms: Vec<String>,
    /// Output directory overriding each platform's buildPath
    pub out_dir: Option<PathBuf>,
    /// Print to stdout instead of writing files
    pub stdout: bool,
    /// Convergence-loop bound
    pub max_passes: usize,
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to read config {}", args.config.display()))?;
    let base_dir = args
        .config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let sources = load_sources(&config.source, &base_dir).context("Failed to load token sources")?;
    debug!(files = sources.files.len(), "sources loaded");
    report(&sources.diagnostics);

    let platforms = TransformRegistry::with_builtins()
        .resolve_all(&config)
        .context("Invalid platform configuration")?;
    let dictionary = StyleDictionary {
        tokens: sources.dictionary,
        platforms,
    };

    let selected: Vec<String> = if args.platforms.is_empty() {
        dictionary.platforms.keys().cloned().collect()
    } else {
        args.platforms.clone()
    };

    let options = ExportOptions {
        max_passes: args.max_passes,
    };
    let mut failed = Vec::new();
    let mut printed = Map::new();

    for platform in &selected {
        match dictionary.export_platform_with_diagnostics(platform, &options) {
            Ok(outcome) => {
                report(&outcome.diagnostics);
                if args.stdout {
                    printed.insert(platform.clone(), outcome.dictionary.to_value());
                } else {
                    let dir = output_dir(&args, &base_dir, &dictionary, platform);
                    write_platform(&dir, platform, &outcome)?;
                }
            }
            Err(err) => {
                report_failure(platform, &err);
                failed.push(platform.clone());
            }
        }
    }

    if args.stdout {
        println!("{}", serde_json::to_string_pretty(&Value::Object(printed))?);
    }

    if !failed.is_empty() {
        anyhow::bail!("Failed to export platform(s): {}", failed.join(", "));
    }
    Ok(())
}

/// `--out-dir`, else the platform's buildPath (relative to the config), else the config's directory.
fn output_dir(args: &BuildArgs, base_dir: &Path, dictionary: &StyleDictionary, platform: &str) -> PathBuf {
    if let Some(dir) = &args.out_dir {
        return dir.clone();
    }
    match dictionary.platform(platform).and_then(|p| p.build_path()) {
        Some(build_path) => base_dir.join(build_path),
        None => base_dir.to_path_buf(),
    }
}

fn write_platform(dir: &Path, platform: &str, outcome: &ExportOutcome) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(format!("{platform}.json"));
    let text = serde_json::to_string_pretty(&outcome.dictionary.to_value())?;
    fs::write(&path, text + "\n").with_context(|| format!("Failed to write {}", path.display()))?;
    info!(platform, passes = outcome.passes, path = %path.display(), "wrote platform");
    Ok(())
}

fn report(diagnostics: &[DiagnosticMessage]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic.to_text());
        if let Some(url) = diagnostic.docs_url() {
            eprintln!("See {url} for more information");
        }
    }
}

fn report_failure(platform: &str, err: &ExportError) {
    match err {
        ExportError::UnresolvedReferences { warnings } => {
            eprintln!("Platform '{platform}' has unresolved property references:");
            report(warnings);
        }
        ExportError::InvalidPlatform { .. } => eprintln!("{err}"),
    }
}
