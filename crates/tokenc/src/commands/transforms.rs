/*
 * transforms.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `tokenc transforms`: list what a config file may name.

use anyhow::Result;
use tokenc_core::TransformRegistry;

/// Execute the transforms command
pub fn execute() -> Result<()> {
    let registry = TransformRegistry::with_builtins();

    println!("Transforms:");
    for transform in registry.transforms() {
        println!("  {:<20} {}", transform.transform_name(), transform.kind());
    }

    println!();
    println!("Transform groups:");
    for (name, members) in registry.groups() {
        println!("  {:<20} {}", name, members.join(", "));
    }
    Ok(())
}
