/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Platform export pipeline for design-token dictionaries.
//!
//! A dictionary is a tree of namespaces and tokens. Exporting it for a platform
//! merges `@apply` mixins, hands `@group` metadata to group transforms, then
//! alternates transform and reference-resolution passes until every token has
//! a literal value that went through the platform's value transforms.
//!
//! ```
//! use serde_json::json;
//! use tokenc_core::{Dictionary, PlatformConfig, StyleDictionary};
//!
//! let tokens = Dictionary::try_from(json!({
//!     "color": {
//!         "brand": { "value": "#ff0000" },
//!         "link": { "value": "{color.brand}" }
//!     }
//! }))
//! .unwrap();
//!
//! let sd = StyleDictionary::new(tokens).with_platform(PlatformConfig::new("web"));
//! let out = sd.export_platform("web").unwrap();
//! assert_eq!(out.token_at(&["color", "link"]).unwrap().value, json!("#ff0000"));
//! ```

pub mod context;
pub mod decorators;
pub mod dictionary;
pub mod error;
pub mod export;
pub mod group_meta;
pub mod loader;
pub mod platform;
pub mod reference;
pub mod transform;
pub mod transforms;

pub use context::{DiagnosticCollector, TransformationContext, WarningGroup};
pub use decorators::apply_decorators;
pub use dictionary::{Dictionary, Namespace, Node, Token};
pub use error::{ConfigError, ExportError, LoadError, Result};
pub use export::{ExportOptions, ExportOutcome, StyleDictionary, export_pipeline};
pub use group_meta::{GroupMeta, propagate_group_meta};
pub use loader::{LoadedSources, load_sources};
pub use platform::{Config, PlatformConfig, PlatformSpec, TransformRegistry};
pub use reference::{resolve_references, uses_reference};
pub use transform::{
    Transform, TransformKind, TransformOptions, TransformScope, transform_dictionary,
    transform_token,
};
