/*
 * transforms/attribute.rs
 * Copyright (c) 2025 Posit, PBC
 */

use serde_json::{Map, Value};

use crate::transform::Transform;

/// Category/Type/Item attribute names, in path order.
const CTI_NAMES: [&str; 5] = ["category", "type", "item", "subitem", "state"];

/// `attribute/cti`: derive `category`, `type`, `item`, `subitem` and `state`
/// from the first five path segments. Attributes the token already has win.
pub fn cti() -> Transform {
    Transform::attribute("attribute/cti", |token, _| {
        let mut attributes: Map<String, Value> = CTI_NAMES
            .iter()
            .zip(&token.path)
            .map(|(name, segment)| (name.to_string(), Value::String(segment.clone())))
            .collect();
        for (key, value) in &token.attributes {
            attributes.insert(key.clone(), value.clone());
        }
        attributes
    })
}
