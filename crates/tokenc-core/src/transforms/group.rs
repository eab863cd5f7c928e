/*
 * transforms/group.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::transform::Transform;

/// `group/attributes`: copy inherited `@group` metadata into the token's
/// attributes. Keys the token already has are kept.
pub fn attributes() -> Transform {
    Transform::group("group/attributes", |mut token, options| {
        if let Some(meta) = options.group_meta {
            for (key, value) in meta {
                if !token.attributes.contains_key(key) {
                    token.attributes.insert(key.clone(), value.clone());
                }
            }
        }
        token
    })
}
