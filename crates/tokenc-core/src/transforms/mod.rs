/*
 * transforms/mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Built-in transforms and transform groups.
//!
//! | name                  | kind      | applies to            |
//! |-----------------------|-----------|-----------------------|
//! | `attribute/cti`       | attribute | every token           |
//! | `name/cti/kebab`      | name      | every token           |
//! | `name/cti/camel`      | name      | every token           |
//! | `name/cti/pascal`     | name      | every token           |
//! | `name/cti/snake`      | name      | every token           |
//! | `name/cti/constant`   | name      | every token           |
//! | `size/px`             | value     | `category: size`      |
//! | `size/rem`            | value     | `category: size`      |
//! | `size/pxToRem`        | value     | `category: size`      |
//! | `time/seconds`        | value     | `category: time`      |
//! | `content/quote`       | value     | `category: content`   |
//! | `group/attributes`    | group     | every token           |

mod attribute;
mod group;
mod name;
mod value;

pub use name::split_words;

use crate::dictionary::Token;
use crate::platform::TransformRegistry;

/// Transforms of the built-in `css` group.
pub const CSS_GROUP: &[&str] = &[
    "group/attributes",
    "attribute/cti",
    "name/cti/kebab",
    "time/seconds",
    "content/quote",
    "size/rem",
];

/// Transforms of the built-in `scss` group.
pub const SCSS_GROUP: &[&str] = CSS_GROUP;

/// Transforms of the built-in `js` group.
pub const JS_GROUP: &[&str] = &[
    "group/attributes",
    "attribute/cti",
    "name/cti/pascal",
    "size/rem",
];

/// Add every built-in transform and group to `registry`.
pub fn register_builtins(registry: &mut TransformRegistry) {
    registry.register(attribute::cti());

    registry.register(name::kebab());
    registry.register(name::camel());
    registry.register(name::pascal());
    registry.register(name::snake());
    registry.register(name::constant());

    registry.register(value::size_px());
    registry.register(value::size_rem());
    registry.register(value::size_px_to_rem());
    registry.register(value::time_seconds());
    registry.register(value::content_quote());

    registry.register(group::attributes());

    registry.register_group("css", CSS_GROUP.iter().copied());
    registry.register_group("scss", SCSS_GROUP.iter().copied());
    registry.register_group("js", JS_GROUP.iter().copied());
}

/// The token's `category` attribute, if set.
pub(crate) fn category(token: &Token) -> Option<&str> {
    token.attributes.get("category").and_then(|c| c.as_str())
}
