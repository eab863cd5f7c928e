/*
 * transforms/name.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Name transforms. Each joins the optional `prefix` option and the token's
//! path into one identifier in a given case.

use crate::dictionary::Token;
use crate::transform::{Transform, TransformOptions};

/// Split `text` into words at separators and case changes.
///
/// `"backgroundColor 2xl"` becomes `["background", "Color", "2xl"]`, and an
/// acronym keeps together: `"XMLHttp"` becomes `["XML", "Http"]`.
pub fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for chunk in text.split(|c: char| !c.is_alphanumeric()) {
        let chars: Vec<char> = chunk.chars().collect();
        let mut start = 0;
        for i in 1..chars.len() {
            let prev = chars[i - 1];
            let cur = chars[i];
            let lower_to_upper = (prev.is_lowercase() || prev.is_ascii_digit()) && cur.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && cur.is_uppercase()
                && chars.get(i + 1).is_some_and(|next| next.is_lowercase());
            if lower_to_upper || acronym_end {
                words.push(chars[start..i].iter().collect());
                start = i;
            }
        }
        if start < chars.len() {
            words.push(chars[start..].iter().collect());
        }
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Prefix option plus path, split into words.
fn name_words(token: &Token, options: &TransformOptions) -> Vec<String> {
    let prefix = options.option("prefix").and_then(|p| p.as_str());
    prefix
        .into_iter()
        .chain(token.path.iter().map(String::as_str))
        .flat_map(split_words)
        .collect()
}

fn joined_lower(token: &Token, options: &TransformOptions, separator: &str) -> String {
    name_words(token, options)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(separator)
}

/// `name/cti/kebab`: `color-background-primary`.
pub fn kebab() -> Transform {
    Transform::name("name/cti/kebab", |token, options| joined_lower(token, options, "-"))
}

/// `name/cti/snake`: `color_background_primary`.
pub fn snake() -> Transform {
    Transform::name("name/cti/snake", |token, options| joined_lower(token, options, "_"))
}

/// `name/cti/constant`: `COLOR_BACKGROUND_PRIMARY`.
pub fn constant() -> Transform {
    Transform::name("name/cti/constant", |token, options| {
        name_words(token, options)
            .iter()
            .map(|w| w.to_uppercase())
            .collect::<Vec<_>>()
            .join("_")
    })
}

/// `name/cti/camel`: `colorBackgroundPrimary`.
pub fn camel() -> Transform {
    Transform::name("name/cti/camel", |token, options| {
        name_words(token, options)
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
            .collect()
    })
}

/// `name/cti/pascal`: `ColorBackgroundPrimary`.
pub fn pascal() -> Transform {
    Transform::name("name/cti/pascal", |token, options| {
        name_words(token, options).iter().map(|w| capitalize(w)).collect()
    })
}
