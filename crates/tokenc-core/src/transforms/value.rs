/*
 * transforms/value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Value transforms, each matched on the token's `category` attribute.
//!
//! Numeric transforms read the leading number of the value (`"16"`, `16`,
//! `"16px"` all read as 16). A value with no leading number is left as it is
//! and a warning is logged.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::category;
use crate::dictionary::Token;
use crate::transform::Transform;

/// Root font size used by `size/pxToRem` when `basePxFontSize` is not set.
pub const DEFAULT_BASE_PX_FONT_SIZE: f64 = 16.0;

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").expect("number pattern is valid")
});

/// The leading number of a token value.
fn leading_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => LEADING_NUMBER.find(s)?.as_str().trim().parse().ok(),
        _ => None,
    }
}

/// Apply `f` to the token's number, or keep the value and log why.
fn map_number(token: &Token, transform: &str, f: impl FnOnce(f64) -> String) -> Value {
    match leading_number(&token.value) {
        Some(n) => Value::String(f(n)),
        None => {
            tracing::warn!(
                token = %token.path_name(),
                transform,
                value = %token.value,
                "value is not a number; leaving it unchanged"
            );
            token.value.clone()
        }
    }
}

fn in_category(name: &'static str) -> impl Fn(&Token) -> bool + Send + Sync + 'static {
    move |token| category(token) == Some(name)
}

/// `size/px`: `16` becomes `"16px"`.
pub fn size_px() -> Transform {
    Transform::value("size/px", |token, _| map_number(token, "size/px", |n| format!("{n}px")))
        .with_matcher(in_category("size"))
}

/// `size/rem`: `1.5` becomes `"1.5rem"`.
pub fn size_rem() -> Transform {
    Transform::value("size/rem", |token, _| map_number(token, "size/rem", |n| format!("{n}rem")))
        .with_matcher(in_category("size"))
}

/// `size/pxToRem`: `24` becomes `"1.5rem"`, scaled by the `basePxFontSize` option.
pub fn size_px_to_rem() -> Transform {
    Transform::value("size/pxToRem", |token, options| {
        let base = options
            .option("basePxFontSize")
            .and_then(leading_number)
            .filter(|base| *base != 0.0)
            .unwrap_or(DEFAULT_BASE_PX_FONT_SIZE);
        map_number(token, "size/pxToRem", |n| format!("{}rem", n / base))
    })
    .with_matcher(in_category("size"))
}

/// `time/seconds`: milliseconds to seconds with two decimals, `250` becomes `"0.25s"`.
pub fn time_seconds() -> Transform {
    Transform::value("time/seconds", |token, _| {
        map_number(token, "time/seconds", |n| format!("{:.2}s", n / 1000.0))
    })
    .with_matcher(in_category("time"))
}

/// `content/quote`: wrap the value in single quotes.
pub fn content_quote() -> Transform {
    Transform::value("content/quote", |token, _| {
        let text = match &token.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Value::String(format!("'{text}'"))
    })
    .with_matcher(in_category("content"))
}
