//! Best-effort repair of hand-edited package configs
//!
//! Package files are often written by hand on Windows, so the usual
//! breakage is unescaped backslashes in paths, trailing commas and missing
//! commas between objects in the `env` list.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",(\s*[\]}])").unwrap());
static ADJACENT_OBJECTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\}\s*\{").unwrap());

/// Apply the repair rewrites to raw config text.
pub fn repair_text(text: &str) -> String {
    let text = double_single_backslashes(text);
    let text = TRAILING_COMMA.replace_all(&text, "${1}");
    ADJACENT_OBJECTS.replace_all(&text, "}, {").into_owned()
}

/// Double every lone backslash. An existing `\\` escape pair is kept as is.
fn double_single_backslashes(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '\\' {
            out.push('\\');
            chars.next_if_eq(&'\\');
        }
    }
    out
}

/// Parse `text` after repairing it.
pub fn parse_repaired(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str(&repair_text(text))
}
