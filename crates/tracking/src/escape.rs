//! Centralized escaping for values embedded in emitted script markup.
//!
//! Two contexts exist and nothing else: the inside of a double-quoted
//! JavaScript string literal within a `<script>` element, and an HTML
//! attribute value (the script tag's `nonce`). Every user-controlled value
//! passes through one of these before it reaches a template; the templates
//! themselves run with escaping disabled.

use std::fmt::Write;

/// Escape a value for embedding inside a double-quoted JS string literal
/// that itself lives inside a `<script>` element.
///
/// Beyond the usual string-literal escapes, `<`, `>`, and `&` become
/// `\uXXXX` sequences so no input can form `</script>` or an HTML comment
/// open, and U+2028/U+2029 are escaped because they terminate lines in
/// JavaScript source but not in JSON.
#[must_use]
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '<' => out.push_str("\\u003C"),
            '>' => out.push_str("\\u003E"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => {
                // Remaining C0 controls have no short escape.
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Escape a value for a double-quoted HTML attribute.
#[must_use]
pub fn attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}
