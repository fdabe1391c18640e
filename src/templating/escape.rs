//! LaTeX escaping of field values.
//!
//! Six characters are special inside a LaTeX text argument and are escaped:
//! `&`, `%`, `$`, `_`, `#` get a leading backslash and `^` becomes `\^{}`
//! (the empty group stops it from swallowing the next character as an
//! accent argument). Everything else, backslashes and braces included, passes
//! through untouched.
//!
//! The escape is a single left-to-right pass, so backslashes it inserts are
//! never re-examined. That gives the same result as escaping `&` first and
//! the rest afterwards, without depending on replacement order.

use serde_json::Value;
use std::borrow::Cow;

/// Escapes the LaTeX special characters of `raw`.
///
/// Total and deterministic: never fails, and equal inputs give equal outputs.
///
/// # Examples
///
/// ```
/// use texreport::templating::escape_latex;
///
/// assert_eq!(escape_latex("A & B_Co"), r"A \& B\_Co");
/// assert_eq!(escape_latex("x^2"), r"x\^{}2");
/// ```
#[must_use]
pub fn escape_latex(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + raw.len() / 8);
    for ch in raw.chars() {
        match ch {
            '&' | '%' | '$' | '_' | '#' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '^' => escaped.push_str("\\^{}"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Renders a JSON field value as plain text.
///
/// Strings are taken verbatim, numbers and booleans in their JSON spelling,
/// `null` as the empty string, and arrays or objects as compact JSON.
#[must_use]
pub fn value_to_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Value::Number(n) => Cow::Owned(n.to_string()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Converts a field value to text and escapes it.
#[must_use]
pub fn escape_value(value: &Value) -> String {
    escape_latex(&value_to_text(value))
}
