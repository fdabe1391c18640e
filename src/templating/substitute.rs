//! Placeholder substitution.
//!
//! A placeholder has two kinds of sites in a template:
//!
//! - its **declaration**, `\newcommand{\NAME}{BODY}`, whose body is replaced
//!   by the value while the surrounding declaration syntax is kept;
//! - its **invocations**, every other `\NAME` in the document, which are
//!   replaced by the value literally.
//!
//! All placeholders of a request are rewritten in a single left-to-right scan,
//! so text inserted for one field is never matched again for another. Other
//! definition forms (`\renewcommand`, `\providecommand`, starred or with an
//! argument count) keep their head untouched. Text that is neither kind of
//! site is copied through byte for byte.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::escape::escape_value;
use super::placeholders::FieldMapping;
use super::store::TemplateDocument;

/// Inbound request fields: external name → raw JSON value.
///
/// Iteration is in key order, which keeps substitution deterministic.
pub type FieldMap = Map<String, Value>;

/// `\newcommand{\NAME}{BODY}` at the start of the haystack; group 1 is the
/// name, group 2 the body, which may span lines.
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\\newcommand\{\\([A-Za-z]+)\}\{(.*?)\}")
        .expect("declaration pattern is a valid regex")
});

/// Head of any other command definition, up to and including the defined name.
static DEFINITION_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\\(?:newcommand|renewcommand|providecommand)\*?\{\\[A-Za-z]+\}")
        .expect("definition head pattern is a valid regex")
});

const DEFINING_COMMANDS: [&str; 3] = ["newcommand", "renewcommand", "providecommand"];

/// A template with all field values substituted, ready for compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedDocument {
    text: String,
}

impl MaterializedDocument {
    /// The materialized markup.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the document, returning its markup.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

/// Applies a request's fields to a template.
#[derive(Debug, Clone, Default)]
pub struct Substitutor {
    mapping: FieldMapping,
}

impl Substitutor {
    /// Creates a substitutor using `mapping` to pick placeholders.
    #[must_use]
    pub const fn new(mapping: FieldMapping) -> Self {
        Self {
            mapping,
        }
    }

    /// Produces the materialized document for `fields`.
    ///
    /// Unmapped fields and placeholders absent from the template are no-ops.
    #[must_use]
    pub fn materialize(&self, template: &TemplateDocument, fields: &FieldMap) -> MaterializedDocument {
        let mut values = BTreeMap::new();

        for (field, value) in fields {
            let Some(placeholder) = self.mapping.resolve(field) else {
                tracing::trace!(target: "templating", "Ignoring unmapped field '{}'", field);
                continue;
            };
            values.insert(placeholder, escape_value(value));
        }

        MaterializedDocument {
            text: rewrite(template.as_str(), &values),
        }
    }
}

/// Replaces the declaration body and every invocation of `placeholder` in
/// `document` with `value`.
///
/// `value` is inserted as-is; escape it first.
///
/// # Examples
///
/// ```
/// use texreport::templating::substitute_placeholder;
///
/// let doc = r"\newcommand{\prospectname}{Company} Dear \prospectname,";
/// assert_eq!(
///     substitute_placeholder(doc, "prospectname", "Acme"),
///     r"\newcommand{\prospectname}{Acme} Dear Acme,"
/// );
/// ```
#[must_use]
pub fn substitute_placeholder(document: &str, placeholder: &str, value: &str) -> String {
    rewrite(document, &BTreeMap::from([(placeholder, value.to_owned())]))
}

/// Rewrites every site of every placeholder in `values` in one scan.
///
/// A control word only counts when its backslash is not itself escaped
/// (`\\name` is a line break followed by text). Control words are read
/// greedily, so `\emailaddress` is never an invocation of `email`.
fn rewrite(document: &str, values: &BTreeMap<&str, String>) -> String {
    let mut out = String::with_capacity(document.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = document[pos..].find('\\') {
        let start = pos + offset;
        let rest = &document[start..];

        if rest[1..].starts_with('\\') {
            pos = start + 2;
            continue;
        }
        let name_len = rest[1..].bytes().take_while(u8::is_ascii_alphabetic).count();
        if name_len == 0 {
            pos = start + 1;
            continue;
        }
        let name = &rest[1..=name_len];

        if name == "newcommand" {
            if let Some(caps) = DECLARATION.captures(rest) {
                let (Some(whole), Some(declared), Some(body)) = (caps.get(0), caps.get(1), caps.get(2))
                else {
                    pos = start + 1;
                    continue;
                };
                match values.get(declared.as_str()) {
                    Some(value) => {
                        out.push_str(&document[copied..start + body.start()]);
                        out.push_str(value);
                        copied = start + body.end();
                        pos = start + whole.end();
                    }
                    // The body may still invoke other placeholders
                    None => pos = start + body.start(),
                }
                continue;
            }
        }
        if DEFINING_COMMANDS.contains(&name) {
            if let Some(head) = DEFINITION_HEAD.find(rest) {
                pos = start + head.end();
                continue;
            }
        }

        if let Some(value) = values.get(name) {
            out.push_str(&document[copied..start]);
            out.push_str(value);
            copied = start + 1 + name_len;
        }
        pos = start + 1 + name_len;
    }

    out.push_str(&document[copied..]);
    out
}
