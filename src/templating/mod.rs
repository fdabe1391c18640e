//! LaTeX report templating.
//!
//! Turns a request's field map into a compilable document:
//!
//! ```text
//! FieldMap ──► FieldMapping ──► escape_value ──► substitute_placeholder ──► MaterializedDocument
//!                                                        ▲
//!                                    TemplateStore::load ┘
//! ```
//!
//! # Template Format
//!
//! The template is ordinary LaTeX. A placeholder is declared with a
//! single-line `\newcommand` whose body is the default text, and used anywhere
//! as a control word:
//!
//! ```latex
//! \newcommand{\prospectname}{Company Name}
//! ...
//! Prepared for \prospectname.
//! ```
//!
//! Substituting `{"company": "Acme"}` rewrites both sites:
//!
//! ```latex
//! \newcommand{\prospectname}{Acme}
//! ...
//! Prepared for Acme.
//! ```
//!
//! This is not a general template engine. It locates exactly these two
//! patterns and does not parse or validate the surrounding markup.
//!
//! # Modules
//!
//! - [`escape`] - LaTeX escaping of field values
//! - [`placeholders`] - Field name → placeholder identifier mapping
//! - [`store`] - Read-only template loading
//! - [`substitute`] - Declaration and invocation rewriting

pub mod escape;
pub mod placeholders;
pub mod store;
pub mod substitute;

pub use escape::{escape_latex, escape_value, value_to_text};
pub use placeholders::{FieldMapping, PlaceholderTable};
pub use store::{TemplateDocument, TemplateStore};
pub use substitute::{FieldMap, MaterializedDocument, Substitutor, substitute_placeholder};
