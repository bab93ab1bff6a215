//! Owned XML element tree with namespace-checked serialization.
//!
//! Elements carry their own prefix and namespace declarations, so a tree read
//! from text can be edited in place and written back without reshuffling
//! prefixes. Writing fails if an element or attribute prefix is not bound to
//! its namespace at that point in the tree.
mod attribute;
mod declaration;
mod document;
mod element;
mod namespace;

use std::borrow::Cow;

pub use self::attribute::*;
pub use self::declaration::*;
pub use self::document::*;
pub use self::element::*;
pub use self::namespace::*;

#[derive(Debug, thiserror::Error)]
pub enum XmlBuilderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("Namespace '{ns}' not declared for tag '{tag}'")]
    NamespaceNotDeclared { tag: String, ns: String },
    #[error("Alias '{alias}' used by '{tag}' has no namespace")]
    UnboundAlias { tag: String, alias: String },
}

pub trait NamespaceWrite<'a> {
    fn ns_write<W: std::io::Write>(
        &'a self,
        w: &mut W,
        scope: &mut NamespaceScope<'a>,
    ) -> Result<(), XmlBuilderError>;
}

pub(crate) fn escape_text(text: &str) -> Cow<'_, str> {
    escape(text, false)
}

pub(crate) fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape(value, true)
}

/// Parsers normalize a literal `\r` everywhere, and literal `\n`/`\t` inside
/// attribute values, so those go out as character references.
fn escape(raw: &str, attribute: bool) -> Cow<'_, str> {
    let needs_escape = |c: char| {
        matches!(c, '&' | '<' | '>' | '\r') || (attribute && matches!(c, '"' | '\n' | '\t'))
    };
    if !raw.contains(needs_escape) {
        return Cow::Borrowed(raw);
    }

    let mut escaped = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\r' => escaped.push_str("&#13;"),
            '"' if attribute => escaped.push_str("&quot;"),
            '\n' if attribute => escaped.push_str("&#10;"),
            '\t' if attribute => escaped.push_str("&#9;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
