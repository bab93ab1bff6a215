use core::fmt;

use crate::builder::escape_attribute;

/// URI permanently bound to the `xml` prefix.
pub const XML_NAMESPACE_URI: &str = "http://www.w3.org/XML/1998/namespace";
pub const XML_NAMESPACE_ALIAS: &str = "xml";

/// A namespace declaration carried by an element: `xmlns:alias="url"`, or
/// `xmlns="url"` when `alias` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub url: String,
    pub alias: Option<String>,
}

impl fmt::Display for Namespace {
    /// Formats the declaration as it appears inside a start tag.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "xmlns:{alias}=\"{}\"", escape_attribute(&self.url)),
            None => write!(f, "xmlns=\"{}\"", escape_attribute(&self.url)),
        }
    }
}

impl Namespace {
    /// Creates a new namespace declaration.
    ///
    /// # Example
    ///
    /// ```
    /// use wsasoap_xml::builder::Namespace;
    /// let namespace = Namespace::new("http://example.com", Some("ex"));
    /// assert_eq!(namespace.to_string(), r#"xmlns:ex="http://example.com""#);
    /// ```
    pub fn new(url: impl Into<String>, alias: Option<&str>) -> Self {
        Self {
            url: url.into(),
            alias: alias.map(str::to_owned),
        }
    }
}

/// Prefix bindings in scope while an element tree is being written.
///
/// Declarations are pushed when an element opens and truncated away when it
/// closes, so the innermost binding of a prefix always wins.
#[derive(Debug, Default)]
pub struct NamespaceScope<'a> {
    bindings: Vec<(Option<&'a str>, &'a str)>,
}

impl<'a> NamespaceScope<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn push(&mut self, alias: Option<&'a str>, url: &'a str) {
        self.bindings.push((alias, url));
    }

    pub fn truncate(&mut self, len: usize) {
        self.bindings.truncate(len);
    }

    /// Resolves `alias` (or the default namespace for `None`) to its URI.
    pub fn resolve(&self, alias: Option<&str>) -> Option<&'a str> {
        if alias == Some(XML_NAMESPACE_ALIAS) {
            return Some(XML_NAMESPACE_URI);
        }

        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| *bound == alias)
            .map(|(_, url)| *url)
    }
}
