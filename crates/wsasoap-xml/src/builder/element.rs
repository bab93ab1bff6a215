use std::borrow::Cow;

use crate::builder::{
    Attribute, Namespace, NamespaceScope, NamespaceWrite, XmlBuilderError, escape_text,
};

/// A child node of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data, stored unescaped.
    Text(String),
    Comment(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl<'a> NamespaceWrite<'a> for Node {
    fn ns_write<W: std::io::Write>(
        &'a self,
        w: &mut W,
        scope: &mut NamespaceScope<'a>,
    ) -> Result<(), XmlBuilderError> {
        match self {
            Self::Element(element) => element.ns_write(w, scope),
            Self::Text(text) => {
                w.write_all(escape_text(text).as_bytes())?;
                Ok(())
            }
            Self::Comment(comment) => {
                write!(w, "<!--{comment}-->")?;
                Ok(())
            }
        }
    }
}

/// Represents an XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// The local name of the element.
    name: String,
    /// The namespace URI of the element.
    namespace: Option<String>,
    /// The prefix the element is written with.
    alias: Option<String>,
    /// Namespace declarations made on this element.
    namespace_declarations: Vec<Namespace>,
    /// The attributes of the element.
    attributes: Vec<Attribute>,
    /// Child nodes in document order.
    children: Vec<Node>,
}

impl Element {
    /// Creates a new instance of `Element` with the given name.
    ///
    /// # Example
    ///
    /// ```
    /// use wsasoap_xml::builder::Element;
    /// let element = Element::new("root");
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            alias: None,
            namespace_declarations: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Puts the element in `namespace` and returns a modified `Element`.
    ///
    /// The namespace has to be bound, on this element or an ancestor, to the
    /// alias set with [`Element::set_alias`] (or to the default namespace when
    /// there is no alias) by the time the tree is written.
    ///
    /// # Example
    ///
    /// ```
    /// use wsasoap_xml::builder::Element;
    /// let element = Element::new("root")
    ///     .set_namespace("http://example.com")
    ///     .set_alias("ex")
    ///     .add_namespace_declaration("http://example.com", Some("ex"));
    /// ```
    pub fn set_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn set_namespace_optional(mut self, namespace: Option<impl Into<String>>) -> Self {
        self.namespace = namespace.map(Into::into);
        self
    }

    pub fn set_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn set_alias_optional(mut self, alias: Option<impl Into<String>>) -> Self {
        self.alias = alias.map(Into::into);
        self
    }

    pub fn add_namespace_declaration(mut self, url: impl Into<String>, alias: Option<&str>) -> Self {
        self.declare_namespace(url, alias);
        self
    }

    /// Adds an attribute to the element and returns a modified `Element`.
    ///
    /// # Example
    ///
    /// ```
    /// use wsasoap_xml::builder::{Attribute, Element};
    /// let element = Element::new("root")
    ///     .add_attribute(Attribute::new("attr1", "value1"));
    /// ```
    pub fn add_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Adds a child node to the element and returns a modified `Element`.
    ///
    /// # Example
    ///
    /// ```
    /// use wsasoap_xml::builder::Element;
    /// let child = Element::new("child");
    /// let element = Element::new("root")
    ///     .add_child(child);
    /// ```
    pub fn add_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Replaces the content of the element with a single text node.
    ///
    /// # Example
    ///
    /// ```
    /// use wsasoap_xml::builder::Element;
    /// let element = Element::new("root")
    ///    .set_text("This is some text content.");
    /// ```
    pub fn set_text(mut self, text: impl Into<String>) -> Self {
        self.with_text(text);
        self
    }

    pub fn with_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.children = vec![Node::Text(text.into())];
        self
    }

    /// Appends `child` after the existing children and returns its position.
    pub fn append_child(&mut self, child: impl Into<Node>) -> usize {
        self.children.push(child.into());
        self.children.len() - 1
    }

    /// Inserts `child` at `index`, or appends it when `index` is past the end.
    pub fn insert_child(&mut self, index: usize, child: impl Into<Node>) -> usize {
        let index = index.min(self.children.len());
        self.children.insert(index, child.into());
        index
    }

    /// Declares `alias` (or the default namespace) as `url` on this element.
    ///
    /// An existing declaration of the same alias is replaced and returned.
    pub fn declare_namespace(&mut self, url: impl Into<String>, alias: Option<&str>) -> Option<Namespace> {
        let declaration = Namespace::new(url, alias);

        match self
            .namespace_declarations
            .iter_mut()
            .find(|existing| existing.alias == declaration.alias)
        {
            Some(existing) => Some(std::mem::replace(existing, declaration)),
            None => {
                self.namespace_declarations.push(declaration);
                None
            }
        }
    }

    /// Sets an attribute, replacing one with the same namespace and name.
    pub fn set_attribute(&mut self, attribute: Attribute) -> Option<Attribute> {
        match self
            .attributes
            .iter_mut()
            .find(|existing| existing.is(attribute.namespace(), attribute.name()))
        {
            Some(existing) => Some(std::mem::replace(existing, attribute)),
            None => {
                self.attributes.push(attribute);
                None
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn qualified_name(&self) -> Cow<'_, str> {
        match &self.alias {
            Some(alias) => Cow::Owned(format!("{alias}:{}", self.name)),
            None => Cow::Borrowed(&self.name),
        }
    }

    /// Returns `true` when this element has the given namespace and local name.
    pub fn is(&self, namespace: Option<&str>, name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.name == name
    }

    pub fn namespace_declarations(&self) -> &[Namespace] {
        &self.namespace_declarations
    }

    /// The declaration this element makes for `alias`, if any.
    pub fn declared_namespace(&self, alias: Option<&str>) -> Option<&Namespace> {
        self.namespace_declarations
            .iter()
            .find(|ns| ns.alias.as_deref() == alias)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, namespace: Option<&str>, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.is(namespace, name))
            .map(Attribute::value)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_element_at(&self, index: usize) -> Option<&Element> {
        self.children.get(index).and_then(Node::as_element)
    }

    pub fn child_element_at_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.children.get_mut(index).and_then(Node::as_element_mut)
    }

    /// Position among all child nodes of the first child element matching
    /// `namespace` and `name`.
    pub fn find_child_position(&self, namespace: Option<&str>, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| node.as_element().is_some_and(|e| e.is(namespace, name)))
    }

    pub fn find_child(&self, namespace: Option<&str>, name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.is(namespace, name))
    }

    /// All descendant elements (excluding `self`) matching `namespace` and
    /// `name`, in document order.
    pub fn descendants_named(&self, namespace: Option<&str>, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_named(namespace, name, &mut found);
        found
    }

    fn collect_named<'s>(&'s self, namespace: Option<&str>, name: &str, found: &mut Vec<&'s Element>) {
        for child in self.child_elements() {
            if child.is(namespace, name) {
                found.push(child);
            }
            child.collect_named(namespace, name, found);
        }
    }

    /// Concatenated text of the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn check_bound(&self, scope: &NamespaceScope<'_>) -> Result<bool, XmlBuilderError> {
        match (&self.namespace, &self.alias) {
            (Some(ns), alias) => {
                if scope.resolve(alias.as_deref()) == Some(ns.as_str()) {
                    Ok(false)
                } else {
                    Err(XmlBuilderError::NamespaceNotDeclared {
                        tag: self.qualified_name().into_owned(),
                        ns: ns.clone(),
                    })
                }
            }
            (None, Some(alias)) => Err(XmlBuilderError::UnboundAlias {
                tag: self.qualified_name().into_owned(),
                alias: alias.clone(),
            }),
            // An unqualified element inside a default namespace has to reset it.
            (None, None) => Ok(scope.resolve(None).is_some_and(|url| !url.is_empty())),
        }
    }
}

impl<'a> NamespaceWrite<'a> for Element {
    fn ns_write<W: std::io::Write>(
        &'a self,
        w: &mut W,
        scope: &mut NamespaceScope<'a>,
    ) -> Result<(), XmlBuilderError> {
        let mark = scope.len();
        for ns in &self.namespace_declarations {
            scope.push(ns.alias.as_deref(), &ns.url);
        }

        let reset_default = self.check_bound(scope)?;
        let name = self.qualified_name();

        write!(w, "<{name}")?;
        for ns in &self.namespace_declarations {
            write!(w, " {ns}")?;
        }
        if reset_default {
            write!(w, " xmlns=\"\"")?;
            scope.push(None, "");
        }

        for attribute in &self.attributes {
            attribute.ns_write(w, scope)?;
        }

        if self.children.is_empty() {
            write!(w, "/>")?;
        } else {
            write!(w, ">")?;
            for child in &self.children {
                child.ns_write(w, scope)?;
            }
            write!(w, "</{name}>")?;
        }

        scope.truncate(mark);
        Ok(())
    }
}
