pub use roxmltree::{Error, NodeType};
use tracing::trace;

use crate::XmlError;
use crate::builder::{
    Attribute, Declaration, Document, Element, Node, XML_NAMESPACE_ALIAS, XML_NAMESPACE_URI,
};

impl TryFrom<roxmltree::Node<'_, '_>> for Element {
    type Error = XmlError;

    fn try_from(value: roxmltree::Node<'_, '_>) -> Result<Self, Self::Error> {
        if !value.is_element() {
            return Err(XmlError::InvalidNodeType {
                expected: NodeType::Element,
                found: value.node_type(),
            });
        }

        let tag_name = value.tag_name();
        let namespace = tag_name.namespace();

        let mut element = Element::new(tag_name.name())
            .set_namespace_optional(namespace)
            .set_alias_optional(namespace.and_then(|ns| value.lookup_prefix(ns)));

        // roxmltree reports every namespace in scope; keep only the ones this
        // element introduces.
        let inherited: Vec<(Option<&str>, &str)> = value
            .parent_element()
            .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
            .unwrap_or_default();

        for ns in value.namespaces() {
            if ns.name() == Some(XML_NAMESPACE_ALIAS) || inherited.contains(&(ns.name(), ns.uri())) {
                continue;
            }
            element = element.add_namespace_declaration(ns.uri(), ns.name());
        }

        for attribute in value.attributes() {
            let attribute_ns = attribute.namespace();
            // Attributes can only be qualified through a prefix, never the
            // default namespace.
            let alias = attribute_ns.and_then(|ns| {
                value
                    .namespaces()
                    .find(|binding| binding.uri() == ns && binding.name().is_some())
                    .and_then(|binding| binding.name())
                    .or_else(|| (ns == XML_NAMESPACE_URI).then_some(XML_NAMESPACE_ALIAS))
            });
            element = element.add_attribute(
                Attribute::new(attribute.name(), attribute.value())
                    .set_namespace_optional(attribute_ns)
                    .set_alias_optional(alias),
            );
        }

        for child in value.children() {
            let node = match child.node_type() {
                NodeType::Element => Node::Element(Element::try_from(child)?),
                NodeType::Text => Node::Text(child.text().unwrap_or_default().to_owned()),
                NodeType::Comment => Node::Comment(child.text().unwrap_or_default().to_owned()),
                other => {
                    trace!(node_type = ?other, "skipping node");
                    continue;
                }
            };
            element = element.add_child(node);
        }

        Ok(element)
    }
}

/// Parses `xml` into an owned [`Document`].
///
/// DTDs are rejected, so entity declarations never get expanded.
pub fn parse(xml: &str) -> Result<Document, XmlError> {
    let parsed = roxmltree::Document::parse(xml)?;
    let root = Element::try_from(parsed.root_element())?;
    Ok(Document::new(Some(Declaration::default()), root))
}
