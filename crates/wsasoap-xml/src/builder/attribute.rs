use crate::builder::{NamespaceScope, NamespaceWrite, XmlBuilderError, escape_attribute};

/// Represents an XML attribute with a name and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The local name of the attribute.
    name: String,
    /// The value of the attribute, unescaped.
    value: String,

    namespace: Option<String>,
    alias: Option<String>,
}

impl Attribute {
    /// Creates a new instance of `Attribute`.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the attribute.
    /// * `value` - The value of the attribute.
    ///
    /// # Example
    ///
    /// ```
    /// use wsasoap_xml::builder::Attribute;
    /// let attribute = Attribute::new("name", "value");
    /// ```
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            namespace: None,
            alias: None,
        }
    }

    /// Creates an attribute in `namespace`, written with `alias` as its prefix.
    pub fn new_with_namespace(
        name: impl Into<String>,
        value: impl Into<String>,
        namespace: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            namespace: Some(namespace.into()),
            alias: Some(alias.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub(crate) fn set_alias_optional(mut self, alias: Option<&str>) -> Self {
        self.alias = alias.map(str::to_owned);
        self
    }

    pub(crate) fn set_namespace_optional(mut self, namespace: Option<&str>) -> Self {
        self.namespace = namespace.map(str::to_owned);
        self
    }

    /// Returns `true` when this attribute has the given namespace and local name.
    pub fn is(&self, namespace: Option<&str>, name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.name == name
    }

    pub fn qualified_name(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{alias}:{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl<'a> NamespaceWrite<'a> for Attribute {
    fn ns_write<W: std::io::Write>(
        &'a self,
        w: &mut W,
        scope: &mut NamespaceScope<'a>,
    ) -> Result<(), XmlBuilderError> {
        if let Some(ns) = &self.namespace {
            // Unprefixed attributes never pick up the default namespace.
            let bound = self
                .alias
                .as_deref()
                .and_then(|alias| scope.resolve(Some(alias)));

            if bound != Some(ns.as_str()) {
                return Err(XmlBuilderError::NamespaceNotDeclared {
                    tag: self.qualified_name(),
                    ns: ns.clone(),
                });
            }
        }

        write!(
            w,
            " {}=\"{}\"",
            self.qualified_name(),
            escape_attribute(&self.value)
        )?;
        Ok(())
    }
}
