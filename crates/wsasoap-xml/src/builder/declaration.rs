use std::fmt;

/// The `<?xml ...?>` line written before the root element.
///
/// ```
/// use wsasoap_xml::builder::Declaration;
///
/// let declaration = Declaration::new("1.0", "UTF-8").with_standalone(true);
/// assert_eq!(
///     declaration.to_string(),
///     r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    version: String,
    encoding: String,
    standalone: Option<bool>,
}

impl Default for Declaration {
    /// XML 1.0 in UTF-8, which is what the serializer emits.
    fn default() -> Self {
        Self::new("1.0", "UTF-8")
    }
}

impl Declaration {
    pub fn new(version: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            encoding: encoding.into(),
            standalone: None,
        }
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = Some(standalone);
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"<?xml version="{}" encoding="{}""#, self.version, self.encoding)?;
        match self.standalone {
            Some(true) => f.write_str(r#" standalone="yes""#)?,
            Some(false) => f.write_str(r#" standalone="no""#)?,
            None => {}
        }
        f.write_str("?>")
    }
}
