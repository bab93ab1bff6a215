use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::builder::{Declaration, Element, NamespaceScope, NamespaceWrite, XmlBuilderError};

/// An XML document: an optional declaration followed by a single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    declaration: Option<Declaration>,
    root: Element,
}

impl Document {
    pub fn new(declaration: Option<Declaration>, root: Element) -> Self {
        Self { declaration, root }
    }

    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn write_to<W: Write>(&self, mut w: W) -> Result<(), XmlBuilderError> {
        if let Some(decl) = &self.declaration {
            writeln!(w, "{decl}")?;
        }
        self.root.ns_write(&mut w, &mut NamespaceScope::new())
    }

    pub fn to_xml_string(&self) -> Result<String, XmlBuilderError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Writes the document to `path`, creating or truncating the file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), XmlBuilderError> {
        let path = path.as_ref();
        let mut w = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.write_to(&mut w)?;
        w.flush()?;
        debug!(path = %path.display(), "document saved");
        Ok(())
    }
}
