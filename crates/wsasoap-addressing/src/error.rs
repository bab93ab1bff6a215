use wsasoap_xml::XmlError;

#[derive(Debug, thiserror::Error)]
pub enum WsaError {
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    #[error("Document root is not a SOAP Envelope: found '{found}'")]
    MissingEnvelope { found: String },

    #[error("SOAP envelope '{tag}' has no namespace")]
    UnresolvedNamespace { tag: String },

    #[error("SOAP header is missing from its cached position {index}")]
    HeaderNotFound { index: usize },

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl WsaError {
    pub fn transport(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(error.into())
    }
}

impl From<wsasoap_xml::builder::XmlBuilderError> for WsaError {
    fn from(error: wsasoap_xml::builder::XmlBuilderError) -> Self {
        Self::Xml(error.into())
    }
}
