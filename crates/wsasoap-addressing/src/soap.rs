use std::fmt;

use crate::namespace::Namespace;

/// SOAP protocol version, identified by the Envelope namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoapVersion {
    #[default]
    Soap11,
    Soap12,
}

impl SoapVersion {
    pub fn namespace(&self) -> Namespace {
        match self {
            Self::Soap11 => Namespace::SoapEnvelope11,
            Self::Soap12 => Namespace::SoapEnvelope12,
        }
    }

    pub fn from_namespace(uri: &str) -> Option<Self> {
        [Self::Soap11, Self::Soap12]
            .into_iter()
            .find(|version| version.namespace().url() == uri)
    }
}

impl fmt::Display for SoapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Soap11 => write!(f, "SOAP 1.1"),
            Self::Soap12 => write!(f, "SOAP 1.2"),
        }
    }
}
