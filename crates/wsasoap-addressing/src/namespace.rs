pub const WS_ADDRESSING_NAMESPACE_URI: &str = "http://www.w3.org/2005/08/addressing";
pub const WS_ADDRESSING_NAMESPACE_ALIAS: &str = "wsa";

pub const SOAP11_ENVELOPE_NAMESPACE_URI: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const SOAP12_ENVELOPE_NAMESPACE_URI: &str = "http://www.w3.org/2003/05/soap-envelope";
pub const SOAP_ENVELOPE_NAMESPACE_ALIAS: &str = "soap";

/// Address used for ReplyTo when the caller gives none.
pub const ANONYMOUS_ROLE_URI: &str =
    "http://schemas.xmlsoap.org/ws/2004/08/addressing/role/anonymous";

pub mod tag_name {
    pub const ENVELOPE: &str = "Envelope";
    pub const HEADER: &str = "Header";

    pub const ACTION: &str = "Action";
    pub const TO: &str = "To";
    pub const MESSAGE_ID: &str = "MessageID";
    pub const REPLY_TO: &str = "ReplyTo";
    pub const ADDRESS: &str = "Address";
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Namespace {
    WsAddressing,
    SoapEnvelope11,
    SoapEnvelope12,
}

impl Namespace {
    pub fn as_tuple(&self) -> (&'static str, &'static str) {
        match self {
            Self::WsAddressing => (WS_ADDRESSING_NAMESPACE_URI, WS_ADDRESSING_NAMESPACE_ALIAS),
            Self::SoapEnvelope11 => (SOAP11_ENVELOPE_NAMESPACE_URI, SOAP_ENVELOPE_NAMESPACE_ALIAS),
            Self::SoapEnvelope12 => (SOAP12_ENVELOPE_NAMESPACE_URI, SOAP_ENVELOPE_NAMESPACE_ALIAS),
        }
    }

    pub fn url(&self) -> &'static str {
        self.as_tuple().0
    }

    pub fn alias(&self) -> &'static str {
        self.as_tuple().1
    }
}
