//! WS-Addressing headers for outgoing SOAP envelopes.
//!
//! [`WsaHeaderBuilder`] edits a parsed envelope in place, adding `Action`,
//! `To`, `MessageID` and `ReplyTo` to its SOAP `Header`. [`WsaInterceptor`]
//! applies the same steps to every request sent through an
//! [`Intercepted`] transport.

pub mod builder;
pub mod error;
pub mod message_id;
pub mod namespace;
pub mod options;
pub mod soap;
pub mod transport;

pub use builder::WsaHeaderBuilder;
pub use error::WsaError;
pub use options::WsaOptions;
pub use soap::SoapVersion;
pub use transport::{
    Intercepted, OutboundRequest, RequestInterceptor, SoapTransport, WsaInterceptor,
    interceptor_fn, transport_fn,
};
