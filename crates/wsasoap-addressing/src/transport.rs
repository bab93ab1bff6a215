//! Outbound request hooks.
//!
//! A [`SoapTransport`] sends a request and returns the response body. An
//! [`Intercepted`] transport lets a [`RequestInterceptor`] rewrite the request
//! text first; [`WsaInterceptor`] is the interceptor that adds the
//! WS-Addressing headers.

use tracing::{debug, instrument, warn};

use crate::builder::WsaHeaderBuilder;
use crate::error::WsaError;
use crate::options::WsaOptions;
use crate::soap::SoapVersion;

/// A SOAP request on its way to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboundRequest<'a> {
    /// Serialized envelope.
    pub body: &'a str,
    /// Endpoint the request is sent to.
    pub location: &'a str,
    /// SOAP action of the operation.
    pub action: &'a str,
    pub version: SoapVersion,
}

pub trait RequestInterceptor {
    /// Returns the request body to send in place of `request.body`.
    fn intercept(&self, request: &OutboundRequest<'_>) -> Result<String, WsaError>;
}

pub trait SoapTransport {
    /// Sends `request` and returns the response body.
    fn send(&self, request: OutboundRequest<'_>) -> Result<String, WsaError>;
}

impl<T: SoapTransport + ?Sized> SoapTransport for &T {
    fn send(&self, request: OutboundRequest<'_>) -> Result<String, WsaError> {
        (**self).send(request)
    }
}

impl<T: SoapTransport + ?Sized> SoapTransport for Box<T> {
    fn send(&self, request: OutboundRequest<'_>) -> Result<String, WsaError> {
        (**self).send(request)
    }
}

/// Interceptor built from a closure, see [`interceptor_fn`].
#[derive(Debug, Clone, Copy)]
pub struct InterceptorFn<F>(F);

pub fn interceptor_fn<F>(f: F) -> InterceptorFn<F>
where
    F: Fn(&OutboundRequest<'_>) -> Result<String, WsaError>,
{
    InterceptorFn(f)
}

impl<F> RequestInterceptor for InterceptorFn<F>
where
    F: Fn(&OutboundRequest<'_>) -> Result<String, WsaError>,
{
    fn intercept(&self, request: &OutboundRequest<'_>) -> Result<String, WsaError> {
        (self.0)(request)
    }
}

/// Transport built from a closure, see [`transport_fn`].
#[derive(Debug, Clone, Copy)]
pub struct TransportFn<F>(F);

pub fn transport_fn<F>(f: F) -> TransportFn<F>
where
    F: Fn(OutboundRequest<'_>) -> Result<String, WsaError>,
{
    TransportFn(f)
}

impl<F> SoapTransport for TransportFn<F>
where
    F: Fn(OutboundRequest<'_>) -> Result<String, WsaError>,
{
    fn send(&self, request: OutboundRequest<'_>) -> Result<String, WsaError> {
        (self.0)(request)
    }
}

/// Adds Action, To, MessageID and ReplyTo to every request, in that order.
///
/// Action and To come from the request itself; MessageID is generated and
/// ReplyTo uses the configured default address.
#[derive(Debug, Clone, Default)]
pub struct WsaInterceptor {
    options: WsaOptions,
}

impl WsaInterceptor {
    pub fn new(options: WsaOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WsaOptions {
        &self.options
    }
}

impl RequestInterceptor for WsaInterceptor {
    #[instrument(skip_all, fields(location = request.location, action = request.action))]
    fn intercept(&self, request: &OutboundRequest<'_>) -> Result<String, WsaError> {
        let mut document = wsasoap_xml::parser::parse(request.body)?;
        let mut wsa = WsaHeaderBuilder::with_options(&mut document, self.options.clone())?;

        match wsa.soap_version() {
            Some(detected) if detected != request.version => {
                warn!(%detected, expected = %request.version, "envelope namespace does not match SOAP version");
            }
            None => debug!("envelope namespace is not a known SOAP version"),
            Some(_) => {}
        }

        wsa.add_action(request.action)?;
        wsa.add_to(request.location)?;
        let message_id = wsa.add_message_id(None)?;
        wsa.add_reply_to(None)?;

        debug!(%message_id, "WS-Addressing headers added");
        wsa.to_xml_string()
    }
}

/// A transport whose requests pass through an interceptor before being sent.
///
/// Only the body is replaced; location, action and version reach the inner
/// transport unchanged.
#[derive(Debug, Clone)]
pub struct Intercepted<I, T> {
    interceptor: I,
    transport: T,
}

impl<I, T> Intercepted<I, T> {
    pub fn new(interceptor: I, transport: T) -> Self {
        Self {
            interceptor,
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<I, T> SoapTransport for Intercepted<I, T>
where
    I: RequestInterceptor,
    T: SoapTransport,
{
    fn send(&self, request: OutboundRequest<'_>) -> Result<String, WsaError> {
        let body = self.interceptor.intercept(&request)?;
        self.transport.send(OutboundRequest {
            body: &body,
            ..request
        })
    }
}
