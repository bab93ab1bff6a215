use std::cell::Cell;

use tracing::info;
use wsasoap_addressing::{
    Intercepted, OutboundRequest, SoapTransport, SoapVersion, WsaError, WsaInterceptor,
};

/// Stands in for an HTTP client: prints what would go on the wire.
#[derive(Default)]
struct PrintingTransport {
    requests: Cell<usize>,
}

impl SoapTransport for PrintingTransport {
    fn send(&self, request: OutboundRequest<'_>) -> Result<String, WsaError> {
        self.requests.set(self.requests.get() + 1);
        info!(location = request.location, action = request.action, "sending request");
        println!("{}\n", request.body);

        Ok(String::from(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body/></soap:Envelope>"#,
        ))
    }
}

pub fn main() -> Result<(), WsaError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let client = Intercepted::new(WsaInterceptor::default(), PrintingTransport::default());

    let body = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><GetQuote xmlns="urn:example:quotes"><Symbol>ACME</Symbol></GetQuote></soap:Body></soap:Envelope>"#;

    for action in ["urn:example:quotes/GetQuote", "urn:example:quotes/GetHistory"] {
        let response = client.send(OutboundRequest {
            body,
            location: "http://example.com/quotes.svc",
            action,
            version: SoapVersion::Soap11,
        })?;
        info!(bytes = response.len(), "response received");
    }

    info!(sent = client.transport().requests.get(), "done");
    Ok(())
}
