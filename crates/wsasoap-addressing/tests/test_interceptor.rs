use std::cell::RefCell;
use std::fs;

use wsasoap_addressing::namespace::WS_ADDRESSING_NAMESPACE_URI;
use wsasoap_addressing::{
    Intercepted, OutboundRequest, SoapTransport, SoapVersion, WsaError, WsaInterceptor, WsaOptions,
    transport_fn,
};

/// Keeps every request body it is given and answers with a canned response.
#[derive(Default)]
struct RecordingTransport {
    sent: RefCell<Vec<String>>,
}

impl SoapTransport for RecordingTransport {
    fn send(&self, request: OutboundRequest<'_>) -> Result<String, WsaError> {
        self.sent.borrow_mut().push(request.body.to_owned());
        Ok(r#"<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope"><env:Body/></env:Envelope>"#.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ping_request(body: &str) -> OutboundRequest<'_> {
        OutboundRequest {
            body,
            location: "http://example.com/ping.svc",
            action: "urn:example:ping/Ping",
            version: SoapVersion::Soap12,
        }
    }

    fn header_texts(xml: &str, name: &str) -> Vec<String> {
        let document = wsasoap_xml::parser::parse(xml).expect("Intercepted body should parse");
        document
            .root()
            .descendants_named(Some(WS_ADDRESSING_NAMESPACE_URI), name)
            .into_iter()
            .map(|e| e.text())
            .collect()
    }

    #[test]
    fn test_each_request_gets_fresh_message_id() {
        let body = fs::read_to_string("tests/resources/soap12_with_header.xml").unwrap();
        let client = Intercepted::new(WsaInterceptor::default(), RecordingTransport::default());

        client.send(ping_request(&body)).unwrap();
        client.send(ping_request(&body)).unwrap();

        let sent = client.transport().sent.borrow();
        assert_eq!(sent.len(), 2);

        let first = header_texts(&sent[0], "MessageID");
        let second = header_texts(&sent[1], "MessageID");
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_ne!(first, second);
        assert!(first[0].starts_with("uudi:"));
    }

    #[test]
    fn test_request_fields_become_headers() {
        let body = fs::read_to_string("tests/resources/soap12_with_header.xml").unwrap();
        let client = Intercepted::new(WsaInterceptor::default(), RecordingTransport::default());

        let response = client.send(ping_request(&body)).unwrap();
        assert!(response.contains("env:Body"));

        let sent = client.transport().sent.borrow();
        assert_eq!(header_texts(&sent[0], "Action"), vec!["urn:example:ping/Ping"]);
        assert_eq!(header_texts(&sent[0], "To"), vec!["http://example.com/ping.svc"]);
        assert_eq!(
            header_texts(&sent[0], "Address"),
            vec!["http://schemas.xmlsoap.org/ws/2004/08/addressing/role/anonymous"]
        );
    }

    #[test]
    fn test_configured_options_reach_headers() {
        let body = fs::read_to_string("tests/resources/soap11_no_header.xml").unwrap();
        let options = WsaOptions::builder()
            .message_id_prefix("urn:uuid:")
            .default_reply_to("http://client.example/replies")
            .build();
        let client = Intercepted::new(WsaInterceptor::new(options), RecordingTransport::default());

        client
            .send(OutboundRequest {
                version: SoapVersion::Soap11,
                ..ping_request(&body)
            })
            .unwrap();

        let sent = client.transport().sent.borrow();
        assert!(header_texts(&sent[0], "MessageID")[0].starts_with("urn:uuid:"));
        assert_eq!(
            header_texts(&sent[0], "Address"),
            vec!["http://client.example/replies"]
        );
    }

    #[test]
    fn test_invalid_body_never_reaches_transport() {
        let body = fs::read_to_string("tests/resources/malformed/not_an_envelope.xml").unwrap();
        let client = Intercepted::new(WsaInterceptor::default(), RecordingTransport::default());

        let result = client.send(ping_request(&body));

        assert!(matches!(result, Err(WsaError::MissingEnvelope { .. })));
        assert!(client.transport().sent.borrow().is_empty());
    }

    #[test]
    fn test_transport_error_is_propagated() {
        let body = fs::read_to_string("tests/resources/soap11_no_header.xml").unwrap();
        let unreachable = transport_fn(|request: OutboundRequest<'_>| {
            Err(WsaError::transport(format!("connection refused: {}", request.location)))
        });
        let client = Intercepted::new(WsaInterceptor::default(), unreachable);

        let err = client.send(ping_request(&body)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Transport error: connection refused: http://example.com/ping.svc"
        );
    }
}
