use std::path::Path;

use tracing::{debug, trace};
use wsasoap_xml::{Document, Element};

use crate::error::WsaError;
use crate::message_id;
use crate::namespace::{Namespace, tag_name};
use crate::options::WsaOptions;
use crate::soap::SoapVersion;

/// Adds WS-Addressing headers to a parsed SOAP envelope.
///
/// The builder borrows the document for one outbound message. Every `add_*`
/// call appends to the SOAP `Header`, which is found or created once and then
/// reused, so headers appear in the order the calls were made.
///
/// ```
/// use wsasoap_addressing::WsaHeaderBuilder;
///
/// let mut document = wsasoap_xml::parser::parse(
///     r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body/></soap:Envelope>"#,
/// )?;
/// let mut wsa = WsaHeaderBuilder::new(&mut document)?;
/// wsa.add_action("urn:op")?;
/// wsa.add_to("http://example.com/svc")?;
/// wsa.add_reply_to(None)?;
///
/// assert!(wsa.to_xml_string()?.contains("<wsa:Action>urn:op</wsa:Action>"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct WsaHeaderBuilder<'a> {
    document: &'a mut Document,
    soap_namespace: String,
    soap_alias: Option<String>,
    options: WsaOptions,
    /// Position of the Header among the Envelope's child nodes.
    header: Option<usize>,
    message_id: Option<String>,
}

impl<'a> WsaHeaderBuilder<'a> {
    pub fn new(document: &'a mut Document) -> Result<Self, WsaError> {
        Self::with_options(document, WsaOptions::default())
    }

    pub fn with_options(document: &'a mut Document, options: WsaOptions) -> Result<Self, WsaError> {
        let envelope = document.root_mut();

        if envelope.name() != tag_name::ENVELOPE {
            return Err(WsaError::MissingEnvelope {
                found: envelope.qualified_name().into_owned(),
            });
        }

        let soap_namespace = envelope
            .namespace()
            .ok_or_else(|| WsaError::UnresolvedNamespace {
                tag: envelope.qualified_name().into_owned(),
            })?
            .to_owned();
        let soap_alias = envelope.alias().map(str::to_owned);

        let (wsa_url, wsa_alias) = Namespace::WsAddressing.as_tuple();
        if let Some(previous) = envelope.declare_namespace(wsa_url, Some(wsa_alias)) {
            if previous.url != wsa_url {
                debug!(previous = %previous.url, "replaced existing wsa namespace binding");
            }
        }

        let mut builder = Self {
            document,
            soap_namespace,
            soap_alias,
            options,
            header: None,
            message_id: None,
        };
        builder.locate_header()?;

        Ok(builder)
    }

    fn locate_header(&mut self) -> Result<&mut Element, WsaError> {
        let index = match self.header {
            Some(index) => index,
            None => {
                let index = self.find_or_create_header();
                self.header = Some(index);
                index
            }
        };

        self.document
            .root_mut()
            .child_element_at_mut(index)
            .ok_or(WsaError::HeaderNotFound { index })
    }

    fn find_or_create_header(&mut self) -> usize {
        let envelope = self.document.root_mut();

        if let Some(index) = envelope.find_child_position(Some(self.soap_namespace.as_str()), tag_name::HEADER) {
            debug!(index, "reusing existing SOAP header");
            return index;
        }

        let header = Element::new(tag_name::HEADER)
            .set_namespace(self.soap_namespace.as_str())
            .set_alias_optional(self.soap_alias.as_deref());
        debug!(namespace = %self.soap_namespace, "creating SOAP header");
        envelope.insert_child(0, header)
    }

    /// The SOAP `Header`, for callers adding their own header blocks.
    pub fn header(&mut self) -> Result<&mut Element, WsaError> {
        self.locate_header()
    }

    fn append_header(&mut self, mut element: Element) -> Result<(), WsaError> {
        let header = self.locate_header()?;

        // The Envelope binds `wsa` correctly, so only the Header itself can
        // shadow it.
        let (wsa_url, wsa_alias) = Namespace::WsAddressing.as_tuple();
        if let Some(shadowing) = header
            .declared_namespace(Some(wsa_alias))
            .filter(|ns| ns.url != wsa_url)
        {
            debug!(header_binding = %shadowing.url, "redeclaring wsa prefix on header element");
            element = element.add_namespace_declaration(wsa_url, Some(wsa_alias));
        }

        trace!(name = element.name(), "appending WS-Addressing header");
        header.append_child(element);
        Ok(())
    }

    pub fn add_action(&mut self, action: &str) -> Result<(), WsaError> {
        self.append_header(wsa_element(tag_name::ACTION).set_text(action))
    }

    pub fn add_to(&mut self, location: &str) -> Result<(), WsaError> {
        self.append_header(wsa_element(tag_name::TO).set_text(location))
    }

    /// Adds a MessageID and returns it.
    ///
    /// `id` is used verbatim unless it is `None` or empty, in which case one
    /// is generated. Once a MessageID has been added, later calls return it
    /// and leave the header untouched.
    pub fn add_message_id(&mut self, id: Option<&str>) -> Result<String, WsaError> {
        if let Some(existing) = &self.message_id {
            return Ok(existing.clone());
        }

        let id = match id {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => message_id::generate(&self.options.message_id_prefix),
        };

        self.append_header(wsa_element(tag_name::MESSAGE_ID).set_text(id.as_str()))?;
        self.message_id = Some(id.clone());
        Ok(id)
    }

    /// Adds a ReplyTo endpoint reference, adding a MessageID first if there is
    /// none yet. An empty or missing `address` means the configured default.
    pub fn add_reply_to(&mut self, address: Option<&str>) -> Result<(), WsaError> {
        if self.message_id.is_none() {
            self.add_message_id(None)?;
        }

        let address = match address {
            Some(address) if !address.is_empty() => address.to_owned(),
            _ => self.options.default_reply_to.clone(),
        };

        let reply_to =
            wsa_element(tag_name::REPLY_TO).add_child(wsa_element(tag_name::ADDRESS).set_text(address));
        self.append_header(reply_to)
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn soap_version(&self) -> Option<SoapVersion> {
        SoapVersion::from_namespace(&self.soap_namespace)
    }

    pub fn options(&self) -> &WsaOptions {
        &self.options
    }

    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn to_xml_string(&self) -> Result<String, WsaError> {
        Ok(self.document.to_xml_string()?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), WsaError> {
        Ok(self.document.save(path)?)
    }
}

fn wsa_element(name: &str) -> Element {
    let (url, alias) = Namespace::WsAddressing.as_tuple();
    Element::new(name).set_namespace(url).set_alias(alias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::{ANONYMOUS_ROLE_URI, WS_ADDRESSING_NAMESPACE_URI};

    const SOAP11: &str = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body/></soap:Envelope>"#;

    fn wsa_children(document: &Document) -> Vec<(String, String)> {
        let header = document
            .root()
            .find_child(Some("http://schemas.xmlsoap.org/soap/envelope/"), "Header")
            .unwrap();
        header
            .child_elements()
            .map(|e| {
                assert_eq!(e.namespace(), Some(WS_ADDRESSING_NAMESPACE_URI));
                (e.name().to_owned(), e.text())
            })
            .collect()
    }

    #[test]
    fn test_header_created_as_first_child() {
        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        WsaHeaderBuilder::new(&mut document).unwrap();

        let names: Vec<_> = document.root().child_elements().map(Element::name).collect();
        assert_eq!(names, vec!["Header", "Body"]);

        let header = document.root().child_element_at(0).unwrap();
        assert_eq!(header.alias(), Some("soap"));
        assert_eq!(header.namespace(), Some("http://schemas.xmlsoap.org/soap/envelope/"));
    }

    #[test]
    fn test_header_location_is_memoized() {
        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();

        let first: *const Element = wsa.header().unwrap();
        let second: *const Element = wsa.header().unwrap();
        assert_eq!(first, second);

        let headers = wsa.document().root().descendants_named(
            Some("http://schemas.xmlsoap.org/soap/envelope/"),
            "Header",
        );
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_existing_header_is_reused() {
        let xml = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body/><soap:Header><Token xmlns="urn:auth">t</Token></soap:Header></soap:Envelope>"#;
        let mut document = wsasoap_xml::parser::parse(xml).unwrap();

        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();
        wsa.add_action("urn:op").unwrap();

        let names: Vec<_> = document.root().child_elements().map(Element::name).collect();
        assert_eq!(names, vec!["Body", "Header"]);

        let header = document.root().child_element_at(1).unwrap();
        let children: Vec<_> = header.child_elements().map(Element::name).collect();
        assert_eq!(children, vec!["Token", "Action"]);
    }

    #[test]
    fn test_header_rebinding_wsa_prefix() {
        let xml = concat!(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soap:Header xmlns:wsa="http://schemas.xmlsoap.org/ws/2004/08/addressing"><wsa:From>x</wsa:From></soap:Header>"#,
            "<soap:Body/></soap:Envelope>"
        );
        let mut document = wsasoap_xml::parser::parse(xml).unwrap();
        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();
        wsa.add_action("urn:op").unwrap();
        wsa.add_reply_to(None).unwrap();

        let written = wsa.to_xml_string().unwrap();
        assert!(written.contains(concat!(
            "<wsa:From>x</wsa:From>",
            r#"<wsa:Action xmlns:wsa="http://www.w3.org/2005/08/addressing">urn:op</wsa:Action>"#
        )));
        assert!(written.contains(concat!(
            r#"<wsa:ReplyTo xmlns:wsa="http://www.w3.org/2005/08/addressing">"#,
            "<wsa:Address>"
        )));

        let reparsed = wsasoap_xml::parser::parse(&written).unwrap();
        let header = reparsed
            .root()
            .find_child(Some("http://schemas.xmlsoap.org/soap/envelope/"), "Header")
            .unwrap();
        let children: Vec<_> = header
            .child_elements()
            .map(|e| (e.name(), e.namespace()))
            .collect();
        assert_eq!(
            children,
            vec![
                ("From", Some("http://schemas.xmlsoap.org/ws/2004/08/addressing")),
                ("Action", Some(WS_ADDRESSING_NAMESPACE_URI)),
                ("MessageID", Some(WS_ADDRESSING_NAMESPACE_URI)),
                ("ReplyTo", Some(WS_ADDRESSING_NAMESPACE_URI)),
            ]
        );
    }

    #[test]
    fn test_wsa_namespace_declared_on_envelope() {
        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        WsaHeaderBuilder::new(&mut document).unwrap();

        let declaration = document.root().declared_namespace(Some("wsa")).unwrap();
        assert_eq!(declaration.url, WS_ADDRESSING_NAMESPACE_URI);
    }

    #[test]
    fn test_message_id_is_memoized() {
        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();

        let first = wsa.add_message_id(None).unwrap();
        let second = wsa.add_message_id(None).unwrap();
        let third = wsa.add_message_id(Some("urn:uuid:ignored")).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, third);
        assert!(first.starts_with("uudi:"));
        assert_eq!(wsa.message_id(), Some(first.as_str()));

        let ids = document
            .root()
            .descendants_named(Some(WS_ADDRESSING_NAMESPACE_URI), "MessageID");
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn test_empty_message_id_is_generated() {
        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();

        let id = wsa.add_message_id(Some("")).unwrap();
        assert!(id.starts_with("uudi:"));
        assert_eq!(id.len(), "uudi:".len() + 36);
    }

    #[test]
    fn test_message_id_prefix_option() {
        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        let mut wsa =
            WsaHeaderBuilder::with_options(&mut document, WsaOptions::standard_message_ids()).unwrap();

        assert!(wsa.add_message_id(None).unwrap().starts_with("urn:uuid:"));
    }

    #[test]
    fn test_reply_to_adds_message_id_first() {
        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();

        wsa.add_reply_to(None).unwrap();
        let id = wsa.message_id().unwrap().to_owned();

        let names: Vec<_> = wsa_children(&document).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["MessageID", "ReplyTo"]);

        let ids = document
            .root()
            .descendants_named(Some(WS_ADDRESSING_NAMESPACE_URI), "MessageID");
        assert_eq!(ids[0].text(), id);
    }

    #[test]
    fn test_reply_to_default_address() {
        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();
        wsa.add_reply_to(Some("")).unwrap();

        let addresses = document
            .root()
            .descendants_named(Some(WS_ADDRESSING_NAMESPACE_URI), "Address");
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].text(), ANONYMOUS_ROLE_URI);
    }

    #[test]
    fn test_reply_to_explicit_address() {
        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();
        wsa.add_message_id(Some("urn:uuid:1")).unwrap();
        wsa.add_reply_to(Some("http://client.example/callback")).unwrap();

        let xml = wsa.to_xml_string().unwrap();
        assert!(xml.contains(
            "<wsa:ReplyTo><wsa:Address>http://client.example/callback</wsa:Address></wsa:ReplyTo>"
        ));
        assert_eq!(xml.matches("<wsa:MessageID>").count(), 1);
    }

    #[test]
    fn test_headers_follow_call_order() {
        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();
        wsa.add_to("X").unwrap();
        wsa.add_action("Y").unwrap();

        assert_eq!(
            wsa_children(&document),
            vec![
                ("To".to_owned(), "X".to_owned()),
                ("Action".to_owned(), "Y".to_owned())
            ]
        );
    }

    #[test]
    fn test_values_are_inserted_verbatim() {
        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();
        wsa.add_action("").unwrap();
        wsa.add_to("http://example.com/?a=1&b=<2>").unwrap();

        let xml = wsa.to_xml_string().unwrap();
        assert!(xml.contains("<wsa:Action></wsa:Action>"));
        assert!(xml.contains("<wsa:To>http://example.com/?a=1&amp;b=&lt;2&gt;</wsa:To>"));

        assert_eq!(
            wsa_children(&document)[1].1,
            "http://example.com/?a=1&b=<2>"
        );
    }

    #[test]
    fn test_full_example() {
        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();
        wsa.add_action("urn:op").unwrap();
        wsa.add_to("http://example.com/svc").unwrap();
        assert_eq!(
            wsa.add_message_id(Some("urn:uuid:fixed-id")).unwrap(),
            "urn:uuid:fixed-id"
        );
        wsa.add_reply_to(None).unwrap();

        assert_eq!(
            wsa.to_xml_string().unwrap(),
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:wsa="http://www.w3.org/2005/08/addressing">"#,
                "<soap:Header>",
                "<wsa:Action>urn:op</wsa:Action>",
                "<wsa:To>http://example.com/svc</wsa:To>",
                "<wsa:MessageID>urn:uuid:fixed-id</wsa:MessageID>",
                "<wsa:ReplyTo><wsa:Address>http://schemas.xmlsoap.org/ws/2004/08/addressing/role/anonymous</wsa:Address></wsa:ReplyTo>",
                "</soap:Header>",
                "<soap:Body/>",
                "</soap:Envelope>"
            )
        );
    }

    #[test]
    fn test_root_must_be_envelope() {
        let mut document =
            wsasoap_xml::parser::parse(r#"<soap:Body xmlns:soap="urn:s"/>"#).unwrap();

        let err = WsaHeaderBuilder::new(&mut document).unwrap_err();
        assert!(matches!(err, WsaError::MissingEnvelope { ref found } if found == "soap:Body"));
    }

    #[test]
    fn test_envelope_needs_namespace() {
        let mut document = wsasoap_xml::parser::parse("<Envelope><Body/></Envelope>").unwrap();

        let err = WsaHeaderBuilder::new(&mut document).unwrap_err();
        assert!(matches!(err, WsaError::UnresolvedNamespace { .. }));
    }

    #[test]
    fn test_default_namespace_envelope() {
        let xml = r#"<Envelope xmlns="http://www.w3.org/2003/05/soap-envelope"><Body/></Envelope>"#;
        let mut document = wsasoap_xml::parser::parse(xml).unwrap();
        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();
        wsa.add_action("urn:op").unwrap();

        assert_eq!(wsa.soap_version(), Some(SoapVersion::Soap12));
        let xml = wsa.to_xml_string().unwrap();
        assert!(xml.contains("<Header><wsa:Action>urn:op</wsa:Action></Header><Body/>"));
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.xml");

        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        let mut wsa = WsaHeaderBuilder::new(&mut document).unwrap();
        wsa.add_action("urn:op").unwrap();
        wsa.save(&path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            wsa.to_xml_string().unwrap()
        );
    }

    #[test]
    fn test_save_to_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("request.xml");

        let mut document = wsasoap_xml::parser::parse(SOAP11).unwrap();
        let wsa = WsaHeaderBuilder::new(&mut document).unwrap();

        assert!(matches!(wsa.save(&path), Err(WsaError::Xml(_))));
    }
}
