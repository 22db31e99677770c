//! SOAP envelope of a UPnP action

use xmltree::{Element, EmitterConfig, XMLNode};

use super::{ADD_PORT_MAPPING, SOAP_ENVELOPE_NS, WAN_IP_CONNECTION_NS};
use crate::errors::IgdError;
use crate::mapping::PortMappingRequest;

/// SOAP request for one action of the WANIPConnection service.
///
/// Both namespaces are declared on the envelope element (`xmlns:s`,
/// `xmlns:u`); the action element is `u:<action>` with one child per
/// argument, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapEnvelope {
    envelope_namespace: String,
    service_namespace: String,
    action: String,
    arguments: Vec<(String, String)>,
}

impl SoapEnvelope {
    pub fn add_port_mapping(request: &PortMappingRequest) -> Self {
        Self::for_service(request, WAN_IP_CONNECTION_NS)
    }

    /// `AddPortMapping` declared in another service namespace. The
    /// SOAPAction header sent with it must use the same URN.
    pub fn for_service(request: &PortMappingRequest, service_type: &str) -> Self {
        Self {
            envelope_namespace: SOAP_ENVELOPE_NS.to_string(),
            service_namespace: service_type.to_string(),
            action: ADD_PORT_MAPPING.to_string(),
            arguments: request
                .arguments()
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn service_namespace(&self) -> &str {
        &self.service_namespace
    }

    pub fn envelope_namespace(&self) -> &str {
        &self.envelope_namespace
    }

    pub fn arguments(&self) -> &[(String, String)] {
        &self.arguments
    }

    fn to_element(&self) -> Element {
        let mut action = Element::new(&format!("u:{}", self.action));
        for (name, value) in &self.arguments {
            let mut child = Element::new(name);
            if !value.is_empty() {
                child.children.push(XMLNode::Text(value.clone()));
            }
            action.children.push(XMLNode::Element(child));
        }

        let mut body = Element::new("s:Body");
        body.children.push(XMLNode::Element(action));

        let mut envelope = Element::new("s:Envelope");
        envelope
            .attributes
            .insert("xmlns:s".to_string(), self.envelope_namespace.clone());
        envelope
            .attributes
            .insert("xmlns:u".to_string(), self.service_namespace.clone());
        envelope.children.push(XMLNode::Element(body));
        envelope
    }

    /// Serializes the envelope, indented with two spaces.
    pub fn to_xml(&self) -> Result<String, IgdError> {
        let mut buf = Vec::new();
        let config = EmitterConfig::new()
            .write_document_declaration(true)
            .perform_indent(true)
            .indent_string("  ");
        self.to_element().write_with_config(&mut buf, config)?;

        Ok(String::from_utf8(buf)?)
    }
}

/// `AddPortMapping` request body.
pub fn build_envelope(request: &PortMappingRequest) -> Result<String, IgdError> {
    SoapEnvelope::add_port_mapping(request).to_xml()
}
