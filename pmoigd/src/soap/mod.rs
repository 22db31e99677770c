//! # Module SOAP
//!
//! Requests sent to the WANIPConnection control endpoint.
//!
//! - [`SoapEnvelope`] - action + arguments + namespaces, serialized with
//!   [`SoapEnvelope::to_xml`]
//! - [`build_envelope`] - `AddPortMapping` body for a [`PortMappingRequest`]
//! - [`parse_soap_action`] - reads an action envelope back
//!
//! [`PortMappingRequest`]: crate::mapping::PortMappingRequest

mod envelope;
mod parser;

pub use envelope::{SoapEnvelope, build_envelope};
pub use parser::{SoapAction, SoapParseError, parse_soap_action};

/// SOAP 1.1 envelope namespace
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// WANIPConnection service
pub const WAN_IP_CONNECTION_NS: &str = "urn:schemas-upnp-org:service:WANIPConnection:1";

pub const ADD_PORT_MAPPING: &str = "AddPortMapping";

/// Value of the `SOAPAction` HTTP header: `"<service>#<action>"`, quotes
/// included.
pub fn soap_action_header(service_type: &str, action: &str) -> String {
    format!(r#""{}#{}""#, service_type, action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soap_action_header() {
        assert_eq!(
            soap_action_header(WAN_IP_CONNECTION_NS, ADD_PORT_MAPPING),
            "\"urn:schemas-upnp-org:service:WANIPConnection:1#AddPortMapping\""
        );
    }
}
