//! Port mapping arguments of the `AddPortMapping` action.

use crate::config::IgdConfig;
use crate::errors::IgdError;
use crate::input::MappingInput;

/// Arguments of `AddPortMapping`, kept as strings as they travel on the wire.
///
/// Field order is the argument order of the action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortMappingRequest {
    pub remote_host: String,
    pub external_port: String,
    pub protocol: String,
    pub internal_port: String,
    pub internal_client: String,
    pub enabled: String,
    pub description: String,
    pub lease_duration: String,
}

impl PortMappingRequest {
    /// Operator input completed with the configured defaults.
    pub fn from_input(input: &MappingInput, config: &IgdConfig) -> Self {
        Self {
            remote_host: String::new(),
            external_port: input.external_port.trim().to_string(),
            protocol: input.protocol.trim().to_ascii_uppercase(),
            internal_port: input.internal_port.trim().to_string(),
            internal_client: config.resolve_internal_client(),
            enabled: "1".to_string(),
            description: config.description.clone(),
            lease_duration: config.lease_duration.to_string(),
        }
    }

    /// `(element name, value)` pairs in argument order.
    pub fn arguments(&self) -> [(&'static str, &str); 8] {
        [
            ("NewRemoteHost", self.remote_host.as_str()),
            ("NewExternalPort", self.external_port.as_str()),
            ("NewProtocol", self.protocol.as_str()),
            ("NewInternalPort", self.internal_port.as_str()),
            ("NewInternalClient", self.internal_client.as_str()),
            ("NewEnabled", self.enabled.as_str()),
            ("NewPortMappingDescription", self.description.as_str()),
            ("NewLeaseDuration", self.lease_duration.as_str()),
        ]
    }

    /// Checks the ports, protocol and lease before anything is sent.
    pub fn validate(&self) -> Result<(), IgdError> {
        validate_port("external port", &self.external_port)?;
        validate_port("internal port", &self.internal_port)?;

        if !matches!(self.protocol.as_str(), "TCP" | "UDP") {
            return Err(IgdError::invalid_mapping(format!(
                "protocol must be TCP or UDP, got '{}'",
                self.protocol
            )));
        }

        if self.lease_duration.parse::<u32>().is_err() {
            return Err(IgdError::invalid_mapping(format!(
                "lease duration must be a non-negative integer, got '{}'",
                self.lease_duration
            )));
        }
        Ok(())
    }
}

fn validate_port(name: &str, value: &str) -> Result<(), IgdError> {
    match value.parse::<u16>() {
        Ok(port) if port >= 1 => Ok(()),
        _ => Err(IgdError::invalid_mapping(format!(
            "{name} must be in 1..=65535, got '{value}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PortMappingRequest {
        PortMappingRequest {
            remote_host: String::new(),
            external_port: "8080".to_string(),
            protocol: "TCP".to_string(),
            internal_port: "8080".to_string(),
            internal_client: "192.168.1.2".to_string(),
            enabled: "1".to_string(),
            description: "TestMapping".to_string(),
            lease_duration: "10".to_string(),
        }
    }

    #[test]
    fn test_from_input_applies_defaults() {
        let config = IgdConfig {
            internal_client: Some("192.168.1.2".to_string()),
            lease_duration: 0,
            ..IgdConfig::default()
        };
        let input = MappingInput::new(" 2222 ", "22", "tcp");

        let req = PortMappingRequest::from_input(&input, &config);
        assert_eq!(req.remote_host, "");
        assert_eq!(req.external_port, "2222");
        assert_eq!(req.internal_port, "22");
        assert_eq!(req.protocol, "TCP");
        assert_eq!(req.internal_client, "192.168.1.2");
        assert_eq!(req.enabled, "1");
        assert_eq!(req.description, "TestMapping");
        assert_eq!(req.lease_duration, "0");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_argument_order() {
        let names: Vec<&str> = valid().arguments().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            [
                "NewRemoteHost",
                "NewExternalPort",
                "NewProtocol",
                "NewInternalPort",
                "NewInternalClient",
                "NewEnabled",
                "NewPortMappingDescription",
                "NewLeaseDuration",
            ]
        );
    }

    #[test]
    fn test_port_bounds() {
        for bad in ["0", "65536", "", "-1", "http"] {
            let req = PortMappingRequest {
                external_port: bad.to_string(),
                ..valid()
            };
            assert!(
                matches!(req.validate(), Err(IgdError::InvalidMapping(_))),
                "external port '{bad}' should be rejected"
            );
        }

        let req = PortMappingRequest {
            internal_port: "65535".to_string(),
            external_port: "1".to_string(),
            ..valid()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_protocol_and_lease() {
        let req = PortMappingRequest {
            protocol: "SCTP".to_string(),
            ..valid()
        };
        assert!(req.validate().is_err());

        let req = PortMappingRequest {
            lease_duration: "-5".to_string(),
            ..valid()
        };
        assert!(req.validate().is_err());

        let req = PortMappingRequest {
            protocol: "UDP".to_string(),
            lease_duration: "0".to_string(),
            ..valid()
        };
        assert!(req.validate().is_ok());
    }
}
