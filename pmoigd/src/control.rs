use std::borrow::Cow;
use std::time::Duration;

use tracing::{debug, info, warn};
use ureq::Agent;

use crate::errors::IgdError;
use crate::soap::{WAN_IP_CONNECTION_NS, soap_action_header};

/// Result of a SOAP call: HTTP status code and raw body bytes, whatever the
/// status and charset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ActionResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body for display, invalid UTF-8 replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Blocking HTTP client posting SOAP envelopes to a control URL.
pub struct SoapClient {
    agent: Agent,
    service_type: String,
}

impl SoapClient {
    /// Client for the WANIPConnection service. `None` means no timeout.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self::for_service(WAN_IP_CONNECTION_NS, timeout)
    }

    pub fn for_service(service_type: &str, timeout: Option<Duration>) -> Self {
        // 4xx/5xx are not errors: a SOAP fault body comes with HTTP 500
        // and must reach the caller.
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();

        Self {
            agent: config.into(),
            service_type: service_type.to_string(),
        }
    }

    /// POSTs `envelope` to `control_url` and returns status and body as
    /// received. The body is not interpreted.
    pub fn send_action(
        &self,
        control_url: &str,
        envelope: &str,
        action: &str,
    ) -> Result<ActionResponse, IgdError> {
        let soap_action = soap_action_header(&self.service_type, action);
        debug!("📨 POST {} SOAPAction: {}\n{}", control_url, soap_action, envelope);

        let mut response = self
            .agent
            .post(control_url)
            .header("Content-Type", r#"text/xml; charset="utf-8""#)
            .header("SOAPAction", &soap_action)
            .send(envelope.to_string())
            .map_err(|source| {
                warn!("❌ {} to {} failed: {}", action, control_url, source);
                IgdError::Http {
                    url: control_url.to_string(),
                    action: action.to_string(),
                    source,
                }
            })?;

        let status = response.status().as_u16();

        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|source| IgdError::HttpBody {
                url: control_url.to_string(),
                source,
            })?;

        info!("📥 {} answered HTTP {} ({} bytes)", action, status, body.len());
        Ok(ActionResponse { status, body })
    }
}

/// One-shot helper: WANIPConnection client without timeout.
pub fn send_action(
    control_url: &str,
    envelope: &str,
    action: &str,
) -> Result<ActionResponse, IgdError> {
    SoapClient::new(None).send_action(control_url, envelope, action)
}
