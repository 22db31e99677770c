//! Discovery → control URL → envelope → SOAP call.

use tracing::{info, warn};

use crate::config::IgdConfig;
use crate::control::{ActionResponse, SoapClient};
use crate::endpoint::derive_control_url;
use crate::errors::IgdError;
use crate::input::MappingInputSource;
use crate::mapping::PortMappingRequest;
use crate::soap::{ADD_PORT_MAPPING, SoapEnvelope};
use crate::ssdp::{SearchRequest, discover, select_gateway_location};

/// Everything learnt while adding one mapping.
#[derive(Debug, Clone)]
pub struct MappingOutcome {
    pub location: String,
    pub control_url: String,
    pub request: PortMappingRequest,
    pub response: ActionResponse,
}

/// Runs the SSDP search and returns the LOCATION of the gateway.
///
/// Unlike [`select_gateway_location`], an empty result is an error here.
pub fn find_gateway(config: &IgdConfig) -> Result<String, IgdError> {
    let request = SearchRequest::from_config(config);
    let responses = discover(&request, config.search_window())?;

    let location = select_gateway_location(&responses, &config.device_type);
    if location.is_empty() {
        warn!(
            "No {} among {} SSDP response(s)",
            config.device_type,
            responses.len()
        );
        return Err(IgdError::NoGatewayFound);
    }

    info!("✅ Gateway found at {}", location);
    Ok(location)
}

/// Discovers the gateway, asks the operator for the mapping and sends
/// `AddPortMapping`.
///
/// A non-2xx answer is not an error: it is returned in
/// [`MappingOutcome::response`].
pub fn add_port_mapping(
    config: &IgdConfig,
    input: &mut dyn MappingInputSource,
) -> Result<MappingOutcome, IgdError> {
    let location = find_gateway(config)?;
    let control_url = derive_control_url(&location, &config.control_path);
    info!("Control URL: {}", control_url);

    let mapping_input = input.read_mapping_input()?;
    let request = PortMappingRequest::from_input(&mapping_input, config);
    request.validate()?;

    // envelope namespace and SOAPAction header share the configured URN
    let envelope = SoapEnvelope::for_service(&request, &config.service_type).to_xml()?;
    let client = SoapClient::for_service(&config.service_type, config.http_timeout());
    let response = client.send_action(&control_url, &envelope, ADD_PORT_MAPPING)?;

    if !response.is_success() {
        warn!("⚠️ {} rejected with HTTP {}", ADD_PORT_MAPPING, response.status);
    }

    Ok(MappingOutcome {
        location,
        control_url,
        request,
        response,
    })
}
