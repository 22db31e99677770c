//! # pmoigd
//!
//! Adds a NAT port mapping on the local UPnP Internet Gateway Device.
//!
//! The flow is a straight pipeline, each step usable on its own:
//!
//! 1. [`ssdp::discover`] multicasts an M-SEARCH and collects the answers
//!    received during a fixed window, [`ssdp::select_gateway_location`]
//!    keeps the LOCATION of the first gateway;
//! 2. [`endpoint::derive_control_url`] appends the control path;
//! 3. [`soap::build_envelope`] builds the `AddPortMapping` request;
//! 4. [`control::SoapClient::send_action`] posts it and returns the raw
//!    HTTP status and body.
//!
//! [`gateway::add_port_mapping`] chains the four steps.
//!
//! ```no_run
//! use pmoigd::{IgdConfig, MappingInput, add_port_mapping};
//!
//! let config = IgdConfig::load(None)?;
//! let mut input = MappingInput::new("8080", "8080", "TCP");
//! let outcome = add_port_mapping(&config, &mut input)?;
//! println!("HTTP {}: {}", outcome.response.status, outcome.response.body_text());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod control;
pub mod endpoint;
pub mod errors;
pub mod gateway;
pub mod input;
pub mod mapping;
pub mod soap;
pub mod ssdp;

pub use config::IgdConfig;
pub use control::{ActionResponse, SoapClient, send_action};
pub use endpoint::derive_control_url;
pub use errors::IgdError;
pub use gateway::{MappingOutcome, add_port_mapping, find_gateway};
pub use input::{MappingInput, MappingInputSource, PromptInput};
pub use mapping::PortMappingRequest;
pub use soap::{SoapEnvelope, build_envelope};
pub use ssdp::{RawResponse, SearchRequest, discover, select_gateway_location};
