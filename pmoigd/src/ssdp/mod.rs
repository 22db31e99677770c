//! # SSDP - Simple Service Discovery Protocol
//!
//! Control point side of SSDP: one M-SEARCH is multicast, then every
//! unicast answer received before the deadline is collected.
//!
//! - [`SearchRequest`] - the M-SEARCH datagram
//! - [`RawResponse`] - one received datagram, headers read on demand
//! - [`discover`] - send + bounded receive loop
//! - [`select_gateway_location`] - LOCATION of the first matching device
//!
//! The client binds an ephemeral port (`0.0.0.0:0`), never 1900: answers to an
//! M-SEARCH are unicast to the sender port.

mod client;
mod response;

pub use client::{SearchRequest, discover};
pub use response::{RawResponse, select_gateway_location};

/// SSDP multicast group
pub const SSDP_MULTICAST_ADDR: &str = "239.255.255.250";

/// SSDP port
pub const SSDP_PORT: u16 = 1900;

/// Largest datagram kept, longer answers are truncated
pub const MAX_DATAGRAM_SIZE: usize = 8192;

/// Device type of an Internet Gateway Device (version suffix omitted)
pub const IGD_DEVICE_TYPE: &str = "urn:schemas-upnp-org:device:InternetGatewayDevice";
