//! Control URL of the WANIPConnection service.
//!
//! The URL is not read from the device description: the configured control
//! path is appended to the SSDP LOCATION. Devices exposing the service
//! elsewhere answer with an HTTP error at the SOAP stage.

/// Control path used by the devices this tool was written for.
pub const DEFAULT_CONTROL_PATH: &str = "/ctl/IPConn";

pub fn derive_control_url(location: &str, control_path: &str) -> String {
    format!("{location}{control_path}")
}
