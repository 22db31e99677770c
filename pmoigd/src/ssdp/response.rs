//! SSDP answers and gateway selection

use std::collections::HashMap;
use std::net::SocketAddr;

use tracing::{debug, trace};

/// Raw text of one datagram received during the discovery window.
#[derive(Debug, Clone)]
pub struct RawResponse {
    text: String,
    from: Option<SocketAddr>,
}

impl RawResponse {
    pub fn new(text: impl Into<String>, from: Option<SocketAddr>) -> Self {
        Self {
            text: text.into(),
            from,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Option<SocketAddr> {
        self.from
    }

    /// First line of the datagram (ex: `HTTP/1.1 200 OK`).
    pub fn start_line(&self) -> &str {
        self.text.lines().next().map(str::trim).unwrap_or_default()
    }

    /// Value of a header, name matched case-insensitively, value trimmed.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_lines(&self.text)
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// All headers, names upper-cased. Last occurrence wins.
    pub fn headers(&self) -> HashMap<String, String> {
        header_lines(&self.text)
            .map(|(key, value)| (key.to_ascii_uppercase(), value.to_string()))
            .collect()
    }
}

fn header_lines(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.lines()
        .skip(1)
        .map(str::trim)
        // Empty line marks end of headers
        .take_while(|line| !line.is_empty())
        .filter_map(|line| {
            // Split on first ':' only (values may contain ':')
            match line.split_once(':') {
                Some((name, value)) if !name.trim().is_empty() => {
                    Some((name.trim(), value.trim()))
                }
                _ => {
                    trace!("Skipping malformed header: '{}'", line);
                    None
                }
            }
        })
}

/// Returns the LOCATION of the first response, in arrival order, whose ST
/// header contains `device_type`.
///
/// Responses matching the ST but carrying no LOCATION are skipped. An empty
/// string means no device matched.
pub fn select_gateway_location(responses: &[RawResponse], device_type: &str) -> String {
    for response in responses {
        let Some(st) = response.header("ST") else {
            trace!("Response from {:?} has no ST header", response.sender());
            continue;
        };
        if !st.contains(device_type) {
            continue;
        }
        match response.header("LOCATION") {
            Some(location) => {
                debug!(st = %st, location = %location, "Gateway device selected");
                return location.to_string();
            }
            None => {
                trace!(
                    "Response from {:?} matches {} without LOCATION, ignoring",
                    response.sender(),
                    device_type
                );
            }
        }
    }
    String::new()
}
