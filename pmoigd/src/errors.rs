use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IgdError {
    // Setup errors: without a working socket nothing else can be done
    #[error("Cannot resolve SSDP address {addr}: {source}")]
    Resolve {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot bind SSDP socket: {0}")]
    Bind(#[source] std::io::Error),
    #[error("Failed to send M-SEARCH to {addr}: {source}")]
    Send {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("SSDP receive error: {0}")]
    Receive(#[source] std::io::Error),

    // Control stage errors
    #[error("No Internet Gateway Device answered the SSDP search")]
    NoGatewayFound,
    #[error("Invalid port mapping: {0}")]
    InvalidMapping(String),
    #[error("Failed to read operator input: {0}")]
    Input(#[source] std::io::Error),
    #[error("Failed to encode SOAP envelope: {0}")]
    Envelope(#[from] xmltree::Error),
    #[error("SOAP envelope is not valid UTF-8: {0}")]
    EnvelopeEncoding(#[from] FromUtf8Error),
    #[error("HTTP error when sending {action} to {url}: {source}")]
    Http {
        url: String,
        action: String,
        #[source]
        source: ureq::Error,
    },
    #[error("Failed to read SOAP response body from {url}: {source}")]
    HttpBody {
        url: String,
        #[source]
        source: ureq::Error,
    },
}

impl IgdError {
    /// True for the errors that leave the process without network access.
    pub fn is_setup_fatal(&self) -> bool {
        matches!(
            self,
            IgdError::Resolve { .. }
                | IgdError::Bind(_)
                | IgdError::Send { .. }
                | IgdError::Receive(_)
        )
    }

    pub fn invalid_mapping(message: impl Into<String>) -> Self {
        IgdError::InvalidMapping(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_tier() {
        let bind = IgdError::Bind(std::io::Error::other("denied"));
        assert!(bind.is_setup_fatal());

        let send = IgdError::Send {
            addr: "239.255.255.250:1900".to_string(),
            source: std::io::Error::other("unreachable"),
        };
        assert!(send.is_setup_fatal());
    }

    #[test]
    fn test_recoverable_tier() {
        assert!(!IgdError::NoGatewayFound.is_setup_fatal());
        assert!(!IgdError::invalid_mapping("bad port").is_setup_fatal());
        assert_eq!(
            IgdError::invalid_mapping("bad port").to_string(),
            "Invalid port mapping: bad port"
        );
    }
}
