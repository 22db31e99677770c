//! Parser SOAP pour actions UPnP

use std::io::BufReader;

use xmltree::Element;

/// Action UPnP extraite d'une enveloppe SOAP
#[derive(Debug, Clone)]
pub struct SoapAction {
    /// Nom de l'action (ex: "AddPortMapping")
    pub name: String,

    /// Namespace de l'action (ex: "urn:schemas-upnp-org:service:WANIPConnection:1")
    pub namespace: Option<String>,

    /// Namespace de l'enveloppe
    pub envelope_namespace: Option<String>,

    /// Arguments, dans l'ordre du document
    pub args: Vec<(String, String)>,
}

impl SoapAction {
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Erreur de parsing SOAP
#[derive(Debug, thiserror::Error)]
pub enum SoapParseError {
    #[error("XML parse error: {0}")]
    XmlError(#[from] xmltree::ParseError),

    #[error("Missing SOAP Envelope")]
    MissingEnvelope,

    #[error("Missing SOAP Body")]
    MissingBody,

    #[error("No action found in SOAP Body")]
    NoAction,
}

/// Parse une action SOAP à partir de bytes XML
pub fn parse_soap_action(xml: &[u8]) -> Result<SoapAction, SoapParseError> {
    let root = Element::parse(BufReader::new(xml))?;

    if root.name != "Envelope" {
        return Err(SoapParseError::MissingEnvelope);
    }

    let body = root
        .children
        .iter()
        .filter_map(|n| n.as_element())
        .find(|e| e.name == "Body")
        .ok_or(SoapParseError::MissingBody)?;

    // Forme : <u:ActionName>...</u:ActionName>
    let action = body
        .children
        .iter()
        .find_map(|n| n.as_element())
        .ok_or(SoapParseError::NoAction)?;

    let args = action
        .children
        .iter()
        .filter_map(|n| n.as_element())
        .map(|arg| {
            let value = arg.get_text().unwrap_or_default().to_string();
            (arg.name.clone(), value)
        })
        .collect();

    Ok(SoapAction {
        name: action.name.clone(),
        namespace: action.namespace.clone(),
        envelope_namespace: root.namespace.clone(),
        args,
    })
}
