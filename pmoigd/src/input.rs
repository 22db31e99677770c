//! Operator input for a port mapping.
//!
//! The library never reads the terminal itself: the caller hands a
//! [`MappingInputSource`] to [`crate::gateway::add_port_mapping`].

use std::io::{BufRead, ErrorKind, Write};

use crate::errors::IgdError;

/// The three values asked to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingInput {
    pub external_port: String,
    pub internal_port: String,
    pub protocol: String,
}

impl MappingInput {
    pub fn new(
        external_port: impl Into<String>,
        internal_port: impl Into<String>,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            external_port: external_port.into(),
            internal_port: internal_port.into(),
            protocol: protocol.into(),
        }
    }
}

pub trait MappingInputSource {
    fn read_mapping_input(&mut self) -> Result<MappingInput, IgdError>;
}

/// Already known values (command line, tests...).
impl MappingInputSource for MappingInput {
    fn read_mapping_input(&mut self) -> Result<MappingInput, IgdError> {
        Ok(self.clone())
    }
}

/// Asks each value on `writer` and reads one line per value from `reader`.
pub struct PromptInput<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> PromptInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn ask(&mut self, prompt: &str) -> Result<String, IgdError> {
        write!(self.writer, "{prompt}").map_err(IgdError::Input)?;
        self.writer.flush().map_err(IgdError::Input)?;

        let mut line = String::new();
        let n = self.reader.read_line(&mut line).map_err(IgdError::Input)?;
        if n == 0 {
            return Err(IgdError::Input(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "input closed before all values were given",
            )));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> MappingInputSource for PromptInput<R, W> {
    fn read_mapping_input(&mut self) -> Result<MappingInput, IgdError> {
        let external_port = self.ask("Enter new external port: ")?;
        let internal_port = self.ask("Enter new internal port: ")?;
        let protocol = self.ask("Enter new protocol (TCP or UDP): ")?;
        Ok(MappingInput {
            external_port,
            internal_port,
            protocol,
        })
    }
}
