//! Error types for the SOAP client

use std::net::Ipv4Addr;
use thiserror::Error;

/// The underlying reason a single SOAP exchange failed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SoapError {
    /// Connection, DNS, timeout or body read failure
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The device answered with a non-2xx status and no SOAP fault body
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// XML parsing error or unexpected envelope shape
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// SOAP fault returned by the device
    #[error("SOAP fault {code}: {description}")]
    Fault { code: u16, description: String },
}

impl SoapError {
    /// Whether a caller-side retry has a reasonable chance of succeeding
    pub fn is_transient(&self) -> bool {
        match self {
            SoapError::Network(_) => true,
            SoapError::HttpStatus(status) => *status >= 500,
            SoapError::Parse(_) | SoapError::Fault { .. } => false,
        }
    }

    /// UPnP error code when the device replied with a fault
    pub fn fault_code(&self) -> Option<u16> {
        match self {
            SoapError::Fault { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// A failed call against one speaker, carrying enough context for diagnostics
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{action} on {address} failed: {cause}")]
pub struct TransportError {
    pub address: Ipv4Addr,
    pub action: String,
    #[source]
    pub cause: SoapError,
}

impl TransportError {
    pub fn new(address: Ipv4Addr, action: impl Into<String>, cause: SoapError) -> Self {
        Self {
            address,
            action: action.into(),
            cause,
        }
    }
}
