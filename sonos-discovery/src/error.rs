//! Error types for the discovery system.

use std::fmt;

/// Error type for probe and scan operations.
///
/// A host that answers but is not a Sonos speaker is not an error; see
/// [`ProbeOutcome::NotFound`](crate::ProbeOutcome::NotFound).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// Connection refused, reset, or the HTTP client could not be built
    Network(String),
    /// The host did not answer within the probe timeout
    Timeout,
    /// The subnet string is not usable CIDR notation
    InvalidSubnet(String),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::Network(msg) => write!(f, "Network error: {}", msg),
            DiscoveryError::Timeout => write!(f, "Probe timed out"),
            DiscoveryError::InvalidSubnet(msg) => write!(f, "Invalid subnet: {}", msg),
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
