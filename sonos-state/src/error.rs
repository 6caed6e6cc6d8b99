//! Error types for sonos-state

use std::net::Ipv4Addr;

use sonos_api::ApiError;
use sonos_discovery::DiscoveryError;
use thiserror::Error;

/// Result type for sonos-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors surfaced by the coordinator's command surface.
///
/// Poll-cycle failures never show up here; they only change a speaker's
/// reachability.
#[derive(Debug, Error)]
pub enum StateError {
    /// A command named a speaker the coordinator does not know
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// The address answered, but not as a Sonos speaker
    #[error("{0} is not a Sonos speaker")]
    NotASpeaker(Ipv4Addr),

    /// The speaker rejected or failed the call
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The command makes no sense for the current topology
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// The background worker is already running
    #[error("Polling is already running")]
    AlreadyRunning,

    #[error("Worker error: {0}")]
    Worker(String),
}

impl StateError {
    /// The SOAP fault code, when the speaker answered with a fault
    pub fn fault_code(&self) -> Option<u16> {
        match self {
            StateError::Api(err) => err.fault_code(),
            _ => None,
        }
    }
}
