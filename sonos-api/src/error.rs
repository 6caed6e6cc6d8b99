use soap_client::{SoapError, TransportError};
use thiserror::Error;

/// High-level API errors for Sonos operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The SOAP exchange itself failed
    ///
    /// Carries the speaker address, the action and the underlying cause
    /// (network failure, HTTP status, malformed envelope or SOAP fault).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid parameter value
    ///
    /// Returned before any network I/O when an operation parameter is out of
    /// range, e.g. a volume above 100 or a sleep timer longer than two hours.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ApiError {
    /// UPnP fault code, if the device rejected the call with a SOAP fault
    pub fn fault_code(&self) -> Option<u16> {
        match self {
            ApiError::Transport(err) => err.cause.fault_code(),
            ApiError::InvalidParameter(_) => None,
        }
    }

    /// The underlying transport error, if any
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            ApiError::Transport(err) => Some(err),
            ApiError::InvalidParameter(_) => None,
        }
    }

    /// Whether the device answered but does not implement the action
    ///
    /// Non-soundbar speakers reject the NightMode and DialogLevel EQ types
    /// with a fault instead of omitting them.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(TransportError {
                cause: SoapError::Fault { .. } | SoapError::HttpStatus(404),
                ..
            })
        )
    }

    pub(crate) fn range(parameter: &str, value: impl std::fmt::Display, min: i64, max: i64) -> Self {
        ApiError::InvalidParameter(format!(
            "Parameter '{}' value {} is out of range [{}, {}]",
            parameter, value, min, max
        ))
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
