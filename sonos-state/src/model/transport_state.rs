//! Transport state enumeration

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the speaker's transport is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    Playing,
    Paused,
    #[default]
    Stopped,
    /// Buffering or switching sources
    Transitioning,
}

impl TransportState {
    /// Parse from a Sonos `CurrentTransportState` value
    ///
    /// Handles `PLAYING`, `PAUSED_PLAYBACK`, `STOPPED`, `TRANSITIONING` and
    /// `NO_MEDIA_PRESENT`; anything unrecognised counts as stopped.
    pub fn from_transport_state(state: &str) -> Self {
        match state.trim().to_uppercase().as_str() {
            "PLAYING" => TransportState::Playing,
            "PAUSED_PLAYBACK" | "PAUSED" => TransportState::Paused,
            "TRANSITIONING" => TransportState::Transitioning,
            _ => TransportState::Stopped,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, TransportState::Playing | TransportState::Transitioning)
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransportState::Playing => "playing",
            TransportState::Paused => "paused",
            TransportState::Stopped => "stopped",
            TransportState::Transitioning => "transitioning",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PLAYING", TransportState::Playing)]
    #[case("playing", TransportState::Playing)]
    #[case("PAUSED_PLAYBACK", TransportState::Paused)]
    #[case("TRANSITIONING", TransportState::Transitioning)]
    #[case("STOPPED", TransportState::Stopped)]
    #[case("NO_MEDIA_PRESENT", TransportState::Stopped)]
    #[case("", TransportState::Stopped)]
    fn test_from_transport_state(#[case] raw: &str, #[case] expected: TransportState) {
        assert_eq!(TransportState::from_transport_state(raw), expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(TransportState::Paused.to_string(), "paused");
    }
}
