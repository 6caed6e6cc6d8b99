//! Known speakers and their reachability

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sonos_discovery::SpeakerIdentity;

use super::PlaybackState;

/// Reachability of a known speaker.
///
/// ```text
/// Discovered --poll ok--> Reachable <--poll ok / poll failed--> Unreachable
/// ```
///
/// Removal is not a state: a removed speaker leaves the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    /// Probed successfully but not yet polled
    Discovered,
    Reachable,
    Unreachable,
}

/// The coordinator's record for one speaker
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerRecord {
    pub identity: SpeakerIdentity,
    pub reachability: Reachability,
    /// Polls failed in a row since the last success
    pub consecutive_failures: u32,
    pub last_seen: Option<DateTime<Utc>>,
    /// State from the most recent successful poll
    pub playback: Option<PlaybackState>,
}

impl SpeakerRecord {
    pub fn new(identity: SpeakerIdentity) -> Self {
        Self {
            identity,
            reachability: Reachability::Discovered,
            consecutive_failures: 0,
            last_seen: None,
            playback: None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.reachability == Reachability::Reachable
    }

    /// Replace the playback state wholesale and mark the speaker reachable
    pub fn record_success(&mut self, playback: PlaybackState, at: DateTime<Utc>) {
        self.reachability = Reachability::Reachable;
        self.consecutive_failures = 0;
        self.last_seen = Some(at);
        self.playback = Some(playback);
    }

    /// Mark the speaker unreachable; it stays known and is polled again next cycle
    pub fn record_failure(&mut self) {
        self.reachability = Reachability::Unreachable;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn record() -> SpeakerRecord {
        SpeakerRecord::new(SpeakerIdentity {
            uuid: "RINCON_1".to_string(),
            address: Ipv4Addr::new(10, 0, 0, 1),
            room_name: "Office".to_string(),
            model_name: "Sonos One".to_string(),
            model_number: None,
            software_version: None,
            hardware_version: None,
            serial_number: None,
            mac_address: None,
        })
    }

    #[test]
    fn test_transitions() {
        let mut speaker = record();
        assert_eq!(speaker.reachability, Reachability::Discovered);
        assert!(!speaker.is_reachable());

        speaker.record_success(PlaybackState::default(), Utc::now());
        assert!(speaker.is_reachable());

        speaker.record_failure();
        speaker.record_failure();
        assert_eq!(speaker.reachability, Reachability::Unreachable);
        assert_eq!(speaker.consecutive_failures, 2);
        assert!(speaker.playback.is_some());

        speaker.record_success(PlaybackState { volume: 30, ..PlaybackState::default() }, Utc::now());
        assert_eq!(speaker.consecutive_failures, 0);
        assert_eq!(speaker.playback.as_ref().map(|p| p.volume), Some(30));
    }
}
