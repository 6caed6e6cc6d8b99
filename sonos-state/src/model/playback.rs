//! Per-speaker playback state gathered by one poll

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sonos_api::operations::PlayMode;
use sonos_parser::TrackRecord;

use super::TransportState;

/// Everything one poll learned about a speaker.
///
/// Built whole by the transport on every successful poll and swapped into
/// the registry in one piece. Settings that not every model supports (EQ on
/// non-soundbars, for instance) are `None` when the speaker refused them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaybackState {
    pub transport_state: TransportState,
    pub volume: u8,
    pub muted: bool,
    pub track: TrackRecord,
    /// 1-based queue position, 0 when nothing is loaded
    pub track_number: u32,
    #[serde(with = "optional_secs", default)]
    pub position: Option<Duration>,
    #[serde(with = "optional_secs", default)]
    pub duration: Option<Duration>,
    /// Number of tracks in the queue, when the speaker reported it
    pub queue_length: Option<u32>,
    pub play_mode: Option<PlayMode>,
    pub crossfade: Option<bool>,
    pub bass: Option<i8>,
    pub treble: Option<i8>,
    pub loudness: Option<bool>,
    pub night_mode: Option<bool>,
    pub speech_enhancement: Option<bool>,
    pub status_light: Option<bool>,
    /// False when the buttons on the speaker are locked
    pub touch_controls: Option<bool>,
    #[serde(with = "optional_secs", default)]
    pub sleep_timer: Option<Duration>,
}

impl PlaybackState {
    pub fn has_queue(&self) -> bool {
        self.queue_length.map_or(false, |n| n > 0)
    }

    pub fn shuffle(&self) -> Option<bool> {
        self.play_mode.map(|mode| mode.shuffle())
    }
}

/// Durations as whole seconds on the wire
pub(crate) mod optional_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}
