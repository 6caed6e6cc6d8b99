//! AVTransport service operations
//!
//! Playback control, queue management, play mode, sleep timer and the
//! transport-URI tricks Sonos uses for grouping.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

use crate::define_upnp_operation;
use crate::error::ApiError;
use crate::operation::{child_flag, child_text, child_value, ensure_range, upnp_bool, INSTANCE};
use crate::time::{format_hms, format_sleep_timer, parse_hms};

/// Longest sleep timer a speaker accepts
pub const MAX_SLEEP_TIMER: Duration = Duration::from_secs(2 * 60 * 60);

/// Result of GetTransportInfo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportInfo {
    /// `PLAYING`, `PAUSED_PLAYBACK`, `STOPPED`, `TRANSITIONING`
    pub current_transport_state: String,
    pub current_transport_status: String,
}

/// Result of GetPositionInfo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionInfo {
    /// 1-based queue position, 0 when nothing is loaded
    pub track: u32,
    pub track_duration: Option<Duration>,
    /// DIDL-Lite document, already unescaped once
    pub track_meta_data: String,
    pub track_uri: String,
    pub rel_time: Option<Duration>,
}

/// Result of GetMediaInfo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfo {
    pub nr_tracks: u32,
    pub current_uri: String,
    pub current_uri_meta_data: String,
}

/// Where a Seek should land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekTarget {
    /// Offset into the current track
    Time(Duration),
    /// 1-based position in the queue
    Track(u32),
}

/// Repeat setting, one axis of [`PlayMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    Off,
    All,
    One,
}

/// Sonos play mode, combining shuffle and repeat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayMode {
    Normal,
    RepeatAll,
    RepeatOne,
    ShuffleNorepeat,
    Shuffle,
    ShuffleRepeatOne,
}

impl PlayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayMode::Normal => "NORMAL",
            PlayMode::RepeatAll => "REPEAT_ALL",
            PlayMode::RepeatOne => "REPEAT_ONE",
            PlayMode::ShuffleNorepeat => "SHUFFLE_NOREPEAT",
            PlayMode::Shuffle => "SHUFFLE",
            PlayMode::ShuffleRepeatOne => "SHUFFLE_REPEAT_ONE",
        }
    }

    pub fn shuffle(&self) -> bool {
        matches!(
            self,
            PlayMode::ShuffleNorepeat | PlayMode::Shuffle | PlayMode::ShuffleRepeatOne
        )
    }

    pub fn repeat(&self) -> RepeatMode {
        match self {
            PlayMode::Normal | PlayMode::ShuffleNorepeat => RepeatMode::Off,
            PlayMode::RepeatAll | PlayMode::Shuffle => RepeatMode::All,
            PlayMode::RepeatOne | PlayMode::ShuffleRepeatOne => RepeatMode::One,
        }
    }

    /// Combine a shuffle flag and repeat setting into the single mode Sonos stores
    pub fn from_parts(shuffle: bool, repeat: RepeatMode) -> Self {
        match (shuffle, repeat) {
            (false, RepeatMode::Off) => PlayMode::Normal,
            (false, RepeatMode::All) => PlayMode::RepeatAll,
            (false, RepeatMode::One) => PlayMode::RepeatOne,
            (true, RepeatMode::Off) => PlayMode::ShuffleNorepeat,
            (true, RepeatMode::All) => PlayMode::Shuffle,
            (true, RepeatMode::One) => PlayMode::ShuffleRepeatOne,
        }
    }
}

impl Default for PlayMode {
    fn default() -> Self {
        PlayMode::Normal
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayMode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NORMAL" => Ok(PlayMode::Normal),
            "REPEAT_ALL" => Ok(PlayMode::RepeatAll),
            "REPEAT_ONE" => Ok(PlayMode::RepeatOne),
            "SHUFFLE_NOREPEAT" => Ok(PlayMode::ShuffleNorepeat),
            "SHUFFLE" => Ok(PlayMode::Shuffle),
            "SHUFFLE_REPEAT_ONE" => Ok(PlayMode::ShuffleRepeatOne),
            other => Err(ApiError::InvalidParameter(format!("Unknown play mode '{}'", other))),
        }
    }
}

// =============================================================================
// STATE QUERIES
// =============================================================================

define_upnp_operation! {
    operation: GetTransportInfoOperation,
    action: "GetTransportInfo",
    service: AVTransport,
    request: {},
    response: TransportInfo,
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |xml| Ok(TransportInfo {
        current_transport_state: child_text(xml, "CurrentTransportState"),
        current_transport_status: child_text(xml, "CurrentTransportStatus"),
    }),
}

define_upnp_operation! {
    operation: GetPositionInfoOperation,
    action: "GetPositionInfo",
    service: AVTransport,
    request: {},
    response: PositionInfo,
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |xml| Ok(PositionInfo {
        track: child_value(xml, "Track"),
        track_duration: parse_hms(&child_text(xml, "TrackDuration")),
        track_meta_data: child_text(xml, "TrackMetaData"),
        track_uri: child_text(xml, "TrackURI"),
        rel_time: parse_hms(&child_text(xml, "RelTime")),
    }),
}

define_upnp_operation! {
    operation: GetMediaInfoOperation,
    action: "GetMediaInfo",
    service: AVTransport,
    request: {},
    response: MediaInfo,
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |xml| Ok(MediaInfo {
        nr_tracks: child_value(xml, "NrTracks"),
        current_uri: child_text(xml, "CurrentURI"),
        current_uri_meta_data: child_text(xml, "CurrentURIMetaData"),
    }),
}

define_upnp_operation! {
    operation: GetTransportSettingsOperation,
    action: "GetTransportSettings",
    service: AVTransport,
    request: {},
    response: PlayMode,
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |xml| Ok(child_text(xml, "PlayMode").parse().unwrap_or_default()),
}

define_upnp_operation! {
    operation: GetCrossfadeModeOperation,
    action: "GetCrossfadeMode",
    service: AVTransport,
    request: {},
    response: bool,
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |xml| Ok(child_flag(xml, "CrossfadeMode")),
}

define_upnp_operation! {
    /// Remaining sleep time, `None` when no timer is set
    operation: GetRemainingSleepTimerDurationOperation,
    action: "GetRemainingSleepTimerDuration",
    service: AVTransport,
    request: {},
    response: Option<Duration>,
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |xml| Ok(parse_hms(&child_text(xml, "RemainingSleepTimerDuration"))),
}

// =============================================================================
// BASIC PLAYBACK CONTROL
// =============================================================================

define_upnp_operation! {
    operation: PlayOperation,
    action: "Play",
    service: AVTransport,
    request: {},
    response: (),
    payload: |_req| Ok(format!("{}<Speed>1</Speed>", INSTANCE)),
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    operation: PauseOperation,
    action: "Pause",
    service: AVTransport,
    request: {},
    response: (),
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    operation: StopOperation,
    action: "Stop",
    service: AVTransport,
    request: {},
    response: (),
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    operation: NextOperation,
    action: "Next",
    service: AVTransport,
    request: {},
    response: (),
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    operation: PreviousOperation,
    action: "Previous",
    service: AVTransport,
    request: {},
    response: (),
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    operation: SeekOperation,
    action: "Seek",
    service: AVTransport,
    request: {
        target: SeekTarget,
    },
    response: (),
    payload: |req| match req.target {
        SeekTarget::Time(offset) => Ok(format!(
            "{}<Unit>REL_TIME</Unit><Target>{}</Target>",
            INSTANCE,
            format_hms(offset)
        )),
        SeekTarget::Track(0) => Err(ApiError::InvalidParameter(
            "Track numbers start at 1".to_string(),
        )),
        SeekTarget::Track(n) => Ok(format!(
            "{}<Unit>TRACK_NR</Unit><Target>{}</Target>",
            INSTANCE, n
        )),
    },
    parse: |_xml| Ok(()),
}

// =============================================================================
// SETTINGS AND QUEUE
// =============================================================================

define_upnp_operation! {
    operation: SetPlayModeOperation,
    action: "SetPlayMode",
    service: AVTransport,
    request: {
        mode: PlayMode,
    },
    response: (),
    payload: |req| Ok(format!("{}<NewPlayMode>{}</NewPlayMode>", INSTANCE, req.mode)),
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    operation: SetCrossfadeModeOperation,
    action: "SetCrossfadeMode",
    service: AVTransport,
    request: {
        enabled: bool,
    },
    response: (),
    payload: |req| Ok(format!(
        "{}<CrossfadeMode>{}</CrossfadeMode>",
        INSTANCE,
        upnp_bool(req.enabled)
    )),
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    operation: RemoveAllTracksFromQueueOperation,
    action: "RemoveAllTracksFromQueue",
    service: AVTransport,
    request: {},
    response: (),
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    /// Replace what the speaker is playing, also used to join a group via `x-rincon:`
    operation: SetAVTransportURIOperation,
    action: "SetAVTransportURI",
    service: AVTransport,
    request: {
        uri: String,
        metadata: String,
    },
    response: (),
    payload: |req| {
        if req.uri.trim().is_empty() {
            return Err(ApiError::InvalidParameter("uri must not be empty".to_string()));
        }
        Ok(format!(
            "{}<CurrentURI>{}</CurrentURI><CurrentURIMetaData>{}</CurrentURIMetaData>",
            INSTANCE,
            escape(req.uri.as_str()),
            escape(req.metadata.as_str())
        ))
    },
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    /// Leave the current group and become a group of one
    operation: BecomeCoordinatorOfStandaloneGroupOperation,
    action: "BecomeCoordinatorOfStandaloneGroup",
    service: AVTransport,
    request: {},
    response: (),
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    /// Set (`Some`) or clear (`None`) the sleep timer
    operation: ConfigureSleepTimerOperation,
    action: "ConfigureSleepTimer",
    service: AVTransport,
    request: {
        duration: Option<Duration>,
    },
    response: (),
    payload: |req| {
        let value = match req.duration {
            Some(duration) => {
                ensure_range(
                    "sleep_timer",
                    duration.as_secs() as i64,
                    1,
                    MAX_SLEEP_TIMER.as_secs() as i64,
                )?;
                format_sleep_timer(duration)
            }
            None => String::new(),
        };
        Ok(format!(
            "{}<NewSleepTimerDuration>{}</NewSleepTimerDuration>",
            INSTANCE, value
        ))
    },
    parse: |_xml| Ok(()),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::SonosOperation;
    use rstest::rstest;
    use xmltree::Element;

    #[rstest]
    #[case(false, RepeatMode::Off, PlayMode::Normal)]
    #[case(false, RepeatMode::All, PlayMode::RepeatAll)]
    #[case(false, RepeatMode::One, PlayMode::RepeatOne)]
    #[case(true, RepeatMode::Off, PlayMode::ShuffleNorepeat)]
    #[case(true, RepeatMode::All, PlayMode::Shuffle)]
    #[case(true, RepeatMode::One, PlayMode::ShuffleRepeatOne)]
    fn test_play_mode_parts(#[case] shuffle: bool, #[case] repeat: RepeatMode, #[case] mode: PlayMode) {
        assert_eq!(PlayMode::from_parts(shuffle, repeat), mode);
        assert_eq!(mode.shuffle(), shuffle);
        assert_eq!(mode.repeat(), repeat);
        assert_eq!(mode.as_str().parse::<PlayMode>().unwrap(), mode);
    }

    #[test]
    fn test_seek_payload() {
        let payload = SeekOperation::build_payload(&SeekOperationRequest {
            target: SeekTarget::Time(Duration::from_secs(95)),
        })
        .unwrap();
        assert_eq!(
            payload,
            "<InstanceID>0</InstanceID><Unit>REL_TIME</Unit><Target>0:01:35</Target>"
        );

        assert!(SeekOperation::build_payload(&SeekOperationRequest {
            target: SeekTarget::Track(0),
        })
        .is_err());
    }

    #[test]
    fn test_sleep_timer_payload_bounds() {
        let set = ConfigureSleepTimerOperation::build_payload(&ConfigureSleepTimerOperationRequest {
            duration: Some(Duration::from_secs(900)),
        })
        .unwrap();
        assert!(set.contains("<NewSleepTimerDuration>00:15:00</NewSleepTimerDuration>"));

        let clear = ConfigureSleepTimerOperation::build_payload(&ConfigureSleepTimerOperationRequest {
            duration: None,
        })
        .unwrap();
        assert!(clear.contains("<NewSleepTimerDuration></NewSleepTimerDuration>"));

        for bad in [0, 7201] {
            let err = ConfigureSleepTimerOperation::build_payload(&ConfigureSleepTimerOperationRequest {
                duration: Some(Duration::from_secs(bad)),
            })
            .unwrap_err();
            assert!(matches!(err, ApiError::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_set_uri_escapes_arguments() {
        let payload = SetAVTransportURIOperation::build_payload(&SetAVTransportURIOperationRequest {
            uri: "x-rincon:RINCON_A".to_string(),
            metadata: "<DIDL-Lite/>".to_string(),
        })
        .unwrap();
        assert!(payload.contains("<CurrentURI>x-rincon:RINCON_A</CurrentURI>"));
        assert!(payload.contains("<CurrentURIMetaData>&lt;DIDL-Lite/&gt;</CurrentURIMetaData>"));
    }

    #[test]
    fn test_parse_position_info() {
        let xml = Element::parse(
            r#"<u:GetPositionInfoResponse xmlns:u="urn:schemas-upnp-org:service:AVTransport:1">
                <Track>3</Track>
                <TrackDuration>0:04:10</TrackDuration>
                <TrackMetaData>&lt;DIDL-Lite&gt;&lt;/DIDL-Lite&gt;</TrackMetaData>
                <TrackURI>x-file-cifs://nas/music/song.flac</TrackURI>
                <RelTime>0:01:02</RelTime>
            </u:GetPositionInfoResponse>"#
                .as_bytes(),
        )
        .unwrap();

        let info = GetPositionInfoOperation::parse_response(&xml).unwrap();
        assert_eq!(info.track, 3);
        assert_eq!(info.track_duration, Some(Duration::from_secs(250)));
        assert_eq!(info.rel_time, Some(Duration::from_secs(62)));
        assert_eq!(info.track_meta_data, "<DIDL-Lite></DIDL-Lite>");
        assert_eq!(info.track_uri, "x-file-cifs://nas/music/song.flac");
    }

    #[test]
    fn test_parse_remaining_sleep_timer() {
        let empty = Element::parse(
            "<R><RemainingSleepTimerDuration></RemainingSleepTimerDuration></R>".as_bytes(),
        )
        .unwrap();
        assert_eq!(GetRemainingSleepTimerDurationOperation::parse_response(&empty).unwrap(), None);

        let set = Element::parse(
            "<R><RemainingSleepTimerDuration>0:09:59</RemainingSleepTimerDuration></R>".as_bytes(),
        )
        .unwrap();
        assert_eq!(
            GetRemainingSleepTimerDurationOperation::parse_response(&set).unwrap(),
            Some(Duration::from_secs(599))
        );
    }
}
