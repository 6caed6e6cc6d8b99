//! The network seam between the coordinator and the speakers
//!
//! The coordinator core only talks to [`SpeakerTransport`]. Production code
//! uses [`NetworkTransport`]; tests script their own.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use parking_lot::Mutex;
use sonos_api::operations::*;
use sonos_api::{ApiError, SoapClient, SonosClient, SonosOperation, DEFAULT_CONNECT_TIMEOUT};
use sonos_discovery::{ProbeOutcome, Prober};
use tracing::{debug, trace};

use crate::model::{PlaybackState, TransportState};

/// Transport controls that act on a whole group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportCommand {
    Play,
    Pause,
    Stop,
    Next,
    Previous,
}

impl TransportCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportCommand::Play => "play",
            TransportCommand::Pause => "pause",
            TransportCommand::Stop => "stop",
            TransportCommand::Next => "next",
            TransportCommand::Previous => "previous",
        }
    }
}

/// A control action against one speaker
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Transport(TransportCommand),
    SetVolume(u8),
    /// Relative change; the speaker clamps the result to 0..=100
    VolumeStep(i8),
    SetMute(bool),
    SetBass(i8),
    SetTreble(i8),
    SetLoudness(bool),
    SetNightMode(bool),
    SetSpeechEnhancement(bool),
    SetStatusLight(bool),
    SetTouchControls(bool),
    SetCrossfade(bool),
    SetPlayMode(PlayMode),
    Seek(SeekTarget),
    ClearQueue,
    PlayUri { uri: String, title: String },
    /// Follow the group anchored by the speaker with this UUID
    Join { coordinator_uuid: String },
    Unjoin,
    /// `None` clears the timer
    SleepTimer(Option<Duration>),
}

impl Command {
    /// Commands a group member cannot take itself; they go to its coordinator
    pub fn is_group_scoped(&self) -> bool {
        matches!(
            self,
            Command::Transport(_)
                | Command::SetCrossfade(_)
                | Command::SetPlayMode(_)
                | Command::Seek(_)
                | Command::ClearQueue
                | Command::PlayUri { .. }
                | Command::SleepTimer(_)
        )
    }
}

/// Everything the coordinator needs from the network.
///
/// Implementations block; the coordinator runs them on its own threads and
/// bounds how long it waits.
pub trait SpeakerTransport: Send + Sync + 'static {
    /// Classify `address` within `timeout`
    fn probe(&self, address: Ipv4Addr, timeout: Duration) -> sonos_discovery::Result<ProbeOutcome>;

    /// Gather a full [`PlaybackState`]
    fn poll(&self, address: Ipv4Addr) -> Result<PlaybackState, ApiError>;

    /// The household zone group document as seen by `address`
    fn zone_group_state(&self, address: Ipv4Addr) -> Result<String, ApiError>;

    fn execute(&self, address: Ipv4Addr, command: &Command) -> Result<(), ApiError>;
}

/// [`SpeakerTransport`] over SOAP and HTTP
#[derive(Debug)]
pub struct NetworkTransport {
    client: SonosClient,
    probers: Mutex<HashMap<Duration, Prober>>,
    port: u16,
}

impl NetworkTransport {
    /// Each SOAP call gives up after `call_timeout`
    pub fn new(call_timeout: Duration) -> Self {
        let connect = call_timeout.min(DEFAULT_CONNECT_TIMEOUT);
        Self::with_client(SonosClient::with_soap_client(SoapClient::with_timeouts(connect, call_timeout)))
    }

    pub fn with_client(client: SonosClient) -> Self {
        let port = client.soap_client().port();
        Self {
            client,
            probers: Mutex::new(HashMap::new()),
            port,
        }
    }

    /// Talk to a non-standard port, for local test servers
    pub fn with_port(self, port: u16) -> Self {
        let soap = self.client.soap_client().clone().with_port(port);
        Self {
            client: SonosClient::with_soap_client(soap),
            probers: Mutex::new(HashMap::new()),
            port,
        }
    }

    pub fn client(&self) -> &SonosClient {
        &self.client
    }

    fn prober(&self, timeout: Duration) -> sonos_discovery::Result<Prober> {
        let mut probers = self.probers.lock();
        if let Some(prober) = probers.get(&timeout) {
            return Ok(prober.clone());
        }
        let prober = Prober::new(timeout)?.with_port(self.port);
        probers.insert(timeout, prober.clone());
        Ok(prober)
    }

    fn call<Op: SonosOperation>(&self, address: Ipv4Addr, request: &Op::Request) -> Result<Op::Response, ApiError> {
        self.client.execute::<Op>(address, request)
    }

    /// Settings some models lack; a refusal reads as "not available"
    fn optional<Op: SonosOperation>(&self, address: Ipv4Addr, request: &Op::Request) -> Option<Op::Response> {
        match self.call::<Op>(address, request) {
            Ok(value) => Some(value),
            Err(e) if e.is_unsupported() => {
                trace!(%address, action = Op::ACTION, "not supported");
                None
            }
            Err(e) => {
                debug!(%address, error = %e, "optional poll failed");
                None
            }
        }
    }
}

impl SpeakerTransport for NetworkTransport {
    fn probe(&self, address: Ipv4Addr, timeout: Duration) -> sonos_discovery::Result<ProbeOutcome> {
        self.prober(timeout)?.probe_one(address)
    }

    fn poll(&self, address: Ipv4Addr) -> Result<PlaybackState, ApiError> {
        let info = self.call::<GetTransportInfoOperation>(address, &GetTransportInfoOperationRequest {})?;
        let volume = self.call::<GetVolumeOperation>(address, &GetVolumeOperationRequest {})?;
        let muted = self.call::<GetMuteOperation>(address, &GetMuteOperationRequest {})?;
        let position = self.call::<GetPositionInfoOperation>(address, &GetPositionInfoOperationRequest {})?;

        let base = format!("http://{}:{}", address, self.port);
        let track = sonos_parser::extract_with_uri(&position.track_meta_data, &position.track_uri).with_base(&base);
        let media = self.optional::<GetMediaInfoOperation>(address, &GetMediaInfoOperationRequest {});

        Ok(PlaybackState {
            transport_state: TransportState::from_transport_state(&info.current_transport_state),
            volume,
            muted,
            track,
            track_number: position.track,
            position: position.rel_time,
            duration: position.track_duration,
            queue_length: media.map(|m| m.nr_tracks),
            play_mode: self.optional::<GetTransportSettingsOperation>(address, &GetTransportSettingsOperationRequest {}),
            crossfade: self.optional::<GetCrossfadeModeOperation>(address, &GetCrossfadeModeOperationRequest {}),
            bass: self.optional::<GetBassOperation>(address, &GetBassOperationRequest {}),
            treble: self.optional::<GetTrebleOperation>(address, &GetTrebleOperationRequest {}),
            loudness: self.optional::<GetLoudnessOperation>(address, &GetLoudnessOperationRequest {}),
            night_mode: self
                .optional::<GetEqOperation>(address, &GetEqOperationRequest { eq_type: EqType::NightMode })
                .map(|v| v != 0),
            speech_enhancement: self
                .optional::<GetEqOperation>(address, &GetEqOperationRequest { eq_type: EqType::DialogLevel })
                .map(|v| v != 0),
            status_light: self.optional::<GetLedStateOperation>(address, &GetLedStateOperationRequest {}),
            touch_controls: self
                .optional::<GetButtonLockStateOperation>(address, &GetButtonLockStateOperationRequest {})
                .map(|locked| !locked),
            sleep_timer: self
                .optional::<GetRemainingSleepTimerDurationOperation>(
                    address,
                    &GetRemainingSleepTimerDurationOperationRequest {},
                )
                .flatten(),
        })
    }

    fn zone_group_state(&self, address: Ipv4Addr) -> Result<String, ApiError> {
        self.call::<GetZoneGroupStateOperation>(address, &GetZoneGroupStateOperationRequest {})
    }

    fn execute(&self, address: Ipv4Addr, command: &Command) -> Result<(), ApiError> {
        debug!(%address, ?command, "executing command");
        match command {
            Command::Transport(TransportCommand::Play) => self.call::<PlayOperation>(address, &PlayOperationRequest {}),
            Command::Transport(TransportCommand::Pause) => self.call::<PauseOperation>(address, &PauseOperationRequest {}),
            Command::Transport(TransportCommand::Stop) => self.call::<StopOperation>(address, &StopOperationRequest {}),
            Command::Transport(TransportCommand::Next) => self.call::<NextOperation>(address, &NextOperationRequest {}),
            Command::Transport(TransportCommand::Previous) => {
                self.call::<PreviousOperation>(address, &PreviousOperationRequest {})
            }
            Command::SetVolume(volume) => {
                self.call::<SetVolumeOperation>(address, &SetVolumeOperationRequest { volume: *volume })
            }
            Command::VolumeStep(adjustment) => self
                .call::<SetRelativeVolumeOperation>(
                    address,
                    &SetRelativeVolumeOperationRequest { adjustment: *adjustment },
                )
                .map(|_| ()),
            Command::SetMute(muted) => self.call::<SetMuteOperation>(address, &SetMuteOperationRequest { muted: *muted }),
            Command::SetBass(level) => self.call::<SetBassOperation>(address, &SetBassOperationRequest { level: *level }),
            Command::SetTreble(level) => {
                self.call::<SetTrebleOperation>(address, &SetTrebleOperationRequest { level: *level })
            }
            Command::SetLoudness(enabled) => {
                self.call::<SetLoudnessOperation>(address, &SetLoudnessOperationRequest { enabled: *enabled })
            }
            Command::SetNightMode(enabled) => self.call::<SetEqOperation>(
                address,
                &SetEqOperationRequest {
                    eq_type: EqType::NightMode,
                    value: i32::from(*enabled),
                },
            ),
            Command::SetSpeechEnhancement(enabled) => self.call::<SetEqOperation>(
                address,
                &SetEqOperationRequest {
                    eq_type: EqType::DialogLevel,
                    value: i32::from(*enabled),
                },
            ),
            Command::SetStatusLight(on) => self.call::<SetLedStateOperation>(address, &SetLedStateOperationRequest { on: *on }),
            Command::SetTouchControls(enabled) => self.call::<SetButtonLockStateOperation>(
                address,
                &SetButtonLockStateOperationRequest { locked: !*enabled },
            ),
            Command::SetCrossfade(enabled) => {
                self.call::<SetCrossfadeModeOperation>(address, &SetCrossfadeModeOperationRequest { enabled: *enabled })
            }
            Command::SetPlayMode(mode) => self.call::<SetPlayModeOperation>(address, &SetPlayModeOperationRequest { mode: *mode }),
            Command::Seek(target) => self.call::<SeekOperation>(address, &SeekOperationRequest { target: *target }),
            Command::ClearQueue => {
                self.call::<RemoveAllTracksFromQueueOperation>(address, &RemoveAllTracksFromQueueOperationRequest {})
            }
            Command::PlayUri { uri, title } => self.client.play_uri(address, uri, title),
            Command::Join { coordinator_uuid } => self.client.join_group(address, coordinator_uuid),
            Command::Unjoin => self.client.leave_group(address),
            Command::SleepTimer(duration) => self.call::<ConfigureSleepTimerOperation>(
                address,
                &ConfigureSleepTimerOperationRequest { duration: *duration },
            ),
        }
    }
}
