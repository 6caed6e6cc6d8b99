//! Sonos API operations organized by service

pub mod av_transport;
pub mod device_properties;
pub mod rendering_control;
pub mod zone_group_topology;

pub use av_transport::{
    BecomeCoordinatorOfStandaloneGroupOperation, BecomeCoordinatorOfStandaloneGroupOperationRequest,
    ConfigureSleepTimerOperation, ConfigureSleepTimerOperationRequest, GetCrossfadeModeOperation,
    GetCrossfadeModeOperationRequest, GetMediaInfoOperation, GetMediaInfoOperationRequest,
    GetPositionInfoOperation, GetPositionInfoOperationRequest,
    GetRemainingSleepTimerDurationOperation, GetRemainingSleepTimerDurationOperationRequest,
    GetTransportInfoOperation, GetTransportInfoOperationRequest, GetTransportSettingsOperation,
    GetTransportSettingsOperationRequest, MediaInfo, NextOperation, NextOperationRequest,
    PauseOperation, PauseOperationRequest, PlayMode, PlayOperation, PlayOperationRequest,
    PositionInfo, PreviousOperation, PreviousOperationRequest, RemoveAllTracksFromQueueOperation,
    RemoveAllTracksFromQueueOperationRequest, RepeatMode, SeekOperation, SeekOperationRequest,
    SeekTarget, SetAVTransportURIOperation, SetAVTransportURIOperationRequest,
    SetCrossfadeModeOperation, SetCrossfadeModeOperationRequest, SetPlayModeOperation,
    SetPlayModeOperationRequest, StopOperation, StopOperationRequest, TransportInfo,
    MAX_SLEEP_TIMER,
};
pub use device_properties::{
    GetButtonLockStateOperation, GetButtonLockStateOperationRequest, GetLedStateOperation,
    GetLedStateOperationRequest, SetButtonLockStateOperation, SetButtonLockStateOperationRequest,
    SetLedStateOperation, SetLedStateOperationRequest,
};
pub use rendering_control::{
    EqType, GetBassOperation, GetBassOperationRequest, GetEqOperation, GetEqOperationRequest,
    GetLoudnessOperation, GetLoudnessOperationRequest, GetMuteOperation, GetMuteOperationRequest,
    GetTrebleOperation, GetTrebleOperationRequest, GetVolumeOperation, GetVolumeOperationRequest,
    SetBassOperation, SetBassOperationRequest, SetEqOperation, SetEqOperationRequest,
    SetLoudnessOperation, SetLoudnessOperationRequest, SetMuteOperation, SetMuteOperationRequest,
    SetRelativeVolumeOperation, SetRelativeVolumeOperationRequest, SetTrebleOperation,
    SetTrebleOperationRequest, SetVolumeOperation, SetVolumeOperationRequest,
};
pub use zone_group_topology::{GetZoneGroupStateOperation, GetZoneGroupStateOperationRequest};
