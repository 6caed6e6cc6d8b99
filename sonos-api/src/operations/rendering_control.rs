//! RenderingControl service operations
//!
//! Volume, mute, tone and the soundbar-only EQ settings. Every action targets
//! the `Master` channel.

use serde::{Deserialize, Serialize};

use crate::define_upnp_operation;
use crate::operation::{child_flag, child_value, ensure_range, upnp_bool, INSTANCE};

const MASTER: &str = "<Channel>Master</Channel>";

/// Soundbar EQ settings exposed through GetEQ/SetEQ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EqType {
    NightMode,
    /// Speech enhancement
    DialogLevel,
}

impl EqType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EqType::NightMode => "NightMode",
            EqType::DialogLevel => "DialogLevel",
        }
    }
}

define_upnp_operation! {
    operation: GetVolumeOperation,
    action: "GetVolume",
    service: RenderingControl,
    request: {},
    response: u8,
    payload: |_req| Ok(format!("{}{}", INSTANCE, MASTER)),
    parse: |xml| Ok(child_value(xml, "CurrentVolume")),
}

define_upnp_operation! {
    operation: SetVolumeOperation,
    action: "SetVolume",
    service: RenderingControl,
    request: {
        volume: u8,
    },
    response: (),
    payload: |req| {
        ensure_range("volume", i64::from(req.volume), 0, 100)?;
        Ok(format!(
            "{}{}<DesiredVolume>{}</DesiredVolume>",
            INSTANCE, MASTER, req.volume
        ))
    },
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    /// Nudge the volume; the speaker clamps to 0..=100 and returns the new level
    operation: SetRelativeVolumeOperation,
    action: "SetRelativeVolume",
    service: RenderingControl,
    request: {
        adjustment: i8,
    },
    response: u8,
    payload: |req| {
        ensure_range("adjustment", i64::from(req.adjustment), -100, 100)?;
        Ok(format!(
            "{}{}<Adjustment>{}</Adjustment>",
            INSTANCE, MASTER, req.adjustment
        ))
    },
    parse: |xml| Ok(child_value(xml, "NewVolume")),
}

define_upnp_operation! {
    operation: GetMuteOperation,
    action: "GetMute",
    service: RenderingControl,
    request: {},
    response: bool,
    payload: |_req| Ok(format!("{}{}", INSTANCE, MASTER)),
    parse: |xml| Ok(child_flag(xml, "CurrentMute")),
}

define_upnp_operation! {
    operation: SetMuteOperation,
    action: "SetMute",
    service: RenderingControl,
    request: {
        muted: bool,
    },
    response: (),
    payload: |req| Ok(format!(
        "{}{}<DesiredMute>{}</DesiredMute>",
        INSTANCE,
        MASTER,
        upnp_bool(req.muted)
    )),
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    operation: GetBassOperation,
    action: "GetBass",
    service: RenderingControl,
    request: {},
    response: i8,
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |xml| Ok(child_value(xml, "CurrentBass")),
}

define_upnp_operation! {
    operation: SetBassOperation,
    action: "SetBass",
    service: RenderingControl,
    request: {
        level: i8,
    },
    response: (),
    payload: |req| {
        ensure_range("bass", i64::from(req.level), -10, 10)?;
        Ok(format!("{}<DesiredBass>{}</DesiredBass>", INSTANCE, req.level))
    },
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    operation: GetTrebleOperation,
    action: "GetTreble",
    service: RenderingControl,
    request: {},
    response: i8,
    payload: |_req| Ok(INSTANCE.to_string()),
    parse: |xml| Ok(child_value(xml, "CurrentTreble")),
}

define_upnp_operation! {
    operation: SetTrebleOperation,
    action: "SetTreble",
    service: RenderingControl,
    request: {
        level: i8,
    },
    response: (),
    payload: |req| {
        ensure_range("treble", i64::from(req.level), -10, 10)?;
        Ok(format!("{}<DesiredTreble>{}</DesiredTreble>", INSTANCE, req.level))
    },
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    operation: GetLoudnessOperation,
    action: "GetLoudness",
    service: RenderingControl,
    request: {},
    response: bool,
    payload: |_req| Ok(format!("{}{}", INSTANCE, MASTER)),
    parse: |xml| Ok(child_flag(xml, "CurrentLoudness")),
}

define_upnp_operation! {
    operation: SetLoudnessOperation,
    action: "SetLoudness",
    service: RenderingControl,
    request: {
        enabled: bool,
    },
    response: (),
    payload: |req| Ok(format!(
        "{}{}<DesiredLoudness>{}</DesiredLoudness>",
        INSTANCE,
        MASTER,
        upnp_bool(req.enabled)
    )),
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    operation: GetEqOperation,
    action: "GetEQ",
    service: RenderingControl,
    request: {
        eq_type: EqType,
    },
    response: i32,
    payload: |req| Ok(format!("{}<EQType>{}</EQType>", INSTANCE, req.eq_type.as_str())),
    parse: |xml| Ok(child_value(xml, "CurrentValue")),
}

define_upnp_operation! {
    operation: SetEqOperation,
    action: "SetEQ",
    service: RenderingControl,
    request: {
        eq_type: EqType,
        value: i32,
    },
    response: (),
    payload: |req| Ok(format!(
        "{}<EQType>{}</EQType><DesiredValue>{}</DesiredValue>",
        INSTANCE,
        req.eq_type.as_str(),
        req.value
    )),
    parse: |_xml| Ok(()),
}
