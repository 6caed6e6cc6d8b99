//! DeviceProperties service operations
//!
//! The front status light and the capacitive touch controls.

use crate::define_upnp_operation;
use crate::operation::child_flag;

fn on_off(value: bool) -> &'static str {
    if value {
        "On"
    } else {
        "Off"
    }
}

define_upnp_operation! {
    operation: GetLedStateOperation,
    action: "GetLEDState",
    service: DeviceProperties,
    request: {},
    response: bool,
    payload: |_req| Ok(String::new()),
    parse: |xml| Ok(child_flag(xml, "CurrentLEDState")),
}

define_upnp_operation! {
    operation: SetLedStateOperation,
    action: "SetLEDState",
    service: DeviceProperties,
    request: {
        on: bool,
    },
    response: (),
    payload: |req| Ok(format!("<DesiredLEDState>{}</DesiredLEDState>", on_off(req.on))),
    parse: |_xml| Ok(()),
}

define_upnp_operation! {
    /// `true` when the touch controls are locked
    operation: GetButtonLockStateOperation,
    action: "GetButtonLockState",
    service: DeviceProperties,
    request: {},
    response: bool,
    payload: |_req| Ok(String::new()),
    parse: |xml| Ok(child_flag(xml, "CurrentButtonLockState")),
}

define_upnp_operation! {
    operation: SetButtonLockStateOperation,
    action: "SetButtonLockState",
    service: DeviceProperties,
    request: {
        locked: bool,
    },
    response: (),
    payload: |req| Ok(format!(
        "<DesiredButtonLockState>{}</DesiredButtonLockState>",
        on_off(req.locked)
    )),
    parse: |_xml| Ok(()),
}
