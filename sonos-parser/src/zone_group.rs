//! ZoneGroupTopology document model
//!
//! `GetZoneGroupState` returns the household's grouping as a nested XML
//! document. Current firmware wraps it in a `ZoneGroupState` root with a
//! `ZoneGroups` child; older firmware returns a bare `ZoneGroups` root. Both
//! parse to the same list of [`ZoneGroup`]s.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::common::xml_decode;
use crate::error::{ParseError, ParseResult};

/// Root of the current document shape.
///
/// ```xml
/// <ZoneGroupState>
///   <ZoneGroups>
///     <ZoneGroup Coordinator="RINCON_A" ID="RINCON_A:12">
///       <ZoneGroupMember UUID="RINCON_A" Location="http://192.168.1.10:1400/xml/device_description.xml" ZoneName="Kitchen"/>
///     </ZoneGroup>
///   </ZoneGroups>
///   <VanishedDevices/>
/// </ZoneGroupState>
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename = "ZoneGroupState")]
pub struct ZoneGroupState {
    #[serde(rename = "ZoneGroups", default)]
    pub zone_groups: Option<ZoneGroups>,
}

/// Container for all zone groups; also the root of the legacy shape
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ZoneGroups {
    #[serde(rename = "ZoneGroup", default)]
    pub zone_groups: Vec<ZoneGroup>,
}

/// Speakers playing in sync under one coordinator
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ZoneGroup {
    /// UUID of the coordinating speaker; empty when the attribute is missing
    #[serde(rename = "@Coordinator", default)]
    pub coordinator: String,

    #[serde(rename = "@ID", default)]
    pub id: String,

    #[serde(rename = "ZoneGroupMember", default)]
    pub members: Vec<ZoneGroupMember>,
}

impl ZoneGroup {
    /// The member entry describing the coordinator, if present
    pub fn coordinator_member(&self) -> Option<&ZoneGroupMember> {
        if self.coordinator.is_empty() {
            return None;
        }
        self.members.iter().find(|m| m.uuid == self.coordinator)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ZoneGroupMember {
    /// Empty when the attribute is missing
    #[serde(rename = "@UUID", default)]
    pub uuid: String,

    /// Device description URL, e.g. `http://192.168.1.10:1400/xml/device_description.xml`
    #[serde(rename = "@Location", default)]
    pub location: String,

    #[serde(rename = "@ZoneName", default)]
    pub zone_name: String,

    #[serde(rename = "@Invisible", default)]
    pub invisible: Option<String>,

    #[serde(rename = "@IsZoneBridge", default)]
    pub is_zone_bridge: Option<String>,

    #[serde(rename = "@SoftwareVersion", default)]
    pub software_version: Option<String>,

    /// Home theater surrounds and subs bonded to this member
    #[serde(rename = "Satellite", default)]
    pub satellites: Vec<Satellite>,
}

impl ZoneGroupMember {
    /// IPv4 address taken from the member's location URL
    pub fn ip_address(&self) -> Option<Ipv4Addr> {
        host_of(&self.location)?.parse().ok()
    }

    /// Bridges (BRIDGE, BOOST) take part in the mesh but play nothing
    pub fn is_zone_bridge(&self) -> bool {
        is_set(&self.is_zone_bridge)
    }

    pub fn is_invisible(&self) -> bool {
        is_set(&self.invisible)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Satellite {
    #[serde(rename = "@UUID", default)]
    pub uuid: String,

    #[serde(rename = "@Location", default)]
    pub location: String,
}

fn is_set(flag: &Option<String>) -> bool {
    matches!(flag.as_deref().map(str::trim), Some("1") | Some("true"))
}

fn host_of(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split('/').next()?;
    let host = authority.rsplit_once(':').map_or(authority, |(host, _)| host);
    (!host.is_empty()).then_some(host)
}

/// Parse a zone group state document in either shape.
///
/// The text may still be entity-escaped when it was lifted out of a SOAP
/// envelope by hand.
pub fn parse_zone_group_state(xml: &str) -> ParseResult<Vec<ZoneGroup>> {
    let xml = xml_decode::unescape_if_escaped(xml)?;
    if xml.trim().is_empty() {
        return Err(ParseError::MissingRequiredElement("ZoneGroupState".to_string()));
    }

    let state: ZoneGroupState = xml_decode::parse(&xml)?;
    if let Some(groups) = state.zone_groups {
        return Ok(groups.zone_groups);
    }

    let legacy: ZoneGroups = xml_decode::parse(&xml)?;
    Ok(legacy.zone_groups)
}
