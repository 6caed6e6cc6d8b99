//! Group topology reconciliation
//!
//! The zone group document is household-wide and can change at any time
//! because the vendor's own app regroups speakers too. It is therefore
//! rebuilt from scratch on every fetch and never patched.

use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use sonos_parser::{parse_zone_group_state, ZoneGroup};
use thiserror::Error;
use tracing::debug;

use crate::model::GroupRole;

/// The zone group document could not be used at all
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Zone group state could not be parsed: {0}")]
    Parse(String),

    #[error("Zone group state contains no groups")]
    NoGroups,
}

/// Coordinator address to ordered member addresses (coordinator first).
///
/// Only speakers from the known set appear as members. A coordinator the
/// controller does not manage can still anchor a group that known speakers
/// follow. Known speakers that are not placed in any group are standalone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupTopology {
    groups: BTreeMap<Ipv4Addr, Vec<Ipv4Addr>>,
    known: BTreeSet<Ipv4Addr>,
    /// Coordinator UUIDs as the document names them, including unmanaged ones
    #[serde(default)]
    coordinator_uuids: BTreeMap<Ipv4Addr, String>,
}

impl GroupTopology {
    /// Every known speaker in a group of its own
    pub fn standalone(known: &BTreeSet<Ipv4Addr>) -> Self {
        Self {
            groups: BTreeMap::new(),
            known: known.clone(),
            coordinator_uuids: BTreeMap::new(),
        }
    }

    pub fn role_of(&self, address: Ipv4Addr) -> GroupRole {
        if self.groups.contains_key(&address) {
            return GroupRole::Coordinator;
        }
        self.groups
            .iter()
            .find(|(coordinator, members)| **coordinator != address && members.contains(&address))
            .map_or(GroupRole::Standalone, |(coordinator, _)| GroupRole::MemberOf(*coordinator))
    }

    /// The coordinator whose group `address` plays in; itself when standalone
    pub fn coordinator_of(&self, address: Ipv4Addr) -> Ipv4Addr {
        match self.role_of(address) {
            GroupRole::MemberOf(coordinator) => coordinator,
            GroupRole::Coordinator | GroupRole::Standalone => address,
        }
    }

    /// All members of the group `address` belongs to, coordinator first
    pub fn members_of(&self, address: Ipv4Addr) -> Vec<Ipv4Addr> {
        self.groups
            .get(&self.coordinator_of(address))
            .cloned()
            .unwrap_or_else(|| vec![address])
    }

    /// Explicit groups followed by singleton groups for unplaced known speakers
    pub fn groups(&self) -> Vec<(Ipv4Addr, Vec<Ipv4Addr>)> {
        let placed: BTreeSet<Ipv4Addr> = self.groups.values().flatten().copied().collect();
        let mut all: Vec<_> = self.groups.iter().map(|(c, m)| (*c, m.clone())).collect();
        all.extend(
            self.known
                .iter()
                .filter(|addr| !placed.contains(addr))
                .map(|addr| (*addr, vec![*addr])),
        );
        all
    }

    pub fn known(&self) -> &BTreeSet<Ipv4Addr> {
        &self.known
    }

    /// UUID of the speaker leading the group at `coordinator`, when the
    /// document placed one there
    pub fn coordinator_uuid(&self, coordinator: Ipv4Addr) -> Option<&str> {
        self.coordinator_uuids.get(&coordinator).map(String::as_str)
    }

    /// Drop everything that is no longer in `known`.
    ///
    /// Groups left with no known speaker disappear; speakers newly known are
    /// standalone until the next fetch places them.
    pub fn restricted_to(&self, known: &BTreeSet<Ipv4Addr>) -> Self {
        let groups: BTreeMap<Ipv4Addr, Vec<Ipv4Addr>> = self
            .groups
            .iter()
            .filter_map(|(coordinator, members)| {
                let kept: Vec<Ipv4Addr> = members
                    .iter()
                    .copied()
                    .filter(|m| m == coordinator || known.contains(m))
                    .collect();
                kept.iter().any(|m| known.contains(m)).then(|| (*coordinator, kept))
            })
            .collect();
        let coordinator_uuids = self
            .coordinator_uuids
            .iter()
            .filter(|(coordinator, _)| groups.contains_key(coordinator))
            .map(|(coordinator, uuid)| (*coordinator, uuid.clone()))
            .collect();

        Self {
            groups,
            known: known.clone(),
            coordinator_uuids,
        }
    }
}

/// Rebuild the topology from a `GetZoneGroupState` document.
///
/// Speakers from other households are ignored. Members without a UUID or a
/// resolvable location are dropped, and zone bridges never count. Fails only
/// when the document is unreadable or lists no groups at all.
pub fn reconcile(xml: &str, known: &BTreeSet<Ipv4Addr>) -> Result<GroupTopology, TopologyError> {
    let groups = parse_zone_group_state(xml).map_err(|e| TopologyError::Parse(e.to_string()))?;
    if groups.is_empty() {
        return Err(TopologyError::NoGroups);
    }

    let mut placed = BTreeSet::new();
    let mut topology = GroupTopology::standalone(known);

    for group in &groups {
        let Some(coordinator) = coordinator_address(group) else {
            debug!(group = %group.id, "coordinator missing or unresolved; members stay standalone");
            continue;
        };
        if placed.contains(&coordinator) {
            continue;
        }

        let mut members = vec![coordinator];
        for member in group.members.iter().filter(|m| !m.is_zone_bridge()) {
            if member.uuid.is_empty() {
                debug!(group = %group.id, location = %member.location, "dropping member without a UUID");
                continue;
            }
            match member.ip_address() {
                Some(addr) if known.contains(&addr) && !members.contains(&addr) && !placed.contains(&addr) => {
                    members.push(addr)
                }
                Some(_) => {}
                None => debug!(uuid = %member.uuid, location = %member.location, "dropping member without usable location"),
            }
        }

        if members.iter().any(|m| known.contains(m)) {
            placed.extend(members.iter().copied());
            topology.groups.insert(coordinator, members);
            topology.coordinator_uuids.insert(coordinator, group.coordinator.clone());
        }
    }

    Ok(topology)
}

fn coordinator_address(group: &ZoneGroup) -> Option<Ipv4Addr> {
    group
        .coordinator_member()
        .filter(|m| !m.is_zone_bridge())
        .and_then(|m| m.ip_address())
}
