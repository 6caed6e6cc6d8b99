//! Published views of the coordinator's state

use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sonos_discovery::SpeakerIdentity;

use super::PlaybackState;
use crate::topology::GroupTopology;

/// A speaker's place in the group topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    /// A group of one
    Standalone,
    /// Anchors a group, possibly with members
    Coordinator,
    /// Follows the coordinator at this address
    MemberOf(Ipv4Addr),
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupRole::Standalone => f.write_str("standalone"),
            GroupRole::Coordinator => f.write_str("coordinator"),
            GroupRole::MemberOf(addr) => write!(f, "member-of:{}", addr),
        }
    }
}

/// What collaborators see for one speaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotView {
    pub address: Ipv4Addr,
    pub identity: SpeakerIdentity,
    /// False while the speaker fails to answer polls
    pub reachable: bool,
    /// Last successfully polled state; kept while the speaker is unreachable
    pub playback: Option<PlaybackState>,
    pub role: GroupRole,
    /// Members of this speaker's group, coordinator first
    pub group_members: Vec<Ipv4Addr>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl SnapshotView {
    /// Entity id collaborators use to refer to this speaker
    pub fn entity_id(&self) -> String {
        crate::entity::entity_id(&self.identity.room_name)
    }

    /// Equal apart from `last_seen`, which moves on every successful poll
    pub fn same_state_as(&self, other: &SnapshotView) -> bool {
        self.address == other.address
            && self.reachable == other.reachable
            && self.role == other.role
            && self.group_members == other.group_members
            && self.playback == other.playback
            && self.identity == other.identity
    }
}

/// One consistent batch of state.
///
/// Every view in a snapshot was derived from the same cycle's polls and the
/// same topology fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Cycle that produced this snapshot; 0 before the first cycle
    pub cycle: u64,
    pub taken_at: DateTime<Utc>,
    /// True when the latest topology fetch failed and an older one is shown
    pub topology_stale: bool,
    pub topology: GroupTopology,
    pub speakers: BTreeMap<Ipv4Addr, SnapshotView>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            cycle: 0,
            taken_at: Utc::now(),
            topology_stale: false,
            topology: GroupTopology::default(),
            speakers: BTreeMap::new(),
        }
    }

    pub fn get(&self, address: Ipv4Addr) -> Option<&SnapshotView> {
        self.speakers.get(&address)
    }

    pub fn role_of(&self, address: Ipv4Addr) -> Option<GroupRole> {
        self.get(address).map(|view| view.role)
    }

    pub fn reachable_count(&self) -> usize {
        self.speakers.values().filter(|view| view.reachable).count()
    }

    /// Same speakers, states and topology, ignoring cycle number and timestamps
    pub fn same_state_as(&self, other: &Snapshot) -> bool {
        self.topology_stale == other.topology_stale
            && self.topology == other.topology
            && self.speakers.len() == other.speakers.len()
            && self
                .speakers
                .values()
                .zip(other.speakers.values())
                .all(|(a, b)| a.same_state_as(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(GroupRole::Standalone.to_string(), "standalone");
        assert_eq!(
            GroupRole::MemberOf(Ipv4Addr::new(192, 168, 2, 20)).to_string(),
            "member-of:192.168.2.20"
        );
    }

    #[test]
    fn test_same_state_ignores_cycle_and_time() {
        let first = Snapshot::empty();
        let second = Snapshot {
            cycle: 7,
            ..Snapshot::empty()
        };
        assert!(first.same_state_as(&second));

        let stale = Snapshot {
            topology_stale: true,
            ..Snapshot::empty()
        };
        assert!(!first.same_state_as(&stale));
    }
}
