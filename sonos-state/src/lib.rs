//! Sonos State Management
//!
//! Keeps an up-to-date, consistent view of Sonos speakers that are reached
//! by address rather than discovered over multicast.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──── poll (parallel) ────┐
//! Coordinator ────┤                         ├──► merge ──► Snapshot ──► subscribers
//!                 └── zone group state (1) ─┘    (one lock)
//!                          │
//!                      reconcile → GroupTopology
//! ```
//!
//! Each refresh cycle polls every known speaker, fetches the household's zone
//! group document once, and publishes a single [`Snapshot`] in which every
//! speaker's [`GroupRole`] agrees with the same topology. A speaker that stops
//! answering is marked unreachable, never dropped.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::net::Ipv4Addr;
//! use std::time::Duration;
//! use sonos_state::Coordinator;
//!
//! let coordinator = Coordinator::builder()
//!     .interval(Duration::from_secs(10))
//!     .speaker(Ipv4Addr::new(192, 168, 2, 30))
//!     .build();
//!
//! coordinator.scan_subnet("192.168.2.0/24", Duration::from_secs(5))?;
//!
//! let snapshot = coordinator.refresh();
//! for view in snapshot.speakers.values() {
//!     println!("{} is {}", view.entity_id(), view.role);
//! }
//!
//! coordinator.set_volume("media_player.living_room", 25)?;
//! # Ok::<(), sonos_state::StateError>(())
//! ```

pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod iter;
pub mod logging;
pub mod model;
pub mod topology;
pub mod transport;
mod worker;

pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, CoordinatorBuilder, VOLUME_STEP};
pub use entity::{entity_id, SpeakerRef};
pub use error::{Result, StateError};
pub use iter::SnapshotIterator;
pub use model::{GroupRole, PlaybackState, Reachability, Snapshot, SnapshotView, SpeakerRecord, TransportState};
pub use topology::{reconcile, GroupTopology, TopologyError};
pub use transport::{Command, NetworkTransport, SpeakerTransport, TransportCommand};

// Types collaborators need alongside the coordinator
pub use sonos_api::operations::{PlayMode, RepeatMode, SeekTarget};
pub use sonos_discovery::{ProbeOutcome, SpeakerIdentity};
pub use sonos_parser::{SourceKind, TrackRecord};
