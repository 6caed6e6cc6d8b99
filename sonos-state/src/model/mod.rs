//! Model types for sonos-state

mod playback;
mod snapshot;
mod speaker;
mod transport_state;

pub use playback::PlaybackState;
pub use snapshot::{GroupRole, Snapshot, SnapshotView};
pub use speaker::{Reachability, SpeakerRecord};
pub use transport_state::TransportState;
