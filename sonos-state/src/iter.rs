//! Blocking iterator over published snapshots
//!
//! Every subscriber gets its own channel. A snapshot is published once per
//! cycle, and only when something changed since the previous one.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use sonos_state::Coordinator;
//!
//! let coordinator = Coordinator::builder().speaker([192, 168, 2, 30].into()).build();
//! let updates = coordinator.subscribe();
//! coordinator.start()?;
//!
//! // Blocking iteration
//! for snapshot in updates.timeout_iter(Duration::from_secs(60)) {
//!     println!("cycle {}: {} reachable", snapshot.cycle, snapshot.reachable_count());
//! }
//! # Ok::<(), sonos_state::StateError>(())
//! ```

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use crate::model::Snapshot;

/// Receives every snapshot the coordinator publishes after subscribing
///
/// Dropping it unsubscribes; the coordinator prunes the closed channel on
/// its next publish.
pub struct SnapshotIterator {
    rx: mpsc::Receiver<Arc<Snapshot>>,
}

impl SnapshotIterator {
    pub(crate) fn new(rx: mpsc::Receiver<Arc<Snapshot>>) -> Self {
        Self { rx }
    }

    /// Block until the next snapshot
    ///
    /// Returns `None` once the coordinator is gone.
    pub fn recv(&self) -> Option<Arc<Snapshot>> {
        self.rx.recv().ok()
    }

    /// Returns `None` if the timeout expires or the coordinator is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Arc<Snapshot>> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<Arc<Snapshot>> {
        self.rx.try_recv().ok()
    }

    /// Drain whatever has already been published, without blocking
    pub fn try_iter(&self) -> TryIter<'_> {
        TryIter { inner: self }
    }

    /// Iterate until no snapshot arrives within `timeout`
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIter<'_> {
        TimeoutIter {
            inner: self,
            timeout,
        }
    }

    /// The most recent snapshot already queued, skipping older ones
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.try_iter().last()
    }
}

impl Iterator for SnapshotIterator {
    type Item = Arc<Snapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

/// Non-blocking iterator over queued snapshots
pub struct TryIter<'a> {
    inner: &'a SnapshotIterator,
}

impl<'a> Iterator for TryIter<'a> {
    type Item = Arc<Snapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with timeout
pub struct TimeoutIter<'a> {
    inner: &'a SnapshotIterator,
    timeout: Duration,
}

impl<'a> Iterator for TimeoutIter<'a> {
    type Item = Arc<Snapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}
