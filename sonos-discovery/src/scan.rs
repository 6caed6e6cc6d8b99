//! Bounded parallel sweeps.
//!
//! A sweep hands its host list to at most `max_parallel` worker threads.
//! Workers pull the next address from a shared cursor, probe it, and send
//! every speaker they find down a channel, so the caller sees identities in
//! completion order. A /24 with 10 workers therefore finishes in roughly
//! `ceil(254 / 10) * timeout` in the worst case.

use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::probe::{ProbeOutcome, Prober};
use crate::subnet::Subnet;
use crate::SpeakerIdentity;

/// Default number of probes in flight during a sweep
pub const DEFAULT_SCAN_PARALLELISM: usize = 50;

/// Lazy sequence of speakers found by a sweep.
///
/// Ends once every host has been probed or has timed out. Dropping it early
/// stops workers from starting new probes; probes already in flight finish
/// against their own timeout and their results are discarded.
pub struct ScanIterator {
    receiver: Receiver<SpeakerIdentity>,
    cancelled: Arc<AtomicBool>,
    total_hosts: usize,
}

impl ScanIterator {
    /// Number of addresses this sweep covers
    pub fn total_hosts(&self) -> usize {
        self.total_hosts
    }

    /// Wait up to `timeout` for the next speaker.
    ///
    /// `Ok(None)` means the sweep has finished.
    pub fn next_timeout(&mut self, timeout: Duration) -> std::result::Result<Option<SpeakerIdentity>, RecvTimeoutError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(identity) => Ok(Some(identity)),
            Err(RecvTimeoutError::Disconnected) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Iterator for ScanIterator {
    type Item = SpeakerIdentity;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.recv().ok()
    }
}

impl Drop for ScanIterator {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Probe `hosts` with at most `max_parallel` probes in flight.
///
/// `probe` is expected to honour its own timeout. Errors are logged at debug
/// level and otherwise ignored so one unreachable host never aborts a sweep.
pub fn scan_hosts<I, F>(hosts: I, max_parallel: usize, probe: F) -> ScanIterator
where
    I: IntoIterator<Item = Ipv4Addr>,
    F: Fn(Ipv4Addr) -> Result<ProbeOutcome> + Send + Sync + 'static,
{
    let hosts: Arc<Vec<Ipv4Addr>> = Arc::new(hosts.into_iter().collect());
    let total_hosts = hosts.len();
    let workers = max_parallel.max(1).min(total_hosts);

    let (sender, receiver) = mpsc::channel();
    let cursor = Arc::new(AtomicUsize::new(0));
    let cancelled = Arc::new(AtomicBool::new(false));
    let probe = Arc::new(probe);

    for worker in 0..workers {
        let hosts = Arc::clone(&hosts);
        let cursor = Arc::clone(&cursor);
        let cancelled = Arc::clone(&cancelled);
        let probe = Arc::clone(&probe);
        let sender = sender.clone();

        let spawned = thread::Builder::new()
            .name(format!("sonos-probe-{}", worker))
            .spawn(move || {
                while !cancelled.load(Ordering::Relaxed) {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(&address) = hosts.get(index) else {
                        break;
                    };

                    match probe(address) {
                        Ok(ProbeOutcome::Found(identity)) => {
                            if sender.send(identity).is_err() {
                                break;
                            }
                        }
                        Ok(ProbeOutcome::NotFound) => {}
                        Err(e) => debug!(%address, error = %e, "probe failed"),
                    }
                }
            });

        if let Err(e) = spawned {
            warn!(worker, error = %e, "could not spawn probe worker");
        }
    }

    ScanIterator {
        receiver,
        cancelled,
        total_hosts,
    }
}

/// Sweep a CIDR block for Sonos speakers.
///
/// # Examples
///
/// ```no_run
/// use sonos_discovery::probe_subnet;
/// use std::time::Duration;
///
/// for speaker in probe_subnet("192.168.2.0/24", Duration::from_secs(5), 50)? {
///     println!("{} at {}", speaker.room_name, speaker.address);
/// }
/// # Ok::<(), sonos_discovery::DiscoveryError>(())
/// ```
pub fn probe_subnet(cidr: &str, timeout: Duration, max_parallel: usize) -> Result<ScanIterator> {
    let subnet = Subnet::parse(cidr)?;
    let prober = Prober::new(timeout)?;
    Ok(prober.scan(&subnet, max_parallel))
}

impl Prober {
    /// Sweep `subnet` with this prober's timeout and port.
    pub fn scan(&self, subnet: &Subnet, max_parallel: usize) -> ScanIterator {
        info!(%subnet, hosts = subnet.host_count(), max_parallel, "scanning subnet");
        let prober = self.clone();
        scan_hosts(subnet.hosts(), max_parallel, move |address| prober.probe_one(address))
    }
}

/// Probe a single address with a fresh prober.
pub fn probe_one(address: Ipv4Addr, timeout: Duration) -> Result<ProbeOutcome> {
    Prober::new(timeout)?.probe_one(address)
}
