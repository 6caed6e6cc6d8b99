//! The polling coordinator
//!
//! Owns the known speakers and the group topology. A refresh cycle polls
//! every known speaker in parallel, fetches the zone group document once,
//! merges both under the coordination lock and publishes one consistent
//! [`Snapshot`]. Commands resolve their target to an address, act on the
//! speaker, then ask for a refresh so the published state catches up.

use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use sonos_api::operations::{PlayMode, RepeatMode, SeekTarget, MAX_SLEEP_TIMER};
use sonos_discovery::{scan_hosts, ProbeOutcome, SpeakerIdentity, Subnet};
use tracing::{debug, info, warn};

use crate::config::CoordinatorConfig;
use crate::entity::{self, SpeakerRef};
use crate::error::{Result, StateError};
use crate::iter::SnapshotIterator;
use crate::model::{PlaybackState, Reachability, Snapshot, SnapshotView, SpeakerRecord};
use crate::topology::{reconcile, GroupTopology, TopologyError};
use crate::transport::{Command, NetworkTransport, SpeakerTransport, TransportCommand};
use crate::worker::Worker;

/// Volume change applied by [`Coordinator::volume_step`]
pub const VOLUME_STEP: i8 = 2;

/// Polls known speakers and exposes their state and the group topology.
///
/// All methods block. Share a coordinator between threads by wrapping it in
/// an `Arc`; dropping it stops the background worker.
///
/// # Example
///
/// ```rust,no_run
/// use std::net::Ipv4Addr;
/// use sonos_state::{Coordinator, TransportCommand};
///
/// let coordinator = Coordinator::builder()
///     .speaker(Ipv4Addr::new(192, 168, 2, 30))
///     .build();
///
/// coordinator.set_transport_state("media_player.kitchen", TransportCommand::Play)?;
/// coordinator.join(Ipv4Addr::new(192, 168, 2, 31), "media_player.kitchen")?;
///
/// for (address, view) in &coordinator.refresh().speakers {
///     println!("{} {} {}", address, view.identity.room_name, view.role);
/// }
/// # Ok::<(), sonos_state::StateError>(())
/// ```
pub struct Coordinator<T: SpeakerTransport = NetworkTransport> {
    inner: Arc<Inner<T>>,
    worker: Mutex<Option<Worker>>,
}

struct Inner<T> {
    transport: Arc<T>,
    config: CoordinatorConfig,
    /// The coordination lock
    state: Mutex<Registry>,
    /// Held for a whole cycle, and by group changes, so only one runs at a time
    cycle_gate: Mutex<()>,
    subscribers: Mutex<Vec<mpsc::Sender<Arc<Snapshot>>>>,
}

struct Registry {
    speakers: BTreeMap<Ipv4Addr, SpeakerRecord>,
    topology: GroupTopology,
    topology_stale: bool,
    snapshot: Arc<Snapshot>,
    cycle: u64,
}

impl Registry {
    fn known(&self) -> BTreeSet<Ipv4Addr> {
        self.speakers.keys().copied().collect()
    }

    fn build_snapshot(&self) -> Snapshot {
        let speakers = self
            .speakers
            .iter()
            .map(|(address, record)| {
                let view = SnapshotView {
                    address: *address,
                    identity: record.identity.clone(),
                    reachable: record.is_reachable(),
                    playback: record.playback.clone(),
                    role: self.topology.role_of(*address),
                    group_members: self.topology.members_of(*address),
                    last_seen: record.last_seen,
                };
                (*address, view)
            })
            .collect();

        Snapshot {
            cycle: self.cycle,
            taken_at: Utc::now(),
            topology_stale: self.topology_stale,
            topology: self.topology.clone(),
            speakers,
        }
    }
}

impl Coordinator<NetworkTransport> {
    pub fn builder() -> CoordinatorBuilder {
        CoordinatorBuilder::default()
    }
}

impl<T: SpeakerTransport> Coordinator<T> {
    /// A coordinator with no speakers over `transport`
    pub fn new(config: CoordinatorConfig, transport: T) -> Self {
        let registry = Registry {
            speakers: BTreeMap::new(),
            topology: GroupTopology::default(),
            topology_stale: false,
            snapshot: Arc::new(Snapshot::empty()),
            cycle: 0,
        };

        Self {
            inner: Arc::new(Inner {
                transport: Arc::new(transport),
                config,
                state: Mutex::new(registry),
                cycle_gate: Mutex::new(()),
                subscribers: Mutex::new(Vec::new()),
            }),
            worker: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start polling in the background every `config().interval`
    pub fn start(&self) -> Result<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Err(StateError::AlreadyRunning);
        }

        let inner = Arc::clone(&self.inner);
        let spawned = Worker::spawn(self.inner.config.interval, move || {
            inner.run_cycle();
        })
        .map_err(|e| StateError::Worker(e.to_string()))?;

        *worker = Some(spawned);
        Ok(())
    }

    /// Stop the background worker, waiting for a running cycle to finish
    pub fn stop(&self) {
        if let Some(worker) = self.worker.lock().take() {
            drop(worker);
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Run a cycle now and return the resulting snapshot
    pub fn refresh(&self) -> Arc<Snapshot> {
        self.inner.run_cycle()
    }

    /// Ask the background worker for an early cycle; false when it is not running
    pub fn request_refresh(&self) -> bool {
        self.worker
            .lock()
            .as_ref()
            .map_or(false, |worker| worker.request_refresh())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The latest snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.inner.state.lock().snapshot)
    }

    /// Identities of all known speakers, by address
    pub fn speakers(&self) -> Vec<SpeakerIdentity> {
        self.inner
            .state
            .lock()
            .speakers
            .values()
            .map(|record| record.identity.clone())
            .collect()
    }

    /// Current reachability of a known speaker
    pub fn reachability(&self, target: impl Into<SpeakerRef>) -> Result<Reachability> {
        let address = self.resolve(target)?;
        self.inner
            .state
            .lock()
            .speakers
            .get(&address)
            .map(|record| record.reachability)
            .ok_or_else(|| StateError::UnknownEntity(address.to_string()))
    }

    /// Turn an address or entity reference into the address of a known speaker
    pub fn resolve(&self, target: impl Into<SpeakerRef>) -> Result<Ipv4Addr> {
        let target = target.into();
        let state = self.inner.state.lock();

        let found = match &target {
            SpeakerRef::Address(address) => state.speakers.contains_key(address).then_some(*address),
            SpeakerRef::Entity(reference) => state
                .speakers
                .iter()
                .find(|(_, record)| entity::matches(&record.identity, reference))
                .map(|(address, _)| *address),
        };

        found.ok_or_else(|| StateError::UnknownEntity(target.to_string()))
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> SnapshotIterator {
        let (tx, rx) = mpsc::channel();
        self.inner.subscribers.lock().push(tx);
        SnapshotIterator::new(rx)
    }

    // =========================================================================
    // Speaker set
    // =========================================================================

    /// Probe `address` and start polling it.
    ///
    /// Adding a speaker that is already known does nothing and returns its
    /// identity.
    pub fn add_speaker(&self, address: Ipv4Addr) -> Result<SpeakerIdentity> {
        let (identity, added) = self.inner.register(address)?;
        if added {
            self.inner.republish();
            self.after_command();
        }
        Ok(identity)
    }

    /// Forget a speaker; it is not polled again
    pub fn remove_speaker(&self, target: impl Into<SpeakerRef>) -> Result<SpeakerIdentity> {
        let address = self.resolve(target)?;
        let removed = {
            let mut state = self.inner.state.lock();
            let removed = state
                .speakers
                .remove(&address)
                .ok_or_else(|| StateError::UnknownEntity(address.to_string()))?;
            state.topology = state.topology.restricted_to(&state.known());
            self.inner.publish(&mut state);
            removed
        };

        info!(%address, room = %removed.identity.room_name, "speaker removed");
        Ok(removed.identity)
    }

    /// Sweep `cidr` for speakers and add the ones not yet known.
    ///
    /// Returns only the newly added speakers; an empty sweep is not an error.
    pub fn scan_subnet(&self, cidr: &str, timeout: Duration) -> Result<Vec<SpeakerIdentity>> {
        let subnet = Subnet::parse(cidr)?;
        info!(%subnet, hosts = subnet.host_count(), "scanning for speakers");

        let transport = Arc::clone(&self.inner.transport);
        let found: Vec<SpeakerIdentity> = scan_hosts(
            subnet.hosts(),
            self.inner.config.scan_parallelism,
            move |address| transport.probe(address, timeout),
        )
        .collect();

        let added: Vec<SpeakerIdentity> = {
            let mut state = self.inner.state.lock();
            let added = found
                .into_iter()
                .filter(|identity| !state.speakers.contains_key(&identity.address))
                .inspect(|identity| {
                    info!(address = %identity.address, room = %identity.room_name, "speaker added by scan");
                })
                .collect::<Vec<_>>();
            for identity in &added {
                state
                    .speakers
                    .insert(identity.address, SpeakerRecord::new(identity.clone()));
            }
            if !added.is_empty() {
                state.topology = state.topology.restricted_to(&state.known());
                self.inner.publish(&mut state);
            }
            added
        };

        if !added.is_empty() {
            self.after_command();
        }
        Ok(added)
    }

    // =========================================================================
    // Playback and settings
    // =========================================================================

    /// Play, pause, stop or skip; acts on the target's whole group
    pub fn set_transport_state(&self, target: impl Into<SpeakerRef>, command: TransportCommand) -> Result<()> {
        self.run_command(target, Command::Transport(command))
    }

    pub fn set_volume(&self, target: impl Into<SpeakerRef>, volume: u8) -> Result<()> {
        if volume > 100 {
            return Err(StateError::InvalidCommand(format!("volume {} is above 100", volume)));
        }
        self.run_command(target, Command::SetVolume(volume))
    }

    /// Nudge the volume by [`VOLUME_STEP`]
    pub fn volume_step(&self, target: impl Into<SpeakerRef>, up: bool) -> Result<()> {
        let step = if up { VOLUME_STEP } else { -VOLUME_STEP };
        self.run_command(target, Command::VolumeStep(step))
    }

    pub fn set_mute(&self, target: impl Into<SpeakerRef>, muted: bool) -> Result<()> {
        self.run_command(target, Command::SetMute(muted))
    }

    pub fn set_bass(&self, target: impl Into<SpeakerRef>, level: i8) -> Result<()> {
        self.run_command(target, Command::SetBass(level))
    }

    pub fn set_treble(&self, target: impl Into<SpeakerRef>, level: i8) -> Result<()> {
        self.run_command(target, Command::SetTreble(level))
    }

    pub fn set_loudness(&self, target: impl Into<SpeakerRef>, enabled: bool) -> Result<()> {
        self.run_command(target, Command::SetLoudness(enabled))
    }

    /// Soundbars only
    pub fn set_night_mode(&self, target: impl Into<SpeakerRef>, enabled: bool) -> Result<()> {
        self.run_command(target, Command::SetNightMode(enabled))
    }

    /// Soundbars only
    pub fn set_speech_enhancement(&self, target: impl Into<SpeakerRef>, enabled: bool) -> Result<()> {
        self.run_command(target, Command::SetSpeechEnhancement(enabled))
    }

    pub fn set_status_light(&self, target: impl Into<SpeakerRef>, on: bool) -> Result<()> {
        self.run_command(target, Command::SetStatusLight(on))
    }

    pub fn set_touch_controls(&self, target: impl Into<SpeakerRef>, enabled: bool) -> Result<()> {
        self.run_command(target, Command::SetTouchControls(enabled))
    }

    pub fn set_crossfade(&self, target: impl Into<SpeakerRef>, enabled: bool) -> Result<()> {
        self.run_command(target, Command::SetCrossfade(enabled))
    }

    /// Change shuffle and/or repeat; `None` keeps the group's current setting
    pub fn set_play_mode(
        &self,
        target: impl Into<SpeakerRef>,
        shuffle: Option<bool>,
        repeat: Option<RepeatMode>,
    ) -> Result<()> {
        let address = self.resolve(target)?;
        let current = {
            let state = self.inner.state.lock();
            let leader = state.topology.coordinator_of(address);
            state
                .speakers
                .get(&leader)
                .or_else(|| state.speakers.get(&address))
                .and_then(|record| record.playback.as_ref())
                .and_then(|playback| playback.play_mode)
                .unwrap_or_default()
        };

        let mode = PlayMode::from_parts(
            shuffle.unwrap_or_else(|| current.shuffle()),
            repeat.unwrap_or_else(|| current.repeat()),
        );
        self.run_command(address, Command::SetPlayMode(mode))
    }

    pub fn seek(&self, target: impl Into<SpeakerRef>, seek: SeekTarget) -> Result<()> {
        self.run_command(target, Command::Seek(seek))
    }

    pub fn clear_queue(&self, target: impl Into<SpeakerRef>) -> Result<()> {
        self.run_command(target, Command::ClearQueue)
    }

    /// Play a plain HTTP(S) audio URL on the target's group
    pub fn play_uri(&self, target: impl Into<SpeakerRef>, uri: &str, title: Option<&str>) -> Result<()> {
        let uri = uri.trim();
        if !(uri.starts_with("http://") || uri.starts_with("https://")) {
            return Err(StateError::InvalidCommand(format!(
                "only http(s) URLs can be played, got '{}'",
                uri
            )));
        }
        self.run_command(
            target,
            Command::PlayUri {
                uri: uri.to_string(),
                title: title.unwrap_or(uri).to_string(),
            },
        )
    }

    pub fn set_sleep_timer(&self, target: impl Into<SpeakerRef>, duration: Duration) -> Result<()> {
        if duration.as_secs() == 0 || duration > MAX_SLEEP_TIMER {
            return Err(StateError::InvalidCommand(format!(
                "sleep timer must be between 1 and {} seconds",
                MAX_SLEEP_TIMER.as_secs()
            )));
        }
        self.run_command(target, Command::SleepTimer(Some(duration)))
    }

    pub fn clear_sleep_timer(&self, target: impl Into<SpeakerRef>) -> Result<()> {
        self.run_command(target, Command::SleepTimer(None))
    }

    // =========================================================================
    // Grouping
    // =========================================================================

    /// Make `member` play along with `coordinator`'s group.
    ///
    /// When `coordinator` is itself a group member, `member` joins the group
    /// it belongs to. Joining a group the member already follows is repeated
    /// against the speaker and leaves the topology unchanged.
    pub fn join(&self, member: impl Into<SpeakerRef>, coordinator: impl Into<SpeakerRef>) -> Result<()> {
        let member = self.resolve(member)?;
        let target = self.resolve(coordinator)?;
        if member == target {
            return Err(StateError::InvalidCommand(format!("{} cannot join itself", member)));
        }

        {
            let _gate = self.inner.cycle_gate.lock();
            let (leader, uuid) = {
                let state = self.inner.state.lock();
                let leader = state.topology.coordinator_of(target);
                let uuid = state
                    .speakers
                    .get(&leader)
                    .map(|record| record.identity.uuid.clone())
                    .or_else(|| state.topology.coordinator_uuid(leader).map(str::to_string))
                    .ok_or_else(|| {
                        StateError::InvalidCommand(format!("coordinator {} of {}'s group is not identified", leader, target))
                    })?;
                (leader, uuid)
            };

            if leader == member {
                debug!(%member, %target, "already leads the target's group");
                return Ok(());
            }

            self.inner
                .transport
                .execute(member, &Command::Join { coordinator_uuid: uuid })?;
            info!(%member, coordinator = %leader, "joined group");
        }

        self.after_command();
        Ok(())
    }

    /// Take `member` out of its group
    pub fn unjoin(&self, member: impl Into<SpeakerRef>) -> Result<()> {
        let member = self.resolve(member)?;
        {
            let _gate = self.inner.cycle_gate.lock();
            self.inner.transport.execute(member, &Command::Unjoin)?;
            info!(%member, "left group");
        }

        self.after_command();
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn run_command(&self, target: impl Into<SpeakerRef>, command: Command) -> Result<()> {
        let address = self.resolve(target)?;
        let destination = if command.is_group_scoped() {
            self.inner.state.lock().topology.coordinator_of(address)
        } else {
            address
        };

        if destination != address {
            debug!(%address, coordinator = %destination, "routing group command to coordinator");
        }
        self.inner.transport.execute(destination, &command)?;
        self.after_command();
        Ok(())
    }

    fn after_command(&self) {
        if self.request_refresh() {
            return;
        }
        if self.inner.config.refresh_after_command {
            self.inner.run_cycle();
        }
    }
}

impl<T: SpeakerTransport> Drop for Coordinator<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<T: SpeakerTransport> Inner<T> {
    /// Probe and insert `address`; `false` when it was already known
    fn register(&self, address: Ipv4Addr) -> Result<(SpeakerIdentity, bool)> {
        if let Some(record) = self.state.lock().speakers.get(&address) {
            debug!(%address, "speaker already known");
            return Ok((record.identity.clone(), false));
        }

        let identity = match self.transport.probe(address, self.config.probe_timeout)? {
            ProbeOutcome::Found(identity) => identity,
            ProbeOutcome::NotFound => return Err(StateError::NotASpeaker(address)),
        };

        let mut state = self.state.lock();
        if let Some(record) = state.speakers.get(&address) {
            return Ok((record.identity.clone(), false));
        }
        state.speakers.insert(address, SpeakerRecord::new(identity.clone()));
        info!(%address, room = %identity.room_name, model = %identity.model_name, "speaker added");
        Ok((identity, true))
    }

    /// Rebuild and publish the snapshot without touching the network
    fn republish(&self) {
        let mut state = self.state.lock();
        state.topology = state.topology.restricted_to(&state.known());
        self.publish(&mut state);
    }

    fn run_cycle(&self) -> Arc<Snapshot> {
        let _gate = self.cycle_gate.lock();
        let started = Instant::now();

        let targets: Vec<Ipv4Addr> = self.state.lock().speakers.keys().copied().collect();
        let polls = self.poll_all(&targets);

        let answered: Vec<Ipv4Addr> = polls
            .iter()
            .filter(|(_, outcome)| outcome.is_ok())
            .map(|(address, _)| *address)
            .collect();
        let known: BTreeSet<Ipv4Addr> = targets.iter().copied().collect();
        let topology = self.fetch_topology(&answered, &known);

        let mut state = self.state.lock();
        let now = Utc::now();
        for (address, outcome) in polls {
            // removed while the cycle was running
            let Some(record) = state.speakers.get_mut(&address) else {
                continue;
            };
            match outcome {
                Ok(playback) => {
                    if record.reachability == Reachability::Unreachable {
                        info!(%address, "speaker reachable again");
                    }
                    record.record_success(playback, now);
                }
                Err(error) => {
                    if record.reachability != Reachability::Unreachable {
                        warn!(%address, %error, "speaker unreachable");
                    }
                    record.record_failure();
                    debug!(%address, failures = record.consecutive_failures, "poll failed");
                }
            }
        }

        match topology {
            Some(topology) => {
                state.topology = topology;
                state.topology_stale = false;
            }
            None if known.is_empty() => {
                state.topology = GroupTopology::default();
                state.topology_stale = false;
            }
            None => state.topology_stale = true,
        }
        state.topology = state.topology.restricted_to(&state.known());
        state.cycle += 1;

        debug!(
            cycle = state.cycle,
            speakers = targets.len(),
            reachable = answered.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "cycle complete"
        );
        self.publish(&mut state)
    }

    /// Poll every target with at most `max_parallel_polls` in flight.
    ///
    /// Polls that have not answered when the cycle budget runs out count as
    /// failures; their threads finish in the background and are ignored.
    fn poll_all(&self, targets: &[Ipv4Addr]) -> BTreeMap<Ipv4Addr, std::result::Result<PlaybackState, String>> {
        let mut results = BTreeMap::new();
        if targets.is_empty() {
            return results;
        }

        let queue: Arc<Vec<Ipv4Addr>> = Arc::new(targets.to_vec());
        let cursor = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();
        let workers = self.config.max_parallel_polls.max(1).min(queue.len());

        for worker in 0..workers {
            let queue = Arc::clone(&queue);
            let cursor = Arc::clone(&cursor);
            let transport = Arc::clone(&self.transport);
            let tx = tx.clone();

            let spawned = thread::Builder::new()
                .name(format!("sonos-poll-{}", worker))
                .spawn(move || loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(&address) = queue.get(index) else {
                        break;
                    };
                    let outcome = transport.poll(address).map_err(|e| e.to_string());
                    if tx.send((address, outcome)).is_err() {
                        break;
                    }
                });

            if let Err(e) = spawned {
                warn!(worker, error = %e, "could not spawn poll worker");
            }
        }
        drop(tx);

        let deadline = Instant::now() + self.config.cycle_budget(queue.len());
        while results.len() < queue.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((address, outcome)) => {
                    results.insert(address, outcome);
                }
                Err(_) => break,
            }
        }

        for address in queue.iter() {
            results
                .entry(*address)
                .or_insert_with(|| Err("poll timed out".to_string()));
        }
        results
    }

    /// Fetch and reconcile the zone group document from the first speaker that answers
    fn fetch_topology(&self, candidates: &[Ipv4Addr], known: &BTreeSet<Ipv4Addr>) -> Option<GroupTopology> {
        if candidates.is_empty() {
            if !known.is_empty() {
                warn!("no reachable speaker to fetch topology from; keeping previous groups");
            }
            return None;
        }

        for address in candidates {
            let xml = match self.transport.zone_group_state(*address) {
                Ok(xml) => xml,
                Err(e) => {
                    debug!(%address, error = %e, "topology fetch failed, trying next speaker");
                    continue;
                }
            };

            return match reconcile(&xml, known) {
                Ok(topology) => Some(topology),
                Err(TopologyError::NoGroups) => {
                    warn!(%address, "zone group state lists no groups; keeping previous groups");
                    None
                }
                Err(e) => {
                    warn!(%address, error = %e, "unusable zone group state; keeping previous groups");
                    None
                }
            };
        }

        warn!("topology fetch failed on every reachable speaker; keeping previous groups");
        None
    }

    /// Store a fresh snapshot and hand it to subscribers if anything changed
    fn publish(&self, state: &mut Registry) -> Arc<Snapshot> {
        let snapshot = Arc::new(state.build_snapshot());
        let changed = !snapshot.same_state_as(&state.snapshot);
        state.snapshot = Arc::clone(&snapshot);

        if changed {
            let mut subscribers = self.subscribers.lock();
            subscribers.retain(|tx| tx.send(Arc::clone(&snapshot)).is_ok());
            debug!(cycle = snapshot.cycle, subscribers = subscribers.len(), "snapshot published");
        }
        snapshot
    }
}

/// Builder for [`Coordinator`]
#[derive(Debug, Clone, Default)]
pub struct CoordinatorBuilder {
    config: CoordinatorConfig,
    speakers: Vec<Ipv4Addr>,
}

impl CoordinatorBuilder {
    /// Replace the whole configuration
    pub fn config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.config.poll_timeout = timeout;
        self
    }

    pub fn max_parallel_polls(mut self, max: usize) -> Self {
        self.config.max_parallel_polls = max;
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.config.probe_timeout = timeout;
        self
    }

    pub fn scan_parallelism(mut self, max: usize) -> Self {
        self.config.scan_parallelism = max;
        self
    }

    pub fn refresh_after_command(mut self, enabled: bool) -> Self {
        self.config.refresh_after_command = enabled;
        self
    }

    /// Probe and add this address when the coordinator is built
    pub fn speaker(mut self, address: Ipv4Addr) -> Self {
        self.speakers.push(address);
        self
    }

    pub fn speakers(mut self, addresses: impl IntoIterator<Item = Ipv4Addr>) -> Self {
        self.speakers.extend(addresses);
        self
    }

    /// Build over the network, with SOAP calls bounded by the poll timeout
    pub fn build(self) -> Coordinator<NetworkTransport> {
        let transport = NetworkTransport::new(self.config.poll_timeout);
        self.build_with(transport)
    }

    /// Build over a custom transport.
    ///
    /// Initial speakers that cannot be probed are logged and skipped; add
    /// them again later with [`Coordinator::add_speaker`].
    pub fn build_with<T: SpeakerTransport>(self, transport: T) -> Coordinator<T> {
        let coordinator = Coordinator::new(self.config, transport);
        for address in self.speakers {
            if let Err(e) = coordinator.inner.register(address) {
                warn!(%address, error = %e, "could not add configured speaker");
            }
        }
        coordinator.inner.republish();
        coordinator
    }
}
