//! Coordinator configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sonos_discovery::{DEFAULT_PROBE_TIMEOUT, DEFAULT_SCAN_PARALLELISM};

/// Time between refresh cycles
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// How long one speaker's poll may take before it counts as failed
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// Speakers polled at the same time within one cycle
pub const DEFAULT_MAX_PARALLEL_POLLS: usize = 10;

/// Tuning for the polling coordinator.
///
/// Durations are whole seconds when serialized. Missing fields take their
/// defaults, so a config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    #[serde(with = "secs")]
    pub interval: Duration,
    #[serde(with = "secs")]
    pub poll_timeout: Duration,
    pub max_parallel_polls: usize,
    #[serde(with = "secs")]
    pub probe_timeout: Duration,
    pub scan_parallelism: usize,
    /// Run a refresh right after every command so state reflects it promptly
    pub refresh_after_command: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            max_parallel_polls: DEFAULT_MAX_PARALLEL_POLLS,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            scan_parallelism: DEFAULT_SCAN_PARALLELISM,
            refresh_after_command: true,
        }
    }
}

impl CoordinatorConfig {
    /// Longest a whole cycle's fan-in waits for `speakers` polls
    pub fn cycle_budget(&self, speakers: usize) -> Duration {
        let parallel = self.max_parallel_polls.max(1);
        let batches = speakers.div_ceil(parallel).max(1) as u32;
        self.poll_timeout.saturating_mul(batches)
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}
