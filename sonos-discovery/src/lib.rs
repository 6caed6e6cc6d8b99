//! Sonos speaker discovery without multicast
//!
//! SSDP does not cross routers, so speakers on another segment have to be
//! found by asking each address directly for its UPnP device description.
//! This crate probes single addresses and sweeps CIDR blocks with a bounded
//! pool of worker threads.
//!
//! # Quick Start
//!
//! ```no_run
//! use sonos_discovery::{probe_one, ProbeOutcome};
//! use std::time::Duration;
//!
//! match probe_one("192.168.2.20".parse().unwrap(), Duration::from_secs(5))? {
//!     ProbeOutcome::Found(speaker) => println!("{} ({})", speaker.room_name, speaker.model_name),
//!     ProbeOutcome::NotFound => println!("not a Sonos speaker"),
//! }
//! # Ok::<(), sonos_discovery::DiscoveryError>(())
//! ```
//!
//! # Subnet sweeps
//!
//! ```no_run
//! use sonos_discovery::probe_subnet;
//! use std::time::Duration;
//!
//! for speaker in probe_subnet("192.168.2.0/24", Duration::from_secs(5), 50)? {
//!     println!("Found {} at {}", speaker.room_name, speaker.address);
//! }
//! # Ok::<(), sonos_discovery::DiscoveryError>(())
//! ```

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

pub mod device;
mod error;
mod probe;
mod scan;
mod subnet;

pub use error::{DiscoveryError, Result};
pub use probe::{ProbeOutcome, Prober, DEFAULT_PROBE_TIMEOUT, DEVICE_DESCRIPTION_PATH, SONOS_PORT};
pub use scan::{probe_one, probe_subnet, scan_hosts, ScanIterator, DEFAULT_SCAN_PARALLELISM};
pub use subnet::{Subnet, MIN_PREFIX};

/// What a speaker says about itself when first probed.
///
/// Fetched once at discovery and never refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerIdentity {
    /// UDN without the `uuid:` prefix, e.g. `RINCON_48A6B8123ABC01400`
    pub uuid: String,
    pub address: Ipv4Addr,
    pub room_name: String,
    pub model_name: String,
    pub model_number: Option<String>,
    pub software_version: Option<String>,
    pub hardware_version: Option<String>,
    pub serial_number: Option<String>,
    pub mac_address: Option<String>,
}
