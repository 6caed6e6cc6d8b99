//! Single-host probing over HTTP.

use std::net::Ipv4Addr;
use std::time::Duration;

use tracing::debug;

use crate::device::DeviceDescription;
use crate::error::{DiscoveryError, Result};
use crate::SpeakerIdentity;

/// Control port every Sonos speaker listens on
pub const SONOS_PORT: u16 = 1400;

/// Path of the UPnP device description document
pub const DEVICE_DESCRIPTION_PATH: &str = "/xml/device_description.xml";

/// Default per-host timeout for probes
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of probing one address.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// A controllable Sonos speaker answered
    Found(SpeakerIdentity),
    /// Something answered (or 404'd) but it is not a Sonos speaker
    NotFound,
}

impl ProbeOutcome {
    pub fn into_identity(self) -> Option<SpeakerIdentity> {
        match self {
            ProbeOutcome::Found(identity) => Some(identity),
            ProbeOutcome::NotFound => None,
        }
    }
}

/// Fetches and classifies device descriptions.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Prober {
    http_client: reqwest::blocking::Client,
    port: u16,
}

impl Prober {
    /// Create a prober whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| DiscoveryError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            port: SONOS_PORT,
        })
    }

    /// Probe a different port; test servers do not listen on 1400
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Fetch the description at `address` and classify it.
    ///
    /// Connection failures and timeouts are errors; anything that answers
    /// with something other than a Sonos speaker description is `NotFound`.
    pub fn probe_one(&self, address: Ipv4Addr) -> Result<ProbeOutcome> {
        let url = format!("http://{}:{}{}", address, self.port, DEVICE_DESCRIPTION_PATH);

        let response = self.http_client.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                DiscoveryError::Timeout
            } else {
                DiscoveryError::Network(format!("Failed to fetch device description: {}", e))
            }
        })?;

        if !response.status().is_success() {
            debug!(%address, status = response.status().as_u16(), "no device description");
            return Ok(ProbeOutcome::NotFound);
        }

        let xml = response.text().map_err(|e| {
            if e.is_timeout() {
                DiscoveryError::Timeout
            } else {
                DiscoveryError::Network(format!("Failed to read response body: {}", e))
            }
        })?;

        match DeviceDescription::from_xml(&xml) {
            Some(device) if device.is_sonos_speaker() => {
                let identity = device.to_identity(address);
                debug!(%address, uuid = %identity.uuid, room = %identity.room_name, "found Sonos speaker");
                Ok(ProbeOutcome::Found(identity))
            }
            Some(device) => {
                debug!(%address, manufacturer = %device.manufacturer, "not a Sonos speaker");
                Ok(ProbeOutcome::NotFound)
            }
            None => {
                debug!(%address, "unparsable device description");
                Ok(ProbeOutcome::NotFound)
            }
        }
    }
}
