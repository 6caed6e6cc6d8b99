//! Config file handling
//!
//! The file is JSON and every key is optional:
//!
//! ```json
//! {
//!   "speakers": ["192.168.2.30", "192.168.2.31"],
//!   "subnets": ["192.168.2.0/24"],
//!   "coordinator": { "interval": 10, "probe_timeout": 5 }
//! }
//! ```

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sonos_state::CoordinatorConfig;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Speakers added by address on startup
    pub speakers: Vec<Ipv4Addr>,
    /// CIDR blocks swept on startup
    pub subnets: Vec<String>,
    pub coordinator: CoordinatorConfig,
}

impl FileConfig {
    /// `<config dir>/sonos-subnet/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sonos-subnet").join("config.json"))
    }

    /// Load `path`, or the default location when `None`.
    ///
    /// An explicit path must exist; a missing default file means an empty
    /// config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Add speakers and subnets given on the command line
    pub fn merge(mut self, speakers: &[Ipv4Addr], subnets: &[String]) -> Self {
        for speaker in speakers {
            if !self.speakers.contains(speaker) {
                self.speakers.push(*speaker);
            }
        }
        for subnet in subnets {
            if !self.subnets.contains(subnet) {
                self.subnets.push(subnet.clone());
            }
        }
        self
    }
}
