//! IPv4 CIDR blocks and host enumeration

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{DiscoveryError, Result};

/// Shortest prefix a sweep will accept; a /16 is already 65534 probes
pub const MIN_PREFIX: u8 = 16;

/// An IPv4 network in CIDR notation.
///
/// Host bits set in the written address are masked off, so
/// `192.168.2.77/24` parses to `192.168.2.0/24`. A bare address is a /32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    network: Ipv4Addr,
    prefix: u8,
}

impl Subnet {
    pub fn parse(cidr: &str) -> Result<Self> {
        let cidr = cidr.trim();
        let (addr, prefix) = match cidr.split_once('/') {
            Some((addr, prefix)) => {
                let prefix: u8 = prefix
                    .trim()
                    .parse()
                    .map_err(|_| DiscoveryError::InvalidSubnet(format!("bad prefix length in {:?}", cidr)))?;
                (addr, prefix)
            }
            None => (cidr, 32),
        };

        let addr: Ipv4Addr = addr
            .trim()
            .parse()
            .map_err(|_| DiscoveryError::InvalidSubnet(format!("bad address in {:?}", cidr)))?;

        if prefix > 32 {
            return Err(DiscoveryError::InvalidSubnet(format!("prefix /{} is longer than 32", prefix)));
        }
        if prefix < MIN_PREFIX {
            return Err(DiscoveryError::InvalidSubnet(format!(
                "prefix /{} is wider than /{}",
                prefix, MIN_PREFIX
            )));
        }

        Ok(Self {
            network: Ipv4Addr::from(u32::from(addr) & mask(prefix)),
            prefix,
        })
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.network) | !mask(self.prefix))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & mask(self.prefix) == u32::from(self.network)
    }

    /// Probe targets: every address except network and broadcast, or every
    /// address at all for point-to-point /31 and single-host /32 blocks.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + Send + 'static {
        let first = u32::from(self.network);
        let last = u32::from(self.broadcast());
        let range = if self.prefix >= 31 {
            first..=last
        } else {
            (first + 1)..=(last - 1)
        };
        range.map(Ipv4Addr::from)
    }

    pub fn host_count(&self) -> usize {
        match self.prefix {
            32 => 1,
            31 => 2,
            p => (1usize << (32 - p)) - 2,
        }
    }
}

fn mask(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix))
    }
}

impl FromStr for Subnet {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self> {
        Subnet::parse(s)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}
