//! High-level Sonos API for device control
//!
//! Typed UPnP operations for the services a controller needs when it reaches
//! speakers directly by address: AVTransport, RenderingControl,
//! DeviceProperties and ZoneGroupTopology. It uses the private `soap-client`
//! crate for the SOAP exchange.
//!
//! ```rust,no_run
//! use std::net::Ipv4Addr;
//! use sonos_api::SonosClient;
//! use sonos_api::operations::{SetVolumeOperation, SetVolumeOperationRequest};
//!
//! let client = SonosClient::new();
//! client.execute::<SetVolumeOperation>(
//!     Ipv4Addr::new(192, 168, 2, 30),
//!     &SetVolumeOperationRequest { volume: 25 },
//! )?;
//! # Ok::<(), sonos_api::ApiError>(())
//! ```

pub mod client;
pub mod didl;
pub mod error;
pub mod operation;
pub mod operations;
pub mod service;
pub mod time;

pub use client::SonosClient;
pub use error::{ApiError, Result};
pub use operation::SonosOperation;
pub use service::{Service, ServiceInfo};
pub use soap_client::{SoapClient, SoapError, TransportError, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, SONOS_PORT};
