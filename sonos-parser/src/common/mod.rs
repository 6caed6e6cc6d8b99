//! Shared XML helpers and the DIDL-Lite model

pub mod didl;
pub mod xml_decode;

pub use didl::{DidlItem, DidlLite, DidlResource};
