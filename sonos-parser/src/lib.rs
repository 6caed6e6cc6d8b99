//! # sonos-parser
//!
//! Tolerant parsers for the XML documents Sonos speakers hand back: DIDL-Lite
//! track metadata and the zone group topology document.
//!
//! ```rust
//! use sonos_parser::{extract, SourceKind};
//!
//! let record = extract("NOT_IMPLEMENTED");
//! assert_eq!(record.source_kind, SourceKind::Unknown);
//! ```

pub mod common;
pub mod error;
pub mod metadata;
pub mod zone_group;

pub use common::{DidlItem, DidlLite, DidlResource};
pub use error::{ParseError, ParseResult};
pub use metadata::{extract, extract_with_uri, SourceKind, TrackRecord, UNKNOWN_TRACK};
pub use zone_group::{parse_zone_group_state, Satellite, ZoneGroup, ZoneGroupMember, ZoneGroupState, ZoneGroups};
