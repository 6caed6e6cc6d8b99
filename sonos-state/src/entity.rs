//! Entity references
//!
//! Collaborators name speakers either by address or by the entity id the
//! home-automation side knows them as. Both are resolved to an address at the
//! command boundary; nothing below it sees entity ids.

use std::convert::Infallible;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use sonos_discovery::SpeakerIdentity;

/// Domain prefix of media player entity ids
pub const ENTITY_DOMAIN: &str = "media_player";

/// A speaker named by a command
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpeakerRef {
    Address(Ipv4Addr),
    /// `media_player.<slug>`, a bare slug, a room name or a speaker UUID
    Entity(String),
}

impl From<Ipv4Addr> for SpeakerRef {
    fn from(address: Ipv4Addr) -> Self {
        SpeakerRef::Address(address)
    }
}

impl From<&str> for SpeakerRef {
    fn from(s: &str) -> Self {
        match s.trim().parse::<Ipv4Addr>() {
            Ok(address) => SpeakerRef::Address(address),
            Err(_) => SpeakerRef::Entity(s.trim().to_string()),
        }
    }
}

impl From<String> for SpeakerRef {
    fn from(s: String) -> Self {
        SpeakerRef::from(s.as_str())
    }
}

impl FromStr for SpeakerRef {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SpeakerRef::from(s))
    }
}

impl fmt::Display for SpeakerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeakerRef::Address(address) => write!(f, "{}", address),
            SpeakerRef::Entity(name) => f.write_str(name),
        }
    }
}

/// Lowercase, with every run of non-alphanumerics collapsed to one `_`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

/// Entity id for a room, e.g. `media_player.living_room`
pub fn entity_id(room_name: &str) -> String {
    format!("{}.{}", ENTITY_DOMAIN, slugify(room_name))
}

/// Whether `reference` names `identity`
pub(crate) fn matches(identity: &SpeakerIdentity, reference: &str) -> bool {
    let reference = reference.trim();
    if reference.is_empty() {
        return false;
    }

    let slug = slugify(&identity.room_name);
    let wanted = reference.to_lowercase();
    let bare = wanted
        .strip_prefix(ENTITY_DOMAIN)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(&wanted);

    bare == slug
        || identity.room_name.eq_ignore_ascii_case(reference)
        || identity.uuid.eq_ignore_ascii_case(reference)
        || identity.uuid.eq_ignore_ascii_case(&format!("uuid:{}", reference))
}
