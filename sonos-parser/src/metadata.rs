//! Normalised "now playing" records
//!
//! Streaming services fill DIDL-Lite inconsistently: library tracks carry
//! structured title/creator/album, live radio only a caption and a show name,
//! and some payloads are not XML at all. [`extract`] walks an explicit fallback
//! chain over those fields and never fails; a payload it cannot read becomes
//! an empty record tagged [`SourceKind::Unknown`].

use serde::{Deserialize, Serialize};

use crate::common::didl::{DidlItem, DidlLite};

/// Title used when a payload parses but names nothing
pub const UNKNOWN_TRACK: &str = "Unknown track";

/// URI prefixes that identify live or service-hosted streams rather than queue items
const STREAM_SCHEMES: &[&str] = &[
    "x-rincon-mp3radio:",
    "x-sonosapi-stream:",
    "x-sonosapi-radio:",
    "x-sonosapi-hls:",
    "x-sonosapi-hls-static:",
    "aac:",
    "http://",
    "https://",
];

/// Where the current item comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A track from a library or the queue
    Library,
    /// Live radio or another stream
    Stream,
    /// Nothing could be parsed
    #[default]
    Unknown,
}

/// A track as shown to collaborators
///
/// Produced whole on every poll and never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackRecord {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub art_uri: Option<String>,
    /// Track length as reported in the resource (`H:MM:SS`)
    pub duration: Option<String>,
    pub source_kind: SourceKind,
}

impl TrackRecord {
    /// Resolve a relative artwork path (`/getaa?...`) against the speaker's base URL
    pub fn with_base(mut self, base_url: &str) -> Self {
        if let Some(art) = self.art_uri.take() {
            self.art_uri = Some(if art.starts_with('/') {
                format!("{}{}", base_url.trim_end_matches('/'), art)
            } else {
                art
            });
        }
        self
    }

    /// True when nothing at all is known about the item
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.art_uri.is_none()
    }
}

/// Extract a track record from a DIDL-Lite payload
pub fn extract(didl: &str) -> TrackRecord {
    extract_with_uri(didl, "")
}

/// Extract a track record, using the transport URI as an extra hint for the source kind
pub fn extract_with_uri(didl: &str, track_uri: &str) -> TrackRecord {
    let trimmed = didl.trim();
    if trimmed.is_empty() || trimmed == "NOT_IMPLEMENTED" {
        return TrackRecord::default();
    }

    let item = match DidlLite::from_xml(trimmed) {
        Ok(DidlLite { item: Some(item) }) => item,
        Ok(DidlLite { item: None }) | Err(_) => return TrackRecord::default(),
    };

    from_item(&item, track_uri)
}

fn from_item(item: &DidlItem, track_uri: &str) -> TrackRecord {
    let structured_title = non_empty(&item.title);
    let caption = non_empty(&item.stream_content);
    let show = non_empty(&item.radio_show_md).map(strip_programme_id);

    let title = structured_title
        .or(caption)
        .or(show)
        .unwrap_or(UNKNOWN_TRACK)
        .to_string();

    let artist = non_empty(&item.creator)
        .or(if structured_title.is_none() && caption.is_some() { show } else { None })
        .map(str::to_string);

    let source_kind = if is_stream(item, track_uri) {
        SourceKind::Stream
    } else {
        SourceKind::Library
    };

    TrackRecord {
        title: Some(title),
        artist,
        album: non_empty(&item.album).map(str::to_string),
        art_uri: artwork(item),
        duration: item.res.as_ref().and_then(|r| non_empty(&r.duration)).map(str::to_string),
        source_kind,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// `Morning Show,p123456` -> `Morning Show`
fn strip_programme_id(show: &str) -> &str {
    match show.rsplit_once(',') {
        Some((name, id))
            if !name.trim().is_empty()
                && id.len() > 1
                && id.starts_with('p')
                && id[1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            name.trim()
        }
        _ => show,
    }
}

fn artwork(item: &DidlItem) -> Option<String> {
    non_empty(&item.album_art_uri)
        .or_else(|| non_empty(&item.icon))
        .map(str::to_string)
        .or_else(|| {
            item.res
                .as_ref()
                .and_then(|r| non_empty(&r.protocol_info))
                .and_then(uri_in_protocol_info)
        })
}

/// Some services smuggle an artwork URL into the fourth protocol-info field
fn uri_in_protocol_info(protocol_info: &str) -> Option<String> {
    let start = protocol_info
        .find("https://")
        .or_else(|| protocol_info.find("http://"))?;
    let uri = protocol_info[start..]
        .split(|c: char| c.is_whitespace() || c == ';')
        .next()?;
    Some(uri.to_string())
}

fn is_stream(item: &DidlItem, track_uri: &str) -> bool {
    let broadcast_class = item
        .class
        .as_deref()
        .map_or(false, |c| c.contains("audioBroadcast"));
    let radio_fields = non_empty(&item.stream_content).is_some() || non_empty(&item.radio_show_md).is_some();
    let res_uri = item.res.as_ref().and_then(|r| non_empty(&r.uri)).unwrap_or("");

    broadcast_class || radio_fields || has_stream_scheme(track_uri) || has_stream_scheme(res_uri)
}

fn has_stream_scheme(uri: &str) -> bool {
    let uri = uri.trim();
    STREAM_SCHEMES.iter().any(|scheme| uri.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const NS: &str = r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" xmlns:r="urn:schemas-rinconnetworks-com:metadata-1-0/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/""#;

    fn didl(body: &str) -> String {
        format!(r#"<DIDL-Lite {}><item id="-1" parentID="-1" restricted="true">{}</item></DIDL-Lite>"#, NS, body)
    }

    #[test]
    fn test_library_track() {
        let record = extract_with_uri(
            &didl(
                "<dc:title>Harvest Moon</dc:title><dc:creator>Neil Young</dc:creator>\
                 <upnp:album>Harvest Moon</upnp:album><upnp:albumArtURI>/getaa?s=1&amp;u=x</upnp:albumArtURI>\
                 <upnp:class>object.item.audioItem.musicTrack</upnp:class>\
                 <res duration=\"0:05:03\" protocolInfo=\"x-file-cifs:*:audio/flac:*\">x-file-cifs://nas/moon.flac</res>",
            ),
            "x-file-cifs://nas/moon.flac",
        );

        assert_eq!(record.title.as_deref(), Some("Harvest Moon"));
        assert_eq!(record.artist.as_deref(), Some("Neil Young"));
        assert_eq!(record.album.as_deref(), Some("Harvest Moon"));
        assert_eq!(record.art_uri.as_deref(), Some("/getaa?s=1&u=x"));
        assert_eq!(record.duration.as_deref(), Some("0:05:03"));
        assert_eq!(record.source_kind, SourceKind::Library);
    }

    #[test]
    fn test_stream_caption_wins_over_placeholder() {
        let record = extract(&didl("<r:streamContent>Artist - Live Song</r:streamContent>"));

        assert_eq!(record.title.as_deref(), Some("Artist - Live Song"));
        assert_ne!(record.title.as_deref(), Some(UNKNOWN_TRACK));
        assert_eq!(record.source_kind, SourceKind::Stream);
    }

    #[test]
    fn test_caption_with_show_uses_show_as_artist() {
        let record = extract(&didl(
            "<r:streamContent>Traffic update</r:streamContent><r:radioShowMd>Drive Time,p98765</r:radioShowMd>",
        ));

        assert_eq!(record.title.as_deref(), Some("Traffic update"));
        assert_eq!(record.artist.as_deref(), Some("Drive Time"));
    }

    #[test]
    fn test_radio_show_is_third_choice() {
        let record = extract(&didl("<r:radioShowMd>Night Jazz,p42</r:radioShowMd><r:streamContent></r:streamContent>"));
        assert_eq!(record.title.as_deref(), Some("Night Jazz"));
        assert_eq!(record.artist, None);
    }

    #[test]
    fn test_placeholder_when_nothing_named() {
        let record = extract(&didl("<upnp:class>object.item.audioItem.audioBroadcast</upnp:class>"));
        assert_eq!(record.title.as_deref(), Some(UNKNOWN_TRACK));
        assert_eq!(record.source_kind, SourceKind::Stream);
    }

    #[rstest]
    #[case("")]
    #[case("NOT_IMPLEMENTED")]
    #[case("<DIDL-Lite><item>")]
    #[case("definitely not xml <<<")]
    fn test_unparseable_payload_degrades_to_empty(#[case] payload: &str) {
        let record = extract(payload);
        assert!(record.is_empty());
        assert_eq!(record.title, None);
        assert_eq!(record.source_kind, SourceKind::Unknown);
    }

    #[rstest]
    #[case("x-sonosapi-stream:s1234?sid=254", SourceKind::Stream)]
    #[case("x-rincon-mp3radio://radio.example/live", SourceKind::Stream)]
    #[case("https://cdn.example/track.mp3", SourceKind::Stream)]
    #[case("x-file-cifs://nas/track.mp3", SourceKind::Library)]
    fn test_source_kind_from_track_uri(#[case] uri: &str, #[case] expected: SourceKind) {
        let record = extract_with_uri(&didl("<dc:title>T</dc:title>"), uri);
        assert_eq!(record.source_kind, expected);
    }

    #[test]
    fn test_artwork_fallbacks() {
        let icon = extract(&didl("<dc:title>T</dc:title><upnp:icon>http://logo.example/a.png</upnp:icon>"));
        assert_eq!(icon.art_uri.as_deref(), Some("http://logo.example/a.png"));

        let embedded = extract(&didl(
            "<dc:title>T</dc:title><res protocolInfo=\"sonos.com-http:*:audio/mp4:https://art.example/c.jpg\">x-sonos-http:track.mp4</res>",
        ));
        assert_eq!(embedded.art_uri.as_deref(), Some("https://art.example/c.jpg"));

        let none = extract(&didl("<dc:title>T</dc:title>"));
        assert_eq!(none.art_uri, None);
    }

    #[test]
    fn test_with_base_only_rewrites_relative_paths() {
        let record = TrackRecord {
            art_uri: Some("/getaa?u=1".to_string()),
            ..TrackRecord::default()
        };
        assert_eq!(
            record.with_base("http://192.168.2.20:1400").art_uri.as_deref(),
            Some("http://192.168.2.20:1400/getaa?u=1")
        );

        let absolute = TrackRecord {
            art_uri: Some("https://art.example/x.jpg".to_string()),
            ..TrackRecord::default()
        };
        assert_eq!(
            absolute.with_base("http://192.168.2.20:1400").art_uri.as_deref(),
            Some("https://art.example/x.jpg")
        );
    }

    #[test]
    fn test_escaped_payload_is_accepted() {
        let escaped = didl("<dc:title>Escaped &amp; Fine</dc:title>")
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;");
        let record = extract(&escaped);
        assert_eq!(record.title.as_deref(), Some("Escaped & Fine"));
    }

    #[test]
    fn test_record_serializes_source_kind_snake_case() {
        let record = extract(&didl("<r:streamContent>x</r:streamContent>"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["source_kind"], "stream");
    }
}
