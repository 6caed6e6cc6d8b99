//! DIDL-Lite structures for "now playing" metadata

use serde::{Deserialize, Serialize};
use crate::error::ParseResult;
use crate::common::xml_decode;

/// DIDL-Lite root structure for media metadata.
///
/// DIDL-Lite format example:
/// ```xml
/// <DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" ...>
///   <item id="-1" parentID="-1">
///     <dc:title>Song Title</dc:title>
///     <dc:creator>Artist Name</dc:creator>
///     <upnp:album>Album Name</upnp:album>
///     <res duration="0:03:58">uri</res>
///   </item>
/// </DIDL-Lite>
/// ```
///
/// Radio streams describe what is on air through `r:streamContent` and
/// `r:radioShowMd` instead of the structured fields.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename = "DIDL-Lite")]
pub struct DidlLite {
    /// The item (or container, for some favourites) describing the track
    #[serde(rename = "item", alias = "container", default)]
    pub item: Option<DidlItem>,
}

impl DidlLite {
    /// Parse DIDL-Lite XML content, unescaping it first if needed.
    pub fn from_xml(xml: &str) -> ParseResult<Self> {
        let xml = xml_decode::unescape_if_escaped(xml)?;
        xml_decode::parse(&xml)
    }
}

/// Individual item in DIDL-Lite metadata containing track information.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct DidlItem {
    #[serde(rename = "@id", default)]
    pub id: String,

    #[serde(rename = "@parentID", default)]
    pub parent_id: String,

    /// Resource element with URI, duration and protocol info
    #[serde(rename = "res", default)]
    pub res: Option<DidlResource>,

    #[serde(rename = "albumArtURI", default)]
    pub album_art_uri: Option<String>,

    /// Station logo some services use instead of album art
    #[serde(rename = "icon", default)]
    pub icon: Option<String>,

    /// Item class (e.g., object.item.audioItem.musicTrack)
    #[serde(rename = "class", default)]
    pub class: Option<String>,

    #[serde(rename = "title", default)]
    pub title: Option<String>,

    /// Track creator/artist
    #[serde(rename = "creator", default)]
    pub creator: Option<String>,

    #[serde(rename = "album", default)]
    pub album: Option<String>,

    /// Live caption for radio, usually "Artist - Title"
    #[serde(rename = "streamContent", default)]
    pub stream_content: Option<String>,

    /// Station or show name, optionally followed by `,p<programme id>`
    #[serde(rename = "radioShowMd", default)]
    pub radio_show_md: Option<String>,

    #[serde(rename = "streamInfo", default)]
    pub stream_info: Option<String>,
}

/// Resource element in DIDL-Lite containing media resource information.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct DidlResource {
    /// Duration in H:MM:SS format
    #[serde(rename = "@duration", default)]
    pub duration: Option<String>,

    #[serde(rename = "@protocolInfo", default)]
    pub protocol_info: Option<String>,

    /// The resource URI
    #[serde(rename = "$value", default)]
    pub uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_didl_lite_basic() {
        let didl_xml = r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/"><item id="-1" parentID="-1"><dc:title>Test Song</dc:title><dc:creator>Test Artist</dc:creator><upnp:album>Test Album</upnp:album></item></DIDL-Lite>"#;

        let didl = DidlLite::from_xml(didl_xml).unwrap();
        let item = didl.item.unwrap();
        assert_eq!(item.id, "-1");
        assert_eq!(item.title.as_deref(), Some("Test Song"));
        assert_eq!(item.creator.as_deref(), Some("Test Artist"));
        assert_eq!(item.album.as_deref(), Some("Test Album"));
    }

    #[test]
    fn test_parse_didl_lite_with_resource() {
        let didl_xml = r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/"><item id="-1" parentID="-1"><dc:title>Song</dc:title><res duration="0:03:58" protocolInfo="http-get:*:audio/mpeg:*">http://example.com/song.mp3</res></item></DIDL-Lite>"#;

        let item = DidlLite::from_xml(didl_xml).unwrap().item.unwrap();
        let res = item.res.unwrap();
        assert_eq!(res.duration.as_deref(), Some("0:03:58"));
        assert_eq!(res.protocol_info.as_deref(), Some("http-get:*:audio/mpeg:*"));
        assert_eq!(res.uri.as_deref(), Some("http://example.com/song.mp3"));
    }

    #[test]
    fn test_parse_escaped_radio_payload() {
        let didl_xml = "&lt;DIDL-Lite xmlns:r=&quot;urn:schemas-rinconnetworks-com:metadata-1-0/&quot;&gt;&lt;item id=&quot;-1&quot; parentID=&quot;-1&quot;&gt;&lt;r:streamContent&gt;Band - Tune&lt;/r:streamContent&gt;&lt;r:radioShowMd&gt;Morning Show,p123456&lt;/r:radioShowMd&gt;&lt;/item&gt;&lt;/DIDL-Lite&gt;";

        let item = DidlLite::from_xml(didl_xml).unwrap().item.unwrap();
        assert_eq!(item.stream_content.as_deref(), Some("Band - Tune"));
        assert_eq!(item.radio_show_md.as_deref(), Some("Morning Show,p123456"));
        assert_eq!(item.title, None);
    }

    #[test]
    fn test_malformed_didl_is_an_error() {
        assert!(DidlLite::from_xml("<DIDL-Lite><item>").is_err());
    }
}
