//! DIDL-Lite documents sent to speakers

use quick_xml::escape::escape;

/// URI scheme a member speaker uses to follow a group coordinator
pub const RINCON_SCHEME: &str = "x-rincon:";

/// Transport URI that makes a speaker follow the coordinator with `coordinator_uuid`
pub fn rincon_uri(coordinator_uuid: &str) -> String {
    format!("{}{}", RINCON_SCHEME, coordinator_uuid)
}

/// Minimal metadata for playing a plain HTTP(S) audio URL
///
/// The result is unescaped DIDL; SetAVTransportURI escapes it once more when
/// embedding it in the SOAP body.
pub fn stream_didl(uri: &str, title: &str) -> String {
    format!(
        concat!(
            r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
            r#"xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" "#,
            r#"xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/" "#,
            r#"xmlns:r="urn:schemas-rinconnetworks-com:metadata-1-0/">"#,
            r#"<item id="1" parentID="0" restricted="1">"#,
            "<dc:title>{title}</dc:title>",
            "<upnp:class>object.item.audioItem.musicTrack</upnp:class>",
            r#"<res protocolInfo="http-get:*:audio/mpeg:*">{uri}</res>"#,
            "</item></DIDL-Lite>"
        ),
        title = escape(title),
        uri = escape(uri),
    )
}
