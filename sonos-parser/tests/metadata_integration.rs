//! Metadata extraction against payloads captured from real speakers

use sonos_parser::{extract_with_uri, parse_zone_group_state, SourceKind, TrackRecord, UNKNOWN_TRACK};

const RADIO_TRACK_URI: &str = "x-sonosapi-stream:s17488?sid=254&flags=8224&sn=0";

/// TuneIn station between songs: only the caption is filled in, escaped once
const TUNEIN_ESCAPED: &str = "&lt;DIDL-Lite xmlns:dc=&quot;http://purl.org/dc/elements/1.1/&quot; xmlns:upnp=&quot;urn:schemas-upnp-org:metadata-1-0/upnp/&quot; xmlns:r=&quot;urn:schemas-rinconnetworks-com:metadata-1-0/&quot; xmlns=&quot;urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/&quot;&gt;&lt;item id=&quot;-1&quot; parentID=&quot;-1&quot; restricted=&quot;true&quot;&gt;&lt;res protocolInfo=&quot;sonos.com-http:*:application/octet-stream:*&quot;&gt;x-sonosapi-stream:s17488?sid=254&lt;/res&gt;&lt;r:streamContent&gt;Nina Simone - Feeling Good&lt;/r:streamContent&gt;&lt;r:radioShowMd&gt;Jazz Classics,p1123&lt;/r:radioShowMd&gt;&lt;upnp:albumArtURI&gt;/getaa?s=1&amp;amp;u=x-sonosapi-stream%3as17488&lt;/upnp:albumArtURI&gt;&lt;upnp:class&gt;object.item&lt;/upnp:class&gt;&lt;/item&gt;&lt;/DIDL-Lite&gt;";

#[test]
fn test_radio_caption_record() {
    let record = extract_with_uri(TUNEIN_ESCAPED, RADIO_TRACK_URI).with_base("http://192.168.4.31:1400");

    assert_eq!(record.title.as_deref(), Some("Nina Simone - Feeling Good"));
    assert_eq!(record.artist.as_deref(), Some("Jazz Classics"));
    assert_eq!(record.source_kind, SourceKind::Stream);
    assert_eq!(
        record.art_uri.as_deref(),
        Some("http://192.168.4.31:1400/getaa?s=1&u=x-sonosapi-stream%3as17488")
    );
}

#[test]
fn test_line_in_without_metadata() {
    let record = extract_with_uri("", "x-rincon-stream:RINCON_000E58A1B2C301400");
    assert_eq!(record, TrackRecord::default());
}

#[test]
fn test_metadata_without_names_gets_placeholder() {
    let didl = r#"<DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/"><item id="-1" parentID="-1"><res>x-file-cifs://nas/a.mp3</res></item></DIDL-Lite>"#;
    let record = extract_with_uri(didl, "x-file-cifs://nas/a.mp3");
    assert_eq!(record.title.as_deref(), Some(UNKNOWN_TRACK));
    assert_eq!(record.source_kind, SourceKind::Library);
}

#[test]
fn test_zone_group_state_with_bridge_and_hidden_member() {
    let xml = r#"<ZoneGroupState><ZoneGroups>
        <ZoneGroup Coordinator="RINCON_BR01" ID="RINCON_BR01:3"><ZoneGroupMember UUID="RINCON_BR01" Location="http://192.168.4.2:1400/xml/device_description.xml" ZoneName="BRIDGE" IsZoneBridge="1"/></ZoneGroup>
        <ZoneGroup Coordinator="RINCON_K1" ID="RINCON_K1:44"><ZoneGroupMember UUID="RINCON_K1" Location="http://192.168.4.31:1400/xml/device_description.xml" ZoneName="Kitchen"/><ZoneGroupMember UUID="RINCON_K2" Location="http://192.168.4.32:1400/xml/device_description.xml" ZoneName="Kitchen" Invisible="1"/></ZoneGroup>
    </ZoneGroups><VanishedDevices></VanishedDevices></ZoneGroupState>"#;

    let groups = parse_zone_group_state(xml).unwrap();
    assert_eq!(groups.len(), 2);
    assert!(groups[0].members[0].is_zone_bridge());
    assert!(groups[1].members[1].is_invisible());
}
