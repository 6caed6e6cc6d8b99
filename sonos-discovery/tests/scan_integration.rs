//! Sweeps against a local HTTP server standing in for a speaker

use std::net::Ipv4Addr;
use std::time::Duration;

use sonos_discovery::{probe_subnet, DiscoveryError, Prober, Subnet, DEVICE_DESCRIPTION_PATH};

const DESCRIPTION: &str = r#"<?xml version="1.0"?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <device>
    <deviceType>urn:schemas-upnp-org:device:ZonePlayer:1</deviceType>
    <friendlyName>127.0.0.1 - Sonos Five</friendlyName>
    <manufacturer>Sonos, Inc.</manufacturer>
    <modelName>Sonos Five</modelName>
    <UDN>uuid:RINCON_5F5F5F5F5F5F01400</UDN>
    <roomName>Studio</roomName>
    <deviceList>
      <device>
        <deviceType>urn:schemas-upnp-org:device:MediaRenderer:1</deviceType>
        <serviceList>
          <service><serviceType>urn:schemas-upnp-org:service:RenderingControl:1</serviceType></service>
          <service><serviceType>urn:schemas-upnp-org:service:AVTransport:1</serviceType></service>
        </serviceList>
      </device>
    </deviceList>
  </device>
</root>"#;

fn port_of(server: &mockito::ServerGuard) -> u16 {
    server
        .host_with_port()
        .rsplit(':')
        .next()
        .and_then(|p| p.parse().ok())
        .expect("mock server port")
}

#[test]
fn test_scan_of_single_host_block_finds_speaker() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", DEVICE_DESCRIPTION_PATH)
        .with_status(200)
        .with_body(DESCRIPTION)
        .expect(1)
        .create();

    let prober = Prober::new(Duration::from_secs(2)).unwrap().with_port(port_of(&server));
    let found: Vec<_> = prober.scan(&Subnet::parse("127.0.0.1/32").unwrap(), 4).collect();

    mock.assert();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].room_name, "Studio");
    assert_eq!(found[0].address, Ipv4Addr::LOCALHOST);
}

#[test]
fn test_probe_subnet_rejects_bad_cidr() {
    assert!(matches!(
        probe_subnet("not-a-subnet", Duration::from_secs(1), 10),
        Err(DiscoveryError::InvalidSubnet(_))
    ));
    assert!(matches!(
        probe_subnet("10.0.0.0/8", Duration::from_secs(1), 10),
        Err(DiscoveryError::InvalidSubnet(_))
    ));
}
