//! Device description parsing and classification.
//!
//! Every Sonos speaker serves `/xml/device_description.xml`. The root device
//! is the ZonePlayer; the services that matter for control live on embedded
//! MediaRenderer devices, so classification walks the whole tree.

use std::net::Ipv4Addr;

use serde::Deserialize;

use crate::SpeakerIdentity;

/// Services a device must expose to be driven as a speaker
const REQUIRED_SERVICES: [&str; 2] = ["AVTransport", "RenderingControl"];

/// UPnP device description root element.
#[derive(Debug, Deserialize)]
pub struct Root {
    pub device: DeviceDescription,
}

/// One `<device>` node, root or embedded.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescription {
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub friendly_name: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub model_number: Option<String>,
    #[serde(default)]
    pub software_version: Option<String>,
    #[serde(default)]
    pub hardware_version: Option<String>,
    #[serde(default)]
    pub serial_num: Option<String>,
    #[serde(rename = "MACAddress", default)]
    pub mac_address: Option<String>,
    #[serde(rename = "UDN", default)]
    pub udn: String,
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub service_list: Option<ServiceList>,
    #[serde(default)]
    pub device_list: Option<DeviceList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceList {
    #[serde(default)]
    pub service: Vec<ServiceEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    #[serde(default)]
    pub service_type: String,
    #[serde(rename = "controlURL", default)]
    pub control_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeviceList {
    #[serde(default)]
    pub device: Vec<DeviceDescription>,
}

impl DeviceDescription {
    /// Parse a device description document.
    ///
    /// Returns `None` for anything that is not a UPnP description; an
    /// unrelated web server at the address is an expected outcome.
    pub fn from_xml(xml: &str) -> Option<Self> {
        quick_xml::de::from_str::<Root>(xml).ok().map(|root| root.device)
    }

    /// Service types exposed by this device and every embedded device
    pub fn service_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self
            .service_list
            .iter()
            .flat_map(|list| list.service.iter())
            .map(|s| s.service_type.as_str())
            .collect();
        for child in self.device_list.iter().flat_map(|list| list.device.iter()) {
            types.extend(child.service_types());
        }
        types
    }

    /// True when the tree exposes `urn:...:service:<name>:<version>`
    pub fn has_service(&self, name: &str) -> bool {
        let marker = format!(":service:{}:", name);
        self.service_types().iter().any(|t| t.contains(&marker))
    }

    /// Sonos manufacturer marker plus the transport and rendering services.
    pub fn is_sonos_speaker(&self) -> bool {
        self.manufacturer.to_lowercase().contains("sonos")
            && REQUIRED_SERVICES.iter().all(|s| self.has_service(s))
    }

    /// Build the immutable identity recorded at discovery time.
    pub fn to_identity(&self, address: Ipv4Addr) -> SpeakerIdentity {
        let uuid = self.udn.strip_prefix("uuid:").unwrap_or(&self.udn).to_string();
        let room_name = non_empty(&self.room_name)
            .or_else(|| non_empty(&self.display_name))
            .or_else(|| Some(self.friendly_name.trim()).filter(|n| !n.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Sonos ({})", address));

        SpeakerIdentity {
            uuid,
            address,
            room_name,
            model_name: non_empty(&self.model_name).unwrap_or("Unknown").to_string(),
            model_number: non_empty(&self.model_number).map(str::to_string),
            software_version: non_empty(&self.software_version).map(str::to_string),
            hardware_version: non_empty(&self.hardware_version).map(str::to_string),
            serial_number: non_empty(&self.serial_num).map(str::to_string),
            mac_address: non_empty(&self.mac_address).map(str::to_string),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Trimmed description of a Sonos One
    pub const SONOS_ONE: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <specVersion><major>1</major><minor>0</minor></specVersion>
  <device>
    <deviceType>urn:schemas-upnp-org:device:ZonePlayer:1</deviceType>
    <friendlyName>192.168.2.20 - Sonos One - RINCON_48A6B8123ABC01400</friendlyName>
    <manufacturer>Sonos, Inc.</manufacturer>
    <modelNumber>S18</modelNumber>
    <modelName>Sonos One</modelName>
    <softwareVersion>79.1-56030</softwareVersion>
    <hardwareVersion>1.20.1.6-2.1</hardwareVersion>
    <serialNum>48-A6-B8-12-3A-BC:D</serialNum>
    <MACAddress>48:A6:B8:12:3A:BC</MACAddress>
    <UDN>uuid:RINCON_48A6B8123ABC01400</UDN>
    <roomName>Kitchen</roomName>
    <displayName>One</displayName>
    <serviceList>
      <service><serviceType>urn:schemas-upnp-org:service:AlarmClock:1</serviceType><controlURL>/AlarmClock/Control</controlURL></service>
      <service><serviceType>urn:schemas-upnp-org:service:DeviceProperties:1</serviceType><controlURL>/DeviceProperties/Control</controlURL></service>
      <service><serviceType>urn:schemas-upnp-org:service:ZoneGroupTopology:1</serviceType><controlURL>/ZoneGroupTopology/Control</controlURL></service>
    </serviceList>
    <deviceList>
      <device>
        <deviceType>urn:schemas-upnp-org:device:MediaServer:1</deviceType>
        <friendlyName>Kitchen Media Server</friendlyName>
        <manufacturer>Sonos, Inc.</manufacturer>
        <UDN>uuid:RINCON_48A6B8123ABC01400_MS</UDN>
        <serviceList>
          <service><serviceType>urn:schemas-upnp-org:service:ContentDirectory:1</serviceType></service>
        </serviceList>
      </device>
      <device>
        <deviceType>urn:schemas-upnp-org:device:MediaRenderer:1</deviceType>
        <friendlyName>Kitchen - Sonos One Media Renderer</friendlyName>
        <manufacturer>Sonos, Inc.</manufacturer>
        <UDN>uuid:RINCON_48A6B8123ABC01400_MR</UDN>
        <serviceList>
          <service><serviceType>urn:schemas-upnp-org:service:RenderingControl:1</serviceType><controlURL>/MediaRenderer/RenderingControl/Control</controlURL></service>
          <service><serviceType>urn:schemas-upnp-org:service:ConnectionManager:1</serviceType></service>
          <service><serviceType>urn:schemas-upnp-org:service:AVTransport:1</serviceType><controlURL>/MediaRenderer/AVTransport/Control</controlURL></service>
        </serviceList>
      </device>
    </deviceList>
  </device>
</root>"#;

    /// A Sonos BRIDGE: right manufacturer, no playback services
    pub const SONOS_BRIDGE: &str = r#"<?xml version="1.0"?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <device>
    <deviceType>urn:schemas-upnp-org:device:ZonePlayer:1</deviceType>
    <friendlyName>192.168.2.2 - Sonos BRIDGE</friendlyName>
    <manufacturer>Sonos, Inc.</manufacturer>
    <modelName>Sonos BRIDGE</modelName>
    <UDN>uuid:RINCON_000E58BR1DGE01400</UDN>
    <serviceList>
      <service><serviceType>urn:schemas-upnp-org:service:ZoneGroupTopology:1</serviceType></service>
    </serviceList>
  </device>
</root>"#;

    /// A media renderer from another vendor
    pub const OTHER_RENDERER: &str = r#"<?xml version="1.0"?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <device>
    <deviceType>urn:schemas-upnp-org:device:MediaRenderer:1</deviceType>
    <friendlyName>Living Room TV</friendlyName>
    <manufacturer>Acme Corp</manufacturer>
    <modelName>Screen 9000</modelName>
    <UDN>uuid:acme-1</UDN>
    <serviceList>
      <service><serviceType>urn:schemas-upnp-org:service:RenderingControl:1</serviceType></service>
      <service><serviceType>urn:schemas-upnp-org:service:AVTransport:1</serviceType></service>
    </serviceList>
  </device>
</root>"#;
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_sonos_speaker_with_embedded_renderer() {
        let device = DeviceDescription::from_xml(SONOS_ONE).unwrap();

        assert_eq!(device.manufacturer, "Sonos, Inc.");
        assert!(device.has_service("AVTransport"));
        assert!(device.has_service("ZoneGroupTopology"));
        assert!(!device.has_service("Queue"));
        assert!(device.is_sonos_speaker());
    }

    #[test]
    fn test_bridge_and_foreign_renderer_are_rejected() {
        assert!(!DeviceDescription::from_xml(SONOS_BRIDGE).unwrap().is_sonos_speaker());
        assert!(!DeviceDescription::from_xml(OTHER_RENDERER).unwrap().is_sonos_speaker());
    }

    #[test]
    fn test_not_a_description() {
        assert!(DeviceDescription::from_xml("<html><body>router login</body></html>").map_or(true, |d| !d.is_sonos_speaker()));
        assert!(DeviceDescription::from_xml("not xml at all").is_none());
    }

    #[test]
    fn test_to_identity() {
        let address = Ipv4Addr::new(192, 168, 2, 20);
        let identity = DeviceDescription::from_xml(SONOS_ONE).unwrap().to_identity(address);

        assert_eq!(identity.uuid, "RINCON_48A6B8123ABC01400");
        assert_eq!(identity.address, address);
        assert_eq!(identity.room_name, "Kitchen");
        assert_eq!(identity.model_name, "Sonos One");
        assert_eq!(identity.model_number.as_deref(), Some("S18"));
        assert_eq!(identity.software_version.as_deref(), Some("79.1-56030"));
        assert_eq!(identity.hardware_version.as_deref(), Some("1.20.1.6-2.1"));
        assert_eq!(identity.serial_number.as_deref(), Some("48-A6-B8-12-3A-BC:D"));
        assert_eq!(identity.mac_address.as_deref(), Some("48:A6:B8:12:3A:BC"));
    }

    #[test]
    fn test_room_name_fallbacks() {
        let address = Ipv4Addr::new(10, 0, 0, 9);
        let named = DeviceDescription {
            friendly_name: "Office Speaker".to_string(),
            ..DeviceDescription::default()
        };
        assert_eq!(named.to_identity(address).room_name, "Office Speaker");

        let anonymous = DeviceDescription::default();
        let identity = anonymous.to_identity(address);
        assert_eq!(identity.room_name, "Sonos (10.0.0.9)");
        assert_eq!(identity.model_name, "Unknown");
    }
}
