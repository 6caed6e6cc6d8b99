//! Private SOAP client for Sonos speakers reached by address
//!
//! Speakers on a routed subnet are never discovered over multicast, so every
//! request here goes straight to `http://<address>:1400/...`. The client is
//! stateless apart from its HTTP agent and never retries; retry policy belongs
//! to callers.

mod error;

pub use error::{SoapError, TransportError};

use std::net::Ipv4Addr;
use std::time::Duration;
use xmltree::Element;

/// HTTP port every Sonos speaker serves its UPnP endpoints on
pub const SONOS_PORT: u16 = 1400;

/// Default TCP connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default response read timeout
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// A minimal SOAP client for UPnP device communication
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
    port: u16,
}

impl SoapClient {
    /// Create a new SOAP client with default timeouts
    pub fn new() -> Self {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }

    /// Create a SOAP client with caller-supplied connect and read timeouts
    pub fn with_timeouts(connect: Duration, read: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect)
                .timeout_read(read)
                .timeout_write(read)
                .build(),
            port: SONOS_PORT,
        }
    }

    /// Point the client at a non-standard port (used against local test servers)
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// The port requests are sent to
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Send a SOAP request and return the `<{action}Response>` element
    pub fn call(
        &self,
        address: Ipv4Addr,
        endpoint: &str,
        service_uri: &str,
        action: &str,
        payload: &str,
    ) -> Result<Element, TransportError> {
        let body = format!(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"><s:Body><u:{action} xmlns:u="{service_uri}">{payload}</u:{action}></s:Body></s:Envelope>"#
        );

        let url = format!("http://{}:{}/{}", address, self.port, endpoint);
        let soap_action = format!("\"{}#{}\"", service_uri, action);
        let fail = |cause: SoapError| TransportError::new(address, action, cause);

        tracing::trace!("SOAP {} -> {}", action, url);

        let xml_text = match self
            .agent
            .post(&url)
            .set("Content-Type", "text/xml; charset=\"utf-8\"")
            .set("SOAPACTION", &soap_action)
            .send_string(&body)
        {
            Ok(response) => response
                .into_string()
                .map_err(|e| fail(SoapError::Network(e.to_string())))?,
            Err(ureq::Error::Status(status, response)) => {
                // Sonos reports faults with HTTP 500, the fault body is the useful part
                let body = response.into_string().unwrap_or_default();
                let cause = Element::parse(body.as_bytes())
                    .ok()
                    .and_then(|xml| fault_from_envelope(&xml))
                    .unwrap_or(SoapError::HttpStatus(status));
                return Err(fail(cause));
            }
            Err(e) => return Err(fail(SoapError::Network(e.to_string()))),
        };

        let xml = Element::parse(xml_text.as_bytes())
            .map_err(|e| fail(SoapError::Parse(e.to_string())))?;

        extract_response(&xml, action).map_err(fail)
    }

    /// Fetch a raw document such as the device description
    pub fn fetch(&self, address: Ipv4Addr, path: &str) -> Result<String, TransportError> {
        let url = format!(
            "http://{}:{}/{}",
            address,
            self.port,
            path.trim_start_matches('/')
        );
        let action = format!("GET {}", path);

        match self.agent.get(&url).call() {
            Ok(response) => response
                .into_string()
                .map_err(|e| TransportError::new(address, action, SoapError::Network(e.to_string()))),
            Err(ureq::Error::Status(status, _)) => Err(TransportError::new(
                address,
                action,
                SoapError::HttpStatus(status),
            )),
            Err(e) => Err(TransportError::new(
                address,
                action,
                SoapError::Network(e.to_string()),
            )),
        }
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_response(xml: &Element, action: &str) -> Result<Element, SoapError> {
    let body = xml
        .get_child("Body")
        .ok_or_else(|| SoapError::Parse("Missing SOAP Body".to_string()))?;

    // Faults are checked before the action response
    if let Some(fault) = fault_from_envelope(xml) {
        return Err(fault);
    }

    let response_name = format!("{}Response", action);
    body.get_child(response_name.as_str())
        .cloned()
        .ok_or_else(|| SoapError::Parse(format!("Missing {} element", response_name)))
}

fn fault_from_envelope(xml: &Element) -> Option<SoapError> {
    let fault = xml.get_child("Body")?.get_child("Fault")?;
    let upnp_error = fault
        .get_child("detail")
        .and_then(|d| d.get_child("UPnPError").or_else(|| d.get_child("UpnPError")));

    let code = upnp_error
        .and_then(|e| e.get_child("errorCode"))
        .and_then(|c| c.get_text())
        .and_then(|t| t.trim().parse::<u16>().ok())
        .unwrap_or(500);

    let description = upnp_error
        .and_then(|e| e.get_child("errorDescription"))
        .and_then(|d| d.get_text())
        .or_else(|| fault.get_child("faultstring").and_then(|f| f.get_text()))
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    Some(SoapError::Fault { code, description })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAULT_ENVELOPE: &str = r#"
        <s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
            <s:Body>
                <s:Fault>
                    <faultcode>s:Client</faultcode>
                    <faultstring>UPnPError</faultstring>
                    <detail>
                        <UPnPError xmlns="urn:schemas-upnp-org:control-1-0">
                            <errorCode>701</errorCode>
                        </UPnPError>
                    </detail>
                </s:Fault>
            </s:Body>
        </s:Envelope>
    "#;

    fn mock_port(server: &mockito::Server) -> u16 {
        server
            .host_with_port()
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .expect("mock server port")
    }

    #[test]
    fn test_extract_response_with_valid_response() {
        let xml_str = r#"
            <s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
                <s:Body>
                    <u:GetVolumeResponse xmlns:u="urn:schemas-upnp-org:service:RenderingControl:1">
                        <CurrentVolume>27</CurrentVolume>
                    </u:GetVolumeResponse>
                </s:Body>
            </s:Envelope>
        "#;

        let xml = Element::parse(xml_str.as_bytes()).unwrap();
        let response = extract_response(&xml, "GetVolume").unwrap();

        assert_eq!(response.name, "GetVolumeResponse");
        assert_eq!(
            response.get_child("CurrentVolume").and_then(|c| c.get_text()).as_deref(),
            Some("27")
        );
    }

    #[test]
    fn test_extract_response_with_soap_fault() {
        let xml = Element::parse(FAULT_ENVELOPE.as_bytes()).unwrap();

        match extract_response(&xml, "Play").unwrap_err() {
            SoapError::Fault { code, description } => {
                assert_eq!(code, 701);
                assert_eq!(description, "UPnPError");
            }
            other => panic!("Expected SoapError::Fault, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_response_missing_body() {
        let xml_str = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"></s:Envelope>"#;
        let xml = Element::parse(xml_str.as_bytes()).unwrap();

        match extract_response(&xml, "Play").unwrap_err() {
            SoapError::Parse(msg) => assert!(msg.contains("Missing SOAP Body")),
            other => panic!("Expected SoapError::Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_response_missing_action_response() {
        let xml_str = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body></s:Body></s:Envelope>"#;
        let xml = Element::parse(xml_str.as_bytes()).unwrap();

        match extract_response(&xml, "Play").unwrap_err() {
            SoapError::Parse(msg) => assert!(msg.contains("Missing PlayResponse element")),
            other => panic!("Expected SoapError::Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_soap_fault_with_default_error_code() {
        let xml_str = r#"
            <s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
                <s:Body>
                    <s:Fault>
                        <faultcode>s:Server</faultcode>
                        <faultstring>Internal Error</faultstring>
                    </s:Fault>
                </s:Body>
            </s:Envelope>
        "#;
        let xml = Element::parse(xml_str.as_bytes()).unwrap();

        assert_eq!(
            extract_response(&xml, "Play").unwrap_err(),
            SoapError::Fault {
                code: 500,
                description: "Internal Error".to_string()
            }
        );
    }

    #[test]
    fn test_call_against_live_server() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/MediaRenderer/RenderingControl/Control")
            .match_header(
                "soapaction",
                "\"urn:schemas-upnp-org:service:RenderingControl:1#GetVolume\"",
            )
            .with_status(200)
            .with_body(
                r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><u:GetVolumeResponse xmlns:u="urn:schemas-upnp-org:service:RenderingControl:1"><CurrentVolume>42</CurrentVolume></u:GetVolumeResponse></s:Body></s:Envelope>"#,
            )
            .create();

        let client = SoapClient::new().with_port(mock_port(&server));
        let response = client
            .call(
                Ipv4Addr::LOCALHOST,
                "MediaRenderer/RenderingControl/Control",
                "urn:schemas-upnp-org:service:RenderingControl:1",
                "GetVolume",
                "<InstanceID>0</InstanceID><Channel>Master</Channel>",
            )
            .unwrap();

        mock.assert();
        assert_eq!(
            response.get_child("CurrentVolume").and_then(|c| c.get_text()).as_deref(),
            Some("42")
        );
    }

    #[test]
    fn test_call_maps_http_500_fault_body() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/MediaRenderer/AVTransport/Control")
            .with_status(500)
            .with_body(FAULT_ENVELOPE)
            .create();

        let client = SoapClient::new().with_port(mock_port(&server));
        let err = client
            .call(
                Ipv4Addr::LOCALHOST,
                "MediaRenderer/AVTransport/Control",
                "urn:schemas-upnp-org:service:AVTransport:1",
                "Play",
                "<InstanceID>0</InstanceID><Speed>1</Speed>",
            )
            .unwrap_err();

        assert_eq!(err.address, Ipv4Addr::LOCALHOST);
        assert_eq!(err.action, "Play");
        assert_eq!(err.cause.fault_code(), Some(701));
    }

    #[test]
    fn test_call_maps_bare_http_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/ZoneGroupTopology/Control")
            .with_status(503)
            .with_body("busy")
            .create();

        let client = SoapClient::new().with_port(mock_port(&server));
        let err = client
            .call(
                Ipv4Addr::LOCALHOST,
                "ZoneGroupTopology/Control",
                "urn:schemas-upnp-org:service:ZoneGroupTopology:1",
                "GetZoneGroupState",
                "",
            )
            .unwrap_err();

        assert_eq!(err.cause, SoapError::HttpStatus(503));
    }

    #[test]
    fn test_fetch_returns_body_and_maps_404() {
        let mut server = mockito::Server::new();
        let _found = server
            .mock("GET", "/xml/device_description.xml")
            .with_status(200)
            .with_body("<root/>")
            .create();
        let _missing = server.mock("GET", "/missing").with_status(404).create();

        let client = SoapClient::new().with_port(mock_port(&server));
        assert_eq!(
            client.fetch(Ipv4Addr::LOCALHOST, "/xml/device_description.xml").unwrap(),
            "<root/>"
        );

        let err = client.fetch(Ipv4Addr::LOCALHOST, "/missing").unwrap_err();
        assert_eq!(err.cause, SoapError::HttpStatus(404));
        assert_eq!(err.action, "GET /missing");
    }
}
