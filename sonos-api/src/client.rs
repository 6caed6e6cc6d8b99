use std::net::Ipv4Addr;

use soap_client::SoapClient;

use crate::didl::{rincon_uri, stream_didl};
use crate::operations::{
    BecomeCoordinatorOfStandaloneGroupOperation, BecomeCoordinatorOfStandaloneGroupOperationRequest,
    PlayOperation, PlayOperationRequest, SetAVTransportURIOperation,
    SetAVTransportURIOperationRequest,
};
use crate::{Result, SonosOperation};

/// A client for executing Sonos operations against speakers by address
///
/// This client bridges the stateless operation definitions and actual
/// network requests. It uses the soap-client crate for the SOAP exchange.
#[derive(Debug, Clone, Default)]
pub struct SonosClient {
    soap_client: SoapClient,
}

impl SonosClient {
    /// Create a client with the default SOAP timeouts
    pub fn new() -> Self {
        Self {
            soap_client: SoapClient::new(),
        }
    }

    /// Create a Sonos client with a custom SOAP client (timeouts, test port)
    pub fn with_soap_client(soap_client: SoapClient) -> Self {
        Self { soap_client }
    }

    /// The underlying SOAP client
    pub fn soap_client(&self) -> &SoapClient {
        &self.soap_client
    }

    /// Execute a Sonos operation against a speaker
    ///
    /// Validates the request, sends it, and parses the response.
    ///
    /// # Example
    /// ```rust,no_run
    /// use std::net::Ipv4Addr;
    /// use sonos_api::SonosClient;
    /// use sonos_api::operations::{GetVolumeOperation, GetVolumeOperationRequest};
    ///
    /// let client = SonosClient::new();
    /// let volume = client.execute::<GetVolumeOperation>(
    ///     Ipv4Addr::new(192, 168, 2, 30),
    ///     &GetVolumeOperationRequest {},
    /// )?;
    /// # Ok::<(), sonos_api::ApiError>(())
    /// ```
    pub fn execute<Op: SonosOperation>(
        &self,
        ip: Ipv4Addr,
        request: &Op::Request,
    ) -> Result<Op::Response> {
        let service_info = Op::SERVICE.info();
        let payload = Op::build_payload(request)?;

        let xml = self.soap_client.call(
            ip,
            service_info.endpoint,
            service_info.service_uri,
            Op::ACTION,
            &payload,
        )?;

        Op::parse_response(&xml)
    }

    /// Make `member` follow the group anchored by the speaker with `coordinator_uuid`
    pub fn join_group(&self, member: Ipv4Addr, coordinator_uuid: &str) -> Result<()> {
        tracing::debug!("{} joining group of {}", member, coordinator_uuid);
        self.execute::<SetAVTransportURIOperation>(
            member,
            &SetAVTransportURIOperationRequest {
                uri: rincon_uri(coordinator_uuid),
                metadata: String::new(),
            },
        )
    }

    /// Take `member` out of whatever group it is in
    pub fn leave_group(&self, member: Ipv4Addr) -> Result<()> {
        tracing::debug!("{} leaving its group", member);
        self.execute::<BecomeCoordinatorOfStandaloneGroupOperation>(
            member,
            &BecomeCoordinatorOfStandaloneGroupOperationRequest {},
        )
    }

    /// Load a direct HTTP(S) audio URL and start playing it
    pub fn play_uri(&self, ip: Ipv4Addr, uri: &str, title: &str) -> Result<()> {
        self.execute::<SetAVTransportURIOperation>(
            ip,
            &SetAVTransportURIOperationRequest {
                uri: uri.to_string(),
                metadata: stream_didl(uri, title),
            },
        )?;
        self.execute::<PlayOperation>(ip, &PlayOperationRequest {})
    }
}
