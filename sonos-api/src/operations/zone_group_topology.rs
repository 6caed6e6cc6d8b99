//! ZoneGroupTopology service operations

use crate::define_upnp_operation;
use crate::operation::child_text;

define_upnp_operation! {
    /// The household zone group document, unescaped and ready for parsing
    operation: GetZoneGroupStateOperation,
    action: "GetZoneGroupState",
    service: ZoneGroupTopology,
    request: {},
    response: String,
    payload: |_req| Ok(String::new()),
    parse: |xml| Ok(child_text(xml, "ZoneGroupState")),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::SonosOperation;
    use xmltree::Element;

    #[test]
    fn test_zone_group_state_is_unescaped() {
        let xml = Element::parse(
            r#"<u:GetZoneGroupStateResponse xmlns:u="urn:schemas-upnp-org:service:ZoneGroupTopology:1"><ZoneGroupState>&lt;ZoneGroupState&gt;&lt;ZoneGroups/&gt;&lt;/ZoneGroupState&gt;</ZoneGroupState></u:GetZoneGroupStateResponse>"#
                .as_bytes(),
        )
        .unwrap();

        assert_eq!(
            GetZoneGroupStateOperation::parse_response(&xml).unwrap(),
            "<ZoneGroupState><ZoneGroups/></ZoneGroupState>"
        );
    }
}
