//! Operation framework
//!
//! Every UPnP action is a zero-sized type implementing [`SonosOperation`]. The
//! request struct carries the action arguments, `build_payload` validates them
//! and renders the SOAP arguments, and `parse_response` turns the
//! `<{Action}Response>` element into a typed value.

pub mod macros;

use std::str::FromStr;
use xmltree::Element;

use crate::error::ApiError;
use crate::service::Service;

/// Base trait for all Sonos API operations
pub trait SonosOperation {
    /// Typed action arguments
    type Request;

    /// Typed action result
    type Response;

    /// The UPnP service this operation belongs to
    const SERVICE: Service;

    /// The SOAP action name for this operation
    const ACTION: &'static str;

    /// Validate the request and render the XML arguments (without the SOAP envelope)
    fn build_payload(request: &Self::Request) -> Result<String, ApiError>;

    /// Extract the typed response from the `<{Action}Response>` element
    fn parse_response(xml: &Element) -> Result<Self::Response, ApiError>;
}

/// `<InstanceID>0</InstanceID>`, the argument every AVTransport and RenderingControl action starts with
pub(crate) const INSTANCE: &str = "<InstanceID>0</InstanceID>";

/// Text of a direct child element, empty when absent
pub(crate) fn child_text(xml: &Element, name: &str) -> String {
    xml.get_child(name)
        .and_then(|e| e.get_text())
        .map(|t| t.into_owned())
        .unwrap_or_default()
}

/// Parse a direct child element, falling back to the type's default
pub(crate) fn child_value<T: FromStr + Default>(xml: &Element, name: &str) -> T {
    child_text(xml, name).trim().parse().unwrap_or_default()
}

/// UPnP booleans arrive as `1`/`0`, `true`/`false` or `On`/`Off`
pub(crate) fn child_flag(xml: &Element, name: &str) -> bool {
    matches!(
        child_text(xml, name).trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on"
    )
}

pub(crate) fn upnp_bool(value: bool) -> u8 {
    u8::from(value)
}

pub(crate) fn ensure_range(parameter: &str, value: i64, min: i64, max: i64) -> Result<(), ApiError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ApiError::range(parameter, value, min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn element(xml: &str) -> Element {
        Element::parse(xml.as_bytes()).unwrap()
    }

    #[rstest]
    #[case("<R><V>1</V></R>", true)]
    #[case("<R><V>On</V></R>", true)]
    #[case("<R><V>true</V></R>", true)]
    #[case("<R><V>0</V></R>", false)]
    #[case("<R><V>Off</V></R>", false)]
    #[case("<R></R>", false)]
    fn test_child_flag(#[case] xml: &str, #[case] expected: bool) {
        assert_eq!(child_flag(&element(xml), "V"), expected);
    }

    #[test]
    fn test_child_value_defaults_on_garbage() {
        let xml = element("<R><Volume>abc</Volume><Bass>-4</Bass></R>");
        assert_eq!(child_value::<u8>(&xml, "Volume"), 0);
        assert_eq!(child_value::<i8>(&xml, "Bass"), -4);
        assert_eq!(child_value::<u32>(&xml, "Missing"), 0);
    }

    #[test]
    fn test_ensure_range() {
        assert!(ensure_range("volume", 100, 0, 100).is_ok());
        assert!(ensure_range("volume", 101, 0, 100).is_err());
        assert!(ensure_range("bass", -11, -10, 10).is_err());
    }
}
