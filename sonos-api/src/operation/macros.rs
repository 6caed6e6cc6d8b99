//! Declarative macro for UPnP operation definitions
//!
//! Instead of hand-writing a request struct, a marker type and the trait impl
//! for every action, operations are declared in one block.

/// Define a UPnP operation and its `<Operation>Request` struct
///
/// # Example
/// ```rust,ignore
/// define_upnp_operation! {
///     operation: SetMuteOperation,
///     action: "SetMute",
///     service: RenderingControl,
///     request: {
///         muted: bool,
///     },
///     response: (),
///     payload: |req| Ok(format!("<InstanceID>0</InstanceID><Channel>Master</Channel><DesiredMute>{}</DesiredMute>", u8::from(req.muted))),
///     parse: |_xml| Ok(()),
/// }
/// ```
#[macro_export]
macro_rules! define_upnp_operation {
    (
        $(#[$meta:meta])*
        operation: $op_struct:ident,
        action: $action:literal,
        service: $service:ident,
        request: {
            $($field:ident: $field_type:ty),* $(,)?
        },
        response: $response_type:ty,
        payload: |$req_param:ident| $payload_expr:expr,
        parse: |$xml_param:ident| $parse_expr:expr $(,)?
    ) => {
        ::paste::paste! {
            #[doc = concat!("Arguments for the `", $action, "` action")]
            #[derive(Clone, Debug, PartialEq)]
            pub struct [<$op_struct Request>] {
                $(pub $field: $field_type,)*
            }

            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $op_struct;

            impl $crate::operation::SonosOperation for $op_struct {
                type Request = [<$op_struct Request>];
                type Response = $response_type;

                const SERVICE: $crate::service::Service = $crate::service::Service::$service;
                const ACTION: &'static str = $action;

                fn build_payload(
                    request: &Self::Request,
                ) -> ::std::result::Result<String, $crate::error::ApiError> {
                    let $req_param = request;
                    $payload_expr
                }

                fn parse_response(
                    xml: &::xmltree::Element,
                ) -> ::std::result::Result<Self::Response, $crate::error::ApiError> {
                    let $xml_param = xml;
                    $parse_expr
                }
            }
        }
    };
}
