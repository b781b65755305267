use dlna_discovery::ServiceKind;
use serde::{Deserialize, Serialize};
use soap_client::ActionResponse;

use crate::error::Result;

/// Base trait for all renderer control operations
///
/// Each UPnP action is one zero-sized operation type carrying its target
/// service and action name, a payload builder and a response parser. The
/// controller supplies the envelope, addressing and status handling.
pub trait RendererOperation {
    /// The request type for this operation, must be serializable
    type Request: Serialize;

    /// The response type for this operation, must be deserializable
    type Response: for<'de> Deserialize<'de>;

    /// The service this operation is sent to
    const SERVICE: ServiceKind;

    /// The SOAP action name for this operation
    const ACTION: &'static str;

    /// Build the argument elements placed inside the action element
    fn build_payload(request: &Self::Request) -> String;

    /// Extract the typed result from a 200 response.
    ///
    /// Operations without output arguments ignore the body.
    fn parse_response(response: &ActionResponse) -> Result<Self::Response>;
}
