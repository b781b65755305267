//! SetAVTransportURI operation for AVTransport service
//!
//! Registers the stream URL and its DIDL-Lite description with the renderer.

use dlna_discovery::ServiceKind;
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use soap_client::ActionResponse;

use crate::{RendererOperation, Result};

pub struct SetAVTransportURIOperation;

#[derive(Debug, Clone, Serialize)]
pub struct SetAVTransportURIRequest {
    pub instance_id: u32,
    pub current_uri: String,
    /// Unescaped DIDL-Lite document; escaped once when the payload is built
    pub current_uri_metadata: String,
}

#[derive(Debug, Deserialize)]
pub struct SetAVTransportURIResponse;

impl RendererOperation for SetAVTransportURIOperation {
    type Request = SetAVTransportURIRequest;
    type Response = SetAVTransportURIResponse;

    const SERVICE: ServiceKind = ServiceKind::Transport;
    const ACTION: &'static str = "SetAVTransportURI";

    fn build_payload(request: &Self::Request) -> String {
        format!(
            "<InstanceID>{}</InstanceID><CurrentURI>{}</CurrentURI>\
             <CurrentURIMetaData>{}</CurrentURIMetaData>",
            request.instance_id,
            escape(&request.current_uri),
            escape(&request.current_uri_metadata)
        )
    }

    fn parse_response(_response: &ActionResponse) -> Result<Self::Response> {
        Ok(SetAVTransportURIResponse)
    }
}
