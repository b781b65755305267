//! GetTransportInfo operation for AVTransport service

use dlna_discovery::ServiceKind;
use serde::{Deserialize, Serialize};
use soap_client::{descendant_text, ActionResponse};

use crate::{ControlError, RendererOperation, Result};

pub struct GetTransportInfoOperation;

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetTransportInfoRequest {
    pub instance_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GetTransportInfoResponse {
    /// Raw state reported by the renderer, e.g. "PLAYING" or "TRANSITIONING"
    pub current_transport_state: String,
    pub current_transport_status: Option<String>,
    pub current_speed: Option<String>,
}

impl RendererOperation for GetTransportInfoOperation {
    type Request = GetTransportInfoRequest;
    type Response = GetTransportInfoResponse;

    const SERVICE: ServiceKind = ServiceKind::Transport;
    const ACTION: &'static str = "GetTransportInfo";

    fn build_payload(request: &Self::Request) -> String {
        format!("<InstanceID>{}</InstanceID>", request.instance_id)
    }

    fn parse_response(response: &ActionResponse) -> Result<Self::Response> {
        let xml = response.xml()?;

        let current_transport_state = descendant_text(&xml, "CurrentTransportState").ok_or_else(|| {
            ControlError::MalformedResponse("Missing CurrentTransportState element".to_string())
        })?;

        Ok(GetTransportInfoResponse {
            current_transport_state,
            current_transport_status: descendant_text(&xml, "CurrentTransportStatus"),
            current_speed: descendant_text(&xml, "CurrentSpeed"),
        })
    }
}
