//! Play operation for AVTransport service

use dlna_discovery::ServiceKind;
use serde::{Deserialize, Serialize};
use soap_client::ActionResponse;

use crate::{RendererOperation, Result};

/// Play operation
pub struct PlayOperation;

/// Request for play operation
#[derive(Debug, Clone, Serialize)]
pub struct PlayRequest {
    pub instance_id: u32,
    pub speed: String,
}

impl Default for PlayRequest {
    fn default() -> Self {
        Self {
            instance_id: 0,
            speed: "1".to_string(),
        }
    }
}

/// Response for play operation
#[derive(Debug, Deserialize)]
pub struct PlayResponse;

impl RendererOperation for PlayOperation {
    type Request = PlayRequest;
    type Response = PlayResponse;

    const SERVICE: ServiceKind = ServiceKind::Transport;
    const ACTION: &'static str = "Play";

    fn build_payload(request: &Self::Request) -> String {
        format!(
            "<InstanceID>{}</InstanceID><Speed>{}</Speed>",
            request.instance_id, request.speed
        )
    }

    fn parse_response(_response: &ActionResponse) -> Result<Self::Response> {
        Ok(PlayResponse)
    }
}
