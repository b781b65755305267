//! Pause operation for AVTransport service

use dlna_discovery::ServiceKind;
use serde::{Deserialize, Serialize};
use soap_client::ActionResponse;

use crate::{RendererOperation, Result};

pub struct PauseOperation;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PauseRequest {
    pub instance_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct PauseResponse;

impl RendererOperation for PauseOperation {
    type Request = PauseRequest;
    type Response = PauseResponse;

    const SERVICE: ServiceKind = ServiceKind::Transport;
    const ACTION: &'static str = "Pause";

    fn build_payload(request: &Self::Request) -> String {
        format!("<InstanceID>{}</InstanceID>", request.instance_id)
    }

    fn parse_response(_response: &ActionResponse) -> Result<Self::Response> {
        Ok(PauseResponse)
    }
}
