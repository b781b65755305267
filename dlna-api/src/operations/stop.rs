//! Stop operation for AVTransport service

use dlna_discovery::ServiceKind;
use serde::{Deserialize, Serialize};
use soap_client::ActionResponse;

use crate::{RendererOperation, Result};

pub struct StopOperation;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StopRequest {
    pub instance_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct StopResponse;

impl RendererOperation for StopOperation {
    type Request = StopRequest;
    type Response = StopResponse;

    const SERVICE: ServiceKind = ServiceKind::Transport;
    const ACTION: &'static str = "Stop";

    fn build_payload(request: &Self::Request) -> String {
        format!("<InstanceID>{}</InstanceID>", request.instance_id)
    }

    fn parse_response(_response: &ActionResponse) -> Result<Self::Response> {
        Ok(StopResponse)
    }
}
