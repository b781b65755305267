//! GetProtocolInfo operation for ConnectionManager service

use dlna_discovery::ServiceKind;
use serde::{Deserialize, Serialize};
use soap_client::{find_descendant, ActionResponse};

use crate::{ControlError, RendererOperation, Result};

pub struct GetProtocolInfoOperation;

/// GetProtocolInfo takes no arguments
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetProtocolInfoRequest;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GetProtocolInfoResponse {
    /// The raw `Sink` list as reported
    pub sink: String,
    /// Mime types extracted from the sink protocol entries, in order
    pub mime_types: Vec<String>,
}

impl RendererOperation for GetProtocolInfoOperation {
    type Request = GetProtocolInfoRequest;
    type Response = GetProtocolInfoResponse;

    const SERVICE: ServiceKind = ServiceKind::Connection;
    const ACTION: &'static str = "GetProtocolInfo";

    fn build_payload(_request: &Self::Request) -> String {
        String::new()
    }

    fn parse_response(response: &ActionResponse) -> Result<Self::Response> {
        let xml = response.xml()?;
        let sink = find_descendant(&xml, "Sink")
            .ok_or_else(|| ControlError::MalformedResponse("Missing Sink element".to_string()))?
            .get_text()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ControlError::MalformedResponse("Empty Sink element".to_string()))?;

        let mime_types = parse_sink(&sink);
        Ok(GetProtocolInfoResponse { sink, mime_types })
    }
}

/// Extract mime types from a comma separated list of protocol info entries.
///
/// Each entry reads `<protocol>:<network>:<mime type>:<info>`; entries with
/// fewer than four fields are skipped. The third field may itself carry
/// parameters, e.g. `audio/L16;rate=44100;channels=2`.
pub fn parse_sink(sink: &str) -> Vec<String> {
    sink.split(',')
        .filter_map(|entry| {
            let fields: Vec<&str> = entry.trim().split(':').collect();
            (fields.len() >= 4).then(|| fields[2].to_string())
        })
        .collect()
}
