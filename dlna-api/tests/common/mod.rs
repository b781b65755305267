//! Shared helpers for controller and renderer tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use dlna_api::ControllerConfig;
use dlna_discovery::{parse_descriptor, Codec, Device};
use soap_client::{ActionInvoker, ActionRequest, ActionResponse, SoapError};

pub const LOCATION: &str = "http://192.168.1.5:8080/description.xml";

pub const DESCRIPTOR: &str =
    include_str!("../../../dlna-discovery/tests/fixtures/full_renderer.xml");

/// A renderer with all three services, as parsed from a descriptor
pub fn device() -> Device {
    parse_descriptor(DESCRIPTOR, LOCATION).expect("fixture descriptor parses")
}

/// Same as [`device`] but with an mp3 codec already negotiated
pub fn device_with_codec() -> Device {
    let mut device = device();
    device.add_mime_type("audio/mpeg");
    device.codecs = vec![Codec::new("audio/mpeg", 18)];
    device
}

/// Polling fast enough for tests
pub fn fast_config() -> ControllerConfig {
    ControllerConfig::new().with_state_polling(Duration::from_millis(5), Duration::from_millis(40))
}

pub fn transport_state_body(state: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
  <s:Body>
    <u:GetTransportInfoResponse xmlns:u="urn:schemas-upnp-org:service:AVTransport:1">
      <CurrentTransportState>{}</CurrentTransportState>
      <CurrentTransportStatus>OK</CurrentTransportStatus>
      <CurrentSpeed>1</CurrentSpeed>
    </u:GetTransportInfoResponse>
  </s:Body>
</s:Envelope>"#,
        state
    )
}

pub fn protocol_info_body(sink: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
  <s:Body>
    <u:GetProtocolInfoResponse xmlns:u="urn:schemas-upnp-org:service:ConnectionManager:1">
      <Source></Source>
      <Sink>{}</Sink>
    </u:GetProtocolInfoResponse>
  </s:Body>
</s:Envelope>"#,
        sink
    )
}

/// What a scripted action answers
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, String),
    Timeout,
    Refused,
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Status(200, String::new())
    }

    pub fn state(state: &str) -> Self {
        Reply::Status(200, transport_state_body(state))
    }
}

/// Invoker answering each action from a per-action queue
///
/// The last queued reply of an action repeats forever. Every request is
/// recorded in order.
#[derive(Default)]
pub struct ScriptedInvoker {
    script: RefCell<HashMap<String, VecDeque<Reply>>>,
    requests: RefCell<Vec<ActionRequest>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, action: &str, reply: Reply) -> Self {
        self.script
            .borrow_mut()
            .entry(action.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<ActionRequest> {
        self.requests.borrow().clone()
    }

    /// Action names in the order they were sent
    pub fn actions(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|request| request.action.clone()).collect()
    }

    pub fn count(&self, action: &str) -> usize {
        self.requests.borrow().iter().filter(|request| request.action == action).count()
    }
}

impl ActionInvoker for ScriptedInvoker {
    fn invoke(&self, request: &ActionRequest) -> Result<ActionResponse, SoapError> {
        self.requests.borrow_mut().push(request.clone());

        let reply = {
            let mut script = self.script.borrow_mut();
            let queue = script
                .get_mut(&request.action)
                .unwrap_or_else(|| panic!("no reply scripted for {}", request.action));
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        };

        match reply {
            Some(Reply::Status(status, body)) => Ok(ActionResponse { status, body }),
            Some(Reply::Timeout) => Err(SoapError::Timeout(request.url.clone())),
            Some(Reply::Refused) => Err(SoapError::ConnectionRefused(request.url.clone())),
            None => panic!("empty script for {}", request.action),
        }
    }
}
