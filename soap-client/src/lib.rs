//! Private SOAP client for UPnP media renderer control
//!
//! This crate performs exactly one SOAP action per call: it wraps an
//! operation payload in the envelope, sends it with the UPnP action headers
//! under a bounded timeout, and hands back the raw status and body. Failures
//! are classified into timeouts, refused connections and everything else so
//! callers can map them to status codes.

mod error;

pub use error::SoapError;

use std::io;
use std::time::Duration;
use tracing::{debug, error};
use xmltree::{Element, XMLNode};

/// Default character encoding declared in envelopes and headers
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One SOAP action addressed to one service control URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    /// Absolute control URL of the target service
    pub url: String,
    /// Service type URI, e.g. `urn:schemas-upnp-org:service:AVTransport:1`
    pub service_type: String,
    /// Action name, e.g. `Play`
    pub action: String,
    /// Argument elements placed inside the action element
    pub payload: String,
    /// Character encoding declared in the envelope and `Content-Type`
    pub encoding: String,
}

impl ActionRequest {
    pub fn new(
        url: impl Into<String>,
        service_type: impl Into<String>,
        action: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            service_type: service_type.into(),
            action: action.into(),
            payload: payload.into(),
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Request headers in the order they are sent
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", format!("text/xml; charset=\"{}\"", self.encoding)),
            ("SOAPAction", format!("\"{}#{}\"", self.service_type, self.action)),
        ]
    }

    /// Render the full SOAP envelope for this action
    pub fn envelope(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="{encoding}"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
    <s:Body>
        <u:{action} xmlns:u="{service_type}">
            {payload}
        </u:{action}>
    </s:Body>
</s:Envelope>"#,
            encoding = self.encoding,
            action = self.action,
            service_type = self.service_type,
            payload = self.payload
        )
    }
}

/// Raw outcome of an HTTP exchange that reached the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub status: u16,
    pub body: String,
}

impl ActionResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Parse the response body as XML
    pub fn xml(&self) -> Result<Element, SoapError> {
        Element::parse(self.body.as_bytes()).map_err(|e| SoapError::Parse(e.to_string()))
    }
}

/// Anything that can carry out a single SOAP action
///
/// `SoapClient` is the network implementation; tests substitute scripted
/// invokers to drive controllers without a device.
pub trait ActionInvoker {
    fn invoke(&self, request: &ActionRequest) -> Result<ActionResponse, SoapError>;
}

impl<T: ActionInvoker + ?Sized> ActionInvoker for &T {
    fn invoke(&self, request: &ActionRequest) -> Result<ActionResponse, SoapError> {
        (**self).invoke(request)
    }
}

/// A minimal blocking SOAP client for UPnP renderers
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
    timeout: Duration,
}

impl SoapClient {
    /// Create a new SOAP client with the default 10 second timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a SOAP client whose calls are bounded by `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn post(
        &self,
        request: &ActionRequest,
        headers: &[(&str, String)],
        body: &str,
    ) -> Result<ActionResponse, SoapError> {
        let mut call = self.agent.post(&request.url).timeout(self.timeout);
        for (name, value) in headers {
            call = call.set(name, value);
        }

        match call.send_string(body) {
            Ok(response) => read_response(&request.url, response),
            // Non-2xx replies are still answers from the device
            Err(ureq::Error::Status(_, response)) => read_response(&request.url, response),
            Err(ureq::Error::Transport(transport)) => {
                Err(classify_transport(&request.url, &transport))
            }
        }
    }
}

impl ActionInvoker for SoapClient {
    fn invoke(&self, request: &ActionRequest) -> Result<ActionResponse, SoapError> {
        let headers = request.headers();
        let body = request.envelope();

        let outcome = self.post(request, &headers, &body);

        if let Err(SoapError::Timeout(url)) = &outcome {
            error!(
                action = %request.action,
                "{} command - could not connect to {}. Connection timeout.",
                request.action.to_uppercase(),
                url
            );
        }
        log_exchange(request, &headers, &body, &outcome);

        outcome
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the first descendant element (depth first, document order) with the
/// given local name, ignoring namespaces.
pub fn find_descendant<'a>(element: &'a Element, name: &str) -> Option<&'a Element> {
    element.children.iter().find_map(|node| match node {
        XMLNode::Element(child) if child.name == name => Some(child),
        XMLNode::Element(child) => find_descendant(child, name),
        _ => None,
    })
}

/// Text of the first descendant with the given local name
pub fn descendant_text(element: &Element, name: &str) -> Option<String> {
    find_descendant(element, name)
        .and_then(|e| e.get_text())
        .map(|text| text.into_owned())
}

fn read_response(url: &str, response: ureq::Response) -> Result<ActionResponse, SoapError> {
    let status = response.status();
    let body = response
        .into_string()
        .map_err(|e| classify_io(url, &e).unwrap_or_else(|| SoapError::Network(e.to_string())))?;
    Ok(ActionResponse { status, body })
}

fn classify_transport(url: &str, transport: &ureq::Transport) -> SoapError {
    let io_error = std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<io::Error>());
    if let Some(err) = io_error.and_then(|e| classify_io(url, e)) {
        return err;
    }

    match transport.kind() {
        ureq::ErrorKind::ConnectionFailed => SoapError::ConnectionRefused(url.to_string()),
        _ => SoapError::Network(transport.to_string()),
    }
}

fn classify_io(url: &str, err: &io::Error) -> Option<SoapError> {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
            Some(SoapError::Timeout(url.to_string()))
        }
        io::ErrorKind::ConnectionRefused => Some(SoapError::ConnectionRefused(url.to_string())),
        _ => None,
    }
}

fn log_exchange(
    request: &ActionRequest,
    headers: &[(&str, String)],
    body: &str,
    outcome: &Result<ActionResponse, SoapError>,
) {
    let (status, result) = match outcome {
        Ok(response) => (response.status.to_string(), response.body.as_str()),
        Err(_) => ("none".to_string(), "none"),
    };
    let headers = headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join("\n");

    debug!(
        "sending {} to {}:\n - headers:\n{}\n - data:\n{}\n - result: {}\n{}",
        request.action.to_uppercase(),
        request.url,
        headers,
        body,
        status,
        result
    );
}
