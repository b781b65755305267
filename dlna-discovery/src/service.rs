//! Control endpoints declared by a renderer's device descriptor.

use std::fmt;

use url::Url;

use crate::error::{DiscoveryError, Result};

/// The UPnP services a renderer must expose to be controllable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// AVTransport - set source, play, pause, stop, transport state
    Transport,
    /// ConnectionManager - protocol (mime type) negotiation
    Connection,
    /// RenderingControl - volume and mute
    Rendering,
}

impl ServiceKind {
    /// All required kinds, in the order validation checks them
    pub const REQUIRED: [ServiceKind; 3] = [
        ServiceKind::Transport,
        ServiceKind::Connection,
        ServiceKind::Rendering,
    ];

    /// Service type URI prefix identifying this kind (version suffix excluded)
    pub fn type_prefix(&self) -> &'static str {
        match self {
            ServiceKind::Transport => "urn:schemas-upnp-org:service:AVTransport:",
            ServiceKind::Connection => "urn:schemas-upnp-org:service:ConnectionManager:",
            ServiceKind::Rendering => "urn:schemas-upnp-org:service:RenderingControl:",
        }
    }

    /// Classify a declared service type URI; unknown services yield `None`
    pub fn from_service_type(service_type: &str) -> Option<Self> {
        Self::REQUIRED
            .into_iter()
            .find(|kind| service_type.starts_with(kind.type_prefix()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::Transport => "transport",
            ServiceKind::Connection => "connection",
            ServiceKind::Rendering => "rendering",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One control endpoint of a renderer
///
/// URLs are kept exactly as declared in the descriptor and resolved against
/// the device address on every access, so an address change is always
/// picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub kind: ServiceKind,
    /// Declared service type URI, e.g. `urn:schemas-upnp-org:service:AVTransport:1`
    pub service_type: String,
    pub service_id: Option<String>,
    pub scpd_url: Option<String>,
    pub control_path: String,
    pub event_path: Option<String>,
}

impl Service {
    /// Absolute control URL for a device reachable at `host:port`
    pub fn control_url(&self, host: &str, port: u16) -> Result<String> {
        resolve(host, port, &self.control_path)
    }

    /// Absolute event subscription URL, if the service declares one
    pub fn event_url(&self, host: &str, port: u16) -> Option<Result<String>> {
        self.event_path
            .as_deref()
            .map(|path| resolve(host, port, path))
    }
}

/// Join `path` onto `http://host:port/` with standard URL-join rules.
pub fn resolve(host: &str, port: u16, path: &str) -> Result<String> {
    let host = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]", host)
    } else {
        host.to_string()
    };

    let base = Url::parse(&format!("http://{}:{}/", host, port))
        .map_err(|e| {
            DiscoveryError::ParseError(format!(
                "Invalid device address {}:{}: {}",
                host, port, e
            ))
        })?;

    base.join(path)
        .map(String::from)
        .map_err(|e| DiscoveryError::ParseError(format!("Invalid service url '{}': {}", path, e)))
}
