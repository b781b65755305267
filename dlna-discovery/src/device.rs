//! Renderer identity, addressing and playback bookkeeping.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::error::{Result, ValidationError};
use crate::service::{Service, ServiceKind};
use crate::workaround::Workaround;

/// Locally tracked playback state of a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Idle,
    Playing,
    Paused,
    Stopped,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportState::Idle => "idle",
            TransportState::Playing => "playing",
            TransportState::Paused => "paused",
            TransportState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// An encoding the renderer can play, as offered by the encoder registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    pub mime_type: String,
    /// Higher values are preferred
    pub priority: i32,
}

impl Codec {
    pub fn new(mime_type: impl Into<String>, priority: i32) -> Self {
        Self {
            mime_type: mime_type.into(),
            priority,
        }
    }
}

/// A UPnP media renderer parsed from its device descriptor
#[derive(Debug, Clone)]
pub struct Device {
    /// Friendly name
    pub name: String,
    pub host: String,
    pub port: u16,
    /// Unique device name, e.g. "uuid:5f9ec1b3-ed59-79bc-4530-745e1d0fe6b2"
    pub udn: String,
    pub model_name: Option<String>,
    pub model_number: Option<String>,
    pub manufacturer: Option<String>,
    pub services: Vec<Service>,
    pub state: TransportState,
    /// Mime types advertised by the renderer, first-seen order, no duplicates
    pub mime_types: Vec<String>,
    /// Playable codecs, most preferred first
    pub codecs: Vec<Codec>,
    pub workarounds: Vec<Arc<dyn Workaround>>,
}

impl Device {
    /// Name used in log lines
    pub fn label(&self) -> String {
        format!("{} (DLNA)", self.name)
    }

    /// The control service of the given kind.
    ///
    /// When a descriptor declares the same kind twice, the last one wins.
    pub fn service(&self, kind: ServiceKind) -> Option<&Service> {
        self.services.iter().rev().find(|service| service.kind == kind)
    }

    /// Absolute control URL of a service, resolved against the current address
    pub fn control_url(&self, kind: ServiceKind) -> Option<Result<String>> {
        self.service(kind)
            .map(|service| service.control_url(&self.host, self.port))
    }

    /// Absolute event URL of a service, resolved against the current address
    pub fn event_url(&self, kind: ServiceKind) -> Option<Result<String>> {
        self.service(kind)
            .and_then(|service| service.event_url(&self.host, self.port))
    }

    /// Check that all three control services are present.
    ///
    /// A failing device is logged and should be skipped by the caller.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for kind in ServiceKind::REQUIRED {
            if self.service(kind).is_none() {
                info!(
                    "The device \"{}\" does not specify a service {} url. Device skipped!",
                    self.label(),
                    kind
                );
                return Err(ValidationError::MissingService(kind));
            }
        }
        Ok(())
    }

    /// Record an advertised mime type, ignoring duplicates.
    ///
    /// Returns `true` if the mime type was new.
    pub fn add_mime_type(&mut self, mime_type: &str) -> bool {
        if self.mime_types.iter().any(|known| known == mime_type) {
            return false;
        }
        self.mime_types.push(mime_type.to_string());
        true
    }

    /// Most preferred codec, if any survived negotiation
    pub fn preferred_codec(&self) -> Option<&Codec> {
        self.codecs.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(kind: ServiceKind, control_path: &str) -> Service {
        let service_type = format!("{}1", kind.type_prefix());
        Service {
            kind,
            service_type,
            service_id: None,
            scpd_url: None,
            control_path: control_path.to_string(),
            event_path: None,
        }
    }

    fn device(services: Vec<Service>) -> Device {
        Device {
            name: "Kitchen".to_string(),
            host: "192.168.1.5".to_string(),
            port: 8080,
            udn: "uuid:kitchen".to_string(),
            model_name: None,
            model_number: None,
            manufacturer: None,
            services,
            state: TransportState::default(),
            mime_types: Vec::new(),
            codecs: Vec::new(),
            workarounds: Vec::new(),
        }
    }

    #[test]
    fn test_initial_state_is_idle() {
        assert_eq!(device(Vec::new()).state, TransportState::Idle);
    }

    #[test]
    fn test_validate_complete_device() {
        let device = device(vec![
            service(ServiceKind::Transport, "/avt"),
            service(ServiceKind::Connection, "/cm"),
            service(ServiceKind::Rendering, "/rc"),
        ]);
        assert!(device.validate().is_ok());
    }

    #[test]
    fn test_validate_names_missing_kind() {
        let device = device(vec![
            service(ServiceKind::Transport, "/avt"),
            service(ServiceKind::Rendering, "/rc"),
        ]);
        assert_eq!(
            device.validate(),
            Err(ValidationError::MissingService(ServiceKind::Connection))
        );
    }

    #[test]
    fn test_last_declared_service_wins() {
        let device = device(vec![
            service(ServiceKind::Transport, "/first"),
            service(ServiceKind::Transport, "/second"),
        ]);
        assert_eq!(
            device.control_url(ServiceKind::Transport).unwrap().unwrap(),
            "http://192.168.1.5:8080/second"
        );
    }

    #[test]
    fn test_control_url_uses_current_address() {
        let mut device = device(vec![service(ServiceKind::Transport, "/avt")]);
        device.host = "10.0.0.2".to_string();
        assert_eq!(
            device.control_url(ServiceKind::Transport).unwrap().unwrap(),
            "http://10.0.0.2:8080/avt"
        );
        assert!(device.control_url(ServiceKind::Rendering).is_none());
    }

    #[test]
    fn test_add_mime_type_deduplicates() {
        let mut device = device(Vec::new());
        assert!(device.add_mime_type("audio/mpeg"));
        assert!(device.add_mime_type("audio/wav"));
        assert!(!device.add_mime_type("audio/mpeg"));
        assert_eq!(device.mime_types, vec!["audio/mpeg", "audio/wav"]);
    }

    #[test]
    fn test_label() {
        assert_eq!(device(Vec::new()).label(), "Kitchen (DLNA)");
    }
}
