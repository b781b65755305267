//! Device descriptor parsing.
//!
//! This module turns a UPnP device description document into a [`Device`].
//! Only MediaRenderer devices are accepted; the first one found in document
//! order wins, and every service declared anywhere beneath it is collected.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, error, info};
use url::{Host, Url};

use crate::device::{Device, TransportState};
use crate::error::{DiscoveryError, Result};
use crate::service::{Service, ServiceKind};
use crate::workaround::WorkaroundRegistry;

/// Device types accepted as controllable renderers
pub const MEDIA_RENDERER_TYPES: [&str; 2] = [
    "urn:schemas-upnp-org:device:MediaRenderer:1",
    "urn:schemas-upnp-org:device:MediaRenderer:2",
];

/// Default timeout for fetching a descriptor
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// UPnP device description root element.
#[derive(Debug, Deserialize)]
pub struct Root {
    pub device: DeviceDescription,
}

/// A `<device>` element, possibly with embedded devices.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescription {
    pub device_type: Option<String>,
    pub friendly_name: Option<String>,
    pub manufacturer: Option<String>,
    pub model_name: Option<String>,
    pub model_number: Option<String>,
    #[serde(rename = "UDN")]
    pub udn: Option<String>,
    pub service_list: Option<ServiceList>,
    pub device_list: Option<DeviceList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceList {
    #[serde(rename = "service", default)]
    pub services: Vec<ServiceDescription>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeviceList {
    #[serde(rename = "device", default)]
    pub devices: Vec<DeviceDescription>,
}

/// A `<service>` element.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDescription {
    #[serde(rename = "serviceType")]
    pub service_type: String,
    #[serde(rename = "serviceId")]
    pub service_id: Option<String>,
    #[serde(rename = "SCPDURL")]
    pub scpd_url: Option<String>,
    #[serde(rename = "controlURL")]
    pub control_url: String,
    #[serde(rename = "eventSubURL")]
    pub event_sub_url: Option<String>,
}

impl Root {
    /// Parse a descriptor document.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::ParseError` if the XML is malformed.
    pub fn from_xml(xml: &str) -> Result<Self> {
        quick_xml::de::from_str(xml)
            .map_err(|e| DiscoveryError::ParseError(format!("Failed to parse device XML: {}", e)))
    }

    /// First MediaRenderer device in document order
    pub fn media_renderer(&self) -> Option<&DeviceDescription> {
        self.device.find(&|device| device.is_media_renderer())
    }
}

impl DeviceDescription {
    pub fn is_media_renderer(&self) -> bool {
        self.device_type
            .as_deref()
            .map(str::trim)
            .is_some_and(|device_type| MEDIA_RENDERER_TYPES.contains(&device_type))
    }

    fn embedded(&self) -> &[DeviceDescription] {
        self.device_list
            .as_ref()
            .map(|list| list.devices.as_slice())
            .unwrap_or_default()
    }

    fn find(&self, predicate: &dyn Fn(&DeviceDescription) -> bool) -> Option<&DeviceDescription> {
        if predicate(self) {
            return Some(self);
        }
        self.embedded().iter().find_map(|device| device.find(predicate))
    }

    /// Every service declared by this device and its embedded devices
    pub fn all_services(&self) -> Vec<&ServiceDescription> {
        let mut services: Vec<&ServiceDescription> = self
            .service_list
            .iter()
            .flat_map(|list| list.services.iter())
            .collect();
        for device in self.embedded() {
            services.extend(device.all_services());
        }
        services
    }
}

impl ServiceDescription {
    /// Materialize a controllable service; unknown service types yield `None`
    pub fn to_service(&self) -> Option<Service> {
        let service_type = self.service_type.trim();
        let kind = ServiceKind::from_service_type(service_type)?;
        Some(Service {
            kind,
            service_type: service_type.to_string(),
            service_id: self.service_id.as_deref().map(|s| s.trim().to_string()),
            scpd_url: self.scpd_url.as_deref().map(|s| s.trim().to_string()),
            control_path: self.control_url.trim().to_string(),
            event_path: self.event_sub_url.as_deref().map(|s| s.trim().to_string()),
        })
    }
}

/// Extract host and port from a descriptor location URL.
///
/// # Arguments
///
/// * `url` - e.g. "http://192.168.1.100:49152/description.xml"
pub fn extract_address(url: &str) -> Option<(String, u16)> {
    let parsed = Url::parse(url).ok()?;
    let host = match parsed.host()? {
        Host::Domain(domain) => domain.to_string(),
        Host::Ipv4(addr) => addr.to_string(),
        Host::Ipv6(addr) => addr.to_string(),
    };
    Some((host, parsed.port_or_known_default()?))
}

/// Parse a fetched descriptor using the built-in workarounds.
pub fn parse_descriptor(xml: &str, location: &str) -> Result<Device> {
    parse_descriptor_with(xml, location, &WorkaroundRegistry::default())
}

/// Parse a fetched descriptor, attaching workarounds from `registry`.
///
/// # Errors
///
/// `DiscoveryError::ParseError` for malformed XML, an unusable location URL,
/// a missing friendly name or UDN, or when no MediaRenderer device exists.
pub fn parse_descriptor_with(
    xml: &str,
    location: &str,
    registry: &WorkaroundRegistry,
) -> Result<Device> {
    let (host, port) = extract_address(location)
        .ok_or_else(|| {
            DiscoveryError::ParseError(format!("Invalid descriptor location: {}", location))
        })?;

    let root = Root::from_xml(xml)?;
    let description = root
        .media_renderer()
        .ok_or_else(|| {
            DiscoveryError::ParseError(format!(
                "No MediaRenderer device in descriptor from {}",
                location
            ))
        })?;

    let name = required(description.friendly_name.as_deref(), "friendlyName")?;
    let udn = required(description.udn.as_deref(), "UDN")?;
    let manufacturer = optional(description.manufacturer.as_deref());

    let mut device = Device {
        name,
        host,
        port,
        udn,
        model_name: optional(description.model_name.as_deref()),
        model_number: optional(description.model_number.as_deref()),
        manufacturer: manufacturer.clone(),
        services: description
            .all_services()
            .into_iter()
            .filter_map(ServiceDescription::to_service)
            .collect(),
        state: TransportState::Idle,
        mime_types: Vec::new(),
        codecs: Vec::new(),
        workarounds: Vec::new(),
    };

    if let Some(manufacturer) = manufacturer {
        for workaround in registry.for_manufacturer(&manufacturer, xml.as_bytes()) {
            debug!("Applying {} to \"{}\"", workaround.name(), device.label());
            workaround.apply(&mut device);
            device.workarounds.push(workaround);
        }
    }

    Ok(device)
}

fn required(value: Option<&str>, field: &str) -> Result<String> {
    optional(value)
        .ok_or_else(|| DiscoveryError::ParseError(format!("Missing required element {}", field)))
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Fetch and parse a single descriptor with the built-in workarounds.
pub fn fetch_descriptor(url: &str, timeout: Duration) -> Result<Device> {
    DescriptorFetcher::with_timeout(timeout)?.from_url(url)
}

/// Fetches descriptors over HTTP and parses them.
#[derive(Debug, Clone)]
pub struct DescriptorFetcher {
    http_client: reqwest::blocking::Client,
    registry: WorkaroundRegistry,
}

impl DescriptorFetcher {
    /// Create a fetcher with the default 5 second timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DiscoveryError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            registry: WorkaroundRegistry::default(),
        })
    }

    pub fn with_registry(mut self, registry: WorkaroundRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Fetch and parse the descriptor at `url`.
    ///
    /// Failures are logged; the caller should skip the device.
    pub fn from_url(&self, url: &str) -> Result<Device> {
        let xml = self.fetch(url).inspect_err(|e| info!("{}", e))?;
        debug!("Response from UPNP device ({})\n{}", url, xml);

        parse_descriptor_with(&xml, url, &self.registry).inspect_err(|e| {
            error!("No valid XML returned from {}: {}", url, e);
        })
    }

    /// Fetch the descriptor named by the `location` header of an SSDP
    /// response. Returns `None` when the header is absent.
    pub fn from_ssdp_headers(&self, headers: &HashMap<String, String>) -> Option<Result<Device>> {
        headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("location"))
            .map(|(_, location)| self.from_url(location.trim()))
    }

    fn fetch(&self, url: &str) -> Result<String> {
        let response = self.http_client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                DiscoveryError::Timeout(url.to_string())
            } else if e.is_connect() {
                DiscoveryError::ConnectionRefused(url.to_string())
            } else {
                DiscoveryError::NetworkError(format!("Failed to fetch device description: {}", e))
            }
        })?;

        response
            .text()
            .map_err(|e| {
                DiscoveryError::NetworkError(format!("Failed to read response body: {}", e))
            })
    }
}
