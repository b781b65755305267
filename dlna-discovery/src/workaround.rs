//! Vendor-specific workarounds applied to renderers.
//!
//! Some renderers need extra nudging that the UPnP standard does not cover.
//! A [`WorkaroundRegistry`] maps manufacturer names to workaround
//! constructors and is consulted once, when a descriptor is parsed. The
//! resulting workarounds travel with the [`Device`] and are run around each
//! control action.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, info, warn};
use url::Url;

use crate::device::Device;

/// Control actions that workarounds (and controller hooks) can wrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    Register,
    Play,
    Stop,
    Pause,
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlAction::Register => "register",
            ControlAction::Play => "play",
            ControlAction::Stop => "stop",
            ControlAction::Pause => "pause",
        };
        f.write_str(name)
    }
}

/// Where in a control action a hook fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    Before(ControlAction),
    After(ControlAction),
}

/// A behavioral patch for one renderer
pub trait Workaround: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Adjust the device once, right after it was constructed
    fn apply(&self, _device: &mut Device) {}

    /// Called before and after every wrapped control action
    fn run(&self, _hook: HookPoint, _device: &Device) {}
}

/// Builds a workaround from the raw device descriptor
pub type WorkaroundFactory = fn(&[u8]) -> Arc<dyn Workaround>;

/// Manufacturer name to workaround constructor mapping
#[derive(Clone)]
pub struct WorkaroundRegistry {
    entries: Vec<(String, WorkaroundFactory)>,
}

impl WorkaroundRegistry {
    /// A registry without any workarounds
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register a constructor for a manufacturer (compared case-insensitively)
    pub fn register(&mut self, manufacturer: &str, factory: WorkaroundFactory) -> &mut Self {
        self.entries.push((manufacturer.to_lowercase(), factory));
        self
    }

    /// Construct every workaround registered for `manufacturer`
    pub fn for_manufacturer(
        &self,
        manufacturer: &str,
        descriptor: &[u8],
    ) -> Vec<Arc<dyn Workaround>> {
        let manufacturer = manufacturer.to_lowercase();
        self.entries
            .iter()
            .filter(|(name, _)| *name == manufacturer)
            .map(|(_, factory)| factory(descriptor))
            .collect()
    }
}

impl Default for WorkaroundRegistry {
    /// The built-in workarounds
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(YamahaWorkaround::MANUFACTURER, yamaha);
        registry
    }
}

impl fmt::Debug for WorkaroundRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(name, _)| name))
            .finish()
    }
}

fn yamaha(descriptor: &[u8]) -> Arc<dyn Workaround> {
    Arc::new(YamahaWorkaround::from_descriptor(descriptor))
}

/// Yamaha network receivers only play DLNA streams while the main zone is
/// switched on and its input is set to the network server. Both are done
/// through the proprietary `YAMAHA_AV` remote control service advertised in
/// the descriptor's `X_device` extension.
#[derive(Debug)]
pub struct YamahaWorkaround {
    control_url: Option<String>,
    client: Option<reqwest::blocking::Client>,
}

impl YamahaWorkaround {
    pub const MANUFACTURER: &'static str = "Yamaha Corporation";
    pub const REMOTE_CONTROL_SPEC: &'static str = "X_YamahaRemoteControl";
    pub const SERVER_INPUT: &'static str = "SERVER";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn from_descriptor(descriptor: &[u8]) -> Self {
        let control_url = std::str::from_utf8(descriptor)
            .ok()
            .and_then(detect_control_url);

        match &control_url {
            Some(url) => debug!("Yamaha remote control service found at {}", url),
            None => warn!(
                "The Yamaha workaround could not find a remote control url. Workaround disabled."
            ),
        }

        let client = match reqwest::blocking::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
        {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Could not create the Yamaha HTTP client: {}. Workaround disabled.", e);
                None
            }
        };

        Self { control_url, client }
    }

    pub fn control_url(&self) -> Option<&str> {
        self.control_url.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.control_url.is_some() && self.client.is_some()
    }

    fn power_on_command() -> String {
        r#"<?xml version="1.0" encoding="utf-8"?><YAMAHA_AV cmd="PUT"><Main_Zone><Power_Control><Power>On</Power></Power_Control></Main_Zone></YAMAHA_AV>"#.to_string()
    }

    fn select_input_command(input: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?><YAMAHA_AV cmd="PUT"><Main_Zone><Input><Input_Sel>{}</Input_Sel></Input></Main_Zone></YAMAHA_AV>"#,
            input
        )
    }

    fn send(client: &reqwest::blocking::Client, url: &str, body: String) -> bool {
        let result = client
            .post(url)
            .header("Content-Type", "text/xml; charset=\"utf-8\"")
            .body(body)
            .send();

        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!("Yamaha command to {} failed with status {}", url, response.status());
                false
            }
            Err(e) => {
                warn!("Yamaha command to {} failed: {}", url, e);
                false
            }
        }
    }
}

impl Workaround for YamahaWorkaround {
    fn name(&self) -> &str {
        "YamahaWorkaround"
    }

    fn run(&self, hook: HookPoint, device: &Device) {
        let (Some(url), Some(client)) = (self.control_url.as_deref(), &self.client) else {
            return;
        };
        if hook != HookPoint::Before(ControlAction::Register) {
            return;
        }

        info!("Switching \"{}\" to the {} input", device.label(), Self::SERVER_INPUT);
        if Self::send(client, url, Self::power_on_command()) {
            Self::send(client, url, Self::select_input_command(Self::SERVER_INPUT));
        }
    }
}

/// Locate the YAMAHA_AV control URL in a descriptor's `X_device` extension.
fn detect_control_url(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut element: Option<String> = None;
    let mut url_base: Option<String> = None;
    let mut spec_type: Option<String> = None;
    let mut control_path: Option<String> = None;
    let mut found: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "X_service" {
                    spec_type = None;
                    control_path = None;
                }
                element = Some(name);
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().ok()?.trim().to_string();
                match element.as_deref() {
                    Some("X_URLBase") => url_base = Some(text),
                    Some("X_specType") => spec_type = Some(text),
                    Some("X_controlURL") => control_path = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                let is_remote_control = spec_type
                    .as_deref()
                    .is_some_and(|spec| spec.contains(YamahaWorkaround::REMOTE_CONTROL_SPEC));
                if e.local_name().as_ref() == b"X_service" && is_remote_control && found.is_none() {
                    found = control_path.take();
                }
                element = None;
            }
            Ok(Event::Eof) => break,
            Err(_) => return None,
            _ => {}
        }
    }

    let base = Url::parse(&url_base?).ok()?;
    base.join(&found?).ok().map(String::from)
}
