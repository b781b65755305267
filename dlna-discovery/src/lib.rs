//! DLNA media renderer descriptor handling
//!
//! This crate turns an already-located UPnP device description into a
//! controllable [`Device`]: identity, address, the three control services a
//! renderer needs, and any vendor workarounds. SSDP itself is left to the
//! caller; hand the fetcher the `LOCATION` of a search response.
//!
//! # Quick Start
//!
//! ```no_run
//! use dlna_discovery::DescriptorFetcher;
//!
//! let fetcher = DescriptorFetcher::new()?;
//! let device = fetcher.from_url("http://192.168.1.20:49152/description.xml")?;
//! if device.validate().is_ok() {
//!     println!("Found {} at {}:{}", device.name, device.host, device.port);
//! }
//! # Ok::<(), dlna_discovery::DiscoveryError>(())
//! ```

pub mod descriptor;
mod device;
mod error;
pub mod service;
pub mod workaround;

pub use descriptor::{fetch_descriptor, parse_descriptor, parse_descriptor_with, DescriptorFetcher};
pub use device::{Codec, Device, TransportState};
pub use error::{DiscoveryError, Result, ValidationError};
pub use service::{Service, ServiceKind};
pub use workaround::{ControlAction, HookPoint, Workaround, WorkaroundRegistry, YamahaWorkaround};
