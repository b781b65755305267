//! Type-safe control of DLNA / UPnP media renderers
//!
//! This crate drives a renderer through its AVTransport and ConnectionManager
//! services. It uses the private `soap-client` crate for the SOAP exchanges
//! and `dlna-discovery` for the device model.
//!
//! # Playing a stream
//!
//! ```rust,no_run
//! use dlna_api::{MediaRenderer, TrackMetadata};
//! use dlna_discovery::DescriptorFetcher;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = DescriptorFetcher::new()?;
//! let device = fetcher.from_url("http://192.168.1.20:8080/description.xml")?;
//! device.validate()?;
//!
//! let mut renderer = MediaRenderer::new(device);
//! renderer.controller_mut().activate()?;
//!
//! let track = TrackMetadata::new().with_title("Living Room");
//! let status = renderer.play_stream("http://192.168.1.2:8080/stream.mp3", None, &track);
//! println!("play returned {}", status);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod content_features;
pub mod controller;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod operation;
pub mod operations;
pub mod renderer;

pub use codec::{CodecCatalog, CodecProfile, StaticCodecCatalog};
pub use config::ControllerConfig;
pub use content_features::{ContentFeatures, ContentFlag};
pub use controller::{ActionHooks, TransportController};
pub use error::{ControlError, Result};
pub use metadata::TrackMetadata;
pub use operation::RendererOperation;
pub use renderer::MediaRenderer;
