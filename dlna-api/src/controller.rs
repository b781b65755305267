//! Transport control for a single renderer
//!
//! [`TransportController`] owns a [`Device`] and issues the primitive UPnP
//! actions against it, keeping the locally tracked transport state, the
//! advertised mime types and the negotiated codecs up to date.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use dlna_discovery::{Codec, ControlAction, Device, HookPoint, TransportState};
use soap_client::{ActionInvoker, ActionRequest, SoapClient};
use tracing::{debug, error, info};

use crate::codec::{CodecCatalog, StaticCodecCatalog};
use crate::config::ControllerConfig;
use crate::content_features::ContentFeatures;
use crate::metadata::TrackMetadata;
use crate::operations::{
    GetProtocolInfoOperation, GetProtocolInfoRequest, GetTransportInfoOperation,
    GetTransportInfoRequest, PauseOperation, PauseRequest, PlayOperation, PlayRequest,
    SetAVTransportURIOperation, SetAVTransportURIRequest, StopOperation, StopRequest,
};
use crate::{ControlError, RendererOperation, Result};

/// Observer called around the wrapped control actions
///
/// Hooks fire for register, play, stop and pause. The after hook also fires
/// when the action failed.
pub trait ActionHooks: Send + Sync {
    fn before(&self, _action: ControlAction, _device: &Device) {}

    fn after(&self, _action: ControlAction, _device: &Device) {}
}

/// Issues control actions against one renderer
pub struct TransportController<I: ActionInvoker = SoapClient> {
    device: Device,
    invoker: I,
    config: ControllerConfig,
    hooks: Vec<Arc<dyn ActionHooks>>,
    catalog: Arc<dyn CodecCatalog>,
}

impl TransportController<SoapClient> {
    /// Create a controller with the default configuration
    pub fn new(device: Device) -> Self {
        Self::with_config(device, ControllerConfig::default())
    }

    /// Create a controller whose SOAP client honors `config.request_timeout`
    pub fn with_config(device: Device, config: ControllerConfig) -> Self {
        let invoker = SoapClient::with_timeout(config.request_timeout);
        Self::with_invoker(device, invoker, config)
    }
}

impl<I: ActionInvoker> TransportController<I> {
    /// Create a controller that sends actions through `invoker`
    pub fn with_invoker(device: Device, invoker: I, config: ControllerConfig) -> Self {
        Self {
            device,
            invoker,
            config,
            hooks: Vec::new(),
            catalog: Arc::new(StaticCodecCatalog::default()),
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn CodecCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Register an observer for the wrapped control actions
    pub fn add_hooks(&mut self, hooks: Arc<dyn ActionHooks>) {
        self.hooks.push(hooks);
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut Device {
        &mut self.device
    }

    pub fn into_device(self) -> Device {
        self.device
    }

    pub fn state(&self) -> TransportState {
        self.device.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Execute a single operation against the device
    ///
    /// The service URL is resolved against the device's current address.
    /// Any status other than 200 is returned as [`ControlError::Status`].
    pub fn execute<Op: RendererOperation>(&self, request: &Op::Request) -> Result<Op::Response> {
        let service = self
            .device
            .service(Op::SERVICE)
            .ok_or(ControlError::MissingService(Op::SERVICE))?;
        let url = service
            .control_url(&self.device.host, self.device.port)
            .map_err(|e| ControlError::InvalidUrl(e.to_string()))?;

        let action = ActionRequest::new(
            url.clone(),
            service.service_type.clone(),
            Op::ACTION,
            Op::build_payload(request),
        )
        .with_encoding(self.config.encoding.clone());

        let response = self.invoker.invoke(&action)?;
        if !response.is_ok() {
            return Err(ControlError::Status(response.status));
        }

        Op::parse_response(&response).map_err(|err| {
            if let ControlError::MalformedResponse(_) = err {
                error!("No valid XML returned from {}.", url);
            }
            err
        })
    }

    /// Ask the renderer which formats it accepts and negotiate codecs
    ///
    /// Advertised mime types are added to the device (no duplicates), then
    /// the codec catalog filters and orders the playable codecs.
    pub fn get_protocol_info(&mut self) -> Result<()> {
        let response = self.execute::<GetProtocolInfoOperation>(&GetProtocolInfoRequest)?;
        debug!("Got the following mime types: \"{}\"", response.sink);

        for mime_type in &response.mime_types {
            self.device.add_mime_type(mime_type);
        }

        let mut codecs = self.catalog.codecs_for(&self.device.mime_types);
        self.catalog.apply_rules(&mut codecs, &self.device);
        self.catalog.prioritize(&mut codecs);
        self.device.codecs = codecs;

        Ok(())
    }

    /// Point the renderer at `stream_url`
    ///
    /// Without an explicit codec the catalog picks one from the negotiated
    /// codecs; when there is none, nothing is sent. The register hooks fire
    /// either way.
    pub fn register(
        &mut self,
        stream_url: &str,
        codec: Option<&Codec>,
        track: &TrackMetadata,
    ) -> Result<()> {
        self.run_hooks(HookPoint::Before(ControlAction::Register));
        let outcome = self.send_registration(stream_url, codec, track);
        self.run_hooks(HookPoint::After(ControlAction::Register));
        outcome
    }

    fn send_registration(
        &self,
        stream_url: &str,
        codec: Option<&Codec>,
        track: &TrackMetadata,
    ) -> Result<()> {
        let codec = match codec {
            Some(codec) => codec.clone(),
            None => self
                .catalog
                .select(&self.device)
                .cloned()
                .ok_or(ControlError::NoSuitableEncoder)?,
        };

        let metadata = track.to_didl(
            stream_url,
            &codec.mime_type,
            &ContentFeatures::live_stream(),
            &self.config.encoding,
        );
        let request = SetAVTransportURIRequest {
            instance_id: 0,
            current_uri: stream_url.to_string(),
            current_uri_metadata: metadata,
        };

        self.execute::<SetAVTransportURIOperation>(&request).map(|_| ())
    }

    /// The raw `CurrentTransportState` reported by the renderer
    pub fn get_transport_info(&self) -> Result<String> {
        self.execute::<GetTransportInfoOperation>(&GetTransportInfoRequest::default())
            .map(|response| response.current_transport_state)
    }

    /// Poll the renderer until it reports `PLAYING` or `STOPPED`
    ///
    /// Returns `Ok(true)` once the state was reconciled and `Ok(false)` when a
    /// poll failed or the deadline passed. A refused connection is returned
    /// as an error.
    pub fn update_current_state(&mut self) -> Result<bool> {
        let started = Instant::now();
        let interval = self.config.state_poll_interval;
        let deadline = self.config.state_poll_deadline;

        loop {
            match self.get_transport_info() {
                Ok(state) if state == "PLAYING" => {
                    self.device.state = TransportState::Playing;
                    return Ok(true);
                }
                Ok(state) if state == "STOPPED" => {
                    self.device.state = TransportState::Stopped;
                    return Ok(true);
                }
                Ok(state) => debug!(
                    "\"{}\" reports transport state {}",
                    self.device.label(),
                    state
                ),
                Err(err @ ControlError::ConnectionRefused(_)) => return Err(err),
                Err(err) => {
                    debug!(
                        "Transport state poll of \"{}\" failed: {}",
                        self.device.label(),
                        err
                    );
                    return Ok(false);
                }
            }

            if started.elapsed().saturating_add(interval) > deadline {
                return Ok(false);
            }
            thread::sleep(interval);
        }
    }

    pub fn play(&mut self) -> Result<()> {
        self.wrapped::<PlayOperation>(
            ControlAction::Play,
            &PlayRequest::default(),
            Some(TransportState::Playing),
        )
        .map(|_| ())
    }

    /// Stop playback; the local state returns to idle
    pub fn stop(&mut self) -> Result<()> {
        self.wrapped::<StopOperation>(
            ControlAction::Stop,
            &StopRequest::default(),
            Some(TransportState::Idle),
        )
        .map(|_| ())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.wrapped::<PauseOperation>(
            ControlAction::Pause,
            &PauseRequest::default(),
            Some(TransportState::Paused),
        )
        .map(|_| ())
    }

    /// Prepare an accepted device for playback
    ///
    /// Validates the declared services and negotiates codecs.
    pub fn activate(&mut self) -> Result<()> {
        self.device.validate()?;

        match self.get_protocol_info() {
            Ok(()) => {
                info!(
                    "\"{}\" activated with {} playable codec(s)",
                    self.device.label(),
                    self.device.codecs.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "Could not get the protocol info of \"{}\": {}",
                    self.device.label(),
                    err
                );
                Err(err)
            }
        }
    }

    fn wrapped<Op: RendererOperation>(
        &mut self,
        action: ControlAction,
        request: &Op::Request,
        next_state: Option<TransportState>,
    ) -> Result<Op::Response> {
        self.run_hooks(HookPoint::Before(action));

        let outcome = self.execute::<Op>(request);
        if let (Ok(_), Some(state)) = (&outcome, next_state) {
            self.device.state = state;
        }

        self.run_hooks(HookPoint::After(action));
        outcome
    }

    fn run_hooks(&self, hook: HookPoint) {
        for workaround in &self.device.workarounds {
            workaround.run(hook, &self.device);
        }
        for observer in &self.hooks {
            match hook {
                HookPoint::Before(action) => observer.before(action, &self.device),
                HookPoint::After(action) => observer.after(action, &self.device),
            }
        }
    }
}
