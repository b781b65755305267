//! Register-then-play orchestration on top of [`TransportController`]

use dlna_discovery::{Codec, Device, TransportState};
use soap_client::{ActionInvoker, SoapClient};
use tracing::{error, info, warn};

use crate::config::ControllerConfig;
use crate::controller::TransportController;
use crate::metadata::TrackMetadata;
use crate::{ControlError, Result};

/// A renderer that streams are pushed to
///
/// Playing a stream registers it, reconciles the transport state and only
/// sends `Play` when the renderer is not already playing on its own.
pub struct MediaRenderer<I: ActionInvoker = SoapClient> {
    controller: TransportController<I>,
}

impl MediaRenderer<SoapClient> {
    pub fn new(device: Device) -> Self {
        Self::from_controller(TransportController::new(device))
    }

    pub fn with_config(device: Device, config: ControllerConfig) -> Self {
        Self::from_controller(TransportController::with_config(device, config))
    }
}

impl<I: ActionInvoker> MediaRenderer<I> {
    pub fn from_controller(controller: TransportController<I>) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &TransportController<I> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TransportController<I> {
        &mut self.controller
    }

    pub fn into_controller(self) -> TransportController<I> {
        self.controller
    }

    pub fn device(&self) -> &Device {
        self.controller.device()
    }

    /// Register `stream_url` and make sure the renderer plays it
    pub fn try_play_stream(
        &mut self,
        stream_url: &str,
        codec: Option<&Codec>,
        track: &TrackMetadata,
    ) -> Result<()> {
        let outcome = self.play_sequence(stream_url, codec, track);
        match &outcome {
            Err(ControlError::ConnectionRefused(_)) => {
                error!("The device refused the connection!")
            }
            Err(ControlError::NoSuitableEncoder) => error!("Could not find a suitable encoder!"),
            _ => {}
        }
        outcome
    }

    /// Like [`try_play_stream`](Self::try_play_stream), reporting the outcome
    /// as an HTTP-style status code: 200 on success, 404 when the device
    /// refused the connection, 500 when no encoder fits.
    pub fn play_stream(
        &mut self,
        stream_url: &str,
        codec: Option<&Codec>,
        track: &TrackMetadata,
    ) -> u16 {
        match self.try_play_stream(stream_url, codec, track) {
            Ok(()) => 200,
            Err(err) => err.status_code(),
        }
    }

    pub fn stop(&mut self) -> Result<()> {
        self.controller.stop()
    }

    pub fn pause(&mut self) -> Result<()> {
        self.controller.pause()
    }

    fn play_sequence(
        &mut self,
        stream_url: &str,
        codec: Option<&Codec>,
        track: &TrackMetadata,
    ) -> Result<()> {
        match self.controller.register(stream_url, codec, track) {
            Ok(()) => {}
            Err(err @ (ControlError::ConnectionRefused(_) | ControlError::NoSuitableEncoder)) => {
                return Err(err)
            }
            Err(err) => {
                error!("\"{}\" registering failed!", self.device().name);
                return Err(err);
            }
        }

        if !self.controller.update_current_state()? {
            warn!("Updating device state unsuccessful! Sending play command.");
            return self.controller.play();
        }

        match self.controller.state() {
            TransportState::Playing => {
                info!("Device state is playing. No need to send play command.");
                Ok(())
            }
            _ => {
                info!("Device state is stopped. Sending play command.");
                self.controller.play()
            }
        }
    }
}
