use dlna_discovery::{ServiceKind, ValidationError};
use soap_client::SoapError;
use thiserror::Error;

/// Errors raised while controlling a renderer
///
/// Every variant maps onto the HTTP-style status code the control layer
/// reports to its caller, see [`ControlError::status_code`].
#[derive(Debug, Error)]
pub enum ControlError {
    /// The action did not complete within the per-call timeout
    #[error("Request to {0} timed out")]
    Timeout(String),

    /// The renderer refused the connection
    #[error("The device at {0} refused the connection")]
    ConnectionRefused(String),

    /// Any other network failure
    #[error("Network error: {0}")]
    Network(String),

    /// The renderer answered with a status other than 200
    #[error("Renderer answered with HTTP status {0}")]
    Status(u16),

    /// The renderer answered 200 but the body was not the XML we expected
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The device does not declare the service this action needs
    #[error("Device has no {0} service")]
    MissingService(ServiceKind),

    /// The service URL could not be resolved against the device address
    #[error("Invalid service url: {0}")]
    InvalidUrl(String),

    /// No encoder can produce a format the renderer accepts
    #[error("Could not find a suitable encoder")]
    NoSuitableEncoder,
}

impl ControlError {
    /// HTTP-equivalent status code for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            ControlError::Timeout(_) => 408,
            ControlError::ConnectionRefused(_) => 404,
            ControlError::Network(_) => 503,
            ControlError::Status(code) => *code,
            ControlError::MalformedResponse(_) => 400,
            ControlError::MissingService(_)
            | ControlError::InvalidUrl(_)
            | ControlError::NoSuitableEncoder => 500,
        }
    }
}

/// Type alias for results that can return a ControlError
pub type Result<T> = std::result::Result<T, ControlError>;

impl From<SoapError> for ControlError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Timeout(url) => ControlError::Timeout(url),
            SoapError::ConnectionRefused(url) => ControlError::ConnectionRefused(url),
            SoapError::Network(msg) => ControlError::Network(msg),
            SoapError::Parse(msg) => ControlError::MalformedResponse(msg),
        }
    }
}

impl From<ValidationError> for ControlError {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::MissingService(kind) => ControlError::MissingService(kind),
        }
    }
}
