//! Error types for the SOAP client

use thiserror::Error;

/// Errors that can occur while invoking a SOAP action
#[derive(Debug, Error)]
pub enum SoapError {
    /// The request did not complete within the per-call timeout
    #[error("Request to {0} timed out")]
    Timeout(String),

    /// The device refused (or could not accept) the TCP connection
    #[error("Connection refused by {0}")]
    ConnectionRefused(String),

    /// Any other network or HTTP transport failure
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The response body was not the XML we expected
    #[error("XML parsing error: {0}")]
    Parse(String),
}

impl SoapError {
    /// HTTP-equivalent status code used by callers that report numeric outcomes.
    pub fn status_code(&self) -> u16 {
        match self {
            SoapError::Timeout(_) => 408,
            SoapError::ConnectionRefused(_) => 404,
            SoapError::Network(_) => 503,
            SoapError::Parse(_) => 400,
        }
    }
}
