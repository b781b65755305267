//! Error types for descriptor parsing and device validation.

use std::fmt;

use crate::service::ServiceKind;

/// Error type for discovery operations.
///
/// Every variant means "skip this device"; none of them is retryable.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Network-related errors while fetching a descriptor
    NetworkError(String),
    /// The descriptor host refused the connection
    ConnectionRefused(String),
    /// The descriptor fetch exceeded its timeout
    Timeout(String),
    /// Malformed XML, missing required fields or no renderer device
    ParseError(String),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DiscoveryError::ConnectionRefused(url) => {
                write!(f, "Could not connect to {}. Connection refused.", url)
            }
            DiscoveryError::Timeout(url) => {
                write!(f, "Could not connect to {}. Connection timeout.", url)
            }
            DiscoveryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// A parsed device that cannot be used for playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// One of the three required control services was not declared
    MissingService(ServiceKind),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingService(kind) => {
                write!(f, "does not specify a service {} url", kind)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
