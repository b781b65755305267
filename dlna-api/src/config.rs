//! Configuration for renderer control
//!
//! Nothing here is persisted; callers build a config in code and hand it to
//! the controller.

use std::time::Duration;

/// Timing and encoding settings for a [`TransportController`](crate::TransportController)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Upper bound for every single SOAP action
    /// Default: 10 seconds
    pub request_timeout: Duration,

    /// Character encoding declared in envelopes, headers and metadata
    /// Default: "utf-8"
    pub encoding: String,

    /// Pause between two transport state polls
    /// Default: 1 second
    pub state_poll_interval: Duration,

    /// Overall deadline for reconciling the transport state
    /// Default: 10 seconds
    pub state_poll_deadline: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            request_timeout: soap_client::DEFAULT_TIMEOUT,
            encoding: soap_client::DEFAULT_ENCODING.to_string(),
            state_poll_interval: Duration::from_secs(1),
            state_poll_deadline: soap_client::DEFAULT_TIMEOUT,
        }
    }
}

impl ControllerConfig {
    /// Create a new ControllerConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn with_state_polling(mut self, interval: Duration, deadline: Duration) -> Self {
        self.state_poll_interval = interval;
        self.state_poll_deadline = deadline;
        self
    }
}
