// ABOUTME: Connection options for TCP sessions, built with with_* setters
// ABOUTME: Holds the response timeout and read buffer sizing used by TcpSession

use crate::connection::DEFAULT_READ_BUFFER_CAPACITY;
use std::time::Duration;

/// Default wait for a synchronous response before failing with `Timeout`
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for `TcpSession::connect`
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// How long a synchronous call waits for its response
    pub response_timeout: Duration,
    /// Initial capacity of the frame read buffer
    pub read_buffer_capacity: usize,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn with_read_buffer_capacity(mut self, capacity: usize) -> Self {
        self.read_buffer_capacity = capacity;
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
        }
    }
}
