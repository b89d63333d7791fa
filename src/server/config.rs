//! HTTP server configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default upper bound for a whole multipart request body.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Runtime settings of the HTTP server.
///
/// Plain data; the binary fills it from command line flags and environment
/// variables, tests use [`ServerConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Requests running longer than this are answered with 408.
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    /// Allow cross-origin requests from any origin.
    pub cors: bool,
}

impl Default for ServerConfig {
    /// | Field            | Default        |
    /// |------------------|----------------|
    /// | bind_addr        | `0.0.0.0:8080` |
    /// | request_timeout  | 30 seconds     |
    /// | max_upload_bytes | 10 MiB         |
    /// | cors             | on             |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            request_timeout: Duration::from_secs(30),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors: true,
        }
    }
}
