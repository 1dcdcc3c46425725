use std::time::Duration;

use crate::config::settings::UpstreamConfig;

/// Build the shared HTTP client used for upstream calls
///
/// One client is built at startup and cloned into every provider, so
/// connections are pooled across requests.
///
/// # Features
/// - **Timeouts**: separate connect and read timeouts from configuration
/// - **Compression**: gzip, deflate, brotli and zstd response bodies
/// - **Security**: Rustls for TLS (no OpenSSL dependency)
/// - **User-Agent**: identifies this service and its version
///
/// There is no overall request timeout and no retry; a slow upstream is cut
/// off by the read timeout.
pub fn build_http_client(config: &UpstreamConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout())
        .read_timeout(config.read_timeout())
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(user_agent())
        .build()
}

fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), crate::pkg_version())
}
