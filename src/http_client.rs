//! Shared HTTP client for the platform APIs
//!
//! One pooled client is built at startup and cloned into every provider,
//! so the fan-out reuses connections to each API host.

use std::time::Duration;

use reqwest::Client;

/// Build the HTTP client used by every provider.
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("livecheck/", env!("CARGO_PKG_VERSION")))
        // Keep connections alive for reuse across rounds
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .use_rustls_tls()
        .gzip(true)
        .connect_timeout(Duration::from_secs(10))
        .build()
}
