// # HTTP Public-IP Resolver
//
// Resolves the caller's public IPv4 address by asking a third-party
// echo service.
//
// ## Behavior
//
// One GET with a 5 second timeout, parsing a JSON body of the form
// `{"ip": "<ipv4>"}`. No retry: the whole run is idempotent and the
// operator simply reruns on failure.
//
// The default service is ipify's JSON endpoint; the URL is injectable so
// tests can point the resolver at a local mock server.

use async_trait::async_trait;
use fwsync_core::error::{Error, Result};
use fwsync_core::traits::IpResolver;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default IP echo service (43KB/day free, JSON response)
const DEFAULT_ECHO_URL: &str = "https://api.ipify.org?format=json";

/// Timeout for the single resolution request
const RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Response body of the echo service
#[derive(Debug, Deserialize)]
struct EchoBody {
    ip: String,
}

/// HTTP-based public IP resolver
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    url: String,
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver against the default echo service
    pub fn new() -> Self {
        Self::with_url(DEFAULT_ECHO_URL)
    }

    /// Create a resolver against a specific echo URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(RESOLVE_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpIpResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<Ipv4Addr> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::ip_resolution(format!("request to {} timed out", self.url))
            } else {
                Error::ip_resolution(format!("request failed: {e}"))
            }
        })?;

        if !response.status().is_success() {
            return Err(Error::ip_resolution(format!(
                "echo service returned {}",
                response.status()
            )));
        }

        let body: EchoBody = response
            .json()
            .await
            .map_err(|e| Error::ip_resolution(format!("malformed response: {e}")))?;

        let address: Ipv4Addr = body.ip.trim().parse().map_err(|_| {
            Error::ip_resolution(format!("echo service returned a non-IPv4 address: {}", body.ip))
        })?;

        tracing::debug!("resolved public address {address}");
        Ok(address)
    }
}
