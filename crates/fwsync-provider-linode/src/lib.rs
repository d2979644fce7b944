// # Linode Cloud Firewall Client
//
// `FirewallApi` implementation against the Linode API v4.
//
// ## Behavior
//
// - GET `/networking/firewalls/{id}/rules` to read the inbound chain
// - PUT the same path with `{"inbound": [...]}` to replace it
// - Bearer-token authenticated, JSON content type
// - Any non-2xx response surfaces as `Error::Api` with the body verbatim
// - NO retry, NO backoff, NO caching: one failed run is rerun by the
//   operator
//
// ## Security
//
// The API token never appears in logs; the Debug implementation redacts
// it.
//
// ## API Reference
//
// - Linode API v4: https://www.linode.com/docs/api/networking/
// - Firewall rules: GET/PUT `/v4/networking/firewalls/{firewallId}/rules`

use async_trait::async_trait;
use fwsync_core::error::{Error, Result};
use fwsync_core::rules::FirewallRule;
use fwsync_core::traits::FirewallApi;
use serde::Deserialize;
use std::time::Duration;

/// Linode API base URL
const LINODE_API_BASE: &str = "https://api.linode.com/v4";

/// Timeout for firewall API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("fwsync/", env!("CARGO_PKG_VERSION"));

/// Rule payload of GET `/networking/firewalls/{id}/rules`
///
/// The response also carries `outbound` and policy fields; only the
/// inbound chain is managed, so the rest is ignored on read and never
/// sent back (the PUT body contains `inbound` only).
#[derive(Debug, Deserialize)]
struct RuleSetBody {
    inbound: Vec<FirewallRule>,
}

/// Linode Cloud Firewall API client
pub struct LinodeFirewallClient {
    base_url: String,
    /// ⚠️ NEVER log this value
    token: String,
    client: reqwest::Client,
}

// Debug intentionally hides the API token
impl std::fmt::Debug for LinodeFirewallClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinodeFirewallClient")
            .field("base_url", &self.base_url)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

impl LinodeFirewallClient {
    /// Create a client against the production Linode API
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(LINODE_API_BASE, token)
    }

    /// Create a client against a specific base URL (tests)
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::credential_invalid("API token is empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn rules_url(&self, firewall_id: &str) -> String {
        format!("{}/networking/firewalls/{firewall_id}/rules", self.base_url)
    }

    /// Surface a non-2xx response as an API error carrying the body
    async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error response".to_string());
        tracing::debug!("firewall API responded {status}: {body}");
        Err(Error::api(status.as_u16(), body))
    }
}

#[async_trait]
impl FirewallApi for LinodeFirewallClient {
    async fn inbound_rules(&self, firewall_id: &str) -> Result<Vec<FirewallRule>> {
        let response = self
            .client
            .get(self.rules_url(firewall_id))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::http(format!("fetching firewall rules failed: {e}")))?;

        let response = Self::error_for_status(response).await?;
        let body: RuleSetBody = response
            .json()
            .await
            .map_err(|e| Error::http(format!("failed to parse firewall rule list: {e}")))?;

        Ok(body.inbound)
    }

    async fn replace_inbound(&self, firewall_id: &str, rules: &[FirewallRule]) -> Result<()> {
        let response = self
            .client
            .put(self.rules_url(firewall_id))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "inbound": rules }))
            .send()
            .await
            .map_err(|e| Error::http(format!("replacing firewall rules failed: {e}")))?;

        Self::error_for_status(response).await?;
        tracing::debug!("firewall {firewall_id}: inbound chain replaced ({} rules)", rules.len());
        Ok(())
    }
}
