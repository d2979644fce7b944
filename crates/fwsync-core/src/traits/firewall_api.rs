// # Firewall API Trait
//
// Defines the interface for reading and replacing a cloud firewall's
// inbound rule chain.
//
// ## Implementations
//
// - Linode API v4: `fwsync-provider-linode` crate
//
// Implementations are single-shot HTTP clients: no retry, no backoff, no
// caching. A non-2xx response surfaces as [`crate::Error::Api`] with the
// response body verbatim so the operator can self-diagnose.

use async_trait::async_trait;

use crate::error::Result;
use crate::rules::FirewallRule;

/// Trait for firewall API implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait FirewallApi: Send + Sync {
    /// Fetch the firewall's inbound rule list, in remote order
    async fn inbound_rules(&self, firewall_id: &str) -> Result<Vec<FirewallRule>>;

    /// Replace the firewall's entire inbound rule list
    async fn replace_inbound(&self, firewall_id: &str, rules: &[FirewallRule]) -> Result<()>;
}
