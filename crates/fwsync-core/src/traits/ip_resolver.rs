// # IP Resolver Trait
//
// Defines the interface for resolving the caller's current public IPv4
// address.
//
// ## Implementations
//
// - HTTP echo service: `fwsync-ip-http` crate
//
// The address is re-resolved on every invocation and never cached; the
// whole run is idempotent and safe to re-invoke, so a failure here simply
// aborts the run.

use async_trait::async_trait;
use std::net::Ipv4Addr;

use crate::error::Result;

/// Trait for public-IP resolver implementations
///
/// Implementations perform at most one bounded outbound request and must
/// not retry; a failed resolution surfaces as [`crate::Error::IpResolution`].
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Resolve the current public IPv4 address
    async fn resolve(&self) -> Result<Ipv4Addr>;
}
