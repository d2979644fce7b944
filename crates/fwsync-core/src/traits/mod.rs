//! Core traits for the firewall synchronizer
//!
//! These are the seams between the orchestration logic and the two
//! network dependencies, so `RuleSync` can be exercised with in-process
//! doubles.
//!
//! - [`IpResolver`]: resolve the caller's current public IPv4
//! - [`FirewallApi`]: fetch and replace a firewall's inbound rule list

pub mod firewall_api;
pub mod ip_resolver;

pub use firewall_api::FirewallApi;
pub use ip_resolver::IpResolver;
