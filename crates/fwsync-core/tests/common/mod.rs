//! Test doubles for rule synchronizer contract tests
//!
//! These doubles record calls so the tests can assert which API
//! operations a run performed, without any real networking.

use async_trait::async_trait;
use fwsync_core::error::{Error, Result};
use fwsync_core::rules::FirewallRule;
use fwsync_core::traits::{FirewallApi, IpResolver};
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An IpResolver that always returns the same address
pub struct FixedIpResolver {
    address: Ipv4Addr,
}

impl FixedIpResolver {
    pub fn new(address: Ipv4Addr) -> Self {
        Self { address }
    }
}

#[async_trait]
impl IpResolver for FixedIpResolver {
    async fn resolve(&self) -> Result<Ipv4Addr> {
        Ok(self.address)
    }
}

/// An IpResolver that always fails, simulating an unreachable echo service
pub struct FailingIpResolver;

#[async_trait]
impl IpResolver for FailingIpResolver {
    async fn resolve(&self) -> Result<Ipv4Addr> {
        Err(Error::ip_resolution("echo service unreachable"))
    }
}

/// A FirewallApi double holding an in-memory inbound chain
///
/// Applies `replace_inbound` to its own state so consecutive runs against
/// it behave like a real firewall. Share it between the engine and the
/// test via `Arc`.
pub struct RecordingFirewall {
    inbound: Mutex<Vec<FirewallRule>>,
    fetch_calls: AtomicUsize,
    replace_calls: AtomicUsize,
    fetch_failure: Option<(u16, String)>,
}

impl RecordingFirewall {
    pub fn with_rules(rules: Vec<FirewallRule>) -> Self {
        Self {
            inbound: Mutex::new(rules),
            fetch_calls: AtomicUsize::new(0),
            replace_calls: AtomicUsize::new(0),
            fetch_failure: None,
        }
    }

    /// A firewall whose rule fetch fails with the given API error
    pub fn failing_fetch(status: u16, body: &str) -> Self {
        Self {
            inbound: Mutex::new(Vec::new()),
            fetch_calls: AtomicUsize::new(0),
            replace_calls: AtomicUsize::new(0),
            fetch_failure: Some((status, body.to_string())),
        }
    }

    /// Current inbound chain
    pub fn inbound(&self) -> Vec<FirewallRule> {
        self.inbound.lock().unwrap().clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn replace_calls(&self) -> usize {
        self.replace_calls.load(Ordering::SeqCst)
    }
}

/// Newtype over a shared [`RecordingFirewall`] so the foreign
/// `FirewallApi` trait can be implemented without violating the orphan
/// rule (`Arc` is not a local type).
pub struct SharedFirewall(pub std::sync::Arc<RecordingFirewall>);

#[async_trait]
impl FirewallApi for SharedFirewall {
    async fn inbound_rules(&self, _firewall_id: &str) -> Result<Vec<FirewallRule>> {
        self.0.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((status, body)) = &self.0.fetch_failure {
            return Err(Error::api(*status, body.clone()));
        }
        Ok(self.0.inbound())
    }

    async fn replace_inbound(&self, _firewall_id: &str, rules: &[FirewallRule]) -> Result<()> {
        self.0.replace_calls.fetch_add(1, Ordering::SeqCst);
        *self.0.inbound.lock().unwrap() = rules.to_vec();
        Ok(())
    }
}
