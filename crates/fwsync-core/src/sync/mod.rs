//! Firewall rule synchronizer
//!
//! The RuleSync orchestrates one run:
//! - Resolve the public IPv4 via [`IpResolver`]
//! - Fetch the inbound rule set via [`FirewallApi`]
//! - Plan which per-protocol rules to append (or filter out)
//! - Issue a single PUT replacing the inbound chain
//!
//! ## Flow
//!
//! ```text
//! ┌────────────┐    address     ┌──────────────┐   GET / PUT   ┌─────────────┐
//! │ IpResolver │ ─────────────► │   RuleSync   │ ◄───────────► │ FirewallApi │
//! └────────────┘                └──────────────┘               └─────────────┘
//!                                      │
//!                                      ▼
//!                            UpsertReport / RemoveOutcome
//! ```
//!
//! Planning is split into pure functions (`plan_upsert`, `plan_remove`)
//! so the decision logic is testable without any I/O, and the outcome
//! types carry everything the command surface needs for reporting —
//! nothing here prints.

use crate::error::Result;
use crate::rules::{FirewallRule, Protocol};
use crate::traits::{FirewallApi, IpResolver};
use tracing::{debug, info};

/// Stage the per-protocol rules missing from an existing rule set
///
/// For each managed protocol, a `{label}-{PROTOCOL}` ACCEPT rule for the
/// given CIDR is staged unless a rule with that exact label already
/// exists. An existing same-label rule is left untouched even when its
/// address is stale; refreshing it is an explicit non-feature until the
/// intended semantics are confirmed.
pub fn plan_upsert(existing: &[FirewallRule], label: &str, ipv4_cidr: &str) -> Vec<FirewallRule> {
    Protocol::MANAGED
        .iter()
        .filter_map(|&protocol| {
            let scoped = FirewallRule::scoped_label(label, protocol);
            if existing.iter().any(|rule| rule.label == scoped) {
                debug!("rule {scoped} already present, leaving it untouched");
                None
            } else {
                Some(FirewallRule::accept(scoped, protocol, ipv4_cidr))
            }
        })
        .collect()
}

/// Filter a rule set down to the rules not belonging to a label group
///
/// Returns `None` when no `{label}-{PROTOCOL}` rule matched (the caller
/// must not issue a PUT in that case); otherwise the surviving rules in
/// their original order.
pub fn plan_remove(existing: &[FirewallRule], label: &str) -> Option<Vec<FirewallRule>> {
    let scoped: Vec<String> = Protocol::MANAGED
        .iter()
        .map(|&protocol| FirewallRule::scoped_label(label, protocol))
        .collect();

    let filtered: Vec<FirewallRule> = existing
        .iter()
        .filter(|rule| !scoped.contains(&rule.label))
        .cloned()
        .collect();

    if filtered.len() == existing.len() {
        None
    } else {
        Some(filtered)
    }
}

/// Result of an upsert run, for command-surface reporting
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertReport {
    /// Single-host CIDR the staged rules point at
    pub address: String,
    /// Inbound rule set as fetched, before mutation
    pub existing: Vec<FirewallRule>,
    /// Labels of the rules appended by this run (empty when all three
    /// protocol labels were already present)
    pub added: Vec<String>,
}

/// Result of a remove run, for command-surface reporting
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    /// Matching rules were filtered out and the rule set replaced
    Removed {
        /// Inbound rule set as fetched, before mutation
        existing: Vec<FirewallRule>,
        /// Labels of the removed rules
        removed: Vec<String>,
        /// Rule set written back
        remaining: Vec<FirewallRule>,
    },
    /// No rule matched any of the managed labels; no PUT was issued
    NothingMatched {
        /// Inbound rule set as fetched
        existing: Vec<FirewallRule>,
    },
}

/// One-shot synchronizer between the public address and the firewall
pub struct RuleSync {
    resolver: Box<dyn IpResolver>,
    firewall: Box<dyn FirewallApi>,
}

impl RuleSync {
    /// Create a synchronizer from its two network seams
    pub fn new(resolver: Box<dyn IpResolver>, firewall: Box<dyn FirewallApi>) -> Self {
        Self { resolver, firewall }
    }

    /// Ensure `{label}-{TCP,UDP,ICMP}` allow-rules exist for the current
    /// public address
    ///
    /// Resolves the address, treats it as a single-host CIDR, fetches the
    /// inbound rule set, and PUTs back `existing + staged`. Rules whose
    /// labels do not match are carried over byte-for-byte.
    pub async fn upsert(&self, firewall_id: &str, label: &str) -> Result<UpsertReport> {
        let address = self.resolver.resolve().await?;
        let cidr = format!("{address}/32");
        info!("resolved public address {cidr}");

        let existing = self.firewall.inbound_rules(firewall_id).await?;
        debug!(
            "firewall {firewall_id} has {} inbound rule(s)",
            existing.len()
        );

        let staged = plan_upsert(&existing, label, &cidr);
        let added: Vec<String> = staged.iter().map(|rule| rule.label.clone()).collect();

        let mut combined = existing.clone();
        combined.extend(staged);
        self.firewall
            .replace_inbound(firewall_id, &combined)
            .await?;

        info!(
            "firewall {firewall_id}: {} rule(s) appended for label {label}",
            added.len()
        );
        Ok(UpsertReport {
            address: cidr,
            existing,
            added,
        })
    }

    /// Remove the `{label}-{TCP,UDP,ICMP}` rules, leaving everything else
    /// in place
    ///
    /// Issues no PUT when nothing matched.
    pub async fn remove(&self, firewall_id: &str, label: &str) -> Result<RemoveOutcome> {
        let existing = self.firewall.inbound_rules(firewall_id).await?;

        let Some(remaining) = plan_remove(&existing, label) else {
            info!("firewall {firewall_id}: no rules matched label {label}");
            return Ok(RemoveOutcome::NothingMatched { existing });
        };

        self.firewall
            .replace_inbound(firewall_id, &remaining)
            .await?;

        let removed: Vec<String> = existing
            .iter()
            .filter(|rule| {
                Protocol::MANAGED
                    .iter()
                    .any(|&p| rule.label == FirewallRule::scoped_label(label, p))
            })
            .map(|rule| rule.label.clone())
            .collect();
        info!(
            "firewall {firewall_id}: removed {} rule(s) for label {label}",
            removed.len()
        );
        Ok(RemoveOutcome::Removed {
            existing,
            removed,
            remaining,
        })
    }
}
