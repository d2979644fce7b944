// # fwsync-core
//
// Core library for the fwsync firewall allow-rule synchronizer.
//
// ## Architecture Overview
//
// This library provides everything except the actual network clients:
// - **IpResolver**: Trait for resolving the caller's current public IPv4
// - **FirewallApi**: Trait for fetching/replacing a firewall's inbound rules
// - **RuleSync**: Orchestrates resolve → fetch → plan → replace for one run
// - **TargetStore**: Persists the `(firewall_id, label)` pair between runs
// - **CredentialFile**: Reads the API bearer token from the linode-cli config
//
// ## Design Principles
//
// 1. **Separation of Concerns**: planning (`sync::plan_*`) is pure and
//    testable without I/O; `RuleSync` returns outcome values and never
//    prints, so reporting stays in the command surface
// 2. **Injected paths**: no global config-path constants; stores take
//    their file paths at construction
// 3. **Idempotency**: a failed run is safely rerun by the operator —
//    there is no retry logic anywhere in this workspace

pub mod credentials;
pub mod error;
mod ini;
pub mod rules;
pub mod store;
pub mod sync;
pub mod traits;

// Re-export core types for convenience
pub use credentials::CredentialFile;
pub use error::{Error, Result};
pub use rules::{FirewallRule, Protocol, RuleAddresses};
pub use store::{SyncTarget, TargetStore};
pub use sync::{RemoveOutcome, RuleSync, UpsertReport};
pub use traits::{FirewallApi, IpResolver};
