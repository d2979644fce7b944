// # fwsync - Firewall Allow-Rule Synchronizer CLI
//
// Thin command surface over fwsync-core. One invocation:
//
// 1. Parse flags and resolve the (firewall_id, label) target, persisting
//    it whenever both are given explicitly
// 2. Read the bearer token from the linode-cli configuration
// 3. Run the upsert or remove flow against the Linode API
// 4. Report the outcome; any propagated error exits non-zero
//
// All decision logic lives in fwsync-core. This binary only wires in the
// concrete resolver and client, and owns every print.
//
// ## Usage
//
// ```bash
// # First run: store the target and create the rules
// fwsync update --firewall_id 123456 --label home
//
// # Later runs (e.g. after the ISP rotated the IP)
// fwsync update
//
// # Tear the rules down again
// fwsync remove
// ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fwsync_core::sync::RemoveOutcome;
use fwsync_core::{CredentialFile, Error, RuleSync, SyncTarget, TargetStore};
use fwsync_ip_http::HttpIpResolver;
use fwsync_provider_linode::LinodeFirewallClient;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, warn};
use tracing_subscriber::FmtSubscriber;

/// Keep a cloud firewall's inbound allow-rules pointed at your current
/// public IP address
#[derive(Debug, Parser)]
#[command(name = "fwsync", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create any missing per-protocol allow-rules for the current public IP
    Update(TargetArgs),
    /// Remove the per-protocol allow-rules for a label
    Remove(TargetArgs),
}

#[derive(Debug, Args)]
struct TargetArgs {
    /// ID of the firewall to manage (stored for later runs when given
    /// together with --label)
    #[arg(long = "firewall_id")]
    firewall_id: Option<String>,

    /// Label prefix for the managed rule group
    #[arg(long)]
    label: Option<String>,

    /// Show the existing rule set before mutation and raise log verbosity
    #[arg(short, long)]
    debug: bool,

    /// Path to the fwsync config file
    #[arg(long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Path to the linode-cli configuration holding the API token
    #[arg(long = "linode-config", default_value_os_t = default_linode_config_path())]
    linode_config: PathBuf,
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_config_path() -> PathBuf {
    home_dir().join(".fwsync-config")
}

fn default_linode_config_path() -> PathBuf {
    home_dir().join(".config").join("linode-cli")
}

impl Cli {
    fn debug(&self) -> bool {
        match &self.command {
            Command::Update(args) | Command::Remove(args) => args.debug,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug() { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return ExitCode::FAILURE;
    }

    // Strictly sequential tool: a current-thread runtime is all it needs.
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Update(args) => run_update(args).await,
        Command::Remove(args) => run_remove(args).await,
    }
}

/// Resolve the firewall target from flags or the stored default
///
/// Both identifiers supplied: use them and overwrite the stored default.
/// Otherwise fall back to the store; an empty store is fatal.
fn resolve_target(args: &TargetArgs) -> Result<SyncTarget, Error> {
    let store = TargetStore::new(&args.config);

    match (&args.firewall_id, &args.label) {
        (Some(firewall_id), Some(label)) => {
            let target = SyncTarget {
                firewall_id: firewall_id.clone(),
                label: label.clone(),
            };
            store.save(&target)?;
            println!("Configuration saved to {}", store.path().display());
            Ok(target)
        }
        (None, None) => store.load()?.ok_or(Error::TargetMissing),
        _ => {
            // Half a pair is not enough to overwrite the stored default.
            warn!("--firewall_id and --label must be given together; falling back to stored target");
            store.load()?.ok_or(Error::TargetMissing)
        }
    }
}

fn build_sync(args: &TargetArgs) -> Result<RuleSync, Error> {
    let token = CredentialFile::new(&args.linode_config).token()?;
    let firewall = LinodeFirewallClient::new(token)?;
    Ok(RuleSync::new(
        Box::new(HttpIpResolver::new()),
        Box::new(firewall),
    ))
}

fn print_rules(heading: &str, rules: &[fwsync_core::FirewallRule]) -> Result<()> {
    println!("{heading}\n{}", serde_json::to_string_pretty(rules)?);
    Ok(())
}

async fn run_update(args: TargetArgs) -> Result<()> {
    let target = resolve_target(&args)?;
    let sync = build_sync(&args)?;

    let report = sync.upsert(&target.firewall_id, &target.label).await?;

    if args.debug {
        print_rules("Existing rules before update:", &report.existing)?;
    }

    if report.added.is_empty() {
        println!(
            "Rules for '{}' already present on firewall {} ({})",
            target.label, target.firewall_id, report.address
        );
    } else {
        println!(
            "Created firewall rules for '{}' -> {}: {}",
            target.label,
            report.address,
            report.added.join(", ")
        );
    }
    Ok(())
}

async fn run_remove(args: TargetArgs) -> Result<()> {
    let target = resolve_target(&args)?;
    let sync = build_sync(&args)?;

    match sync.remove(&target.firewall_id, &target.label).await? {
        RemoveOutcome::NothingMatched { existing } => {
            if args.debug {
                print_rules("Existing rules:", &existing)?;
            }
            println!("No rules found with label '{}' to remove.", target.label);
        }
        RemoveOutcome::Removed {
            existing,
            removed,
            remaining,
        } => {
            if args.debug {
                print_rules("Existing rules before removal:", &existing)?;
            }
            println!(
                "Removed firewall rules for '{}': {}",
                target.label,
                removed.join(", ")
            );
            if args.debug {
                print_rules("Remaining rules after removal:", &remaining)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(config: PathBuf, firewall_id: Option<&str>, label: Option<&str>) -> TargetArgs {
        TargetArgs {
            firewall_id: firewall_id.map(String::from),
            label: label.map(String::from),
            debug: false,
            config,
            linode_config: PathBuf::from("/nonexistent"),
        }
    }

    #[test]
    fn explicit_pair_is_used_and_persisted() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config");

        let target =
            resolve_target(&args(config.clone(), Some("123456"), Some("home"))).unwrap();
        assert_eq!(target.firewall_id, "123456");

        // A later bare invocation loads the persisted pair.
        let loaded = resolve_target(&args(config, None, None)).unwrap();
        assert_eq!(loaded, target);
    }

    #[test]
    fn bare_invocation_without_store_is_target_missing() {
        let dir = tempdir().unwrap();
        let err = resolve_target(&args(dir.path().join("absent"), None, None)).unwrap_err();
        assert!(matches!(err, Error::TargetMissing));
    }

    #[test]
    fn half_a_pair_falls_back_to_stored_target() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config");

        resolve_target(&args(config.clone(), Some("123456"), Some("home"))).unwrap();
        let target = resolve_target(&args(config, Some("999999"), None)).unwrap();

        // The stored pair wins; the lone flag does not overwrite it.
        assert_eq!(target.firewall_id, "123456");
    }
}
