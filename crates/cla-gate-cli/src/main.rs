//! cla-gate - operator CLI for the CLA pull request gate
//!
//! ## Commands
//!
//! - `validate-config`: load and validate a gate configuration
//! - `contributors`: show the identities a commit list resolves to
//! - `check`: dry-run a CLA evaluation against the live signature service

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};

use cla_gate_core::{
    aggregate, extract_contributors, init_tracing, Commit, GateConfig, Identity, RepoPolicy,
    SignReport, Verdict, METRICS,
};
use cla_signature_client::{HttpSignatureChecker, SignatureClientConfig};

#[derive(Parser)]
#[command(name = "cla-gate")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CLA gate for pull requests", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "CLA_GATE_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a configuration file (TOML or JSON)
    ValidateConfig {
        /// Path to the gate configuration
        #[arg(short, long, env = "CLA_GATE_CONFIG")]
        config: PathBuf,
    },

    /// Print the unique contributors of a commit list as JSON
    Contributors {
        #[command(flatten)]
        target: Target,
    },

    /// Dry-run extraction and aggregation against the signature service
    ///
    /// Prints the sign report and verdict as JSON. Nothing is written to the
    /// platform.
    Check {
        #[command(flatten)]
        target: Target,

        /// Per-request timeout for the signature service
        #[arg(long, default_value = "10")]
        timeout_secs: u64,
    },
}

#[derive(clap::Args)]
struct Target {
    /// Path to the gate configuration
    #[arg(short, long, env = "CLA_GATE_CONFIG")]
    config: PathBuf,

    /// Organization owning the repository
    #[arg(long)]
    org: String,

    /// Repository name
    #[arg(long)]
    repo: String,

    /// JSON file holding the PR's commits
    #[arg(long)]
    commits: PathBuf,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    org: &'a str,
    repo: &'a str,
    contributors: &'a [Identity],
    report: &'a SignReport,
    verdict: &'a Verdict,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json_logs, level);

    match cli.command {
        Commands::ValidateConfig { config } => cmd_validate_config(&config),
        Commands::Contributors { target } => cmd_contributors(&target),
        Commands::Check {
            target,
            timeout_secs,
        } => cmd_check(&target, Duration::from_secs(timeout_secs)).await,
    }
}

fn cmd_validate_config(path: &Path) -> Result<()> {
    let config = load_config(path)?;
    let repos: usize = config
        .config_items
        .iter()
        .map(|item| item.filter.repos.len())
        .sum();
    println!(
        "✓ {} is valid: {} policies covering {} repo filter entries",
        path.display(),
        config.config_items.len(),
        repos
    );
    Ok(())
}

fn cmd_contributors(target: &Target) -> Result<()> {
    let config = load_config(&target.config)?;
    let policy = policy_for(&config, target)?;
    let commits = load_commits(&target.commits)?;

    let identities = extract_contributors(&commits, policy);
    info!(commits = commits.len(), contributors = identities.len(), "contributors extracted");
    println!("{}", serde_json::to_string_pretty(&identities)?);
    Ok(())
}

async fn cmd_check(target: &Target, timeout: Duration) -> Result<()> {
    let config = load_config(&target.config)?;
    let policy = policy_for(&config, target)?;
    let commits = load_commits(&target.commits)?;

    let identities = extract_contributors(&commits, policy);
    if identities.is_empty() {
        anyhow::bail!("{} holds no commits, nothing to check", target.commits.display());
    }

    let checker = HttpSignatureChecker::new(SignatureClientConfig::default().with_timeout(timeout))
        .context("failed to build signature client")?;
    let report = aggregate(&identities, policy, &checker).await?;
    let verdict = report.verdict();
    METRICS.record_verdict(&verdict);

    let out = CheckReport {
        org: &target.org,
        repo: &target.repo,
        contributors: &identities,
        report: &report,
        verdict: &verdict,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    METRICS.flush();
    Ok(())
}

fn load_config(path: &Path) -> Result<GateConfig> {
    GateConfig::load(path).with_context(|| format!("failed to load config {}", path.display()))
}

fn policy_for<'a>(config: &'a GateConfig, target: &Target) -> Result<&'a RepoPolicy> {
    config
        .policy_for(&target.org, &target.repo)
        .with_context(|| format!("no config for this repo: {}/{}", target.org, target.repo))
}

fn load_commits(path: &Path) -> Result<Vec<Commit>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read commits {}", path.display()))?;
    parse_commits(&raw).with_context(|| format!("failed to parse commits {}", path.display()))
}

fn parse_commits(raw: &str) -> Result<Vec<Commit>> {
    Ok(serde_json::from_str(raw)?)
}
