//! # themekey CLI Entry Point
//!
//! Operator tooling for the licensing stack: mint keys outside the
//! issuance flow, inspect identity normalization, and replay license
//! transitions offline when diagnosing activation disputes.

use std::collections::HashSet;

use chrono::Utc;
use clap::Parser;
use rand_core::OsRng;

use themekey_core::{key, Contact, LicenseKey, StoreIdentity};
use themekey_state::{Action, LicenseRecord, LicenseStatus, TransitionError, Verdict};

/// ThemeKey licensing toolchain.
///
/// Mints license keys, shows canonical store identities, and evaluates
/// state-machine transitions without touching the record store.
#[derive(Parser, Debug)]
#[command(name = "themekey", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Mint fresh license keys.
    Keygen(KeygenArgs),
    /// Show the canonical form of a store identity.
    Normalize(NormalizeArgs),
    /// Evaluate a transition against a synthetic record.
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
struct KeygenArgs {
    /// Number of keys to mint.
    #[arg(long, default_value_t = 1)]
    count: usize,
}

#[derive(clap::Args, Debug)]
struct NormalizeArgs {
    /// Raw identity as reported by a theme (hostname, URL, or subdomain).
    identity: String,
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Current record status: new, active, inactive, or invalid.
    #[arg(long, default_value = "new")]
    status: String,
    /// Identity currently bound to the record (empty for unbound).
    #[arg(long, default_value = "")]
    bound_identity: String,
    /// Identity the request claims.
    #[arg(long)]
    store_identity: String,
    /// Requested action; "clear" releases, anything else activates.
    #[arg(long)]
    action: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen(args) => keygen(args),
        Commands::Normalize(args) => normalize(args),
        Commands::Check(args) => check(args),
    }
}

fn keygen(args: KeygenArgs) -> anyhow::Result<()> {
    let keys = key::generate_batch(&mut OsRng, args.count, &HashSet::new());
    for minted in keys {
        println!("{minted}");
    }
    Ok(())
}

fn normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    println!("{}", StoreIdentity::normalize(&args.identity));
    Ok(())
}

fn check(args: CheckArgs) -> anyhow::Result<()> {
    let status = match args.status.as_str() {
        "new" => LicenseStatus::New,
        "active" => LicenseStatus::Active,
        "inactive" => LicenseStatus::Inactive,
        "invalid" => LicenseStatus::Invalid,
        other => anyhow::bail!("unknown status {other:?} (expected new|active|inactive|invalid)"),
    };

    let today = Utc::now().date_naive();
    let mut record = LicenseRecord::issued(
        LicenseKey::parse("LIC-0000-0000-0000")?,
        "offline-check",
        Contact::new("", ""),
        "1/1",
        today,
    );
    record.status = status;
    record.bound_identity = StoreIdentity::normalize(&args.bound_identity);

    let action = Action::from_request(args.action.as_deref());
    let result = record.apply(action, &args.store_identity, today);

    let report = match result {
        Ok(verdict) => serde_json::json!({
            "verdict": verdict_name(verdict),
            "valid": verdict.is_valid(),
            "status": record.status.to_string(),
            "bound_identity": record.bound_identity.to_string(),
        }),
        Err(err) => serde_json::json!({
            "verdict": "error",
            "valid": false,
            "error": error_name(&err),
            "message": err.to_string(),
        }),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn verdict_name(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Accepted => "accepted",
        Verdict::Released => "released",
        Verdict::Rejected(_) => "rejected",
        Verdict::Conflict => "conflict",
    }
}

fn error_name(err: &TransitionError) -> &'static str {
    match err {
        TransitionError::MissingIdentity => "missing_identity",
        TransitionError::ReleaseForbidden => "release_forbidden",
    }
}
