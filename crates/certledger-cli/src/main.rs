//! certledger - certificate registry CLI
//!
//! Drives a certificate registry persisted as a JSON state file. Each
//! mutating subcommand is one atomic transaction authored by the identity
//! given with `--caller`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use certledger_core::{ActorId, CertId, CertificateRegistry};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod state_file;

use state_file::StateFile;

/// certledger - certificate registry CLI
#[derive(Parser, Debug)]
#[command(name = "certledger")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the registry state file
    #[arg(short, long, default_value = "certledger.json")]
    state: PathBuf,

    /// Identity authoring this transaction
    #[arg(short, long, default_value = "admin")]
    caller: ActorId,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // === Registry setup ===
    /// Create a new registry administered by the caller
    Init,

    // === Lifecycle operations ===
    /// Issue a certificate for a physical item
    Issue {
        /// Issuer-supplied item identifier
        item_id: String,

        /// Initial owner identity
        owner: ActorId,

        /// Item metadata
        metadata: String,
    },

    /// Update a certificate's metadata (bumps its version)
    Update {
        /// Certificate id
        cert_id: CertId,

        /// Replacement metadata
        metadata: String,
    },

    /// Revoke a certificate (terminal)
    Revoke {
        /// Certificate id
        cert_id: CertId,
    },

    /// Transfer certificate ownership (caller must be the current owner)
    Transfer {
        /// Certificate id
        cert_id: CertId,

        /// New owner identity
        new_owner: ActorId,
    },

    /// Verify a certificate at an exact version
    Verify {
        /// Certificate id
        cert_id: CertId,

        /// Expected current version
        version: u64,
    },

    // === Administration ===
    /// Hand the administrator role to another identity
    TransferAdmin {
        /// New administrator identity
        new_admin: ActorId,
    },

    /// Engage the global mutation lock
    Pause,

    /// Release the global mutation lock
    Resume,

    // === Inspection ===
    /// Show a certificate
    Show {
        /// Certificate id
        cert_id: CertId,
    },

    /// List a certificate's version history
    History {
        /// Certificate id
        cert_id: CertId,
    },

    /// Show registry statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok();

    match cli.command {
        Commands::Init => init(&cli),
        _ => run(&cli),
    }
}

fn init(cli: &Cli) -> Result<()> {
    if cli.state.exists() {
        bail!("registry state already exists at {}", cli.state.display());
    }
    let registry = CertificateRegistry::new(cli.caller.clone())?;
    StateFile::new(registry).save(&cli.state)?;
    println!("initialized registry at {} (admin: {})", cli.state.display(), cli.caller);
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let mut state = StateFile::load(&cli.state)?;
    tracing::debug!(state = %cli.state.display(), clock = state.clock, "loaded registry state");
    let mut dirty = true;

    match &cli.command {
        Commands::Init => unreachable!("handled in main"),

        Commands::Issue { item_id, owner, metadata } => {
            let ctx = state.next_tx(cli.caller.clone());
            let cert_id = state
                .registry
                .issue(&ctx, item_id.clone(), owner.clone(), metadata.clone())?;
            println!("issued certificate {cert_id} (owner: {owner}, version: 1)");
        },

        Commands::Update { cert_id, metadata } => {
            let ctx = state.next_tx(cli.caller.clone());
            let version = state.registry.update_metadata(&ctx, *cert_id, metadata.clone())?;
            println!("certificate {cert_id} now at version {version}");
        },

        Commands::Revoke { cert_id } => {
            let ctx = state.next_tx(cli.caller.clone());
            state.registry.revoke(&ctx, *cert_id)?;
            println!("certificate {cert_id} revoked");
        },

        Commands::Transfer { cert_id, new_owner } => {
            let ctx = state.next_tx(cli.caller.clone());
            state.registry.transfer(&ctx, *cert_id, new_owner.clone())?;
            println!("certificate {cert_id} transferred to {new_owner}");
        },

        Commands::TransferAdmin { new_admin } => {
            let ctx = state.next_tx(cli.caller.clone());
            state.registry.transfer_admin(&ctx, new_admin.clone())?;
            println!("administrator is now {new_admin}");
        },

        Commands::Pause => {
            let ctx = state.next_tx(cli.caller.clone());
            state.registry.set_paused(&ctx, true)?;
            println!("registry paused");
        },

        Commands::Resume => {
            let ctx = state.next_tx(cli.caller.clone());
            state.registry.set_paused(&ctx, false)?;
            println!("registry resumed");
        },

        Commands::Verify { cert_id, version } => {
            dirty = false;
            state.registry.verify(*cert_id, *version)?;
            println!("certificate {cert_id} is valid at version {version}");
        },

        Commands::Show { cert_id } => {
            dirty = false;
            let cert = state
                .registry
                .certificate(*cert_id)
                .with_context(|| format!("no certificate with id {cert_id}"))?;
            println!("{}", serde_json::to_string_pretty(cert)?);
        },

        Commands::History { cert_id } => {
            dirty = false;
            let history: Vec<_> = state
                .registry
                .history(*cert_id)
                .map(|(version, snapshot)| {
                    serde_json::json!({
                        "version": version,
                        "metadata": snapshot.metadata,
                        "updated_at": snapshot.updated_at,
                        "updated_by": snapshot.updated_by,
                    })
                })
                .collect();
            if history.is_empty() {
                bail!("no certificate with id {cert_id}");
            }
            println!("{}", serde_json::to_string_pretty(&history)?);
        },

        Commands::Stats => {
            dirty = false;
            println!("{}", serde_json::to_string_pretty(&state.registry.stats())?);
        },
    }

    if dirty {
        state.save(&cli.state)?;
    }
    Ok(())
}
