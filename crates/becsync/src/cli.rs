//! Clap derive structures for the `becsync` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// becsync -- one-way sync of BECS network inventory into NetBox
#[derive(Debug, Parser)]
#[command(
    name = "becsync",
    version,
    about = "Keep a NetBox inventory convergent with a BECS element tree",
    long_about = "Reads the element tree from a BECS provisioning system and drives a\n\
        NetBox inventory toward it: devices, interfaces and primary addresses.\n\
        BECS is authoritative; NetBox is never written back to BECS.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the config file
    #[arg(long, short = 'c', env = "BECSYNC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile NetBox with the BECS element tree
    Sync(SyncArgs),

    /// List the devices BECS says should exist
    #[command(alias = "els")]
    Elements(ElementsArgs),

    /// Dump one BECS object as JSON
    Object(ObjectArgs),
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Re-fetch the BECS object tree instead of using the snapshot
    #[arg(long)]
    pub refresh_source: bool,

    /// Re-fetch the NetBox device mirror instead of using the snapshot
    #[arg(long)]
    pub refresh_target: bool,

    /// Restrict the run to one device (short name or FQDN)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ElementsArgs {
    /// Re-fetch the BECS object tree instead of using the snapshot
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Debug, Args)]
pub struct ObjectArgs {
    /// BECS object id
    pub oid: i64,
}
