use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// folio -- ingest digitized volumes from a pairtree into a page store.
#[derive(Parser)]
#[command(name = "folio", about = "Volume ingestion and reconciliation", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest every volume named in an id list
    Ingest(IngestArgs),
    /// Report how deliveries drift from stored volumes, without writing
    Compare(BatchArgs),
    /// Delete stored volumes
    Remove(BatchArgs),
    /// Show where a volume's archive and METS document are found
    Locate(LocateArgs),
    /// Parse a METS document and list its pages
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct IngestArgs {
    /// File with one volume id per line
    pub list: PathBuf,

    /// Volumes processed concurrently (overrides config)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Store root directory (overrides config)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Skip checksum verification
    #[arg(long)]
    pub no_checksums: bool,
}

#[derive(Args)]
pub struct BatchArgs {
    /// File with one volume id per line
    pub list: PathBuf,

    /// Store root directory (overrides config)
    #[arg(long)]
    pub store: Option<PathBuf>,
}

#[derive(Args)]
pub struct LocateArgs {
    /// Volume id, e.g. `mdp.39015012345678`
    pub volume: String,

    /// Extra pairtree root, searched before the configured ones
    #[arg(short, long)]
    pub root: Vec<PathBuf>,
}

#[derive(Args)]
pub struct InspectArgs {
    /// METS document to parse
    pub file: PathBuf,

    /// Volume id to attribute the document to
    #[arg(long, default_value = "local.inspect")]
    pub volume: String,
}
