//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// World trust-anchor generator.
#[derive(Parser, Debug, Clone)]
#[command(name = "worldgen")]
#[command(about = "Generate and verify signed World trust-anchor files")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a signed World with a single root.
    Generate(GenerateArgs),
    /// Decode a World file and check its signature.
    Verify(VerifyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Root identity, `<address>:0:<public key>`.
    #[arg(long, conflicts_with = "identity_file", required_unless_present = "identity_file")]
    pub identity: Option<String>,

    /// File containing the root identity text.
    #[arg(long)]
    pub identity_file: Option<PathBuf>,

    /// Root endpoint `<ip>/<port>`; repeatable.
    #[arg(long = "endpoint")]
    pub endpoints: Vec<String>,

    /// Free-text comment, reported but never written into the World.
    #[arg(long, default_value = "")]
    pub comment: String,

    /// Output path for the World file (raw bytes go to stdout otherwise).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Directory to write the signing key file pair into.
    #[arg(long)]
    pub key_dir: Option<PathBuf>,

    /// Produce a moon instead of a planet.
    #[arg(long)]
    pub moon: bool,

    /// Print a JSON summary instead of raw bytes.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// World file to check.
    pub path: PathBuf,

    /// Hex public key of the expected signer (defaults to the key the World
    /// names for its next revision).
    #[arg(long)]
    pub signer: Option<String>,

    /// Print a JSON report.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
