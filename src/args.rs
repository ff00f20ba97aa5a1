//! CLI argument surface.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "tsbindgen",
    about = "Generate structural type declarations from CLR assembly surface dumps",
    version
)]
pub struct CliArgs {
    /// Symbol-graph dumps (or directories to scan for them).
    pub paths: Vec<PathBuf>,

    /// Output directory for artifacts and diagnostics.
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Configuration file (tsbindgen.json).
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Print the diagnostic code table and exit.
    #[arg(long)]
    pub list_diagnostics: bool,

    /// Verbose logging (debug-level stage timing).
    #[arg(long, short)]
    pub verbose: bool,
}
