//! marklink - anchors and links inside source comments
//!
//! marklink provides:
//! - Marker scanning and a workspace-wide anchor index
//! - Link resolution (per document or project-wide)
//! - Decoration ranges and a terminal preview of decorated text
//! - Unified output format (jsonl/json/md/raw)

use anyhow::Result;
use clap::Parser;

use marklink::cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let default_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    cli::run(cli)
}
