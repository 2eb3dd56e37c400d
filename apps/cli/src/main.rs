//! bottleneck CLI: typeset whisky tasting sheets from an Obsidian vault.
//!
//! Reads a tasting note listing `- [[Whisky]]` links, validates every linked
//! whisky note and renders them into a LaTeX document (and optionally a PDF).

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
