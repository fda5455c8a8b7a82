use anyhow::Result;
use clap::Parser;

use wmts_cache::cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
