//! Binary crate for the `smhi` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI flags
//! - Installing the log subscriber (stderr, so stdout only carries reports)
//! - Running the requested pipelines

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cmd.log_level())
        .init();

    cmd.run().await
}
