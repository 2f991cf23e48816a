//! `rotator` - rotate IAM access keys into SSM Parameter Store

mod cli;
mod commands;
mod config;

use clap::Parser;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run(cli).await
}
