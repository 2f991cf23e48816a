mod completions;
mod rotate;
mod validate;

use anyhow::Context;

use crate::cli::{Cli, Command, LogArgs};
use crate::config::RotatorConfig;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Rotate(args) => {
            let config = RotatorConfig::load(&args.config.config)?;
            init_logging(&cli.log, &config)?;
            rotate::run(&config, &args.secrets).await
        }
        Command::Validate(args) => {
            let config = RotatorConfig::load(&args.config)?;
            init_logging(&cli.log, &config)?;
            validate::run(&config);
            Ok(())
        }
        Command::Completions { shell } => {
            completions::run(shell);
            Ok(())
        }
    }
}

/// Flags win over the `[log]` table, which already carries env overrides
fn init_logging(args: &LogArgs, config: &RotatorConfig) -> anyhow::Result<()> {
    let mut log = config.log.clone();
    if let Some(level) = &args.log_level {
        log.level.clone_from(level);
    }
    if let Some(format) = args.log_format {
        log.format = format;
    }

    rotator_log::init_with(log).context("initializing logging")
}
