use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use rotator_log::Format;

#[derive(Debug, Parser)]
#[command(
    name = "rotator",
    version,
    about = "Rotate IAM access keys and publish them to SSM Parameter Store"
)]
pub struct Cli {
    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Log filter directives, e.g. `info` or `debug,aws_smithy_runtime=warn`
    #[arg(long, global = true, env = "ROTATOR_LOG")]
    pub log_level: Option<String>,

    /// Log output format: pretty, compact or json
    #[arg(long, global = true, env = "ROTATOR_LOG_FORMAT")]
    pub log_format: Option<Format>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run rotations from a config file
    Rotate(RotateArgs),
    /// Check a config file without contacting any service
    Validate(ConfigArgs),
    /// Print shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Path to a .toml, .yaml or .yml config file
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,
}

#[derive(Debug, Args)]
pub struct RotateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Only rotate the named secret; repeatable. Defaults to all secrets.
    #[arg(short, long = "secret", value_name = "NAME")]
    pub secrets: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rotate_accepts_repeated_secrets() {
        let cli = Cli::try_parse_from([
            "rotator",
            "rotate",
            "--config",
            "rotator.toml",
            "--secret",
            "a",
            "-s",
            "b",
        ])
        .unwrap();

        let Command::Rotate(args) = cli.command else {
            panic!("expected rotate");
        };
        assert_eq!(args.secrets, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(args.config.config, PathBuf::from("rotator.toml"));
    }

    #[test]
    fn log_flags_are_global() {
        let cli = Cli::try_parse_from([
            "rotator",
            "validate",
            "-c",
            "x.yaml",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log.log_format, Some(Format::Json));
        assert_eq!(cli.log.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn bad_log_format_is_rejected() {
        let result =
            Cli::try_parse_from(["rotator", "--log-format", "xml", "validate", "-c", "x.toml"]);
        assert!(result.is_err());
    }
}
