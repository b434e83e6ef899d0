//! CLI command definitions for the `syslink` binary.
//!
//! Uses clap derive macros for argument parsing. Every command acts on
//! behalf of the account given with `--as` (or `SYSLINK_ACCOUNT`).

pub mod link;
pub mod session;
pub mod system;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use syslink_types::outcome::Tone;

/// Link external accounts to your system.
#[derive(Parser)]
#[command(name = "syslink", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Account the command is issued from (id or <@mention>).
    #[arg(long = "as", global = true, env = "SYSLINK_ACCOUNT", value_name = "ACCOUNT")]
    pub caller: Option<String>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output(&self) -> Output {
        Output {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

/// How command handlers render their results.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    /// Errors are always shown; everything else is dropped under `--quiet`.
    pub fn shows(&self, tone: Tone) -> bool {
        tone == Tone::Error || !self.quiet
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Link another account to your system (the account must confirm).
    Link {
        /// Account to link (id or <@mention>).
        account: Option<String>,
    },

    /// Unlink an account from your system (defaults to your own).
    Unlink {
        /// Account to unlink (id or <@mention>).
        account: Option<String>,
    },

    /// List the accounts linked to your system.
    Accounts,

    /// System management.
    System {
        #[command(subcommand)]
        action: SystemCommand,
    },

    /// List all registered systems.
    Systems,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SystemCommand {
    /// Register a new system owned by the calling account.
    New,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unlink_account_is_optional() {
        let cli = Cli::try_parse_from(["syslink", "--as", "1", "unlink"]).unwrap();
        assert!(matches!(cli.command, Commands::Unlink { account: None }));
        assert_eq!(cli.caller.as_deref(), Some("1"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["syslink", "link", "<@2>", "--as", "1", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Link { account } => assert_eq!(account.as_deref(), Some("<@2>")),
            _ => panic!("expected link"),
        }
    }

    #[test]
    fn test_quiet_hides_everything_but_errors() {
        let cli = Cli::try_parse_from(["syslink", "--quiet", "--json", "accounts"]).unwrap();
        let out = cli.output();
        assert!(out.json);
        assert!(!out.shows(Tone::Success));
        assert!(!out.shows(Tone::Neutral));
        assert!(out.shows(Tone::Error));
    }

    #[test]
    fn test_default_output_shows_everything() {
        let out = Output::default();
        assert!(out.shows(Tone::Success));
        assert!(out.shows(Tone::Neutral));
    }
}
