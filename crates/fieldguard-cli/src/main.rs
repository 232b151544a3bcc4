//! # fieldguard CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fieldguard_cli::check::{run_check, CheckArgs};
use fieldguard_cli::lint::{run_lint, LintArgs};

/// fieldguard: request-field validation tooling.
///
/// Lints route configuration files and checks sample requests against them
/// without starting a server.
#[derive(Parser, Debug)]
#[command(name = "fieldguard", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load and compile a route configuration, then print a summary.
    Lint(LintArgs),

    /// Validate a sample request against a route configuration.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Lint(args) => run_lint(&args),
        Commands::Check(args) => run_check(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_lint() {
        let cli = Cli::try_parse_from(["fieldguard", "lint", "routes.yaml"]).unwrap();
        match cli.command {
            Commands::Lint(args) => assert_eq!(args.config.to_str(), Some("routes.yaml")),
            other => panic!("expected lint, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_check_with_repeated_query() {
        let cli = Cli::try_parse_from([
            "fieldguard",
            "-vv",
            "check",
            "routes.yaml",
            "--path",
            "/search",
            "--query",
            "q=rust",
            "--query",
            "page=2",
            "--body",
            "-",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.path, "/search");
                assert_eq!(args.query.len(), 2);
                assert_eq!(args.query[1], ("page".to_string(), "2".to_string()));
                assert_eq!(args.body.as_deref(), Some("-"));
            }
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_malformed_query_pair() {
        assert!(Cli::try_parse_from([
            "fieldguard", "check", "r.yaml", "--path", "/", "--query", "novalue"
        ])
        .is_err());
    }

    #[test]
    fn cli_requires_path_for_check() {
        assert!(Cli::try_parse_from(["fieldguard", "check", "r.yaml"]).is_err());
    }
}
