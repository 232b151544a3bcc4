//! # Check Subcommand
//!
//! `fieldguard check <config> --path /users/42 --query q=rust --body user.json`
//! builds the request described on the command line, validates it against
//! the configuration, and prints the outcome. Exit status is 1 when the
//! request would be rejected.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use fieldguard_core::{Outcome, RequestData, ValidationConfig};
use serde_json::{Map, Value};

/// Arguments for the `fieldguard check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Route configuration file.
    pub config: PathBuf,

    /// Request path, without query string.
    #[arg(long)]
    pub path: String,

    /// Query parameter as `key=value`. Repeatable.
    #[arg(long = "query", value_parser = parse_pair)]
    pub query: Vec<(String, String)>,

    /// JSON body file, or `-` to read standard input.
    #[arg(long)]
    pub body: Option<String>,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let body = match args.body.as_deref() {
        None => Value::Null,
        Some("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read body from stdin")?;
            parse_body(&text)?
        }
        Some(file) => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("failed to read body file {file}"))?;
            parse_body(&text)?
        }
    };

    let (code, report) = check(args, body)?;
    println!("{report}");
    Ok(code)
}

fn parse_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(text).context("body must be valid JSON")
}

/// Validate the request described by `args` with `body`, returning the exit
/// code and the report text.
pub fn check(args: &CheckArgs, body: Value) -> Result<(u8, String)> {
    if !args.path.starts_with('/') {
        bail!("--path must start with '/'");
    }

    let validator = ValidationConfig::load(&args.config)
        .and_then(|config| config.build())
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    let query: Map<String, Value> = args
        .query
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();
    let request = RequestData::new(args.path.as_str())
        .with_query(query)
        .with_body(body);

    Ok(match validator.validate(&request) {
        Outcome::Unmatched => (0, format!("SKIP: no route matches {}", args.path)),
        Outcome::Valid { route, data } => (
            0,
            format!(
                "OK: {} matched {}\n{}",
                args.path,
                route.as_deref().unwrap_or("*"),
                serde_json::to_string_pretty(&data)?
            ),
        ),
        Outcome::Invalid { errors, .. } => (
            1,
            serde_json::to_string_pretty(&serde_json::json!({ "errors": errors }))?,
        ),
    })
}
