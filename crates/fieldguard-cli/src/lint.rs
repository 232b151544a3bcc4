//! # Lint Subcommand
//!
//! `fieldguard lint <config>` loads a route configuration, compiles every
//! template and rule, and prints one line per route.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use fieldguard_core::ValidationConfig;

/// Arguments for the `fieldguard lint` subcommand.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Route configuration file (YAML, or JSON with a `.json` extension).
    pub config: PathBuf,
}

/// Execute the lint subcommand.
pub fn run_lint(args: &LintArgs) -> Result<u8> {
    print!("{}", summarize(&args.config)?);
    Ok(0)
}

/// Load and compile `path`, returning the printed summary.
pub fn summarize(path: &Path) -> Result<String> {
    let config = ValidationConfig::load(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    config
        .build()
        .with_context(|| format!("failed to compile {}", path.display()))?;

    tracing::debug!(routes = config.routes.len(), "configuration compiled");

    let mut out = String::new();
    let _ = writeln!(out, "OK: {}", path.display());
    let _ = writeln!(
        out,
        "  {} route(s), body limit {} bytes",
        config.routes.len(),
        config.effective_body_limit()
    );
    for route in &config.routes {
        let fields: Vec<String> = route
            .fields
            .iter()
            .map(|(name, spec)| {
                let rules: Vec<String> = spec.rules().iter().map(ToString::to_string).collect();
                format!("{name}: {}", rules.join(", "))
            })
            .collect();
        let _ = writeln!(out, "  {} [{}]", route.path, route.source);
        for field in fields {
            let _ = writeln!(out, "    {field}");
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_routes_and_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.yaml");
        std::fs::write(
            &path,
            "routes:\n  - path: /users/:id\n    source: params\n    fields:\n      id: [required, mongo_id]\n",
        )
        .unwrap();

        let summary = summarize(&path).unwrap();
        assert!(summary.starts_with("OK: "));
        assert!(summary.contains("1 route(s)"));
        assert!(summary.contains("/users/:id [params]"));
        assert!(summary.contains("id: required, mongo_id"));
    }

    #[test]
    fn compile_errors_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.yaml");
        std::fs::write(&path, "routes:\n  - path: /a\n  - path: /a/\n").unwrap();
        let err = summarize(&path).unwrap_err();
        assert!(format!("{err:#}").contains("declared more than once"));
    }
}
