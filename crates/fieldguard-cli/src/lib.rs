//! # fieldguard-cli: Offline Configuration Tooling
//!
//! Checks route configurations without starting a server.
//!
//! ## Subcommands
//!
//! - `lint`: load and compile a configuration, print a route summary.
//! - `check`: run a sample request through a configuration and print the
//!   outcome. Exits with status 1 when the request is rejected.
//!
//! Handlers return the process exit code; argument parsing lives in
//! `main.rs`.

pub mod check;
pub mod lint;
