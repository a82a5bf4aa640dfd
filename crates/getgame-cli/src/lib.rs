#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Terminal client for the getgame Steam recommender.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `shell.rs`: interactive shell standing in for the web screens
//! - `commands/`: shell and one-shot command handlers grouped by concern
//! - `client.rs`: error type, exit codes, and client construction
//! - `output.rs`: renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;
pub mod shell;

pub use cli::run;
pub use shell::{Shell, ShellCommand, ShellFlow};
