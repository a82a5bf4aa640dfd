#![forbid(unsafe_code)]
#![warn(
    unused,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Telemetry primitives shared across the getgame workspace.
//!
//! Layout:
//! - `init.rs`: subscriber installation and logging configuration
//! - `context.rs`: application and per-command spans
//! - `error.rs`: telemetry error type

pub mod context;
pub mod error;
pub mod init;

pub use context::{app_span, command_span};
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
