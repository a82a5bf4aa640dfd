//! Span helpers for the application and individual commands.
//!
//! # Design
//! - The application span carries the mode and build SHA for the whole run.
//! - Each command runs inside its own span tagged with the trace id that is
//!   also sent to the backend as `x-request-id`.
//! - Spans are attached with `tracing::Instrument`, never held across awaits.

use tracing::Span;

use crate::init::build_sha;

/// Top-level span for one process run.
#[must_use]
pub fn app_span(mode: &str, trace_id: &str) -> Span {
    tracing::info_span!("app", mode = %mode, trace_id = %trace_id, build_sha = %build_sha())
}

/// Span wrapping one user command.
#[must_use]
pub fn command_span(command: &str) -> Span {
    tracing::info_span!("command", command = %command)
}
