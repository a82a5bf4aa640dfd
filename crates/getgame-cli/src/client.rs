//! Shared error type and client construction for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use getgame_client::{AppContext, ClientConfig, ClientError};
use url::Url;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::PageOutOfRange { .. } | ClientError::RequestId => {
                Self::Validation(err.to_string())
            }
            other => Self::Failure(other.into()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::failure(anyhow::Error::new(err).context("terminal I/O failed"))
    }
}

/// Build the application context for one process run.
///
/// Every request carries `trace_id` as its request identifier.
pub(crate) fn build_context(
    api_url: &Url,
    timeout_secs: Option<u64>,
    trace_id: &str,
) -> CliResult<AppContext> {
    let mut config = ClientConfig::new(api_url.clone()).with_request_id(trace_id);
    if let Some(secs) = timeout_secs {
        if secs == 0 {
            return Err(CliError::validation("--timeout must be at least 1 second"));
        }
        config = config.with_timeout(Duration::from_secs(secs));
    }
    tracing::debug!(api_url = %config.api_url(), timeout = ?config.timeout, "client configured");
    AppContext::new(&config).map_err(CliError::from)
}
