//! Argument parsing and command dispatch.

use std::io;

use clap::{Parser, Subcommand};
use getgame_client::config::{DEFAULT_API_URL, parse_api_url};
use getgame_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, app_span, init_logging};
use tokio::io::BufReader;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::client::{CliError, CliResult, build_context};
use crate::commands::session::{handle_check_auth, handle_login_url};
use crate::shell::Shell;

/// Parses CLI arguments, installs logging, and executes the requested
/// command. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = install_logging(&cli) {
        eprintln!("error: {}", err.display_message());
        return err.exit_code();
    }

    let trace_id = Uuid::new_v4().to_string();
    let command = cli.command.unwrap_or_default();
    let span = app_span(command.label(), &trace_id);
    let result = dispatch(&cli, command, &trace_id).instrument(span).await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            let message = err.display_message();
            tracing::debug!(%trace_id, error = %message, "command failed");
            eprintln!("error: {message}");
            err.exit_code()
        }
    }
}

async fn dispatch(cli: &Cli, command: Command, trace_id: &str) -> CliResult<()> {
    let app = build_context(&cli.api_url, cli.timeout, trace_id)?;
    match command {
        Command::Shell => {
            let mut shell = Shell::new(app, io::stdout());
            shell.start().await?;
            shell.run(BufReader::new(tokio::io::stdin())).await?;
            Ok(())
        }
        Command::CheckAuth => handle_check_auth(&app, &mut io::stdout()).await,
        Command::LoginUrl => handle_login_url(&app, &mut io::stdout()).await,
    }
}

fn install_logging(cli: &Cli) -> CliResult<()> {
    let config = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        ..LoggingConfig::default()
    };
    init_logging(&config).map_err(CliError::failure)
}

#[derive(Parser)]
#[command(name = "getgame", about = "Terminal client for the getgame Steam recommender")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "GETGAME_API_URL",
        value_parser = parse_api_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(
        long,
        global = true,
        env = "GETGAME_HTTP_TIMEOUT_SECS",
        help = "Request timeout in seconds; requests wait indefinitely when unset"
    )]
    timeout: Option<u64>,
    #[arg(long, global = true, env = "GETGAME_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "GETGAME_LOG_FORMAT",
        value_parser = parse_log_format,
        help = "Log format: json or pretty (defaults to pretty in debug builds)"
    )]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Command {
    /// Interactive shell (default).
    #[default]
    Shell,
    /// Print whether the session is signed in.
    CheckAuth,
    /// Print the Steam sign-in address.
    LoginUrl,
}

impl Command {
    const fn label(self) -> &'static str {
        match self {
            Self::Shell => "shell",
            Self::CheckAuth => "check-auth",
            Self::LoginUrl => "login-url",
        }
    }
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input.parse().map_err(|err| format!("{err}"))
}
