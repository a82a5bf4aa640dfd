//! Session commands: home, login, callback, logout, whoami, plus the one-shot
//! `check-auth` and `login-url` subcommands.

use std::io::{self, Write};

use anyhow::anyhow;
use getgame_client::{AppContext, ClientError, HomeView, Navigation, Screen};

use crate::client::{CliError, CliResult};
use crate::output;
use crate::shell::Shell;

const CALLBACK_FAILED: &str = "Login failed. Please try again.";

impl<W: Write> Shell<W> {
    pub(crate) fn show_home(&mut self) -> io::Result<()> {
        let view = HomeView::from_session(&self.session.current());
        self.write(&output::render_home(&view))
    }

    pub(crate) async fn login(&mut self) -> io::Result<()> {
        match self.app.session().login().await {
            Ok(navigation) => self.navigate(navigation).await,
            Err(err) => self.write(&output::render_alert(&format!(
                "Login failed: {}",
                describe(&err)
            ))),
        }
    }

    pub(crate) async fn callback(&mut self, callback: &str) -> io::Result<()> {
        self.list = None;
        self.screen = Screen::Callback;
        self.write("Processing Steam login...\n")?;
        let navigation = match self.app.session().handle_callback(callback).await {
            Ok(navigation) => navigation,
            Err(_) => {
                self.write(&output::render_alert(CALLBACK_FAILED))?;
                Navigation::Home
            }
        };
        self.navigate(navigation).await
    }

    pub(crate) async fn logout(&mut self) -> io::Result<()> {
        match self.app.session().logout().await {
            Ok(navigation) => {
                self.write("Logged out.\n")?;
                self.navigate(navigation).await
            }
            Err(err) => self.write(&output::render_alert(&format!(
                "Logout failed: {}",
                describe(&err)
            ))),
        }
    }

    pub(crate) async fn reload_home(&mut self) -> io::Result<()> {
        self.list = None;
        self.screen = Screen::Home;
        self.app.session().restart().await;
        self.show_home()
    }

    pub(crate) fn whoami(&mut self) -> io::Result<()> {
        let session = self.session.current();
        self.write(&output::render_whoami(
            session.username(),
            session.is_authenticated(),
        ))
    }
}

/// Print whether the stored session is signed in.
pub(crate) async fn handle_check_auth(app: &AppContext, out: &mut impl Write) -> CliResult<()> {
    let state = app.session().check_auth().await;
    out.write_all(output::render_whoami(state.username(), state.is_authenticated()).as_bytes())?;
    Ok(())
}

/// Print the provider address that starts sign-in.
pub(crate) async fn handle_login_url(app: &AppContext, out: &mut impl Write) -> CliResult<()> {
    match app.session().login().await? {
        Navigation::External(url) => {
            writeln!(out, "{url}")?;
            Ok(())
        }
        other => Err(CliError::failure(anyhow!(
            "login produced no external address ({other:?})"
        ))),
    }
}

/// Short, user-facing description of a failed call.
pub(crate) fn describe(err: &ClientError) -> String {
    err.server_message()
        .map_or_else(|| err.to_string(), str::to_string)
}
