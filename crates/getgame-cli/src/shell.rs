//! Interactive shell standing in for the web screens.
//!
//! # Design
//! - One shell owns one [`AppContext`], so one cookie jar lives for the whole
//!   session; the session probe runs once on [`Shell::start`].
//! - Opening a list screen mounts a fresh loader and loads page 1. Leaving the
//!   screen drops the loader; no list state survives navigation.
//! - A successful logout reloads the home screen: loaders are dropped and the
//!   session is probed again from `Unknown`.

use std::io::{self, Write};
use std::str::FromStr;

use getgame_client::{AppContext, Navigation, Screen, SessionHandle};
use getgame_telemetry::command_span;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::Instrument;

use crate::commands::lists::{ActiveList, PageStep};
use crate::output;

/// One parsed shell command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    /// Show the home screen.
    Home,
    /// Start the Steam sign-in flow.
    Login,
    /// Finish sign-in with the address or query Steam redirected to.
    Callback(String),
    /// Sign out.
    Logout,
    /// Open the owned-games screen.
    Games,
    /// Open the recommendations screen.
    Recommendations,
    /// Open the favorites screen.
    Favorites,
    /// Move to the next page.
    Next,
    /// Move to the previous page.
    Previous,
    /// Jump to a page.
    Page(u32),
    /// Toggle the favorite mark of a listed game.
    Favorite(u64),
    /// Reload the current list.
    Refresh,
    /// Print the store address of a listed game.
    Open(u64),
    /// Print the signed-in user.
    WhoAmI,
    /// Print the command list.
    Help,
    /// Leave the shell.
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a usage message for unknown commands or bad arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(None);
        };
        let argument = words.next();
        let command = match word.to_ascii_lowercase().as_str() {
            "home" => Self::Home,
            "login" => Self::Login,
            "callback" => Self::Callback(required(argument, "callback <address>")?.to_string()),
            "logout" => Self::Logout,
            "games" => Self::Games,
            "recs" | "recommendations" => Self::Recommendations,
            "favorites" | "favs" => Self::Favorites,
            "next" => Self::Next,
            "prev" | "previous" => Self::Previous,
            "page" => Self::Page(number(argument, "page <n>")?),
            "fav" => Self::Favorite(number(argument, "fav <appid>")?),
            "refresh" => Self::Refresh,
            "open" => Self::Open(number(argument, "open <appid>")?),
            "whoami" => Self::WhoAmI,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{other}'; type `help` for a list")),
        };
        Ok(Some(command))
    }

    /// Name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::Callback(_) => "callback",
            Self::Logout => "logout",
            Self::Games => "games",
            Self::Recommendations => "recs",
            Self::Favorites => "favorites",
            Self::Next => "next",
            Self::Previous => "prev",
            Self::Page(_) => "page",
            Self::Favorite(_) => "fav",
            Self::Refresh => "refresh",
            Self::Open(_) => "open",
            Self::WhoAmI => "whoami",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

fn required<'a>(argument: Option<&'a str>, usage: &str) -> Result<&'a str, String> {
    argument.ok_or_else(|| format!("usage: {usage}"))
}

fn number<T: FromStr>(argument: Option<&str>, usage: &str) -> Result<T, String> {
    required(argument, usage)?
        .parse()
        .map_err(|_| format!("usage: {usage}"))
}

/// Whether the shell should keep reading input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellFlow {
    /// Read the next command.
    Continue,
    /// Stop.
    Exit,
}

/// Interactive shell writing to `W`.
pub struct Shell<W: Write> {
    pub(crate) app: AppContext,
    pub(crate) session: SessionHandle,
    pub(crate) out: W,
    pub(crate) screen: Screen,
    pub(crate) list: Option<ActiveList>,
}

impl<W: Write> Shell<W> {
    /// Create a shell on the home screen. Nothing is sent until [`Self::start`].
    #[must_use]
    pub fn new(app: AppContext, out: W) -> Self {
        let session = app.session_handle();
        Self {
            app,
            session,
            out,
            screen: Screen::Home,
            list: None,
        }
    }

    /// Screen currently shown.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Consume the shell and return its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Probe the session and show the home screen.
    ///
    /// # Errors
    ///
    /// Returns an error when writing to the output fails.
    pub async fn start(&mut self) -> io::Result<()> {
        self.app.session().check_auth().await;
        self.show_home()?;
        self.write("type `help` for commands\n")
    }

    /// Read commands from `input` until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error when reading input or writing output fails.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> io::Result<()> {
        let mut lines = input.lines();
        loop {
            write!(self.out, "getgame:{}> ", self.screen.path())?;
            self.out.flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            if self.run_line(&line).await? == ShellFlow::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Parse and execute one input line, printing usage errors.
    ///
    /// # Errors
    ///
    /// Returns an error when writing to the output fails.
    pub async fn run_line(&mut self, line: &str) -> io::Result<ShellFlow> {
        match ShellCommand::parse(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => Ok(ShellFlow::Continue),
            Err(usage) => {
                self.write(&format!("{usage}\n"))?;
                Ok(ShellFlow::Continue)
            }
        }
    }

    /// Execute one command.
    ///
    /// # Errors
    ///
    /// Returns an error when writing to the output fails. Backend failures are
    /// rendered, never returned.
    pub async fn execute(&mut self, command: ShellCommand) -> io::Result<ShellFlow> {
        let span = command_span(command.name());
        self.dispatch(command).instrument(span).await
    }

    async fn dispatch(&mut self, command: ShellCommand) -> io::Result<ShellFlow> {
        match command {
            ShellCommand::Home => self.navigate(Navigation::Home).await?,
            ShellCommand::Login => self.login().await?,
            ShellCommand::Callback(callback) => self.callback(&callback).await?,
            ShellCommand::Logout => self.logout().await?,
            ShellCommand::Games => self.navigate(Navigation::Screen(Screen::Games)).await?,
            ShellCommand::Recommendations => {
                self.navigate(Navigation::Screen(Screen::Recommendations))
                    .await?;
            }
            ShellCommand::Favorites => {
                self.navigate(Navigation::Screen(Screen::Favorites)).await?;
            }
            ShellCommand::Next => self.step(PageStep::Next).await?,
            ShellCommand::Previous => self.step(PageStep::Previous).await?,
            ShellCommand::Page(page) => self.step(PageStep::To(page)).await?,
            ShellCommand::Refresh => self.step(PageStep::Refresh).await?,
            ShellCommand::Favorite(appid) => self.toggle_favorite(appid).await?,
            ShellCommand::Open(appid) => self.open_store(appid)?,
            ShellCommand::WhoAmI => self.whoami()?,
            ShellCommand::Help => self.write(output::help_text())?,
            ShellCommand::Quit => return Ok(ShellFlow::Exit),
        }
        Ok(ShellFlow::Continue)
    }

    /// Follow a navigation target produced by a session or list operation.
    pub(crate) async fn navigate(&mut self, navigation: Navigation) -> io::Result<()> {
        match navigation {
            Navigation::External(url) => self.write(&output::render_login_redirect(&url)),
            Navigation::Home | Navigation::Screen(Screen::Home | Screen::Callback) => {
                self.list = None;
                self.screen = Screen::Home;
                self.show_home()
            }
            Navigation::ReloadHome => self.reload_home().await,
            Navigation::Screen(screen) => self.open_list(screen).await,
        }
    }

    pub(crate) fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }
}
