//! Output renderers and formatting helpers for the shell.
//!
//! Renderers return strings; the shell decides where they are written.

use std::fmt::Write as _;

use getgame_api_models::GameSummary;
use getgame_client::{HomeView, PageState, Screen};

const APP_NAME: &str = "get ur game!!!";
const TAGLINE: &str = "discover your next favorite game on Steam.";

pub(crate) fn render_home(view: &HomeView) -> String {
    let mut text = format!("{APP_NAME}\n{TAGLINE}\n");
    match view {
        HomeView::Checking => text.push_str("checking session...\n"),
        HomeView::LoginPrompt => text.push_str("[login] Login with Steam\n"),
        HomeView::Welcome { .. } => {
            if let Some(greeting) = view.greeting() {
                let _ = writeln!(text, "{greeting}");
            }
            for screen in view.actions() {
                let _ = writeln!(text, "[{}] {}", screen_command(*screen), screen_label(*screen));
            }
            text.push_str("[logout] Logout\n");
        }
    }
    text
}

pub(crate) fn render_list(screen: Screen, state: &PageState<GameSummary>, paginated: bool) -> String {
    let mut text = format!("== {} ==\n", screen.title());
    if let Some(error) = &state.error {
        let _ = writeln!(text, "error: {error}");
    }
    if state.loading {
        text.push_str("loading...\n");
        return text;
    }
    if state.loaded && state.items.is_empty() && state.error.is_none() {
        text.push_str("nothing here yet.\n");
    }
    for game in &state.items {
        text.push_str(&render_game(game, state.is_favorited(game.appid)));
    }
    if paginated && state.loaded {
        text.push_str(&render_pagination(state));
    }
    text
}

pub(crate) fn render_game(game: &GameSummary, favorited: bool) -> String {
    let mark = if favorited { '*' } else { ' ' };
    let mut text = format!("{mark} {:>8}  {}\n", game.appid, game.name);
    if !game.short_description.is_empty() {
        let _ = writeln!(text, "            {}", game.short_description);
    }
    text
}

pub(crate) fn render_pagination(state: &PageState<GameSummary>) -> String {
    let mut line = String::from(if state.has_previous() { "[prev] " } else { "       " });
    let _ = write!(line, "Page {} of {}", state.page, state.total_pages);
    if state.has_next() {
        line.push_str(" [next]");
    }
    line.push('\n');
    line
}

pub(crate) fn render_alert(message: &str) -> String {
    format!("!! {message}\n")
}

pub(crate) fn render_login_redirect(url: &str) -> String {
    format!(
        "Open this address to sign in with Steam:\n{url}\nWhen Steam sends you back, run `callback <address>` with the address you land on.\n"
    )
}

pub(crate) fn render_whoami(username: Option<&str>, authenticated: bool) -> String {
    match (authenticated, username) {
        (true, Some(name)) => format!("signed in as {name}\n"),
        (true, None) => "signed in\n".to_string(),
        (false, _) => "not signed in\n".to_string(),
    }
}

pub(crate) const fn help_text() -> &'static str {
    "commands:
  home                 show the home screen
  login                start signing in with Steam
  callback <address>   finish signing in with the address Steam returned to
  logout               sign out
  games                your games
  recs                 recommended games
  favorites            your favorites
  next | prev          move between pages
  page <n>             jump to page n
  fav <appid>          add or remove a favorite on the current page
  refresh              reload the current list
  open <appid>         show the Steam store address of a listed game
  whoami               show who is signed in
  help                 show this list
  quit                 leave the shell
"
}

pub(crate) const fn screen_command(screen: Screen) -> &'static str {
    match screen {
        Screen::Home => "home",
        Screen::Games => "games",
        Screen::Recommendations => "recs",
        Screen::Favorites => "favorites",
        Screen::Callback => "callback",
    }
}

const fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Home => "Home",
        Screen::Games => "Look Through Your Games",
        Screen::Recommendations => "Get Recommendations",
        Screen::Favorites => "Favorites",
        Screen::Callback => "Finish Login",
    }
}
