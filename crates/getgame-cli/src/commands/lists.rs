//! List screen commands: mounting, paging, favorites, store links.

use std::io::{self, Write};

use getgame_api_models::GameSummary;
use getgame_client::{
    Access, AppContext, ClientResult, FavoriteError, FavoriteToggle, Favorites, LoadOutcome,
    OwnedGames, PageLoader, PageSource, PageState, Recommendations, Screen,
};

use crate::output;
use crate::shell::Shell;

const NO_LIST: &str = "No list is open. Try `games`, `recs` or `favorites`.\n";
const LOGIN_REQUIRED: &str = "Log in with Steam to see this page. Type `login` to start.\n";

/// Loader of the list screen currently shown.
#[derive(Clone)]
pub(crate) enum ActiveList {
    Games(PageLoader<OwnedGames>),
    Favorites(PageLoader<Favorites>),
    Recommendations(PageLoader<Recommendations>),
}

macro_rules! with_loader {
    ($list:expr, |$loader:ident| $body:expr) => {
        match $list {
            ActiveList::Games($loader) => $body,
            ActiveList::Favorites($loader) => $body,
            ActiveList::Recommendations($loader) => $body,
        }
    };
}

impl ActiveList {
    fn mount(app: &AppContext, screen: Screen) -> Option<Self> {
        match screen {
            Screen::Games => Some(Self::Games(app.owned_games())),
            Screen::Favorites => Some(Self::Favorites(app.favorites())),
            Screen::Recommendations => Some(Self::Recommendations(app.recommendations())),
            Screen::Home | Screen::Callback => None,
        }
    }

    const fn screen(&self) -> Screen {
        match self {
            Self::Games(_) => Screen::Games,
            Self::Favorites(_) => Screen::Favorites,
            Self::Recommendations(_) => Screen::Recommendations,
        }
    }

    const fn paginated(&self) -> bool {
        !matches!(self, Self::Recommendations(_))
    }

    fn state(&self) -> PageState<GameSummary> {
        with_loader!(self, |loader| loader.state())
    }

    async fn step(&self, step: PageStep) -> ClientResult<LoadOutcome> {
        with_loader!(self, |loader| step.apply(loader).await)
    }

    async fn toggle_favorite(&self, game: &GameSummary) -> Result<FavoriteToggle, FavoriteError> {
        with_loader!(self, |loader| loader.toggle_favorite(game).await)
    }
}

/// Page movement requested by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PageStep {
    First,
    Next,
    Previous,
    To(u32),
    Refresh,
}

impl PageStep {
    async fn apply<S: PageSource>(self, loader: &PageLoader<S>) -> ClientResult<LoadOutcome> {
        match self {
            Self::First => loader.load(1).await,
            Self::Next => loader.next_page().await,
            Self::Previous => loader.previous_page().await,
            Self::To(page) => loader.change_page(page).await,
            Self::Refresh => loader.refresh().await,
        }
    }
}

impl<W: Write> Shell<W> {
    pub(crate) async fn open_list(&mut self, screen: Screen) -> io::Result<()> {
        match screen.access(&self.session.current()) {
            Access::Granted => {}
            Access::Checking => return self.write("checking session...\n"),
            Access::LoginRequired => {
                self.list = None;
                self.screen = Screen::Home;
                return self.write(LOGIN_REQUIRED);
            }
        }
        let Some(list) = ActiveList::mount(&self.app, screen) else {
            return Ok(());
        };
        self.screen = screen;
        self.list = Some(list.clone());
        self.run_step(&list, PageStep::First).await
    }

    pub(crate) async fn step(&mut self, step: PageStep) -> io::Result<()> {
        let Some(list) = self.list.clone() else {
            return self.write(NO_LIST);
        };
        self.run_step(&list, step).await
    }

    async fn run_step(&mut self, list: &ActiveList, step: PageStep) -> io::Result<()> {
        match list.step(step).await {
            Ok(LoadOutcome::Ignored) => {
                let state = list.state();
                return self.write(&format!(
                    "No such page. Pages run from 1 to {}.\n",
                    state.total_pages
                ));
            }
            Ok(LoadOutcome::Applied | LoadOutcome::Superseded) => {}
            Err(err) => {
                tracing::debug!(screen = list.screen().path(), ?step, error = %err, "list step failed");
            }
        }
        self.render_list(list)
    }

    pub(crate) async fn toggle_favorite(&mut self, appid: u64) -> io::Result<()> {
        let Some(list) = self.list.clone() else {
            return self.write(NO_LIST);
        };
        let Some(game) = find_game(&list.state(), appid) else {
            return self.write(&format!("No game with appid {appid} on this page.\n"));
        };
        match list.toggle_favorite(&game).await {
            Ok(FavoriteToggle::Added) => {
                self.write(&format!("Added {} to favorites.\n", game.name))?;
            }
            Ok(FavoriteToggle::Removed) => {
                self.write(&format!("Removed {} from favorites.\n", game.name))?;
            }
            Err(err) => self.write(&output::render_alert(&err.to_string()))?,
        }
        self.render_list(&list)
    }

    pub(crate) fn open_store(&mut self, appid: u64) -> io::Result<()> {
        let Some(list) = self.list.clone() else {
            return self.write(NO_LIST);
        };
        match find_game(&list.state(), appid) {
            Some(game) => self.write(&format!("{}: {}\n", game.name, game.store_url())),
            None => self.write(&format!("No game with appid {appid} on this page.\n")),
        }
    }

    fn render_list(&mut self, list: &ActiveList) -> io::Result<()> {
        let text = output::render_list(list.screen(), &list.state(), list.paginated());
        self.write(&text)
    }
}

fn find_game(state: &PageState<GameSummary>, appid: u64) -> Option<GameSummary> {
    state.items.iter().find(|game| game.appid == appid).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_game_matches_appid_on_page() {
        let state = PageState {
            items: vec![GameSummary {
                id: None,
                appid: 730,
                name: "Counter-Strike 2".into(),
                short_description: String::new(),
                header_image: String::new(),
            }],
            loaded: true,
            ..PageState::default()
        };
        assert_eq!(
            find_game(&state, 730).map(|game| game.name),
            Some("Counter-Strike 2".to_string())
        );
        assert!(find_game(&state, 570).is_none());
    }
}
