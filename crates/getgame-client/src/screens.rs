//! Screen routes, access gating, and navigation targets.

use crate::session::SessionState;

/// Screens of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Landing page with the login affordance or the welcome message.
    Home,
    /// The signed-in user's owned games.
    Games,
    /// Recommendations computed from the user's library.
    Recommendations,
    /// The user's favorites.
    Favorites,
    /// Landing point for the identity provider's redirect.
    Callback,
}

/// Whether a screen may render its content for the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Content may be shown.
    Granted,
    /// The session is still being resolved; show a placeholder.
    Checking,
    /// Show the login affordance instead of the content.
    LoginRequired,
}

impl Screen {
    /// Every screen, in navigation order.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Games,
        Self::Recommendations,
        Self::Favorites,
        Self::Callback,
    ];

    /// Route path of the screen.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Games => "/games",
            Self::Recommendations => "/get-recs",
            Self::Favorites => "/favorites",
            Self::Callback => "/steam/callback",
        }
    }

    /// Resolve a route path, ignoring any query string or trailing slash.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let trimmed = path.trim_end_matches('/');
        let normalised = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL
            .into_iter()
            .find(|screen| screen.path() == normalised)
    }

    /// Title shown above the screen content.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "get ur game!!!",
            Self::Games => "Your Games",
            Self::Recommendations => "Recommended Games",
            Self::Favorites => "Your Favorites",
            Self::Callback => "Processing Steam login...",
        }
    }

    /// Whether the screen shows per-user content.
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        matches!(self, Self::Games | Self::Recommendations | Self::Favorites)
    }

    /// Gate the screen on the session state.
    #[must_use]
    pub const fn access(self, session: &SessionState) -> Access {
        if !self.requires_auth() || session.is_authenticated() {
            Access::Granted
        } else if session.is_settling() {
            Access::Checking
        } else {
            Access::LoginRequired
        }
    }
}

/// What the home screen shows for a given session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HomeView {
    /// The session probe has not answered yet.
    Checking,
    /// Anonymous visitor: offer the login button.
    LoginPrompt,
    /// Signed-in user: greet them and offer the per-user screens.
    Welcome {
        /// Display name, when known.
        username: Option<String>,
    },
}

impl HomeView {
    /// Derive the home view from the session.
    #[must_use]
    pub fn from_session(session: &SessionState) -> Self {
        match session {
            SessionState::Unknown | SessionState::Pending => Self::Checking,
            SessionState::Anonymous => Self::LoginPrompt,
            SessionState::Authenticated { username } => Self::Welcome {
                username: username.clone(),
            },
        }
    }

    /// Greeting line for signed-in users.
    #[must_use]
    pub fn greeting(&self) -> Option<String> {
        match self {
            Self::Welcome {
                username: Some(name),
            } => Some(format!("welcome, {name}!")),
            Self::Welcome { username: None } => Some("welcome!".to_string()),
            Self::Checking | Self::LoginPrompt => None,
        }
    }

    /// Screens reachable from the home view.
    #[must_use]
    pub fn actions(&self) -> &'static [Screen] {
        match self {
            Self::Welcome { .. } => &[Screen::Games, Screen::Recommendations, Screen::Favorites],
            Self::Checking | Self::LoginPrompt => &[],
        }
    }
}

/// Where the application should go after an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Leave the application for an external URL (full navigation).
    External(String),
    /// In-app navigation to the home screen.
    Home,
    /// Full reload of the home screen; all in-memory state restarts.
    ReloadHome,
    /// In-app navigation to a screen.
    Screen(Screen),
}
