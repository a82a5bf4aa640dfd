//! Application context shared by every screen.
//!
//! # Design
//! - One context per running application; it owns the HTTP client (and with
//!   it the cookie jar) and the session manager.
//! - Screens receive a read-only [`SessionHandle`] and build their own
//!   loaders; no list state is shared between screens.

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::pagination::PageLoader;
use crate::resources::{Favorites, OwnedGames, Recommendations};
use crate::session::{SessionHandle, SessionManager};

/// Owned context for one running application.
#[derive(Debug)]
pub struct AppContext {
    client: ApiClient,
    session: SessionManager,
}

impl AppContext {
    /// Build the HTTP client and a session manager in the `Unknown` state.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::from_client(ApiClient::new(config)?))
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn from_client(client: ApiClient) -> Self {
        let session = SessionManager::new(client.clone());
        Self { client, session }
    }

    /// Shared HTTP client.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Session manager; the only writer of session state.
    #[must_use]
    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Read-only session view for a screen.
    #[must_use]
    pub fn session_handle(&self) -> SessionHandle {
        self.session.handle()
    }

    /// Fresh loader for the owned-games screen.
    #[must_use]
    pub fn owned_games(&self) -> PageLoader<OwnedGames> {
        PageLoader::new(self.client.clone(), OwnedGames)
    }

    /// Fresh loader for the favorites screen.
    #[must_use]
    pub fn favorites(&self) -> PageLoader<Favorites> {
        PageLoader::new(self.client.clone(), Favorites)
    }

    /// Fresh loader for the recommendations screen.
    #[must_use]
    pub fn recommendations(&self) -> PageLoader<Recommendations> {
        PageLoader::new(self.client.clone(), Recommendations)
    }
}
