//! Session state machine.
//!
//! # Design
//! - The server-side cookie is the source of truth; this module only holds the
//!   client's belief about it, in memory.
//! - [`SessionManager`] owns the only writer. Screens get a read-only
//!   [`SessionHandle`].
//! - Logout is two-phase: local state is cleared only after the server
//!   confirms it.
//!
//! Transitions: `Unknown -> {Authenticated, Anonymous}` on `check_auth`,
//! `Anonymous -> Pending -> {Authenticated, Anonymous}` on `handle_callback`,
//! `Authenticated -> Anonymous` on a successful `logout`.

use getgame_api_models::{AuthCheckResponse, CallbackResponse, LoginRedirect, paths};
use tokio::sync::watch;
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;
use crate::screens::Navigation;

/// Client-held belief about the current session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing is known yet; the session probe has not answered.
    #[default]
    Unknown,
    /// The server reported no signed-in user, or could not be asked.
    Anonymous,
    /// A provider callback is being validated.
    Pending,
    /// The server reported a signed-in user.
    Authenticated {
        /// Display name, when the server supplied one.
        username: Option<String>,
    },
}

impl SessionState {
    /// Whether the session is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Display name of the signed-in user.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Authenticated { username } => username.as_deref(),
            _ => None,
        }
    }

    /// Whether the state is still being resolved.
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        matches!(self, Self::Unknown | Self::Pending)
    }
}

impl From<AuthCheckResponse> for SessionState {
    fn from(response: AuthCheckResponse) -> Self {
        if response.is_authenticated {
            Self::Authenticated {
                username: response.username,
            }
        } else {
            Self::Anonymous
        }
    }
}

/// Read-only view of the session shared with every screen.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    receiver: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// Snapshot of the current session state.
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.receiver.borrow().clone()
    }

    /// Whether the session is signed in right now.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.receiver.borrow().is_authenticated()
    }

    /// Wait for the next state change and return the new state.
    ///
    /// Returns `None` once the owning [`SessionManager`] has been dropped.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

/// Sole writer of the session state.
#[derive(Debug)]
pub struct SessionManager {
    client: ApiClient,
    state: watch::Sender<SessionState>,
}

impl SessionManager {
    /// Create a manager whose state starts at [`SessionState::Unknown`].
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: watch::Sender::new(SessionState::Unknown),
        }
    }

    /// Read-only handle for screens.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            receiver: self.state.subscribe(),
        }
    }

    /// Snapshot of the current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Ask the server whether the session cookie is signed in.
    ///
    /// Any failure is logged and treated as anonymous. The call is not retried.
    pub async fn check_auth(&self) -> SessionState {
        let next = match self
            .client
            .get_json::<AuthCheckResponse>(paths::CHECK_AUTH, &[])
            .await
        {
            Ok(response) => SessionState::from(response),
            Err(err) => {
                tracing::warn!(error = %err, kind = ?err.kind(), "auth check failed; treating session as anonymous");
                SessionState::Anonymous
            }
        };
        tracing::info!(authenticated = next.is_authenticated(), username = next.username(), "session checked");
        self.state.send_replace(next.clone());
        next
    }

    /// Start the provider sign-in flow.
    ///
    /// Returns the external navigation target exactly as the backend supplied
    /// it. Session state is not touched.
    ///
    /// # Errors
    ///
    /// Returns an error when the login endpoint fails or omits the redirect.
    pub async fn login(&self) -> ClientResult<Navigation> {
        let (key, value) = paths::LOGIN_SOURCE;
        let redirect: LoginRedirect = self
            .client
            .get_json(paths::STEAM_LOGIN, &[(key, value.to_string())])
            .await
            .inspect_err(|err| tracing::error!(error = %err, "login request failed"))?;

        if redirect.redirect_url.trim().is_empty() {
            tracing::error!("login response carried an empty redirect");
            return Err(ClientError::Malformed {
                endpoint: paths::STEAM_LOGIN.to_string(),
                reason: "empty redirect_url",
            });
        }
        tracing::info!(target_url = %redirect.redirect_url, "redirecting to identity provider");
        Ok(Navigation::External(redirect.redirect_url))
    }

    /// Forward the provider's callback parameters to the backend.
    ///
    /// `callback` is either the raw query string (with or without the leading
    /// `?`) or the full callback URL. On success the session becomes
    /// authenticated and the caller should go home. On failure the session
    /// falls back to anonymous and the caller should also go home, showing a
    /// generic message.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or payload error that rejected the
    /// callback.
    pub async fn handle_callback(&self, callback: &str) -> ClientResult<Navigation> {
        self.state.send_replace(SessionState::Pending);
        let query = callback_query(callback);

        let outcome = self
            .client
            .get_json_raw_query::<CallbackResponse>(paths::STEAM_CALLBACK, query)
            .await
            .and_then(|response| {
                response
                    .identity()
                    .map(|(steam_id, username)| (steam_id.to_string(), username.to_string()))
                    .ok_or_else(|| ClientError::Malformed {
                        endpoint: paths::STEAM_CALLBACK.to_string(),
                        reason: "missing steam_id or username",
                    })
            });

        match outcome {
            Ok((steam_id, username)) => {
                tracing::info!(%steam_id, %username, "login successful");
                self.state.send_replace(SessionState::Authenticated {
                    username: Some(username),
                });
                Ok(Navigation::Home)
            }
            Err(err) => {
                tracing::error!(error = %err, kind = ?err.kind(), "login callback rejected");
                self.state.send_replace(SessionState::Anonymous);
                Err(err)
            }
        }
    }

    /// End the session on the server, then locally.
    ///
    /// Local state is cleared only after the server answers with a 2xx; the
    /// caller should then reload the home screen.
    ///
    /// # Errors
    ///
    /// Returns the failure unchanged; the session stays as it was.
    pub async fn logout(&self) -> ClientResult<Navigation> {
        match self.client.get_ok(paths::STEAM_LOGOUT).await {
            Ok(()) => {
                tracing::info!("logout successful");
                self.state.send_replace(SessionState::Anonymous);
                Ok(Navigation::ReloadHome)
            }
            Err(err) => {
                tracing::error!(error = %err, kind = ?err.kind(), "logout failed; session left unchanged");
                Err(err)
            }
        }
    }

    /// Model a full reload: forget everything and probe the server again.
    pub async fn restart(&self) -> SessionState {
        self.state.send_replace(SessionState::Unknown);
        self.check_auth().await
    }
}

/// Extract the query string from a callback URL or bare query.
fn callback_query(callback: &str) -> &str {
    let trimmed = callback.trim();
    if let Some(start) = trimmed.find('?') {
        let query = &trimmed[start + 1..];
        return query.split('#').next().unwrap_or(query);
    }
    if Url::parse(trimmed).is_ok() {
        // A full URL without a query carries no provider parameters.
        return "";
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_query_accepts_urls_and_bare_queries() {
        assert_eq!(
            callback_query("http://localhost:5173/steam/callback?openid.mode=id_res&openid.identity=x#top"),
            "openid.mode=id_res&openid.identity=x"
        );
        assert_eq!(callback_query("?openid.mode=id_res"), "openid.mode=id_res");
        assert_eq!(callback_query("openid.mode=id_res"), "openid.mode=id_res");
        assert_eq!(callback_query("http://localhost:5173/steam/callback"), "");
    }

    #[test]
    fn auth_check_maps_to_session_state() {
        let signed_in = SessionState::from(AuthCheckResponse {
            is_authenticated: true,
            username: Some("alice".into()),
        });
        assert!(signed_in.is_authenticated());
        assert_eq!(signed_in.username(), Some("alice"));

        let anonymous = SessionState::from(AuthCheckResponse {
            is_authenticated: false,
            username: Some("ignored".into()),
        });
        assert_eq!(anonymous, SessionState::Anonymous);
        assert!(anonymous.username().is_none());
    }

    #[test]
    fn settling_states_are_unknown_and_pending() {
        assert!(SessionState::Unknown.is_settling());
        assert!(SessionState::Pending.is_settling());
        assert!(!SessionState::Anonymous.is_settling());
        assert!(!SessionState::Authenticated { username: None }.is_settling());
    }
}
