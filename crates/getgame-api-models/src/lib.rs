#![forbid(unsafe_code)]
#![warn(
    unused,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the getgame backend API.
//!
//! These types mirror the JSON the backend emits so the client crate and the
//! CLI decode the same shapes. Field names follow the backend verbatim; Rust
//! names are applied through serde renames.
use serde::{Deserialize, Serialize};

/// Number of items the backend places on one page of a paginated collection.
pub const PAGE_SIZE: u32 = 10;

/// Endpoint paths relative to the API base URL.
pub mod paths {
    /// Session probe returning [`super::AuthCheckResponse`].
    pub const CHECK_AUTH: &str = "user/misc/check-auth/";
    /// Login start returning [`super::LoginRedirect`].
    pub const STEAM_LOGIN: &str = "steam/login/";
    /// Provider callback returning [`super::CallbackResponse`].
    pub const STEAM_CALLBACK: &str = "steam/callback/";
    /// Server-side logout.
    pub const STEAM_LOGOUT: &str = "steam/logout/";
    /// CSRF token issuance returning [`super::CsrfTokenResponse`].
    pub const CSRF: &str = "csrf/";
    /// Paginated owned games.
    pub const USER_GAMES: &str = "user/games/";
    /// Recommendation request (POST).
    pub const RECOMMENDATIONS: &str = "get-recs/";
    /// Paginated favorites collection; POST here to add a favorite.
    pub const FAVORITES: &str = "user/favorites/";

    /// Path of a single favorite, used for removal.
    #[must_use]
    pub fn favorite(appid: u64) -> String {
        format!("{FAVORITES}{appid}/")
    }

    /// Query value sent with the login request so the provider returns to the client.
    pub const LOGIN_SOURCE: (&str, &str) = ("source", "frontend");
}

/// Number of pages needed to hold `count` items, i.e. `ceil(count / PAGE_SIZE)`.
#[must_use]
pub const fn pages_for_count(count: u64) -> u64 {
    count.div_ceil(PAGE_SIZE as u64)
}

/// Response of the session probe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthCheckResponse {
    /// Whether the session cookie maps to a signed-in user.
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
    /// Steam display name; `null` for anonymous sessions.
    #[serde(default)]
    pub username: Option<String>,
}

/// Provider URL the client must navigate to in order to sign in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRedirect {
    /// Absolute URL of the identity provider's login page.
    pub redirect_url: String,
}

/// Body returned by the backend after it validated the provider callback.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallbackResponse {
    /// Informational message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Numeric Steam identifier of the signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steam_id: Option<String>,
    /// Steam display name of the signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl CallbackResponse {
    /// Identity carried by a successful callback.
    ///
    /// Returns `None` unless both the Steam id and the display name are present
    /// and non-blank.
    #[must_use]
    pub fn identity(&self) -> Option<(&str, &str)> {
        let steam_id = self.steam_id.as_deref().map(str::trim)?;
        let username = self.username.as_deref().map(str::trim)?;
        if steam_id.is_empty() || username.is_empty() {
            return None;
        }
        Some((steam_id, username))
    }
}

/// Anti-forgery token issued for the current session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsrfTokenResponse {
    /// Token to echo back in the `X-CSRFToken` header.
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

/// Failure body the backend attaches to most non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable failure description.
    #[serde(alias = "detail")]
    pub error: String,
}

/// A game as listed by the owned-games, favorites, and recommendation endpoints.
///
/// The owned-games endpoint names the cover field `cover_url` while the other
/// two use `header_image`; both decode into [`GameSummary::header_image`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSummary {
    /// Backend row id, present on owned-game and favorite rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Steam application id; the identity of the game.
    pub appid: u64,
    /// Display name.
    pub name: String,
    /// Store blurb.
    #[serde(default)]
    pub short_description: String,
    /// Cover image URL.
    #[serde(default, alias = "cover_url")]
    pub header_image: String,
}

impl GameSummary {
    /// Steam store page for this game.
    #[must_use]
    pub fn store_url(&self) -> String {
        format!("https://store.steampowered.com/app/{}/", self.appid)
    }
}

/// Page-number pagination envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginatedResponse<T> {
    /// Total number of items across every page.
    pub count: u64,
    /// Absolute URL of the next page, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Absolute URL of the previous page, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    /// Items on the requested page.
    pub results: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    /// Page count implied by `count`, never less than one.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        u32::try_from(pages_for_count(self.count))
            .unwrap_or(u32::MAX)
            .max(1)
    }
}

/// Payload that marks a game as a favorite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteCreateRequest {
    /// Steam application id.
    pub appid: u64,
    /// Display name.
    pub name: String,
    /// Cover image URL.
    pub header_image: String,
    /// Store blurb.
    pub short_description: String,
}

impl From<&GameSummary> for FavoriteCreateRequest {
    fn from(game: &GameSummary) -> Self {
        Self {
            appid: game.appid,
            name: game.name.clone(),
            header_image: game.header_image.clone(),
            short_description: game.short_description.clone(),
        }
    }
}
