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
#![allow(clippy::module_name_repetitions)]

//! Client-side behaviour of the getgame web application.
//!
//! Layout:
//! - `config.rs`: API base URL, timeout, and request-id settings
//! - `http.rs`: cookie-carrying HTTP transport with CSRF handling
//! - `session.rs`: session state machine (check, login, callback, logout)
//! - `pagination.rs`: generic page loader with stale-response discarding
//! - `resources.rs`: the three collections (owned games, favorites, recommendations)
//! - `screens.rs`: screen routes, access gating, and navigation targets
//! - `app.rs`: the context object that wires the pieces together
//! - `error.rs`: error taxonomy shared by every call site

pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod pagination;
pub mod resources;
pub mod screens;
pub mod session;

pub use app::AppContext;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, FailureKind};
pub use http::ApiClient;
pub use pagination::{
    FavoriteError, FavoriteToggle, Fetched, Keyed, LoadOutcome, PageLoader, PageSource, PageState,
};
pub use resources::{Favorites, OwnedGames, Recommendations};
pub use screens::{Access, HomeView, Navigation, Screen};
pub use session::{SessionHandle, SessionManager, SessionState};
