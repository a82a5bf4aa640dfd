//! Generic paginated collection loader.
//!
//! # Design
//! - One loader type serves every list screen; a [`PageSource`] supplies the
//!   endpoint and item shape.
//! - Each load takes a ticket from a monotonic counter. A response whose
//!   ticket is no longer the newest is discarded, so a slow early request can
//!   never overwrite a later one.
//! - Failures are non-destructive: the previous items stay in place and only
//!   the error banner changes.
//! - Favorite mutations are applied locally only after the server accepts
//!   them; there is nothing to roll back on failure.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use getgame_api_models::{FavoriteCreateRequest, GameSummary, PaginatedResponse, paths};
use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::watch;

use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;

/// Items that carry a stable numeric identity.
pub trait Keyed {
    /// Identity of the item within its collection.
    fn key(&self) -> u64;
}

impl Keyed for GameSummary {
    fn key(&self) -> u64 {
        self.appid
    }
}

/// One fetched page, before it is applied to loader state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fetched<T> {
    /// Items on the page, in server order.
    pub items: Vec<T>,
    /// Page count reported alongside the items.
    pub total_pages: u32,
}

impl<T> From<PaginatedResponse<T>> for Fetched<T> {
    fn from(response: PaginatedResponse<T>) -> Self {
        let total_pages = response.total_pages();
        Self {
            items: response.results,
            total_pages,
        }
    }
}

/// Endpoint and item shape behind one list screen.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    /// Item type listed by the endpoint.
    type Item: Keyed + Clone + Send + Sync + 'static;

    /// Short name used in logs.
    fn label(&self) -> &'static str;

    /// Banner shown when a page fails to load.
    fn load_error_message(&self) -> &'static str;

    /// Whether every listed item is a favorite by construction.
    ///
    /// Sources answering `true` also refetch the current page after a
    /// removal so the removed item disappears from the list.
    fn lists_favorites(&self) -> bool {
        false
    }

    /// Fetch one page.
    async fn fetch_page(&self, client: &ApiClient, page: u32) -> ClientResult<Fetched<Self::Item>>;
}

/// Observable state of one list screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageState<T> {
    /// Items on the current page.
    pub items: Vec<T>,
    /// Current 1-based page number.
    pub page: u32,
    /// Number of pages; at least one.
    pub total_pages: u32,
    /// A load is in flight.
    pub loading: bool,
    /// User-visible banner for the last failed load.
    pub error: Option<String>,
    /// Keys of items on this page currently marked as favorites.
    pub favorited: BTreeSet<u64>,
    /// At least one page has been applied.
    pub loaded: bool,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            loading: false,
            error: None,
            favorited: BTreeSet::new(),
            loaded: false,
        }
    }
}

impl<T: Keyed> PageState<T> {
    /// Whether the item with `key` is marked as a favorite.
    #[must_use]
    pub fn is_favorited(&self, key: u64) -> bool {
        self.favorited.contains(&key)
    }

    /// Whether a previous-page control should be enabled.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next-page control should be enabled.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    fn apply(&mut self, page: u32, fetched: Fetched<T>, all_favorited: bool) {
        let keys: BTreeSet<u64> = fetched.items.iter().map(Keyed::key).collect();
        if all_favorited {
            self.favorited = keys;
        } else {
            self.favorited.retain(|key| keys.contains(key));
        }
        self.items = fetched.items;
        self.total_pages = fetched.total_pages.max(1);
        self.page = page.min(self.total_pages);
        self.loading = false;
        self.error = None;
        self.loaded = true;
    }

    fn remove(&mut self, key: u64) {
        self.items.retain(|item| item.key() != key);
        self.favorited.remove(&key);
    }
}

/// Result of a load request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was applied to state.
    Applied,
    /// A newer load started before this one finished; the response was dropped.
    Superseded,
    /// The requested page is outside the navigable range; nothing was sent.
    Ignored,
}

/// Favorite mutation that succeeded, or was attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FavoriteToggle {
    /// The item was added to favorites.
    Added,
    /// The item was removed from favorites.
    Removed,
}

impl FavoriteToggle {
    /// Blocking alert shown when this mutation fails.
    #[must_use]
    pub const fn failure_alert(self) -> &'static str {
        match self {
            Self::Added => "Failed to add to favorites",
            Self::Removed => "Failed to remove from favorites",
        }
    }
}

/// A favorite mutation the server rejected or never received.
#[derive(Debug, Error)]
#[error("{}", .attempted.failure_alert())]
pub struct FavoriteError {
    /// Mutation that was attempted.
    pub attempted: FavoriteToggle,
    /// Underlying failure.
    #[source]
    pub source: ClientError,
}

/// Loader for one list screen.
///
/// Clones share state, so a clone can drive a concurrent load.
pub struct PageLoader<S: PageSource> {
    inner: Arc<Inner<S>>,
}

struct Inner<S: PageSource> {
    client: ApiClient,
    source: S,
    state: watch::Sender<PageState<S::Item>>,
    sequence: AtomicU64,
}

impl<S: PageSource> Clone for PageLoader<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: PageSource> PageLoader<S> {
    /// Create a loader with empty state. Nothing is fetched until [`Self::load`].
    #[must_use]
    pub fn new(client: ApiClient, source: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                source,
                state: watch::Sender::new(PageState::default()),
                sequence: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> PageState<S::Item> {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PageState<S::Item>> {
        self.inner.state.subscribe()
    }

    /// Whether a previous page exists.
    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.inner.state.borrow().has_previous()
    }

    /// Whether a following page exists.
    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.inner.state.borrow().has_next()
    }

    /// Source backing this loader.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Fetch `page` and make it current.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::PageOutOfRange`] for page `0`, or the fetch
    /// failure. A failed fetch leaves the previous items in place and sets the
    /// error banner.
    pub async fn load(&self, page: u32) -> ClientResult<LoadOutcome> {
        if page == 0 {
            return Err(ClientError::PageOutOfRange {
                requested: page,
                total_pages: self.inner.state.borrow().total_pages,
            });
        }
        let ticket = self.begin();
        let label = self.inner.source.label();
        tracing::debug!(source = label, page, ticket, "loading page");
        let result = self
            .inner
            .source
            .fetch_page(&self.inner.client, page)
            .await;
        self.finish(ticket, page, result)
    }

    /// Move to `page` if it lies within `1..=total_pages`; otherwise do nothing.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure, as [`Self::load`] does.
    pub async fn change_page(&self, page: u32) -> ClientResult<LoadOutcome> {
        let total_pages = self.inner.state.borrow().total_pages;
        if page < 1 || page > total_pages {
            tracing::debug!(source = self.inner.source.label(), page, total_pages, "page change ignored");
            return Ok(LoadOutcome::Ignored);
        }
        self.load(page).await
    }

    /// Move to the following page, if any.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure, as [`Self::load`] does.
    pub async fn next_page(&self) -> ClientResult<LoadOutcome> {
        let page = self.inner.state.borrow().page;
        self.change_page(page.saturating_add(1)).await
    }

    /// Move to the preceding page, if any.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure, as [`Self::load`] does.
    pub async fn previous_page(&self) -> ClientResult<LoadOutcome> {
        let page = self.inner.state.borrow().page;
        self.change_page(page.saturating_sub(1)).await
    }

    /// Reload the current page.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure, as [`Self::load`] does.
    pub async fn refresh(&self) -> ClientResult<LoadOutcome> {
        let page = self.inner.state.borrow().page;
        self.load(page).await
    }

    fn begin(&self) -> u64 {
        let mut ticket = 0;
        self.inner.state.send_modify(|state| {
            ticket = self.inner.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
        });
        ticket
    }

    fn finish(
        &self,
        ticket: u64,
        page: u32,
        result: ClientResult<Fetched<S::Item>>,
    ) -> ClientResult<LoadOutcome> {
        let source = &self.inner.source;
        let sequence = &self.inner.sequence;
        let is_current = || sequence.load(Ordering::SeqCst) == ticket;

        match result {
            Ok(fetched) => {
                let applied = self.inner.state.send_if_modified(|state| {
                    if !is_current() {
                        return false;
                    }
                    state.apply(page, fetched, source.lists_favorites());
                    true
                });
                if applied {
                    Ok(LoadOutcome::Applied)
                } else {
                    tracing::debug!(source = source.label(), page, ticket, "stale page discarded");
                    Ok(LoadOutcome::Superseded)
                }
            }
            Err(err) => {
                let applied = self.inner.state.send_if_modified(|state| {
                    if !is_current() {
                        return false;
                    }
                    state.loading = false;
                    state.error = Some(source.load_error_message().to_string());
                    true
                });
                if applied {
                    tracing::warn!(source = source.label(), page, error = %err, kind = ?err.kind(), "page load failed");
                    Err(err)
                } else {
                    tracing::debug!(source = source.label(), page, ticket, error = %err, "stale page failure discarded");
                    Ok(LoadOutcome::Superseded)
                }
            }
        }
    }
}

impl<S: PageSource<Item = GameSummary>> PageLoader<S> {
    /// Whether `appid` is marked as a favorite on the current page.
    #[must_use]
    pub fn is_favorited(&self, appid: u64) -> bool {
        self.inner.state.borrow().is_favorited(appid)
    }

    /// Add `game` to favorites, or remove it if it is already marked.
    ///
    /// On success the local mark flips; a favorites list refetches its current
    /// page instead, stepping back a page if the current one disappeared.
    ///
    /// # Errors
    ///
    /// Returns a [`FavoriteError`] carrying the alert to show. State is not
    /// changed.
    pub async fn toggle_favorite(&self, game: &GameSummary) -> Result<FavoriteToggle, FavoriteError> {
        let appid = game.appid;
        let client = &self.inner.client;
        let attempted = if self.is_favorited(appid) {
            FavoriteToggle::Removed
        } else {
            FavoriteToggle::Added
        };

        let result = match attempted {
            FavoriteToggle::Added => {
                client
                    .post(paths::FAVORITES, &FavoriteCreateRequest::from(game))
                    .await
            }
            FavoriteToggle::Removed => client.delete(&paths::favorite(appid)).await,
        };

        if let Err(source) = result {
            tracing::error!(appid, action = ?attempted, error = %source, "favorite mutation failed");
            return Err(FavoriteError { attempted, source });
        }
        tracing::info!(appid, action = ?attempted, "favorite updated");

        match attempted {
            FavoriteToggle::Removed if self.inner.source.lists_favorites() => {
                self.refetch_after_removal(appid).await;
            }
            FavoriteToggle::Removed => {
                self.inner.state.send_modify(|state| {
                    state.favorited.remove(&appid);
                });
            }
            FavoriteToggle::Added => {
                self.inner.state.send_modify(|state| {
                    state.favorited.insert(appid);
                });
            }
        }
        Ok(attempted)
    }

    async fn refetch_after_removal(&self, appid: u64) {
        let page = self.inner.state.borrow().page;
        let mut result = self.load(page).await;
        if page > 1
            && matches!(&result, Err(err) if err.status() == Some(StatusCode::NOT_FOUND))
        {
            result = self.load(page - 1).await;
        }
        if result.is_err() {
            // The server no longer lists the item even though the list did not refresh.
            self.inner.state.send_modify(|state| state.remove(appid));
        }
    }
}
