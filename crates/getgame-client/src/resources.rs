//! The three collections behind the list screens.

use async_trait::async_trait;
use getgame_api_models::{GameSummary, PaginatedResponse, paths};
use serde_json::json;

use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::pagination::{Fetched, PageSource};

/// Games in the signed-in user's library, ten per page.
#[derive(Clone, Copy, Debug, Default)]
pub struct OwnedGames;

/// The signed-in user's favorites, ten per page.
#[derive(Clone, Copy, Debug, Default)]
pub struct Favorites;

/// Recommendations computed from the user's library; always a single page.
#[derive(Clone, Copy, Debug, Default)]
pub struct Recommendations;

#[async_trait]
impl PageSource for OwnedGames {
    type Item = GameSummary;

    fn label(&self) -> &'static str {
        "owned_games"
    }

    fn load_error_message(&self) -> &'static str {
        "Failed to fetch games"
    }

    async fn fetch_page(&self, client: &ApiClient, page: u32) -> ClientResult<Fetched<GameSummary>> {
        let response: PaginatedResponse<GameSummary> = client
            .get_json(paths::USER_GAMES, &[("page", page.to_string())])
            .await?;
        Ok(response.into())
    }
}

#[async_trait]
impl PageSource for Favorites {
    type Item = GameSummary;

    fn label(&self) -> &'static str {
        "favorites"
    }

    fn load_error_message(&self) -> &'static str {
        "Failed to fetch favorites"
    }

    fn lists_favorites(&self) -> bool {
        true
    }

    async fn fetch_page(&self, client: &ApiClient, page: u32) -> ClientResult<Fetched<GameSummary>> {
        let response: PaginatedResponse<GameSummary> = client
            .get_json(paths::FAVORITES, &[("page", page.to_string())])
            .await?;
        Ok(response.into())
    }
}

#[async_trait]
impl PageSource for Recommendations {
    type Item = GameSummary;

    fn label(&self) -> &'static str {
        "recommendations"
    }

    fn load_error_message(&self) -> &'static str {
        "Failed to fetch recommendations. Please try again."
    }

    async fn fetch_page(&self, client: &ApiClient, _page: u32) -> ClientResult<Fetched<GameSummary>> {
        let items: Vec<GameSummary> = client.post_json(paths::RECOMMENDATIONS, &json!({})).await?;
        Ok(Fetched {
            items,
            total_pages: 1,
        })
    }
}
