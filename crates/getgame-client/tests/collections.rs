use std::time::Duration;

use anyhow::Result;
use getgame_client::{
    AppContext, ClientConfig, FavoriteToggle, LoadOutcome, PageLoader, PageSource,
};
use getgame_test_support::fixtures;
use getgame_test_support::mocks::{CSRF_HEADER, CSRF_TOKEN, MockBackend};
use httpmock::prelude::*;
use serde_json::json;

fn context(backend: &MockBackend) -> Result<AppContext> {
    Ok(AppContext::new(&ClientConfig::new(backend.api_url()))?)
}

fn owned(appid: u64) -> serde_json::Value {
    fixtures::owned_game(appid, appid, &format!("Game {appid}"))
}

fn listed(appid: u64) -> serde_json::Value {
    fixtures::listed_game(appid, &format!("Game {appid}"))
}

fn appids<S: PageSource<Item = getgame_api_models::GameSummary>>(
    loader: &PageLoader<S>,
) -> Vec<u64> {
    loader.state().items.iter().map(|game| game.appid).collect()
}

#[tokio::test]
async fn owned_games_page_reports_total_pages() -> Result<()> {
    let backend = MockBackend::start().await;
    let first = backend.mock_page(
        "user/games/",
        1,
        fixtures::page(fixtures::rows(1, 10, owned), 23),
    );
    let third = backend.mock_page("user/games/", 3, fixtures::page(vec![owned(21)], 23));
    let loader = context(&backend)?.owned_games();

    assert_eq!(loader.load(1).await?, LoadOutcome::Applied);
    first.assert();
    let state = loader.state();
    assert_eq!(state.items.len(), 10);
    assert_eq!(state.total_pages, 3);
    assert!(!state.has_previous());
    assert!(state.has_next());
    assert!(loader.can_go_next());
    assert!(!loader.can_go_previous());

    assert_eq!(loader.change_page(3).await?, LoadOutcome::Applied);
    third.assert();
    let state = loader.state();
    assert_eq!(state.page, 3);
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].header_image, "https://cdn.example/21.jpg");
    assert!(!state.has_next());
    Ok(())
}

#[tokio::test]
async fn out_of_range_page_changes_are_ignored() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_page("user/games/", 1, fixtures::page(fixtures::rows(1, 10, owned), 23));
    let loader = context(&backend)?.owned_games();
    loader.load(1).await?;

    let stray = backend.server().mock(|when, then| {
        when.method(GET)
            .path(MockBackend::path("user/games/"))
            .query_param("page", "4");
        then.status(404);
    });

    assert_eq!(loader.change_page(0).await?, LoadOutcome::Ignored);
    assert_eq!(loader.change_page(4).await?, LoadOutcome::Ignored);
    assert_eq!(loader.previous_page().await?, LoadOutcome::Ignored);
    stray.assert_hits(0);
    assert_eq!(loader.state().page, 1);
    assert!(loader.load(0).await.is_err());
    Ok(())
}

#[tokio::test]
async fn failed_load_keeps_previous_items() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_page("user/games/", 1, fixtures::page(fixtures::rows(1, 10, owned), 23));
    backend.server().mock(|when, then| {
        when.method(GET)
            .path(MockBackend::path("user/games/"))
            .query_param("page", "2");
        then.status(500)
            .json_body(fixtures::error_body("Steam is unavailable"));
    });
    let loader = context(&backend)?.owned_games();
    loader.load(1).await?;

    let err = loader.next_page().await.expect_err("page 2 should fail");

    assert_eq!(err.server_message(), Some("Steam is unavailable"));
    let state = loader.state();
    assert_eq!(state.page, 1);
    assert_eq!(state.items.len(), 10);
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Failed to fetch games"));

    loader.refresh().await?;
    assert!(loader.state().error.is_none());
    Ok(())
}

#[tokio::test]
async fn slow_stale_response_is_discarded() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_page("user/games/", 1, fixtures::page(fixtures::rows(1, 10, owned), 30));
    backend.server().mock(|when, then| {
        when.method(GET)
            .path(MockBackend::path("user/games/"))
            .query_param("page", "2");
        then.status(200)
            .delay(Duration::from_millis(400))
            .json_body(fixtures::page(fixtures::rows(11, 10, owned), 30));
    });
    backend.mock_page("user/games/", 3, fixtures::page(fixtures::rows(21, 10, owned), 30));
    let loader = context(&backend)?.owned_games();
    loader.load(1).await?;

    let slow = loader.clone();
    let pending = tokio::spawn(async move { slow.change_page(2).await });
    let mut watcher = loader.subscribe();
    watcher.wait_for(|state| state.loading).await?;

    assert_eq!(loader.change_page(3).await?, LoadOutcome::Applied);
    assert_eq!(pending.await??, LoadOutcome::Superseded);

    let state = loader.state();
    assert_eq!(state.page, 3);
    assert_eq!(appids(&loader).first(), Some(&21));
    assert!(!state.loading);
    Ok(())
}

#[tokio::test]
async fn favoriting_owned_game_sends_csrf_token() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_page("user/games/", 1, fixtures::page(vec![owned(10)], 1));
    let csrf = backend.mock_csrf();
    let add = backend.server().mock(|when, then| {
        when.method(POST)
            .path(MockBackend::path("user/favorites/"))
            .header(CSRF_HEADER, CSRF_TOKEN)
            .json_body(json!({
                "appid": 10,
                "name": "Game 10",
                "header_image": "https://cdn.example/10.jpg",
                "short_description": "Game 10 description",
            }));
        then.status(201).json_body(json!({ "message": "Added to favorites" }));
    });
    let remove = backend.server().mock(|when, then| {
        when.method(DELETE)
            .path(MockBackend::path("user/favorites/10/"))
            .header(CSRF_HEADER, CSRF_TOKEN);
        then.status(204);
    });
    let loader = context(&backend)?.owned_games();
    loader.load(1).await?;
    let game = loader.state().items[0].clone();
    assert!(!loader.is_favorited(10));

    assert_eq!(loader.toggle_favorite(&game).await?, FavoriteToggle::Added);
    add.assert();
    assert!(loader.is_favorited(10));

    assert_eq!(loader.toggle_favorite(&game).await?, FavoriteToggle::Removed);
    remove.assert();
    assert!(!loader.is_favorited(10));
    assert_eq!(appids(&loader), vec![10]);
    csrf.assert_hits(2);
    Ok(())
}

#[tokio::test]
async fn failed_favorite_leaves_mark_unchanged() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_page("user/games/", 1, fixtures::page(vec![owned(10)], 1));
    backend.mock_csrf();
    backend.server().mock(|when, then| {
        when.method(POST).path(MockBackend::path("user/favorites/"));
        then.status(400)
            .json_body(fixtures::error_body("Game already in favorites"));
    });
    let loader = context(&backend)?.owned_games();
    loader.load(1).await?;
    let game = loader.state().items[0].clone();

    let err = loader
        .toggle_favorite(&game)
        .await
        .expect_err("add should fail");

    assert_eq!(err.attempted, FavoriteToggle::Added);
    assert_eq!(err.to_string(), "Failed to add to favorites");
    assert!(!loader.is_favorited(10));
    Ok(())
}

#[tokio::test]
async fn favorites_list_marks_every_item() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_page("user/favorites/", 1, fixtures::page(vec![listed(5), listed(6)], 2));
    let loader = context(&backend)?.favorites();

    loader.load(1).await?;

    assert!(loader.is_favorited(5));
    assert!(loader.is_favorited(6));
    assert_eq!(loader.state().total_pages, 1);
    Ok(())
}

#[tokio::test]
async fn removing_last_favorite_on_page_steps_back() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_page(
        "user/favorites/",
        1,
        fixtures::page(fixtures::rows(1, 10, listed), 11),
    );
    let mut second = backend.mock_page("user/favorites/", 2, fixtures::page(vec![listed(11)], 11));
    backend.mock_csrf();
    let remove = backend.server().mock(|when, then| {
        when.method(DELETE)
            .path(MockBackend::path("user/favorites/11/"))
            .header(CSRF_HEADER, CSRF_TOKEN);
        then.status(204);
    });
    let loader = context(&backend)?.favorites();
    loader.load(1).await?;
    loader.next_page().await?;
    let game = loader.state().items[0].clone();
    assert!(loader.is_favorited(11));

    second.delete();
    let gone = backend.server().mock(|when, then| {
        when.method(GET)
            .path(MockBackend::path("user/favorites/"))
            .query_param("page", "2");
        then.status(404).json_body(json!({ "detail": "Invalid page." }));
    });

    assert_eq!(loader.toggle_favorite(&game).await?, FavoriteToggle::Removed);

    remove.assert();
    gone.assert();
    let state = loader.state();
    assert_eq!(state.page, 1);
    assert_eq!(state.total_pages, 2);
    assert_eq!(state.items.len(), 10);
    assert!(state.error.is_none());
    assert!(!state.is_favorited(11));
    Ok(())
}

#[tokio::test]
async fn recommendations_are_requested_with_csrf_token() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_csrf();
    let recs = backend.server().mock(|when, then| {
        when.method(POST)
            .path(MockBackend::path("get-recs/"))
            .header(CSRF_HEADER, CSRF_TOKEN)
            .json_body(json!({}));
        then.status(200).json_body(json!([listed(400), listed(500)]));
    });
    let loader = context(&backend)?.recommendations();

    assert_eq!(loader.load(1).await?, LoadOutcome::Applied);

    recs.assert();
    assert_eq!(appids(&loader), vec![400, 500]);
    let state = loader.state();
    assert_eq!(state.total_pages, 1);
    assert!(!state.has_next());
    assert!(state.favorited.is_empty());
    Ok(())
}

#[tokio::test]
async fn recommendation_failure_sets_retry_banner() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_csrf();
    backend.server().mock(|when, then| {
        when.method(POST).path(MockBackend::path("get-recs/"));
        then.status(500);
    });
    let loader = context(&backend)?.recommendations();

    assert!(loader.load(1).await.is_err());
    assert_eq!(
        loader.state().error.as_deref(),
        Some("Failed to fetch recommendations. Please try again.")
    );
    Ok(())
}
