use anyhow::Result;
use getgame_client::{
    AppContext, ClientConfig, ClientError, FailureKind, HomeView, Navigation, SessionState,
};
use getgame_test_support::fixtures;
use getgame_test_support::mocks::MockBackend;
use httpmock::prelude::*;

fn context(backend: &MockBackend) -> Result<AppContext> {
    Ok(AppContext::new(&ClientConfig::new(backend.api_url()))?)
}

#[tokio::test]
async fn check_auth_reports_signed_in_user() -> Result<()> {
    let backend = MockBackend::start().await;
    let probe = backend.mock_check_auth(fixtures::auth_check(true, Some("alice")));
    let app = context(&backend)?;
    let handle = app.session_handle();
    assert_eq!(handle.current(), SessionState::Unknown);

    let state = app.session().check_auth().await;

    probe.assert();
    assert_eq!(
        state,
        SessionState::Authenticated {
            username: Some("alice".into())
        }
    );
    assert!(handle.is_authenticated());
    assert_eq!(
        HomeView::from_session(&handle.current()).greeting().as_deref(),
        Some("welcome, alice!")
    );
    Ok(())
}

#[tokio::test]
async fn requests_carry_request_id() -> Result<()> {
    let backend = MockBackend::start().await;
    let probe = backend.server().mock(|when, then| {
        when.method(GET)
            .path(MockBackend::path("user/misc/check-auth/"))
            .header("x-request-id", "trace-123");
        then.status(200)
            .json_body(fixtures::auth_check(false, None));
    });
    let config = ClientConfig::new(backend.api_url()).with_request_id("trace-123");
    let app = AppContext::new(&config)?;

    assert_eq!(app.session().check_auth().await, SessionState::Anonymous);
    probe.assert();
    Ok(())
}

#[tokio::test]
async fn check_auth_failure_is_anonymous() -> Result<()> {
    let backend = MockBackend::start().await;
    let probe = backend.server().mock(|when, then| {
        when.method(GET).path(MockBackend::path("user/misc/check-auth/"));
        then.status(500).body("boom");
    });
    let app = context(&backend)?;

    let state = app.session().check_auth().await;

    probe.assert_hits(1);
    assert_eq!(state, SessionState::Anonymous);
    assert_eq!(
        HomeView::from_session(&app.session().state()),
        HomeView::LoginPrompt
    );
    Ok(())
}

#[tokio::test]
async fn check_auth_unreachable_backend_is_anonymous() -> Result<()> {
    let config = ClientConfig::new(url::Url::parse("http://127.0.0.1:9/api/")?);
    let app = AppContext::new(&config)?;
    assert_eq!(app.session().check_auth().await, SessionState::Anonymous);
    Ok(())
}

#[tokio::test]
async fn login_returns_redirect_verbatim() -> Result<()> {
    let backend = MockBackend::start().await;
    let redirect = "https://steamcommunity.com/openid/login?openid.mode=checkid_setup&x=1";
    let login = backend.server().mock(|when, then| {
        when.method(GET)
            .path(MockBackend::path("steam/login/"))
            .query_param("source", "frontend");
        then.status(200)
            .json_body(serde_json::json!({ "redirect_url": redirect }));
    });
    let app = context(&backend)?;

    let navigation = app.session().login().await?;

    login.assert();
    assert_eq!(navigation, Navigation::External(redirect.to_string()));
    assert_eq!(app.session().state(), SessionState::Unknown);
    Ok(())
}

#[tokio::test]
async fn login_failure_is_reported() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.server().mock(|when, then| {
        when.method(GET).path(MockBackend::path("steam/login/"));
        then.status(502);
    });
    let app = context(&backend)?;

    let err = app.session().login().await.expect_err("login should fail");
    assert_eq!(err.kind(), FailureKind::Server);
    Ok(())
}

#[tokio::test]
async fn callback_success_signs_in_and_keeps_cookie() -> Result<()> {
    let backend = MockBackend::start().await;
    let callback = backend.server().mock(|when, then| {
        when.method(GET)
            .path(MockBackend::path("steam/callback/"))
            .query_param("openid.mode", "id_res")
            .query_param("openid.claimed_id", "https://steamcommunity.com/openid/id/7656");
        then.status(200)
            .header("set-cookie", "sessionid=abc; Path=/")
            .json_body(serde_json::json!({
                "message": "Login successful",
                "steam_id": "7656",
                "username": "alice",
            }));
    });
    let probe = backend.server().mock(|when, then| {
        when.method(GET)
            .path(MockBackend::path("user/misc/check-auth/"))
            .header("cookie", "sessionid=abc");
        then.status(200)
            .json_body(fixtures::auth_check(true, Some("alice")));
    });
    let app = context(&backend)?;

    let navigation = app
        .session()
        .handle_callback(
            "http://localhost:5173/steam/callback?openid.mode=id_res&openid.claimed_id=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Fid%2F7656",
        )
        .await?;

    callback.assert();
    assert_eq!(navigation, Navigation::Home);
    assert_eq!(app.session().state().username(), Some("alice"));

    assert!(app.session().restart().await.is_authenticated());
    probe.assert();
    Ok(())
}

#[tokio::test]
async fn callback_without_identity_is_rejected() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.server().mock(|when, then| {
        when.method(GET).path(MockBackend::path("steam/callback/"));
        then.status(200)
            .json_body(serde_json::json!({ "message": "Login successful" }));
    });
    let app = context(&backend)?;

    let err = app
        .session()
        .handle_callback("openid.mode=id_res")
        .await
        .expect_err("callback should be rejected");

    assert!(matches!(err, ClientError::Malformed { .. }));
    assert_eq!(app.session().state(), SessionState::Anonymous);
    Ok(())
}

#[tokio::test]
async fn callback_rejected_by_backend_is_anonymous() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.server().mock(|when, then| {
        when.method(GET).path(MockBackend::path("steam/callback/"));
        then.status(400)
            .json_body(fixtures::error_body("Invalid OpenID response."));
    });
    let app = context(&backend)?;

    let err = app
        .session()
        .handle_callback("?openid.mode=cancel")
        .await
        .expect_err("callback should be rejected");

    assert_eq!(err.server_message(), Some("Invalid OpenID response."));
    assert_eq!(app.session().state(), SessionState::Anonymous);
    Ok(())
}

#[tokio::test]
async fn logout_clears_session_after_server_confirms() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_check_auth(fixtures::auth_check(true, Some("alice")));
    let logout = backend.server().mock(|when, then| {
        when.method(GET).path(MockBackend::path("steam/logout/"));
        then.status(200)
            .json_body(serde_json::json!({ "message": "Logged out" }));
    });
    let app = context(&backend)?;
    let mut handle = app.session_handle();
    app.session().check_auth().await;
    assert!(handle.changed().await.is_some_and(|s| s.is_authenticated()));

    let navigation = app.session().logout().await?;

    logout.assert();
    assert_eq!(navigation, Navigation::ReloadHome);
    assert_eq!(handle.changed().await, Some(SessionState::Anonymous));
    Ok(())
}

#[tokio::test]
async fn logout_failure_keeps_session() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_check_auth(fixtures::auth_check(true, Some("alice")));
    backend.server().mock(|when, then| {
        when.method(GET).path(MockBackend::path("steam/logout/"));
        then.status(500);
    });
    let app = context(&backend)?;
    app.session().check_auth().await;

    let err = app.session().logout().await.expect_err("logout should fail");

    assert_eq!(err.kind(), FailureKind::Server);
    assert_eq!(app.session().state().username(), Some("alice"));
    Ok(())
}
