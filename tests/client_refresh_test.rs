//! Integration tests for the client-side refresh coordinator, driven
//! against a served instance of the real router.

mod helpers;

use http::StatusCode;

use authgate_client::{AuthClient, ClientError};

#[tokio::test]
async fn test_login_populates_state_and_cookie_jar() {
    let app = helpers::TestApp::new();
    let addr = helpers::spawn_server(app.router.clone()).await;
    let client = AuthClient::new(format!("http://{}", addr)).expect("client");

    let principal = client.login("user", "password").await.expect("login");
    assert_eq!(principal.username, "user");

    let snapshot = client.auth_state().current();
    assert!(snapshot.is_authenticated());
    assert_eq!(snapshot.principal.expect("principal").id, principal.id);
}

#[tokio::test]
async fn test_login_failure_surfaces_status() {
    let app = helpers::TestApp::new();
    let addr = helpers::spawn_server(app.router.clone()).await;
    let client = AuthClient::new(format!("http://{}", addr)).expect("client");

    let err = client
        .login("user", "wrongpassword")
        .await
        .expect_err("wrong password must fail");
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!client.auth_state().current().is_authenticated());
}

#[tokio::test]
async fn test_expiry_is_transparent_to_caller() {
    let app = helpers::TestApp::new();
    let addr = helpers::spawn_server(app.router.clone()).await;
    let client = AuthClient::new(format!("http://{}", addr)).expect("client");

    let principal = client.login("user", "password").await.expect("login");

    // Swap in an access token that is already expired; the refresh cookie
    // in the jar is still good.
    let expired = helpers::expired_access_token(&app.config, principal.id);
    client.auth_state().set(expired, principal.clone());

    let response = client.get("/api/protected").await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["message"], "This is protected data!");
    assert_eq!(body["user"]["username"], "user");

    // The state cell now holds the replacement token.
    let token = client
        .auth_state()
        .current()
        .access_token
        .expect("refreshed token");
    assert_ne!(token, helpers::expired_access_token(&app.config, principal.id));
}

#[tokio::test]
async fn test_single_flight_under_concurrent_expiry() {
    let app = helpers::TestApp::new();
    let addr = helpers::spawn_server(app.router.clone()).await;
    let client = AuthClient::new(format!("http://{}", addr)).expect("client");

    let principal = client.login("user", "password").await.expect("login");
    let expired = helpers::expired_access_token(&app.config, principal.id);
    client.auth_state().set(expired, principal.clone());

    // N concurrent requests all discover the expired credential together.
    let mut tasks = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        tasks.push(tokio::spawn(
            async move { client.get("/api/protected").await },
        ));
    }

    // Every request resolves, none hangs, none errors.
    for task in tasks {
        let response = task.await.expect("join").expect("request");
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Exactly one refresh round-trip reached the server.
    let sessions = app.sessions.find_by_principal(principal.id);
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].refresh_count, 1);
}

#[tokio::test]
async fn test_failed_refresh_fails_all_waiters_uniformly() {
    let app = helpers::TestApp::new();
    let addr = helpers::spawn_server(app.router.clone()).await;
    let client = AuthClient::new(format!("http://{}", addr)).expect("client");

    let principal = client.login("user", "password").await.expect("login");

    // Revoke the session server-side: the upcoming refresh must fail.
    let sessions = app.sessions.find_by_principal(principal.id);
    app.sessions.revoke(sessions[0].id);

    let expired = helpers::expired_access_token(&app.config, principal.id);
    client.auth_state().set(expired, principal.clone());

    let mut tasks = Vec::new();
    for _ in 0..5 {
        let client = client.clone();
        tasks.push(tokio::spawn(
            async move { client.get("/api/protected").await },
        ));
    }

    // Uniform failure: every waiter resolves with Unauthenticated.
    for task in tasks {
        let err = task.await.expect("join").expect_err("must fail");
        assert!(matches!(err, ClientError::Unauthenticated));
    }

    // Local state was cleared for the caller to route to a login prompt.
    assert!(!client.auth_state().current().is_authenticated());
    assert_eq!(app.sessions.find_by_principal(principal.id)[0].refresh_count, 0);
}

#[tokio::test]
async fn test_non_expired_401_is_terminal() {
    let app = helpers::TestApp::new();
    let addr = helpers::spawn_server(app.router.clone()).await;
    let client = AuthClient::new(format!("http://{}", addr)).expect("client");

    let principal = client.login("user", "password").await.expect("login");

    // A forged token is rejected as UNAUTHORIZED, not TOKEN_EXPIRED; the
    // coordinator must not attempt a refresh.
    client
        .auth_state()
        .set("forged-token".to_string(), principal.clone());

    let err = client
        .get("/api/protected")
        .await
        .expect_err("forged token must fail");
    assert!(matches!(err, ClientError::Unauthenticated));
    assert!(!client.auth_state().current().is_authenticated());
    assert_eq!(app.sessions.find_by_principal(principal.id)[0].refresh_count, 0);
}

#[tokio::test]
async fn test_logout_clears_state_and_revokes_session() {
    let app = helpers::TestApp::new();
    let addr = helpers::spawn_server(app.router.clone()).await;
    let client = AuthClient::new(format!("http://{}", addr)).expect("client");

    let principal = client.login("user", "password").await.expect("login");
    client.logout().await.expect("logout");

    assert!(!client.auth_state().current().is_authenticated());
    let sessions = app.sessions.find_by_principal(principal.id);
    assert!(app.sessions.is_revoked(sessions[0].id));

    // Without a credential the next request is terminal, not refreshed.
    let err = client
        .get("/api/protected")
        .await
        .expect_err("logged-out request must fail");
    assert!(matches!(err, ClientError::Unauthenticated));
}

#[tokio::test]
async fn test_refresh_works_with_rotation_enabled() {
    let app = helpers::TestApp::with_config(helpers::rotating_config());
    let addr = helpers::spawn_server(app.router.clone()).await;
    let client = AuthClient::new(format!("http://{}", addr)).expect("client");

    let principal = client.login("user", "password").await.expect("login");

    // Two sequential expiry cycles: the cookie jar picks up the rotated
    // refresh cookie each time.
    for expected_count in 1..=2 {
        let expired = helpers::expired_access_token(&app.config, principal.id);
        client.auth_state().set(expired, principal.clone());

        let response = client.get("/api/protected").await.expect("request");
        assert_eq!(response.status(), StatusCode::OK);

        let sessions = app.sessions.find_by_principal(principal.id);
        assert_eq!(sessions[0].refresh_count, expected_count);
    }
}
