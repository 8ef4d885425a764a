use crate::helpers::{spawn_app, spawn_app_with, test_policy};

#[tokio::test]
async fn login_with_valid_credentials_yields_a_working_session() {
    let app = spawn_app().await;
    app.signup("alice@example.com", "S3cure-password", "Alice").await;

    let response = app.login("alice@example.com", "S3cure-password").await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["two_factor_required"], false);
    assert_eq!(body["user"]["email"], "alice@example.com");

    let session = app.get("/session").await;
    assert_eq!(session.status(), 200);
    let session_body: serde_json::Value = session.json().await.unwrap();
    assert_eq!(session_body["email"], "alice@example.com");
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let app = spawn_app().await;
    app.signup("alice@example.com", "S3cure-password", "Alice").await;

    let wrong_password = app.login("alice@example.com", "Not-the-password").await;
    assert_eq!(wrong_password.status(), 401);
    let wrong_password_body: serde_json::Value = wrong_password.json().await.unwrap();

    let unknown_email = app.login("nobody@example.com", "S3cure-password").await;
    assert_eq!(unknown_email.status(), 401);
    let unknown_email_body: serde_json::Value = unknown_email.json().await.unwrap();

    assert_eq!(wrong_password_body["error"], unknown_email_body["error"]);
}

#[tokio::test]
async fn login_attempts_beyond_the_window_limit_are_rejected() {
    let app = spawn_app_with(test_policy(), 3).await;
    app.signup("alice@example.com", "S3cure-password", "Alice").await;

    for _ in 0..3 {
        let response = app.login("alice@example.com", "Not-the-password").await;
        assert_eq!(response.status(), 401);
    }

    // The fourth attempt is refused before credentials are checked, so
    // even the correct password gets a 429.
    let response = app.login("alice@example.com", "S3cure-password").await;
    assert_eq!(response.status(), 429);
    assert!(response.headers().contains_key("retry-after"));
}

#[tokio::test]
async fn rate_limit_windows_are_per_identity() {
    let app = spawn_app_with(test_policy(), 3).await;
    app.signup("alice@example.com", "S3cure-password", "Alice").await;
    app.signup("bob@example.com", "S3cure-password", "Bob").await;

    for _ in 0..3 {
        app.login("alice@example.com", "Not-the-password").await;
    }

    let response = app.login("bob@example.com", "S3cure-password").await;
    assert_eq!(response.status(), 200);
}
