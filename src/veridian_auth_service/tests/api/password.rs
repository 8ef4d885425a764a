use serde_json::json;

use crate::helpers::{spawn_app, token_in};

const EMAIL: &str = "alice@example.com";
const PASSWORD: &str = "S3cure-password";
const NEW_PASSWORD: &str = "Fresh-password-1";

#[tokio::test]
async fn reset_request_for_an_unknown_email_reveals_nothing() {
    let app = spawn_app().await;

    let response = app
        .post("/password/reset-request", &json!({ "email": "nobody@example.com" }))
        .await;

    assert_eq!(response.status(), 200);
    assert!(app.emails.sent().is_empty());
}

#[tokio::test]
async fn reset_flow_replaces_the_password_and_revokes_sessions() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.login(EMAIL, PASSWORD).await;

    let requested = app
        .post("/password/reset-request", &json!({ "email": EMAIL }))
        .await;
    assert_eq!(requested.status(), 200);

    let email = app.emails.last_with_subject("Reset your password");
    assert_eq!(email.recipient, EMAIL);
    let token = token_in(&email.body);

    let reset = app
        .post(
            "/password/reset",
            &json!({ "token": token, "new_password": NEW_PASSWORD }),
        )
        .await;
    assert_eq!(reset.status(), 200);

    // The pre-reset session is gone, the old password no longer works.
    assert_eq!(app.get("/session").await.status(), 401);
    assert_eq!(app.login(EMAIL, PASSWORD).await.status(), 401);
    assert_eq!(app.login(EMAIL, NEW_PASSWORD).await.status(), 200);
}

#[tokio::test]
async fn reset_tokens_are_single_use() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.post("/password/reset-request", &json!({ "email": EMAIL }))
        .await;
    let token = token_in(&app.emails.last_with_subject("Reset your password").body);

    let first = app
        .post(
            "/password/reset",
            &json!({ "token": token, "new_password": NEW_PASSWORD }),
        )
        .await;
    assert_eq!(first.status(), 200);

    let second = app
        .post(
            "/password/reset",
            &json!({ "token": token, "new_password": "Another-password1" }),
        )
        .await;
    assert_eq!(second.status(), 401);
    assert_eq!(app.login(EMAIL, NEW_PASSWORD).await.status(), 200);
}

#[tokio::test]
async fn change_password_requires_the_current_password() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.login(EMAIL, PASSWORD).await;

    let response = app
        .post(
            "/password/change",
            &json!({ "current_password": "Not-the-password", "new_password": NEW_PASSWORD }),
        )
        .await;

    assert_eq!(response.status(), 401);
    app.post_empty("/logout").await;
    assert_eq!(app.login(EMAIL, PASSWORD).await.status(), 200);
}

#[tokio::test]
async fn change_password_spares_the_caller_and_revokes_other_sessions() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.login(EMAIL, PASSWORD).await;

    // A second device with its own cookie jar.
    let other_device = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();
    let other_login = other_device
        .post(format!("{}/login", app.address))
        .json(&json!({ "email": EMAIL, "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(other_login.status(), 200);

    let response = app
        .post(
            "/password/change",
            &json!({ "current_password": PASSWORD, "new_password": NEW_PASSWORD }),
        )
        .await;
    assert_eq!(response.status(), 200);

    assert_eq!(app.get("/session").await.status(), 200);
    let other_session = other_device
        .get(format!("{}/session", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(other_session.status(), 401);
}
