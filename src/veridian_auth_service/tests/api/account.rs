use serde_json::json;

use crate::helpers::{spawn_app, token_in};

const EMAIL: &str = "alice@example.com";
const PASSWORD: &str = "S3cure-password";

#[tokio::test]
async fn deletion_flow_removes_the_account_and_its_sessions() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.login(EMAIL, PASSWORD).await;

    let requested = app.post_empty("/account/delete-request").await;
    assert_eq!(requested.status(), 200);

    let email = app.emails.last_with_subject("Confirm account deletion");
    assert_eq!(email.recipient, EMAIL);
    let token = token_in(&email.body);

    // Nothing is removed until the token comes back.
    assert_eq!(app.get("/session").await.status(), 200);

    let deleted = app.delete("/account", &json!({ "token": token })).await;
    assert_eq!(deleted.status(), 200);

    assert_eq!(app.get("/session").await.status(), 401);
    assert_eq!(app.login(EMAIL, PASSWORD).await.status(), 401);
}

#[tokio::test]
async fn deletion_tokens_are_single_use() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.login(EMAIL, PASSWORD).await;
    app.post_empty("/account/delete-request").await;
    let token = token_in(&app.emails.last_with_subject("Confirm account deletion").body);

    assert_eq!(
        app.delete("/account", &json!({ "token": token })).await.status(),
        200
    );
    assert_eq!(
        app.delete("/account", &json!({ "token": token })).await.status(),
        401
    );
}

#[tokio::test]
async fn delete_request_requires_a_session() {
    let app = spawn_app().await;

    let response = app.post_empty("/account/delete-request").await;

    assert_eq!(response.status(), 401);
}
