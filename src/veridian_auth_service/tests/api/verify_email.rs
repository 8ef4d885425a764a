use serde_json::json;

use crate::helpers::{spawn_app, token_in};

const EMAIL: &str = "alice@example.com";
const PASSWORD: &str = "S3cure-password";

#[tokio::test]
async fn signup_token_marks_the_email_verified() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    let token = token_in(&app.emails.last().body);

    let response = app.post("/verify-email", &json!({ "token": token })).await;
    assert_eq!(response.status(), 200);

    app.login(EMAIL, PASSWORD).await;
    let session: serde_json::Value = app.get("/session").await.json().await.unwrap();
    assert_eq!(session["email_verified"], true);
}

#[tokio::test]
async fn verification_tokens_are_single_use() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    let token = token_in(&app.emails.last().body);

    assert_eq!(
        app.post("/verify-email", &json!({ "token": token })).await.status(),
        200
    );
    assert_eq!(
        app.post("/verify-email", &json!({ "token": token })).await.status(),
        401
    );
}

#[tokio::test]
async fn a_token_for_another_purpose_is_rejected_without_being_burned() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.post("/password/reset-request", &json!({ "email": EMAIL }))
        .await;
    let reset_token = token_in(&app.emails.last_with_subject("Reset your password").body);

    let misused = app
        .post("/verify-email", &json!({ "token": reset_token }))
        .await;
    assert_eq!(misused.status(), 401);

    // Still valid for its real purpose.
    let reset = app
        .post(
            "/password/reset",
            &json!({ "token": reset_token, "new_password": "Fresh-password-1" }),
        )
        .await;
    assert_eq!(reset.status(), 200);
}

#[tokio::test]
async fn garbage_tokens_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .post("/verify-email", &json!({ "token": "no-such-token" }))
        .await;

    assert_eq!(response.status(), 401);
}
