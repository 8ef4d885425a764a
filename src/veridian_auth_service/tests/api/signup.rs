use serde_json::json;

use crate::helpers::spawn_app;

#[tokio::test]
async fn signup_returns_the_new_user_and_mails_a_verification_token() {
    let app = spawn_app().await;

    let response = app.signup("alice@example.com", "S3cure-password", "Alice").await;

    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email_verified"], false);
    assert_eq!(body["two_factor_enabled"], false);

    let sent = app.emails.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "alice@example.com");
    assert!(sent[0].body.contains("verification token"));
}

#[tokio::test]
async fn signup_with_a_taken_email_returns_409() {
    let app = spawn_app().await;
    app.signup("alice@example.com", "S3cure-password", "Alice").await;

    let response = app.signup("alice@example.com", "Other-password1", "Imposter").await;

    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn signup_rejects_malformed_input() {
    let app = spawn_app().await;

    for (payload, case) in [
        (
            json!({ "email": "not-an-email", "password": "S3cure-password", "name": "Alice" }),
            "malformed email",
        ),
        (
            json!({ "email": "alice@example.com", "password": "short", "name": "Alice" }),
            "password below minimum length",
        ),
    ] {
        let response = app.post("/signup", &payload).await;
        assert_eq!(response.status(), 400, "expected 400 for {case}");
    }
}

#[tokio::test]
async fn signup_does_not_create_a_session() {
    let app = spawn_app().await;
    app.signup("alice@example.com", "S3cure-password", "Alice").await;

    let response = app.get("/session").await;

    assert_eq!(response.status(), 401);
}
