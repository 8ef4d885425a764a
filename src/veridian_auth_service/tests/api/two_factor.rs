use serde_json::json;
use totp_rs::{Algorithm, Secret as TotpSecret, TOTP};

use crate::helpers::{TOTP_ISSUER, spawn_app};

const EMAIL: &str = "alice@example.com";
const PASSWORD: &str = "S3cure-password";

fn current_code(secret_base32: &str) -> String {
    let totp = TOTP::new(
        Algorithm::SHA1,
        6,
        1,
        30,
        TotpSecret::Encoded(secret_base32.to_string())
            .to_bytes()
            .unwrap(),
        Some(TOTP_ISSUER.to_string()),
        EMAIL.to_string(),
    )
    .unwrap();
    totp.generate_current().unwrap()
}

#[tokio::test]
async fn enabling_2fa_returns_the_enrollment_and_flags_the_user() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.login(EMAIL, PASSWORD).await;

    let response = app.post("/2fa/enable", &json!({ "password": PASSWORD })).await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(!body["secret"].as_str().unwrap().is_empty());
    assert!(body["otpauth_url"].as_str().unwrap().starts_with("otpauth://totp/"));

    let session: serde_json::Value = app.get("/session").await.json().await.unwrap();
    assert_eq!(session["two_factor_enabled"], true);
}

#[tokio::test]
async fn enabling_2fa_requires_the_current_password() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.login(EMAIL, PASSWORD).await;

    let response = app
        .post("/2fa/enable", &json!({ "password": "Not-the-password" }))
        .await;

    assert_eq!(response.status(), 401);
    let session: serde_json::Value = app.get("/session").await.json().await.unwrap();
    assert_eq!(session["two_factor_enabled"], false);
}

#[tokio::test]
async fn authenticator_code_completes_a_pending_login() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.login(EMAIL, PASSWORD).await;
    let enrollment: serde_json::Value = app
        .post("/2fa/enable", &json!({ "password": PASSWORD }))
        .await
        .json()
        .await
        .unwrap();
    let secret = enrollment["secret"].as_str().unwrap().to_string();
    app.post_empty("/logout").await;

    let login: serde_json::Value = app.login(EMAIL, PASSWORD).await.json().await.unwrap();
    assert_eq!(login["two_factor_required"], true);
    assert_eq!(app.get("/session").await.status(), 401);

    let response = app
        .post("/2fa/verify-totp", &json!({ "code": current_code(&secret) }))
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(app.get("/session").await.status(), 200);
}

#[tokio::test]
async fn wrong_authenticator_code_leaves_the_session_pending() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.login(EMAIL, PASSWORD).await;
    app.post("/2fa/enable", &json!({ "password": PASSWORD })).await;
    app.post_empty("/logout").await;
    app.login(EMAIL, PASSWORD).await;

    let response = app
        .post("/2fa/verify-totp", &json!({ "code": "000000" }))
        .await;

    assert_eq!(response.status(), 401);
    assert_eq!(app.get("/session").await.status(), 401);
}

#[tokio::test]
async fn disabling_2fa_restores_single_factor_login() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.login(EMAIL, PASSWORD).await;
    app.post("/2fa/enable", &json!({ "password": PASSWORD })).await;

    let response = app.post("/2fa/disable", &json!({ "password": PASSWORD })).await;
    assert_eq!(response.status(), 200);

    app.post_empty("/logout").await;
    let login: serde_json::Value = app.login(EMAIL, PASSWORD).await.json().await.unwrap();
    assert_eq!(login["two_factor_required"], false);
    assert_eq!(app.get("/session").await.status(), 200);
}
