use chrono::{Duration, Utc};
use serde_json::json;
use veridian_core::{OneTimeCode, OtpCode, OtpCodeStore, OtpCodeStoreError, OtpVerifyError, UserId};

use crate::helpers::{TestApp, spawn_app, spawn_app_with, test_policy, token_in, wrong_code};

const EMAIL: &str = "alice@example.com";
const PASSWORD: &str = "S3cure-password";

/// Signs up, turns on 2FA, and logs back out, leaving the account ready
/// for a pending login.
async fn enroll(app: &TestApp) -> UserId {
    let response = app.signup(EMAIL, PASSWORD, "Alice").await;
    let body: serde_json::Value = response.json().await.unwrap();
    let user_id = UserId::parse(body["id"].as_str().unwrap()).unwrap();

    app.login(EMAIL, PASSWORD).await;
    let enabled = app.post("/2fa/enable", &json!({ "password": PASSWORD })).await;
    assert_eq!(enabled.status(), 200);
    app.post_empty("/logout").await;

    user_id
}

#[tokio::test]
async fn emailed_code_promotes_the_pending_session_exactly_once() {
    let app = spawn_app().await;
    let user_id = enroll(&app).await;

    let response = app.login(EMAIL, PASSWORD).await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["two_factor_required"], true);

    // Pending sessions grant nothing.
    assert_eq!(app.get("/session").await.status(), 401);

    // Pin the outstanding code to a known value.
    let code = OtpCode::parse("482913".to_string()).unwrap();
    app.otp_store
        .put(OneTimeCode::new(
            user_id.clone(),
            code.clone(),
            Duration::minutes(5),
            3,
        ))
        .await
        .unwrap();

    let verified = app.post("/otp/verify", &json!({ "code": "482913" })).await;
    assert_eq!(verified.status(), 200);
    assert_eq!(app.get("/session").await.status(), 200);

    // The same code is spent now.
    let replay = app.otp_store.consume(&user_id, &code, Utc::now()).await;
    assert!(matches!(
        replay,
        Err(OtpCodeStoreError::Invalid(OtpVerifyError::AlreadyConsumed))
    ));
}

#[tokio::test]
async fn login_mails_the_sign_in_code() {
    let app = spawn_app().await;
    enroll(&app).await;

    app.login(EMAIL, PASSWORD).await;

    let email = app.emails.last_with_subject("Your sign-in code");
    assert_eq!(email.recipient, EMAIL);
    let code = token_in(&email.body);
    assert_eq!(code.len(), 6);

    let verified = app.post("/otp/verify", &json!({ "code": code })).await;
    assert_eq!(verified.status(), 200);
}

#[tokio::test]
async fn requesting_a_new_code_replaces_the_old_one() {
    let app = spawn_app().await;
    enroll(&app).await;
    app.login(EMAIL, PASSWORD).await;

    let resent = app.post_empty("/otp/request").await;
    assert_eq!(resent.status(), 200);

    let code = token_in(&app.emails.last_with_subject("Your sign-in code").body);
    let verified = app.post("/otp/verify", &json!({ "code": code })).await;
    assert_eq!(verified.status(), 200);
}

#[tokio::test]
async fn expired_codes_are_rejected_even_when_correct() {
    let mut policy = test_policy();
    policy.otp_ttl = Duration::zero();
    let app = spawn_app_with(policy, 50).await;
    enroll(&app).await;

    app.login(EMAIL, PASSWORD).await;
    let code = token_in(&app.emails.last_with_subject("Your sign-in code").body);

    let verified = app.post("/otp/verify", &json!({ "code": code })).await;
    assert_eq!(verified.status(), 401);
    assert_eq!(app.get("/session").await.status(), 401);
}

#[tokio::test]
async fn exhausted_codes_stay_dead_for_the_correct_value() {
    let mut policy = test_policy();
    policy.otp_max_attempts = 2;
    let app = spawn_app_with(policy, 50).await;
    enroll(&app).await;

    app.login(EMAIL, PASSWORD).await;
    let code = token_in(&app.emails.last_with_subject("Your sign-in code").body);
    let bad = wrong_code(&code);

    for _ in 0..2 {
        let response = app.post("/otp/verify", &json!({ "code": bad })).await;
        assert_eq!(response.status(), 401);
    }

    let verified = app.post("/otp/verify", &json!({ "code": code })).await;
    assert_eq!(verified.status(), 401);
    assert_eq!(app.get("/session").await.status(), 401);
}

#[tokio::test]
async fn verify_without_a_pending_session_is_rejected() {
    let app = spawn_app().await;
    app.signup(EMAIL, PASSWORD, "Alice").await;
    app.login(EMAIL, PASSWORD).await;

    // Active session, nothing pending.
    let response = app.post("/otp/verify", &json!({ "code": "123456" })).await;
    assert_eq!(response.status(), 401);
}
