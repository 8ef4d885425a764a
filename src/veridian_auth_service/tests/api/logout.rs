use crate::helpers::spawn_app;

#[tokio::test]
async fn logout_revokes_the_session() {
    let app = spawn_app().await;
    app.signup("alice@example.com", "S3cure-password", "Alice").await;
    app.login("alice@example.com", "S3cure-password").await;

    let response = app.post_empty("/logout").await;
    assert_eq!(response.status(), 200);

    assert_eq!(app.get("/session").await.status(), 401);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let app = spawn_app().await;
    app.signup("alice@example.com", "S3cure-password", "Alice").await;
    app.login("alice@example.com", "S3cure-password").await;

    assert_eq!(app.post_empty("/logout").await.status(), 200);
    assert_eq!(app.post_empty("/logout").await.status(), 200);
}

#[tokio::test]
async fn logout_without_a_session_still_succeeds() {
    let app = spawn_app().await;

    let response = app.post_empty("/logout").await;

    assert_eq!(response.status(), 200);
}
