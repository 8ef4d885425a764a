use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use veridian_core::SessionToken;

use crate::config::SESSION_COOKIE_NAME;

/// Build the HTTP-only session cookie. The token is the only credential a
/// browser holds; it never appears in a response body.
pub fn create_session_cookie(token: &SessionToken) -> Cookie<'static> {
    Cookie::build((*SESSION_COOKIE_NAME, token.as_str().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Expired cookie that instructs the browser to drop the session.
pub fn create_removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((*SESSION_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    cookie
}

pub fn extract_session_token(jar: &CookieJar) -> Option<SessionToken> {
    jar.get(*SESSION_COOKIE_NAME)
        .map(|cookie| SessionToken::parse(cookie.value().to_string()))
}
