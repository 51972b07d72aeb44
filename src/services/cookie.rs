//! Session cookie transport — binds tokens to the browser.
//!
//! Performs no trust decisions: `read` hands back whatever the browser
//! sent, verification belongs to the auth gate.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Fixed session cookie name shared by the attach, read, and clear paths.
pub const COOKIE_NAME: &str = "authToken";

/// Attach `token` as the session cookie. The cookie expires together
/// with the token, so the browser drops it once it can no longer verify.
#[must_use]
pub fn attach(jar: CookieJar, token: String, ttl: Duration, secure: bool) -> CookieJar {
    let cookie = Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(ttl);
    jar.add(cookie)
}

/// Extract the raw incoming token value, if any.
#[must_use]
pub fn read(jar: &CookieJar) -> Option<&str> {
    jar.get(COOKIE_NAME)
        .map(Cookie::value)
        .filter(|v| !v.is_empty())
}

/// Instruct the browser to drop the session cookie immediately.
/// Clearing an absent cookie is a no-op for the browser, so this is
/// safe to send unconditionally.
#[must_use]
pub fn clear(jar: CookieJar, secure: bool) -> CookieJar {
    let cookie = Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO);
    jar.add(cookie)
}

#[cfg(test)]
#[path = "cookie_test.rs"]
mod tests;
