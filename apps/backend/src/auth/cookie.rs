//! Signed-cookie envelope for the session token.
//!
//! The cookie is signed with a key independent of the token secret, so a
//! request has to pass two integrity checks before its identity is trusted.

use actix_web::cookie::time::{Duration, OffsetDateTime};
use actix_web::cookie::{Cookie, CookieJar, SameSite};

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// What the gate found in the cookie slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieToken {
    /// No cookie with the configured name.
    Absent,
    /// Cookie present but its envelope signature did not verify.
    Unsigned,
    /// Envelope verified; the token value, possibly empty.
    Present(String),
}

/// Open the signed envelope of the raw request cookie.
pub fn open_token_cookie(raw: Option<Cookie<'static>>, security: &SecurityConfig) -> CookieToken {
    let Some(raw) = raw else {
        return CookieToken::Absent;
    };

    let mut jar = CookieJar::new();
    jar.add_original(raw);

    match jar.signed(security.cookie_key()).get(security.cookie_name()) {
        Some(cookie) => CookieToken::Present(cookie.value().to_string()),
        None => CookieToken::Unsigned,
    }
}

/// Build the signed, http-only cookie that carries a freshly minted token.
pub fn token_cookie(
    token: &str,
    now: OffsetDateTime,
    security: &SecurityConfig,
) -> Result<Cookie<'static>, AppError> {
    let expires = Duration::try_from(security.token_ttl().as_duration())
        .ok()
        .and_then(|ttl| now.checked_add(ttl))
        .ok_or_else(|| AppError::internal("cookie expiry out of range"))?;

    let mut builder = Cookie::build(security.cookie_name().to_string(), token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .expires(expires);
    if let Some(domain) = security.cookie_domain() {
        builder = builder.domain(domain.to_string());
    }

    let mut jar = CookieJar::new();
    jar.signed_mut(security.cookie_key()).add(builder.finish());

    jar.get(security.cookie_name())
        .cloned()
        .ok_or_else(|| AppError::internal("signed cookie missing from jar"))
}

/// Build a removal cookie matching the name, path and domain of `token_cookie`.
pub fn removal_cookie(security: &SecurityConfig) -> Cookie<'static> {
    let mut builder = Cookie::build(security.cookie_name().to_string(), "")
        .path("/")
        .http_only(true);
    if let Some(domain) = security.cookie_domain() {
        builder = builder.domain(domain.to_string());
    }

    let mut cookie = builder.finish();
    cookie.make_removal();
    cookie
}
