//! Session cookie builders.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie carrying the opaque server-side session id.
pub const SESSION_COOKIE: &str = "dietcare_session";

/// Cookie carrying the OAuth provider's access token.
pub const OAUTH_TOKEN_COOKIE: &str = "dietcare_oauth_token";

/// Set the session cookie. `secure` should be `true` everywhere except local development.
/// A `max_age_secs` beyond `i64::MAX` saturates.
///
/// ```
/// use axum_extra::extract::cookie::{CookieJar, SameSite};
/// use dietcare_auth_types::cookie::{set_session_cookie, SESSION_COOKIE};
///
/// let jar = set_session_cookie(CookieJar::new(), "abc".to_string(), 3600, true);
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "abc");
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
/// assert_eq!(cookie.same_site(), Some(SameSite::Lax));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(
    jar: CookieJar,
    session_id: String,
    max_age_secs: u64,
    secure: bool,
) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .max_age(Duration::seconds(i64::try_from(max_age_secs).unwrap_or(i64::MAX)))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Expire the session cookie on the client.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use dietcare_auth_types::cookie::{clear_session_cookie, set_session_cookie, SESSION_COOKIE};
///
/// let jar = set_session_cookie(CookieJar::new(), "abc".to_string(), 3600, false);
/// let jar = clear_session_cookie(jar, false);
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, secure: bool) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
