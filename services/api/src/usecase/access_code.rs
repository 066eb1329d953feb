use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use rand::RngExt;

use dietcare_domain::access_code::{ACCESS_CODE_CHARSET, ACCESS_CODE_LEN, ACCESS_CODE_TTL_DAYS};

use crate::domain::types::{MAX_CODE_ATTEMPTS, SESSION_ID_LEN};
use crate::error::ApiError;

const SESSION_ID_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn random_string(charset: &[u8], len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| charset[rng.random_range(0..charset.len())] as char)
        .collect()
}

/// Eight uniformly drawn `A-Z0-9` characters. Uniqueness is left to the database.
pub fn generate_access_code() -> String {
    random_string(ACCESS_CODE_CHARSET, ACCESS_CODE_LEN)
}

/// Opaque session id for the session cookie.
pub fn generate_session_id() -> String {
    random_string(SESSION_ID_CHARSET, SESSION_ID_LEN)
}

/// Expiry of a code issued at `now`.
pub fn code_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(ACCESS_CODE_TTL_DAYS)
}

/// Run `write` with fresh codes until it stops reporting `CodeConflict`, at most
/// `MAX_CODE_ATTEMPTS` times. Any other outcome is returned as is.
pub async fn with_fresh_code<T, F, Fut>(mut write: F) -> Result<T, ApiError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        match write(generate_access_code()).await {
            Err(ApiError::CodeConflict) => {
                tracing::warn!(attempt, "access code collision, retrying");
            }
            other => return other,
        }
    }
    Err(ApiError::CodeConflict)
}
