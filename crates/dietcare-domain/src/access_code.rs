//! Access-code format shared by issuance (service) and credential parsing (auth types).

/// Access codes are exactly this many characters.
pub const ACCESS_CODE_LEN: usize = 8;

/// Alphabet codes are drawn from: uppercase ASCII letters and digits (36 symbols).
pub const ACCESS_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Patient codes expire this many days after issuance.
pub const ACCESS_CODE_TTL_DAYS: i64 = 30;

/// Prefix of the value written over a revoked code. Never well-formed, so it can't be presented.
pub const REVOKED_CODE_PREFIX: &str = "REVOKED-";

/// `true` if `code` matches `^[A-Z0-9]{8}$`.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == ACCESS_CODE_LEN && code.bytes().all(|b| ACCESS_CODE_CHARSET.contains(&b))
}

/// Normalize user input: trim whitespace and uppercase. Codes are typed by hand.
pub fn normalize(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}
