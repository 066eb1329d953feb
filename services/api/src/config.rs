/// API configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL (session store).
    pub redis_url: String,
    /// HMAC secret shared with the OAuth provider for access-token validation.
    pub jwt_secret: String,
    /// TCP port to listen on (default 3120). Env var: `API_PORT`.
    pub api_port: u16,
    /// Session lifetime in seconds (default 7 days). Env var: `SESSION_TTL_SECS`.
    pub session_ttl_secs: u64,
    /// Mark the session cookie `Secure` (default true). Env var: `COOKIE_SECURE`.
    pub cookie_secure: bool,
    /// Issue a new patient code with each weight record (default true).
    /// Env var: `ROTATE_CODE_ON_WEIGHT`.
    pub rotate_code_on_weight: bool,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            api_port: parsed("API_PORT").unwrap_or(3120),
            session_ttl_secs: parsed("SESSION_TTL_SECS").unwrap_or(604_800),
            cookie_secure: flag("COOKIE_SECURE").unwrap_or(true),
            rotate_code_on_weight: flag("ROTATE_CODE_ON_WEIGHT").unwrap_or(true),
        }
    }
}

fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
