use std::time::Duration;

/// Service configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development; override via
/// environment variables (a `.env` file is honored).
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database URL (default: `sqlite://tradein.db`).
    pub database_url: String,
    /// How long cached device-search results stay valid (default: 1 hour).
    pub search_cache_ttl: Duration,
    /// Budget for one device-search storage read before the lookup
    /// degrades to an empty result set (default: 400 ms).
    pub search_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default              |
    /// |---------------------------------|----------------------|
    /// | `TRADEIN_DATABASE_URL`          | `sqlite://tradein.db`|
    /// | `TRADEIN_SEARCH_CACHE_TTL_SECS` | `3600`               |
    /// | `TRADEIN_SEARCH_TIMEOUT_MS`     | `400`                |
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("TRADEIN_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://tradein.db".into());

        let ttl_secs: u64 = std::env::var("TRADEIN_SEARCH_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("TRADEIN_SEARCH_CACHE_TTL_SECS must be a valid u64");

        let timeout_ms: u64 = std::env::var("TRADEIN_SEARCH_TIMEOUT_MS")
            .unwrap_or_else(|_| "400".into())
            .parse()
            .expect("TRADEIN_SEARCH_TIMEOUT_MS must be a valid u64");

        Self {
            database_url,
            search_cache_ttl: Duration::from_secs(ttl_secs),
            search_timeout: Duration::from_millis(timeout_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_unset() {
        std::env::remove_var("TRADEIN_DATABASE_URL");
        std::env::remove_var("TRADEIN_SEARCH_CACHE_TTL_SECS");
        std::env::remove_var("TRADEIN_SEARCH_TIMEOUT_MS");

        let config = Config::from_env();
        assert_eq!(config.database_url, "sqlite://tradein.db");
        assert_eq!(config.search_cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.search_timeout, Duration::from_millis(400));
    }
}
