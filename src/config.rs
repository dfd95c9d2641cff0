use anyhow::{bail, Context, Result};
use chrono::Duration;

/// Page size used when the criteria leave `limit` unset
pub const DEFAULT_LIMIT: usize = 20;

/// Days a listing counts as new after creation
pub const DEFAULT_NEW_WINDOW_DAYS: i64 = 30;

/// Currency assumed when a record or submission omits one
pub const DEFAULT_CURRENCY: &str = "BDT";

pub const ENV_DEFAULT_LIMIT: &str = "LISTING_QUERY_DEFAULT_LIMIT";
pub const ENV_NEW_WINDOW_DAYS: &str = "LISTING_QUERY_NEW_WINDOW_DAYS";
pub const ENV_DEFAULT_CURRENCY: &str = "LISTING_QUERY_DEFAULT_CURRENCY";

/// Engine-wide defaults for queries and submissions
#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    pub default_limit: usize,
    pub new_listing_window: Duration,
    pub default_currency: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            new_listing_window: Duration::days(DEFAULT_NEW_WINDOW_DAYS),
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl QueryConfig {
    /// Load overrides from `LISTING_QUERY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`QueryConfig::from_env`] with a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_DEFAULT_LIMIT) {
            config.default_limit = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_DEFAULT_LIMIT} must be a non-negative integer, got {raw:?}"))?;
        }

        if let Some(raw) = lookup(ENV_NEW_WINDOW_DAYS) {
            let days: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_NEW_WINDOW_DAYS} must be an integer, got {raw:?}"))?;
            if days < 0 {
                bail!("{ENV_NEW_WINDOW_DAYS} must not be negative, got {days}");
            }
            config.new_listing_window = Duration::days(days);
        }

        if let Some(raw) = lookup(ENV_DEFAULT_CURRENCY) {
            let code = raw.trim();
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("{ENV_DEFAULT_CURRENCY} must be a three-letter ISO code, got {raw:?}");
            }
            config.default_currency = code.to_ascii_uppercase();
        }

        Ok(config)
    }
}
