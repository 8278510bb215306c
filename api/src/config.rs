use log::warn;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.padelhub.dk";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// League, team, standing and match lookups all share this lifetime.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

const ENV_BASE_URL: &str = "PADEL_API_URL";
const ENV_TIMEOUT: &str = "PADEL_API_TIMEOUT_SECS";
const ENV_CACHE_TTL: &str = "PADEL_CACHE_TTL_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Backend root without a trailing slash.
    pub base_url: String,
    /// Upper bound on each HTTP request.
    pub timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl ApiConfig {
    /// Defaults, overridden by `PADEL_API_URL`, `PADEL_API_TIMEOUT_SECS` and
    /// `PADEL_CACHE_TTL_SECS` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&base_url.into());
        self
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL)
            && !url.trim().is_empty()
        {
            config.base_url = normalize_base_url(&url);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT).and_then(|raw| parse_secs(ENV_TIMEOUT, &raw)) {
            config.timeout = timeout;
        }
        if let Some(ttl) = lookup(ENV_CACHE_TTL).and_then(|raw| parse_secs(ENV_CACHE_TTL, &raw)) {
            config.cache_ttl = ttl;
        }

        config
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

fn parse_secs(key: &str, raw: &str) -> Option<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!("ignoring {key}={raw:?}: expected a positive number of seconds");
            None
        }
    }
}
