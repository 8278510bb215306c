use crate::cache::TtlCache;
use crate::config::ApiConfig;
use crate::{
    AllLeagues, League, LeagueId, MatchDetails, MatchId, Region, Team, TeamId, TeamInfo,
    TeamMatch, TeamStandingsResponse,
};
use futures_util::future::try_join;
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as KeyLock;

pub type ApiResult<T> = Result<T, ApiError>;

/// League data client for both regional backends, read through a shared
/// [`TtlCache`].
#[derive(Debug, Clone)]
pub struct LeagueApi {
    client: Client,
    config: ApiConfig,
    cache: Arc<TtlCache>,
    /// One async lock per cache key with a fetch in progress.
    in_flight: Arc<Mutex<HashMap<String, Arc<KeyLock<()>>>>>,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Timeout(String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    /// A spawned fetch panicked or was aborted.
    Task(tokio::task::JoinError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Timeout(url) => write!(f, "Request timed out: {url}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Task(e) => write!(f, "Fetch task failed: {e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
            ApiError::Task(e) => Some(e),
            ApiError::Timeout(_) | ApiError::NotFound(_) => None,
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Task(e)
    }
}

impl LeagueApi {
    pub fn new(config: ApiConfig, cache: Arc<TtlCache>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("padeltui/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            config,
            cache,
            in_flight: Arc::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Region fetchers
    // -----------------------------------------------------------------------

    /// All leagues of one region.
    pub async fn fetch_leagues(&self, region: Region) -> ApiResult<Vec<League>> {
        let url = format!("{}/{}/leagues", self.config.base_url, region.as_str());
        self.cached(&cache_key("leagues", Some(region), None), || self.get(&url))
            .await
    }

    /// Teams entered in one league of one region.
    pub async fn fetch_teams_by_league(
        &self,
        region: Region,
        league_id: LeagueId,
    ) -> ApiResult<Vec<Team>> {
        let url = format!(
            "{}/{}/leagues/{league_id}/teams",
            self.config.base_url,
            region.as_str()
        );
        self.cached(&cache_key("teams", Some(region), Some(league_id)), || {
            self.get(&url)
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Aggregation
    // -----------------------------------------------------------------------

    /// Both regions' leagues, fetched concurrently and returned side by side.
    pub async fn fetch_all_leagues(&self) -> ApiResult<AllLeagues> {
        let (horsens, stensballe) = try_join(
            self.fetch_leagues(Region::Horsens),
            self.fetch_leagues(Region::Stensballe),
        )
        .await?;
        Ok(AllLeagues { horsens, stensballe })
    }

    /// Team detail from the unified endpoint; the backend resolves the region.
    pub async fn fetch_team_info(&self, team_id: TeamId) -> ApiResult<TeamInfo> {
        let url = format!("{}/teams/{team_id}", self.config.base_url);
        self.cached(&cache_key("teamInfo", None, Some(team_id)), || self.get(&url))
            .await
    }

    pub async fn fetch_team_standings(&self, team_id: TeamId) -> ApiResult<TeamStandingsResponse> {
        let url = format!("{}/teams/{team_id}/standings", self.config.base_url);
        self.cached(&cache_key("teamStandings", None, Some(team_id)), || {
            self.get(&url)
        })
        .await
    }

    pub async fn fetch_team_matches(&self, team_id: TeamId) -> ApiResult<Vec<TeamMatch>> {
        let url = format!("{}/teams/{team_id}/matches", self.config.base_url);
        self.cached(&cache_key("teamMatches", None, Some(team_id)), || {
            self.get(&url)
        })
        .await
    }

    /// The backend wraps the detail in a one-element array; only the first
    /// element is kept.
    pub async fn fetch_match_details(&self, match_id: MatchId) -> ApiResult<MatchDetails> {
        let url = format!("{}/matches/{match_id}", self.config.base_url);
        self.cached(&cache_key("matchDetails", None, Some(match_id)), || async {
            let details: Vec<MatchDetails> = self.get(&url).await?;
            details
                .into_iter()
                .next()
                .ok_or_else(|| ApiError::NotFound(format!("no details for match {match_id}")))
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Cache read-through
    // -----------------------------------------------------------------------

    /// Serve `key` from the cache, or run `fetch` and cache its success.
    ///
    /// Concurrent callers for one key queue behind the first; each re-checks
    /// the cache once it gets the key, so a duplicate costs no request.
    async fn cached<T, F, Fut>(&self, key: &str, fetch: F) -> ApiResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        if let Some(hit) = self.cache.get::<T>(key) {
            debug!("cache hit: {key}");
            return Ok(hit);
        }

        let lock = self.key_lock(key);
        let guard = lock.lock().await;

        let result = match self.cache.get::<T>(key) {
            Some(hit) => {
                debug!("cache hit after wait: {key}");
                Ok(hit)
            }
            None => {
                debug!("cache miss: {key}");
                let fetched = fetch().await;
                if let Ok(value) = &fetched {
                    self.cache.set(key, value.clone(), self.config.cache_ttl);
                }
                fetched
            }
        };

        drop(guard);
        self.release_key_lock(key, lock);
        result
    }

    fn key_lock(&self, key: &str) -> Arc<KeyLock<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.entry(key.to_owned()).or_default().clone()
    }

    fn release_key_lock(&self, key: &str, lock: Arc<KeyLock<()>>) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // Held by the map and by us only: nobody is queued on this key.
        if Arc::strong_count(&lock) == 2 {
            in_flight.remove(key);
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(url.to_owned())
                } else {
                    ApiError::Network(e, url.to_owned())
                }
            })
            .inspect_err(|e| warn!("{e}"))?;

        response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))
            .inspect_err(|e| warn!("{e}"))?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
            .inspect_err(|e| warn!("{e}"))
    }
}

/// `<kind>_<region>_<id>`, omitting whichever parts the lookup does not have.
fn cache_key(kind: &str, region: Option<Region>, id: Option<u64>) -> String {
    let mut key = kind.to_owned();
    if let Some(region) = region {
        key.push('_');
        key.push_str(region.as_str());
    }
    if let Some(id) = id {
        key.push('_');
        key.push_str(&id.to_string());
    }
    key
}
