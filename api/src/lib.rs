pub mod cache;
pub mod client;
pub mod config;
pub mod fanout;
pub mod grouping;
pub mod sort;

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fmt;

pub use cache::TtlCache;
pub use client::{ApiError, ApiResult, LeagueApi};
pub use config::ApiConfig;

pub type LeagueId = u64;
pub type TeamId = u64;
pub type PoolId = u64;
pub type MatchId = u64;
pub type PlayerId = u64;

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// One of the two regional backends. League and team ids are only unique
/// within a region, so they are never compared without this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Horsens,
    Stensballe,
}

impl Region {
    /// Fan-out and merge order: Horsens first, then Stensballe.
    pub const ALL: [Region; 2] = [Region::Horsens, Region::Stensballe];

    /// Path segment and cache-key component.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Horsens => "horsens",
            Region::Stensballe => "stensballe",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Horsens => "Horsens",
            Region::Stensballe => "Stensballe",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A value tagged with the region it was fetched from.
#[derive(Debug, Clone, PartialEq)]
pub struct Regional<T> {
    pub region: Region,
    pub value: T,
}

impl<T> Regional<T> {
    pub fn new(region: Region, value: T) -> Self {
        Self { region, value }
    }
}

impl<T> AsRef<T> for Regional<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

// ---------------------------------------------------------------------------
// Leagues and teams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    #[serde(default, deserialize_with = "datetime::deserialize")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "datetime::deserialize")]
    pub end_date: Option<NaiveDateTime>,
}

/// Both regions' league lists, kept apart. Merging is left to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllLeagues {
    pub horsens: Vec<League>,
    pub stensballe: Vec<League>,
}

impl AllLeagues {
    pub fn region(&self, region: Region) -> &[League] {
        match region {
            Region::Horsens => &self.horsens,
            Region::Stensballe => &self.stensballe,
        }
    }

    /// Leagues whose name contains `pattern`, per region, in original order.
    /// An empty pattern keeps everything.
    pub fn select(&self, pattern: &str) -> AllLeagues {
        let pick = |leagues: &[League]| -> Vec<League> {
            leagues
                .iter()
                .filter(|l| l.name.contains(pattern))
                .cloned()
                .collect()
        };
        AllLeagues {
            horsens: pick(&self.horsens),
            stensballe: pick(&self.stensballe),
        }
    }

    /// Horsens leagues in order, then Stensballe leagues in order.
    pub fn iter(&self) -> impl Iterator<Item = (Region, &League)> {
        Region::ALL
            .into_iter()
            .flat_map(move |region| self.region(region).iter().map(move |l| (region, l)))
    }

    pub fn len(&self) -> usize {
        self.horsens.len() + self.stensballe.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A team as listed by a league's team endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

/// Per-team detail, enriched from the unified team endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TeamInfo {
    pub team: TeamDetails,
    #[serde(default)]
    pub team_league_name: String,
}

impl AsRef<TeamInfo> for TeamInfo {
    fn as_ref(&self) -> &TeamInfo {
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TeamDetails {
    pub id: TeamId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub club: Club,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl TeamDetails {
    pub fn captain(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_captain)
    }
}

/// Home club of a team.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Club {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_captain: bool,
}

// ---------------------------------------------------------------------------
// Pools and standings
// ---------------------------------------------------------------------------

/// A named sub-division of a league table. `name` is composite, e.g.
/// `"Lunar Ligaen - Herrer - A"`; see [`grouping`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pool {
    pub id: PoolId,
    pub name: String,
    #[serde(default)]
    pub standings: Vec<TeamStanding>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TeamStandingsResponse {
    #[serde(default)]
    pub team_id: TeamId,
    #[serde(default)]
    pub pools: Vec<Pool>,
}

/// One row of a pool table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub scored_points: u32,
    pub conceded_points: u32,
    pub match_points: u32,
    /// 1-based rank within the pool.
    pub standing: u32,
}

impl AsRef<TeamStanding> for TeamStanding {
    fn as_ref(&self) -> &TeamStanding {
        self
    }
}

impl TeamStanding {
    pub fn game_difference(&self) -> i64 {
        i64::from(self.games_won) - i64::from(self.games_lost)
    }
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchTeam {
    #[serde(default)]
    pub id: Option<TeamId>,
    #[serde(default)]
    pub name: String,
}

/// Games won by each side in one set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchSet {
    pub home: u16,
    pub away: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TeamMatch {
    pub match_id: MatchId,
    #[serde(default, deserialize_with = "datetime::deserialize")]
    pub date: Option<NaiveDateTime>,
    pub home_team: MatchTeam,
    pub away_team: MatchTeam,
    #[serde(default)]
    pub pool_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub sets: Vec<MatchSet>,
}

impl TeamMatch {
    pub fn is_played(&self) -> bool {
        !self.sets.is_empty()
    }

    /// Sets won by (home, away).
    pub fn set_score(&self) -> (u16, u16) {
        set_score(&self.sets)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchDetails {
    pub match_id: MatchId,
    #[serde(default, deserialize_with = "datetime::deserialize")]
    pub date: Option<NaiveDateTime>,
    pub home_team: MatchTeam,
    pub away_team: MatchTeam,
    #[serde(default)]
    pub pool_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub sets: Vec<MatchSet>,
    #[serde(default)]
    pub home_players: Vec<Player>,
    #[serde(default)]
    pub away_players: Vec<Player>,
}

impl MatchDetails {
    pub fn set_score(&self) -> (u16, u16) {
        set_score(&self.sets)
    }

    /// The side that won more sets, if the match has been played and is not level.
    pub fn winner(&self) -> Option<&MatchTeam> {
        let (home, away) = self.set_score();
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Some(&self.home_team),
            std::cmp::Ordering::Less => Some(&self.away_team),
            std::cmp::Ordering::Equal => None,
        }
    }
}

fn set_score(sets: &[MatchSet]) -> (u16, u16) {
    sets.iter().fold((0, 0), |(home, away), set| match set.home.cmp(&set.away) {
        std::cmp::Ordering::Greater => (home + 1, away),
        std::cmp::Ordering::Less => (home, away + 1),
        std::cmp::Ordering::Equal => (home, away),
    })
}

/// Backend timestamps come both with and without a UTC offset.
mod datetime {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_local())
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}
