//! Stable, locale-aware ordering and filtering of team and standings lists.
//!
//! All sorts are stable: rows that compare equal keep their input order, in
//! both directions. String comparison follows Danish collation.

use crate::{TeamInfo, TeamStanding};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeamSortField {
    #[default]
    Name,
    ClubName,
}

impl TeamSortField {
    pub fn toggle(self) -> Self {
        match self {
            TeamSortField::Name => TeamSortField::ClubName,
            TeamSortField::ClubName => TeamSortField::Name,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TeamSortField::Name => "Team",
            TeamSortField::ClubName => "Club",
        }
    }

    fn key<'a>(&self, team: &'a TeamInfo) -> &'a str {
        match self {
            TeamSortField::Name => &team.team.name,
            TeamSortField::ClubName => &team.team.club.name,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StandingSortField {
    #[default]
    Rank,
    MatchPoints,
    TeamName,
}

impl StandingSortField {
    fn compare(&self, a: &TeamStanding, b: &TeamStanding) -> Ordering {
        match self {
            StandingSortField::Rank => a.standing.cmp(&b.standing),
            StandingSortField::MatchPoints => a.match_points.cmp(&b.match_points),
            StandingSortField::TeamName => collate(&a.team_name, &b.team_name),
        }
    }
}

/// Sort teams by name or home-club name.
pub fn sort_teams<T: AsRef<TeamInfo>>(teams: &mut [T], field: TeamSortField, direction: SortDirection) {
    teams.sort_by(|a, b| {
        direction.apply(collate(field.key(a.as_ref()), field.key(b.as_ref())))
    });
}

pub fn sort_standings<T: AsRef<TeamStanding>>(
    rows: &mut [T],
    field: StandingSortField,
    direction: SortDirection,
) {
    rows.sort_by(|a, b| direction.apply(field.compare(a.as_ref(), b.as_ref())));
}

/// Teams whose name or home-club name contains `query`, ignoring case.
pub fn filter_teams<'a, T: AsRef<TeamInfo>>(teams: &'a [T], query: &str) -> Vec<&'a T> {
    let query = query.trim().to_lowercase();
    teams
        .iter()
        .filter(|t| {
            let team = &t.as_ref().team;
            query.is_empty()
                || team.name.to_lowercase().contains(&query)
                || team.club.name.to_lowercase().contains(&query)
        })
        .collect()
}

/// Danish collation: letters compare case-insensitively with æ, ø and å after
/// z, and the digraph "aa" counts as å; on a tie lowercase sorts first, then
/// accents are told apart.
pub fn collate(a: &str, b: &str) -> Ordering {
    primary_weights(a)
        .cmp(&primary_weights(b))
        .then_with(|| a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase)))
        .then_with(|| a.cmp(b))
}

fn primary_weights(s: &str) -> Vec<u32> {
    let mut weights = Vec::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c.eq_ignore_ascii_case(&'a') && chars.peek().is_some_and(|n| n.eq_ignore_ascii_case(&'a')) {
            chars.next();
            weights.push(primary_weight('å'));
        } else {
            weights.push(primary_weight(c));
        }
    }
    weights
}

fn primary_weight(c: char) -> u32 {
    const AFTER_Z: u32 = 'z' as u32 * 4;
    let lower = c.to_lowercase().next().unwrap_or(c);
    match lower {
        'æ' | 'ä' => AFTER_Z + 1,
        'ø' | 'ö' => AFTER_Z + 2,
        'å' => AFTER_Z + 3,
        'á' | 'à' | 'â' => 'a' as u32 * 4,
        'é' | 'è' | 'ê' | 'ë' => 'e' as u32 * 4,
        'í' | 'ì' | 'î' | 'ï' => 'i' as u32 * 4,
        'ó' | 'ò' | 'ô' => 'o' as u32 * 4,
        'ú' | 'ù' | 'û' => 'u' as u32 * 4,
        'ü' => 'y' as u32 * 4,
        other => other as u32 * 4,
    }
}
