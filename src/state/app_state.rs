use crate::app::MenuItem;
use crate::state::category::Category;
use padel_api::grouping::{GroupedPools, group_pools_by_name, group_teams_by_league};
use padel_api::sort::{
    SortDirection, StandingSortField, TeamSortField, filter_teams, sort_standings, sort_teams,
};
use padel_api::{
    AllLeagues, League, MatchDetails, Region, Regional, TeamId, TeamInfo, TeamMatch,
    TeamStandingsResponse,
};

// ---------------------------------------------------------------------------
// League list
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct LeaguesState {
    pub leagues: Option<AllLeagues>,
    pub category: Category,
    pub selected: usize,
    pub last_loaded_at: Option<String>,
}

impl LeaguesState {
    pub fn load(&mut self, leagues: AllLeagues) {
        self.leagues = Some(leagues);
        self.clamp_selection();
    }

    /// Leagues of the active category, both regions, Horsens first.
    pub fn selection(&self) -> AllLeagues {
        self.leagues
            .as_ref()
            .map(|l| l.select(self.category.pattern()))
            .unwrap_or_default()
    }

    /// Only the highlighted league, as a one-league selection.
    pub fn highlighted(&self) -> Option<AllLeagues> {
        let selection = self.selection();
        let (region, league) = selection.iter().nth(self.selected)?;
        let mut single = AllLeagues::default();
        match region {
            Region::Horsens => single.horsens.push(league.clone()),
            Region::Stensballe => single.stensballe.push(league.clone()),
        }
        Some(single)
    }

    pub fn rows(&self) -> Vec<(Region, League)> {
        self.selection()
            .iter()
            .map(|(region, league)| (region, league.clone()))
            .collect()
    }

    pub fn cycle_category(&mut self) {
        self.category = self.category.next();
        self.selected = 0;
    }

    pub fn navigate_down(&mut self) {
        let max = self.selection().len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.selection().len().saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Team table
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TeamsState {
    /// Sorted by the active field and direction.
    pub teams: Vec<Regional<TeamInfo>>,
    pub loaded: bool,
    pub sort_field: TeamSortField,
    pub sort_direction: SortDirection,
    pub filter: String,
    pub filter_editing: bool,
    pub selected: usize,
}

impl TeamsState {
    pub fn load(&mut self, teams: Vec<Regional<TeamInfo>>) {
        self.teams = teams;
        self.loaded = true;
        self.selected = 0;
        self.resort();
    }

    pub fn toggle_sort_field(&mut self) {
        self.sort_field = self.sort_field.toggle();
        self.resort();
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort_direction = self.sort_direction.toggle();
        self.resort();
    }

    fn resort(&mut self) {
        sort_teams(&mut self.teams, self.sort_field, self.sort_direction);
    }

    /// Visible teams grouped by league name; sort order holds within a league.
    pub fn grouped(&self) -> Vec<(String, Vec<&Regional<TeamInfo>>)> {
        let visible = filter_teams(&self.teams, &self.filter);
        group_teams_by_league(&visible).into_iter().collect()
    }

    /// Visible teams in display order.
    pub fn ordered(&self) -> Vec<&Regional<TeamInfo>> {
        self.grouped().into_iter().flat_map(|(_, teams)| teams).collect()
    }

    pub fn selected_team(&self) -> Option<&Regional<TeamInfo>> {
        self.ordered().get(self.selected).copied()
    }

    pub fn navigate_down(&mut self) {
        let max = self.ordered().len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter.push(c);
        self.selected = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.selected = 0;
    }
}

// ---------------------------------------------------------------------------
// Selected team: standings and fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TeamState {
    pub team_id: Option<TeamId>,
    pub team_name: String,
    pub pools: GroupedPools,
    pub matches: Vec<TeamMatch>,
    pub standings_scroll: u16,
    pub selected_match: usize,
    pub match_details: Option<MatchDetails>,
}

impl TeamState {
    pub fn load(
        &mut self,
        team_id: TeamId,
        team_name: String,
        standings: TeamStandingsResponse,
        matches: Vec<TeamMatch>,
    ) {
        if self.team_id != Some(team_id) {
            self.standings_scroll = 0;
            self.selected_match = 0;
            self.match_details = None;
        }
        self.team_id = Some(team_id);
        self.team_name = team_name;
        self.pools = group_pools_by_name(standings.pools);
        for pool in self.pools.values_mut().flatten() {
            sort_standings(&mut pool.standings, StandingSortField::Rank, SortDirection::Ascending);
        }
        self.matches = matches;
        self.selected_match = self.selected_match.min(self.matches.len().saturating_sub(1));
    }

    pub fn selected_match_id(&self) -> Option<u64> {
        self.matches.get(self.selected_match).map(|m| m.match_id)
    }

    pub fn match_down(&mut self) {
        let max = self.matches.len().saturating_sub(1);
        if self.selected_match < max {
            self.selected_match += 1;
        }
    }

    pub fn match_up(&mut self) {
        self.selected_match = self.selected_match.saturating_sub(1);
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub leagues: LeaguesState,
    pub teams: TeamsState,
    pub team: TeamState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padel_api::{Club, Pool, TeamDetails, TeamStanding};

    fn league(id: u64, name: &str) -> League {
        League { id, name: name.into(), ..Default::default() }
    }

    fn team(region: Region, id: u64, name: &str, league: &str) -> Regional<TeamInfo> {
        Regional::new(
            region,
            TeamInfo {
                team: TeamDetails {
                    id,
                    name: name.into(),
                    club: Club { id: None, name: format!("{name} Klub") },
                    players: vec![],
                },
                team_league_name: league.into(),
            },
        )
    }

    fn all_leagues() -> AllLeagues {
        AllLeagues {
            horsens: vec![league(1, "Lunar Ligaen - Herrer"), league(2, "HH-Listen")],
            stensballe: vec![league(1, "Lunar Ligaen - Damer")],
        }
    }

    #[test]
    fn highlighted_league_keeps_its_region() {
        let mut state = LeaguesState::default();
        state.load(all_leagues());
        state.navigate_down();
        let single = state.highlighted().unwrap();
        assert!(single.horsens.is_empty());
        assert_eq!(single.stensballe[0].name, "Lunar Ligaen - Damer");

        state.navigate_down();
        assert_eq!(state.selected, 1, "selection stops at the last row");
    }

    #[test]
    fn cycling_category_resets_selection() {
        let mut state = LeaguesState::default();
        state.load(all_leagues());
        state.navigate_down();
        state.cycle_category();
        assert_eq!(state.category, Category::HhListen);
        assert_eq!(state.selected, 0);
        assert_eq!(state.rows().len(), 1);
    }

    #[test]
    fn teams_display_grouped_by_league_then_sorted() {
        let mut state = TeamsState::default();
        state.load(vec![
            team(Region::Horsens, 1, "Volley", "Lunar Ligaen - Herrer"),
            team(Region::Stensballe, 2, "Smash", "HH-Listen"),
            team(Region::Horsens, 3, "Lob", "Lunar Ligaen - Herrer"),
        ]);
        let ids: Vec<u64> = state.ordered().iter().map(|t| t.value.team.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        state.toggle_sort_direction();
        let ids: Vec<u64> = state.ordered().iter().map(|t| t.value.team.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn filter_narrows_the_selection() {
        let mut state = TeamsState::default();
        state.load(vec![
            team(Region::Horsens, 1, "Volley", "A"),
            team(Region::Horsens, 2, "Smash", "A"),
        ]);
        for c in "sma".chars() {
            state.push_filter_char(c);
        }
        assert_eq!(state.ordered().len(), 1);
        assert_eq!(state.selected_team().unwrap().value.team.id, 2);
        state.pop_filter_char();
        state.pop_filter_char();
        state.pop_filter_char();
        assert_eq!(state.ordered().len(), 2);
    }

    #[test]
    fn team_load_groups_pools_and_ranks_rows() {
        let row = |id: u64, rank: u32| TeamStanding { team_id: id, standing: rank, ..Default::default() };
        let standings = TeamStandingsResponse {
            team_id: 9,
            pools: vec![
                Pool { id: 2, name: "Lunar Ligaen - Herrer - B".into(), standings: vec![row(5, 2), row(9, 1)] },
                Pool { id: 1, name: "Lunar Ligaen - Herrer - A".into(), standings: vec![] },
            ],
        };
        let mut state = TeamState::default();
        state.load(9, "Smash".into(), standings, vec![]);

        let pools = &state.pools["Lunar Ligaen - Herrer"];
        assert_eq!(pools.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(pools[1].standings[0].team_id, 9);
        assert_eq!(state.selected_match_id(), None);
    }
}
