use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use chrono::Local;
use padel_api::{AllLeagues, MatchDetails, Regional, TeamId, TeamInfo, TeamMatch, TeamStandingsResponse};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Leagues,
    Teams,
    Standings,
    Matches,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_leagues_loaded(&mut self, leagues: AllLeagues) {
        self.state.last_error = None;
        self.state.leagues.load(leagues);
        self.state.leagues.last_loaded_at = Some(Local::now().format("%H:%M").to_string());
    }

    pub fn on_teams_loaded(&mut self, teams: Vec<Regional<TeamInfo>>) {
        self.state.last_error = None;
        self.state.teams.load(teams);
    }

    pub fn on_team_loaded(
        &mut self,
        team_id: TeamId,
        team_name: String,
        standings: TeamStandingsResponse,
        matches: Vec<TeamMatch>,
    ) {
        self.state.last_error = None;
        self.state.team.load(team_id, team_name, standings, matches);
    }

    pub fn on_match_details_loaded(&mut self, details: MatchDetails) {
        self.state.last_error = None;
        self.state.team.match_details = Some(details);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Selections that trigger a fetch. Each switches tab as a side-effect.
    // -----------------------------------------------------------------------

    /// Every league of the active category.
    pub fn select_category_leagues(&mut self) -> Option<AllLeagues> {
        let selection = self.state.leagues.selection();
        if selection.is_empty() {
            return None;
        }
        self.begin_team_load();
        Some(selection)
    }

    /// Only the highlighted league.
    pub fn select_highlighted_league(&mut self) -> Option<AllLeagues> {
        let selection = self.state.leagues.highlighted()?;
        self.begin_team_load();
        Some(selection)
    }

    fn begin_team_load(&mut self) {
        self.state.teams.loaded = false;
        self.update_tab(MenuItem::Teams);
    }

    /// The highlighted team. Its name is shown once the load succeeds.
    pub fn select_team(&mut self) -> Option<(TeamId, String)> {
        let team = &self.state.teams.selected_team()?.value.team;
        let selection = (team.id, team.name.clone());
        self.update_tab(MenuItem::Standings);
        Some(selection)
    }

    /// The team currently shown in Standings and Matches.
    pub fn loaded_team(&self) -> Option<(TeamId, String)> {
        let team = &self.state.team;
        team.team_id.map(|id| (id, team.team_name.clone()))
    }

    pub fn select_match(&mut self) -> Option<u64> {
        self.state.team.selected_match_id()
    }
}
