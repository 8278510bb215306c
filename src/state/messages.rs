use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use padel_api::{
    AllLeagues, MatchDetails, MatchId, Regional, TeamId, TeamInfo, TeamMatch,
    TeamStandingsResponse,
};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadLeagues,
    /// Teams of the given leagues, enriched with team detail.
    LoadTeams { leagues: AllLeagues },
    /// Standings and fixtures for one team.
    LoadTeam { team_id: TeamId, team_name: String },
    LoadMatchDetails { match_id: MatchId },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    LeaguesLoaded { leagues: AllLeagues },
    TeamsLoaded { teams: Vec<Regional<TeamInfo>> },
    TeamLoaded {
        team_id: TeamId,
        team_name: String,
        standings: TeamStandingsResponse,
        matches: Vec<TeamMatch>,
    },
    MatchDetailsLoaded { details: MatchDetails },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
