use crate::state::messages::{NetworkRequest, NetworkResponse};
use futures_util::future::try_join;
use log::{debug, error};
use padel_api::fanout::fetch_league_team_infos;
use padel_api::{AllLeagues, ApiResult, LeagueApi, MatchId, TeamId};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: LeagueApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: LeagueApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadLeagues => self.handle_load_leagues().await,
                NetworkRequest::LoadTeams { leagues } => self.handle_load_teams(leagues).await,
                NetworkRequest::LoadTeam { team_id, team_name } => {
                    self.handle_load_team(team_id, team_name).await
                }
                NetworkRequest::LoadMatchDetails { match_id } => {
                    self.handle_load_match_details(match_id).await
                }
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_leagues(&self) -> ApiResult<NetworkResponse> {
        debug!("loading leagues for both regions");
        let leagues = self.client.fetch_all_leagues().await?;
        Ok(NetworkResponse::LeaguesLoaded { leagues })
    }

    async fn handle_load_teams(&self, leagues: AllLeagues) -> ApiResult<NetworkResponse> {
        debug!("loading teams for {} leagues", leagues.len());
        let teams = fetch_league_team_infos(&self.client, &leagues).await?;
        Ok(NetworkResponse::TeamsLoaded { teams })
    }

    async fn handle_load_team(
        &self,
        team_id: TeamId,
        team_name: String,
    ) -> ApiResult<NetworkResponse> {
        debug!("loading standings and matches for team {team_id}");
        let (standings, matches) = try_join(
            self.client.fetch_team_standings(team_id),
            self.client.fetch_team_matches(team_id),
        )
        .await?;
        Ok(NetworkResponse::TeamLoaded {
            team_id,
            team_name,
            standings,
            matches,
        })
    }

    async fn handle_load_match_details(&self, match_id: MatchId) -> ApiResult<NetworkResponse> {
        debug!("loading match {match_id}");
        let details = self.client.fetch_match_details(match_id).await?;
        Ok(NetworkResponse::MatchDetailsLoaded { details })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
