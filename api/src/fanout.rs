//! Parallel league → teams → team-detail fetches.
//!
//! Requests within a stage are issued together and joined back in input order,
//! whatever order they complete in. Each request of a fail-fast stage runs as
//! its own task: the join returns on the first error, and the remaining
//! requests still run to completion and fill the cache.

use crate::client::{ApiError, ApiResult, LeagueApi};
use crate::{AllLeagues, LeagueId, Region, Regional, Team, TeamId, TeamInfo};
use futures_util::future::{join_all, try_join_all};
use log::debug;
use std::sync::Arc;

/// The two lookups the fan-out needs.
pub trait TeamSource {
    fn teams_by_league(
        &self,
        region: Region,
        league_id: LeagueId,
    ) -> impl Future<Output = ApiResult<Vec<Team>>> + Send;

    fn team_info(&self, team_id: TeamId) -> impl Future<Output = ApiResult<TeamInfo>> + Send;
}

impl TeamSource for LeagueApi {
    fn teams_by_league(
        &self,
        region: Region,
        league_id: LeagueId,
    ) -> impl Future<Output = ApiResult<Vec<Team>>> + Send {
        self.fetch_teams_by_league(region, league_id)
    }

    fn team_info(&self, team_id: TeamId) -> impl Future<Output = ApiResult<TeamInfo>> + Send {
        self.fetch_team_info(team_id)
    }
}

impl<S: TeamSource + ?Sized> TeamSource for Arc<S> {
    fn teams_by_league(
        &self,
        region: Region,
        league_id: LeagueId,
    ) -> impl Future<Output = ApiResult<Vec<Team>>> + Send {
        (**self).teams_by_league(region, league_id)
    }

    fn team_info(&self, team_id: TeamId) -> impl Future<Output = ApiResult<TeamInfo>> + Send {
        (**self).team_info(team_id)
    }
}

/// Spawn every future, then wait for all of them in input order, returning on
/// the first error. Tasks that are still running are detached, not aborted.
async fn spawn_fail_fast<T, F>(futures: impl IntoIterator<Item = F>) -> ApiResult<Vec<T>>
where
    T: Send + 'static,
    F: Future<Output = ApiResult<T>> + Send + 'static,
{
    let handles: Vec<_> = futures.into_iter().map(tokio::spawn).collect();
    try_join_all(
        handles
            .into_iter()
            .map(|handle| async move { handle.await.unwrap_or_else(|e| Err(ApiError::from(e))) }),
    )
    .await
}

/// Teams of every selected league, Horsens leagues first, each league's teams
/// in listing order. Regions are concatenated, never joined on id.
pub async fn fetch_teams_for_leagues<S>(
    source: &S,
    leagues: &AllLeagues,
) -> ApiResult<Vec<Regional<Team>>>
where
    S: TeamSource + Clone + Send + Sync + 'static,
{
    debug!("fetching teams for {} leagues", leagues.len());
    let per_league = spawn_fail_fast(leagues.iter().map(|(region, league)| {
        let source = source.clone();
        let league_id = league.id;
        async move {
            let teams = source.teams_by_league(region, league_id).await?;
            Ok::<_, ApiError>(
                teams
                    .into_iter()
                    .map(|team| Regional::new(region, team))
                    .collect::<Vec<_>>(),
            )
        }
    }))
    .await?;

    Ok(per_league.into_iter().flatten().collect())
}

/// Detail for every team, zipped back onto the listing. The listing's name
/// replaces the detail's `Name`.
pub async fn fetch_team_infos<S>(
    source: &S,
    teams: &[Regional<Team>],
) -> ApiResult<Vec<Regional<TeamInfo>>>
where
    S: TeamSource + Clone + Send + Sync + 'static,
{
    debug!("fetching detail for {} teams", teams.len());
    let infos = spawn_fail_fast(teams.iter().map(|team| {
        let source = source.clone();
        let team_id = team.value.id;
        async move { source.team_info(team_id).await }
    }))
    .await?;

    Ok(teams
        .iter()
        .zip(infos)
        .map(|(team, info)| with_listing_name(team, info))
        .collect())
}

/// As [`fetch_team_infos`], but every team gets its own result so callers can
/// render partial data.
pub async fn fetch_team_infos_settled<S: TeamSource>(
    source: &S,
    teams: &[Regional<Team>],
) -> Vec<Regional<ApiResult<TeamInfo>>> {
    let results = join_all(teams.iter().map(|team| source.team_info(team.value.id))).await;

    teams
        .iter()
        .zip(results)
        .map(|(team, result)| {
            Regional::new(
                team.region,
                result.map(|info| with_listing_name(team, info).value),
            )
        })
        .collect()
}

/// Both stages: selected leagues → teams → team detail.
pub async fn fetch_league_team_infos<S>(
    source: &S,
    leagues: &AllLeagues,
) -> ApiResult<Vec<Regional<TeamInfo>>>
where
    S: TeamSource + Clone + Send + Sync + 'static,
{
    let teams = fetch_teams_for_leagues(source, leagues).await?;
    fetch_team_infos(source, &teams).await
}

fn with_listing_name(team: &Regional<Team>, mut info: TeamInfo) -> Regional<TeamInfo> {
    info.team.name = team.value.name.clone();
    Regional::new(team.region, info)
}
