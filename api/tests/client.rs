use mockito::{Matcher, Mock, Server, ServerGuard};
use padel_api::fanout::{fetch_league_team_infos, fetch_team_infos};
use padel_api::{ApiConfig, ApiError, LeagueApi, Region, Regional, Team, TtlCache};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

fn api_for(server: &ServerGuard) -> LeagueApi {
    api_with_ttl(server, Duration::from_secs(600))
}

fn api_with_ttl(server: &ServerGuard, ttl: Duration) -> LeagueApi {
    let mut config = ApiConfig::default().with_base_url(server.url());
    config.cache_ttl = ttl;
    LeagueApi::new(config, Arc::new(TtlCache::new()))
}

async fn json_mock(server: &mut ServerGuard, path: &str, body: &str, hits: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

const HORSENS_LEAGUES: &str = r#"[
    {"id": 1, "name": "Lunar Ligaen - Herrer", "startDate": "2025-01-06T00:00:00", "endDate": "2025-04-30T00:00:00"},
    {"id": 2, "name": "HH-Listen", "startDate": null, "endDate": null}
]"#;

const STENSBALLE_LEAGUES: &str = r#"[
    {"id": 1, "name": "Lunar Ligaen - Damer"}
]"#;

#[tokio::test]
async fn sequential_calls_hit_the_network_once() {
    let mut server = Server::new_async().await;
    let mock = json_mock(&mut server, "/horsens/leagues", HORSENS_LEAGUES, 1).await;
    let api = api_for(&server);

    let first = api.fetch_leagues(Region::Horsens).await.unwrap();
    let second = api.fetch_leagues(Region::Horsens).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].name, "Lunar Ligaen - Herrer");
    mock.assert_async().await;
}

#[tokio::test]
async fn all_leagues_keeps_regions_apart() {
    let mut server = Server::new_async().await;
    let horsens = json_mock(&mut server, "/horsens/leagues", HORSENS_LEAGUES, 1).await;
    let stensballe = json_mock(&mut server, "/stensballe/leagues", STENSBALLE_LEAGUES, 1).await;
    let api = api_for(&server);

    let all = api.fetch_all_leagues().await.unwrap();
    assert_eq!(all.horsens.len(), 2);
    assert_eq!(all.stensballe.len(), 1);
    // League 1 exists in both regions and is not merged.
    assert_eq!(all.horsens[0].id, all.stensballe[0].id);
    assert_ne!(all.horsens[0].name, all.stensballe[0].name);

    // Served from the per-region entries.
    api.fetch_all_leagues().await.unwrap();
    horsens.assert_async().await;
    stensballe.assert_async().await;
}

#[tokio::test]
async fn teams_are_cached_per_region_and_league() {
    let mut server = Server::new_async().await;
    let h1 = json_mock(&mut server, "/horsens/leagues/1/teams", r#"[{"id": 10, "name": "Smash"}]"#, 1).await;
    let s1 = json_mock(&mut server, "/stensballe/leagues/1/teams", r#"[{"id": 10, "name": "Lob"}]"#, 1).await;
    let api = api_for(&server);

    let horsens = api.fetch_teams_by_league(Region::Horsens, 1).await.unwrap();
    let stensballe = api.fetch_teams_by_league(Region::Stensballe, 1).await.unwrap();
    assert_eq!(horsens[0].name, "Smash");
    assert_eq!(stensballe[0].name, "Lob");

    api.fetch_teams_by_league(Region::Horsens, 1).await.unwrap();
    h1.assert_async().await;
    s1.assert_async().await;
}

#[tokio::test]
async fn failures_propagate_and_are_not_cached() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/teams/5/standings")
        .with_status(500)
        .expect(2)
        .create_async()
        .await;
    let api = api_for(&server);

    assert!(matches!(api.fetch_team_standings(5).await, Err(ApiError::Api(..))));
    assert!(matches!(api.fetch_team_standings(5).await, Err(ApiError::Api(..))));
    mock.assert_async().await;
}

#[tokio::test]
async fn client_errors_are_errors_too() {
    let mut server = Server::new_async().await;
    let _mock = server.mock("GET", "/teams/404").with_status(404).create_async().await;
    let api = api_for(&server);

    let err = api.fetch_team_info(404).await.unwrap_err();
    assert!(matches!(err, ApiError::Api(..)));
    assert!(err.to_string().contains("/teams/404"));
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let mut server = Server::new_async().await;
    let _mock = json_mock(&mut server, "/teams/3/matches", "{not json", 1).await;
    let api = api_for(&server);

    assert!(matches!(api.fetch_team_matches(3).await, Err(ApiError::Parsing(..))));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let config = ApiConfig::default().with_base_url("http://127.0.0.1:9");
    let api = LeagueApi::new(config, Arc::new(TtlCache::new()));

    let err = api.fetch_leagues(Region::Stensballe).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(..) | ApiError::Timeout(..)), "{err}");
}

#[tokio::test]
async fn match_details_unwrap_the_first_element() {
    let mut server = Server::new_async().await;
    let body = r#"[{
        "MatchId": 77,
        "Date": "2025-02-14T19:00:00",
        "HomeTeam": {"Id": 10, "Name": "Smash"},
        "AwayTeam": {"Id": 11, "Name": "Lob"},
        "Sets": [{"Home": 6, "Away": 4}, {"Home": 6, "Away": 7}, {"Home": 10, "Away": 8}],
        "HomePlayers": [{"Id": 1, "Name": "Anne"}]
    }]"#;
    let mock = json_mock(&mut server, "/matches/77", body, 1).await;
    let api = api_for(&server);

    let details = api.fetch_match_details(77).await.unwrap();
    assert_eq!(details.match_id, 77);
    assert_eq!(details.set_score(), (2, 1));
    assert_eq!(details.winner().map(|t| t.name.as_str()), Some("Smash"));

    // The unwrapped value is what got cached.
    assert_eq!(api.fetch_match_details(77).await.unwrap(), details);
    mock.assert_async().await;
}

#[tokio::test]
async fn empty_match_details_is_not_found_and_not_cached() {
    let mut server = Server::new_async().await;
    let mock = json_mock(&mut server, "/matches/8", "[]", 2).await;
    let api = api_for(&server);

    assert!(matches!(api.fetch_match_details(8).await, Err(ApiError::NotFound(_))));
    assert!(matches!(api.fetch_match_details(8).await, Err(ApiError::NotFound(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn concurrent_duplicate_fetches_share_one_request() {
    let mut server = Server::new_async().await;
    let body = r#"{"Team": {"Id": 4, "Name": "Smash", "Club": {"Name": "Padel Horsens"}}, "TeamLeagueName": "HH-Listen"}"#;
    let mock = json_mock(&mut server, "/teams/4", body, 1).await;
    let api = api_for(&server);

    let (a, b, c) = tokio::join!(api.fetch_team_info(4), api.fetch_team_info(4), api.fetch_team_info(4));
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(c.unwrap().team.club.name, "Padel Horsens");
    mock.assert_async().await;
}

#[tokio::test]
async fn expired_entries_are_fetched_again() {
    let mut server = Server::new_async().await;
    let mock = json_mock(&mut server, "/teams/9/matches", "[]", 2).await;
    let api = api_with_ttl(&server, Duration::from_millis(50));

    api.fetch_team_matches(9).await.unwrap();
    api.fetch_team_matches(9).await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;
    api.fetch_team_matches(9).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn fan_out_enriches_selected_leagues_in_order() {
    let mut server = Server::new_async().await;
    let _h = json_mock(&mut server, "/horsens/leagues", HORSENS_LEAGUES, 1).await;
    let _s = json_mock(&mut server, "/stensballe/leagues", STENSBALLE_LEAGUES, 1).await;
    let _h1 = json_mock(
        &mut server,
        "/horsens/leagues/1/teams",
        r#"[{"id": 10, "name": "Smash"}, {"id": 11, "name": "Lob"}]"#,
        1,
    )
    .await;
    let _s1 = json_mock(&mut server, "/stensballe/leagues/1/teams", r#"[{"id": 30, "name": "Volley"}]"#, 1).await;
    let details = server
        .mock("GET", Matcher::Regex(r"^/teams/\d+$".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"Team": {"Id": 0, "Name": "backend name"}, "TeamLeagueName": "Lunar Ligaen"}"#)
        .expect(3)
        .create_async()
        .await;
    let api = api_for(&server);

    let leagues = api.fetch_all_leagues().await.unwrap().select("Lunar Ligaen - ");
    let infos = fetch_league_team_infos(&api, &leagues).await.unwrap();

    let rows: Vec<(Region, &str)> = infos
        .iter()
        .map(|i| (i.region, i.value.team.name.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (Region::Horsens, "Smash"),
            (Region::Horsens, "Lob"),
            (Region::Stensballe, "Volley"),
        ]
    );
    details.assert_async().await;
}

#[tokio::test]
async fn hung_backend_times_out() {
    // Accepts connections and never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let mut config = ApiConfig::default().with_base_url(format!("http://{addr}"));
    config.timeout = Duration::from_millis(200);
    let api = LeagueApi::new(config, Arc::new(TtlCache::new()));

    let started = Instant::now();
    let err = api.fetch_leagues(Region::Horsens).await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout(_)), "{err}");
    assert!(err.to_string().contains("/horsens/leagues"));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn waiter_fetches_again_when_the_first_caller_fails() {
    let mut server = Server::new_async().await;
    // Mocks with hits left are served in creation order.
    let failing = server
        .mock("GET", "/teams/6")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let ok = json_mock(&mut server, "/teams/6", r#"{"Team": {"Id": 6, "Name": "Smash"}}"#, 1).await;
    let api = api_for(&server);

    let (first, second) = tokio::join!(api.fetch_team_info(6), api.fetch_team_info(6));
    assert!(matches!(first, Err(ApiError::Api(..))));
    assert_eq!(second.unwrap().team.id, 6);
    failing.assert_async().await;
    ok.assert_async().await;

    // The waiter's success is what got cached.
    assert!(api.fetch_team_info(6).await.is_ok());
    ok.assert_async().await;
}

#[tokio::test]
async fn failed_fan_out_still_caches_finished_siblings() {
    let mut server = Server::new_async().await;
    let _failing = server.mock("GET", "/teams/1").with_status(500).create_async().await;
    let slow = server
        .mock("GET", "/teams/2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(300));
            w.write_all(br#"{"Team": {"Id": 2, "Name": "Lob"}}"#)
        })
        .expect(1)
        .create_async()
        .await;
    let api = api_for(&server);
    let teams = vec![
        Regional::new(Region::Horsens, Team { id: 1, name: "Smash".into() }),
        Regional::new(Region::Horsens, Team { id: 2, name: "Lob".into() }),
    ];

    assert!(fetch_team_infos(&api, &teams).await.is_err());

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(api.fetch_team_info(2).await.unwrap().team.name, "Lob");
    slow.assert_async().await;
}
