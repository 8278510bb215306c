use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    // The team filter swallows printable keys while it is being edited.
    if guard.state.teams.filter_editing {
        match key_event.code {
            KeyCode::Enter | KeyCode::Esc => guard.state.teams.filter_editing = false,
            KeyCode::Backspace => guard.state.teams.pop_filter_char(),
            Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                guard.state.teams.push_filter_char(c)
            }
            _ => {}
        }
        return;
    }

    let request = match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => {
            guard.update_tab(MenuItem::Leagues);
            None
        }
        (_, Char('2'), _) => {
            guard.update_tab(MenuItem::Teams);
            None
        }
        (_, Char('3'), _) => {
            guard.update_tab(MenuItem::Standings);
            None
        }
        (_, Char('4'), _) => {
            guard.update_tab(MenuItem::Matches);
            None
        }
        (_, Char('?'), _) => {
            guard.update_tab(MenuItem::Help);
            None
        }
        (MenuItem::Help, KeyCode::Esc, _) => {
            guard.exit_help();
            None
        }

        // Leagues
        (MenuItem::Leagues, Char('j') | KeyCode::Down, _) => {
            guard.state.leagues.navigate_down();
            None
        }
        (MenuItem::Leagues, Char('k') | KeyCode::Up, _) => {
            guard.state.leagues.navigate_up();
            None
        }
        (MenuItem::Leagues, Char('c'), _) => {
            guard.state.leagues.cycle_category();
            None
        }
        (MenuItem::Leagues, KeyCode::Enter, _) => guard
            .select_category_leagues()
            .map(|leagues| NetworkRequest::LoadTeams { leagues }),
        (MenuItem::Leagues, Char('t'), _) => guard
            .select_highlighted_league()
            .map(|leagues| NetworkRequest::LoadTeams { leagues }),
        (MenuItem::Leagues, Char('r'), _) => Some(NetworkRequest::LoadLeagues),

        // Teams
        (MenuItem::Teams, Char('j') | KeyCode::Down, _) => {
            guard.state.teams.navigate_down();
            None
        }
        (MenuItem::Teams, Char('k') | KeyCode::Up, _) => {
            guard.state.teams.navigate_up();
            None
        }
        (MenuItem::Teams, Char('s'), _) => {
            guard.state.teams.toggle_sort_field();
            None
        }
        (MenuItem::Teams, Char('d'), _) => {
            guard.state.teams.toggle_sort_direction();
            None
        }
        (MenuItem::Teams, Char('/'), _) => {
            guard.state.teams.filter_editing = true;
            None
        }
        (MenuItem::Teams, KeyCode::Esc, _) => {
            guard.state.teams.filter.clear();
            guard.state.teams.selected = 0;
            None
        }
        (MenuItem::Teams, KeyCode::Enter, _) => guard
            .select_team()
            .map(|(team_id, team_name)| NetworkRequest::LoadTeam { team_id, team_name }),

        // Standings
        (MenuItem::Standings, Char('j') | KeyCode::Down, _) => {
            guard.state.team.standings_scroll = guard.state.team.standings_scroll.saturating_add(1);
            None
        }
        (MenuItem::Standings, Char('k') | KeyCode::Up, _) => {
            guard.state.team.standings_scroll = guard.state.team.standings_scroll.saturating_sub(1);
            None
        }
        (MenuItem::Standings | MenuItem::Matches, Char('r'), _) => guard
            .loaded_team()
            .map(|(team_id, team_name)| NetworkRequest::LoadTeam { team_id, team_name }),
        (MenuItem::Standings, KeyCode::Esc, _) => {
            guard.update_tab(MenuItem::Teams);
            None
        }

        // Matches
        (MenuItem::Matches, Char('j') | KeyCode::Down, _) => {
            guard.state.team.match_down();
            None
        }
        (MenuItem::Matches, Char('k') | KeyCode::Up, _) => {
            guard.state.team.match_up();
            None
        }
        (MenuItem::Matches, KeyCode::Enter, _) => guard
            .select_match()
            .map(|match_id| NetworkRequest::LoadMatchDetails { match_id }),
        (MenuItem::Matches, KeyCode::Esc, _) => {
            guard.update_tab(MenuItem::Teams);
            None
        }

        // Global
        (_, Char('f'), _) => {
            guard.toggle_full_screen();
            None
        }
        (_, Char('"'), _) => {
            guard.toggle_show_logs();
            None
        }

        _ => None,
    };

    drop(guard);
    if let Some(request) = request {
        let _ = network_requests.send(request).await;
    }
}
