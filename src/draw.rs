use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use padel_api::{MatchDetails, Player, Regional, TeamInfo, TeamMatch, TeamStanding};

static TABS: &[&str; 4] = &["Leagues", "Teams", "Standings", "Matches"];

const HELP_TEXT: &str = "q=quit  1-4=tabs  f=full screen  \"=logs

Leagues    j/k=move  c=category  Enter=teams of category  t=teams of league  r=reload
Teams      j/k=move  s=sort field  d=direction  /=filter  Esc=clear filter  Enter=standings
Standings  j/k=scroll  r=reload  Esc=back
Matches    j/k=move  Enter=match details  r=reload  Esc=back";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Leagues => draw_leagues(f, layout.main, app),
            MenuItem::Teams => draw_teams(f, layout.main, app),
            MenuItem::Standings => draw_standings(f, layout.main, app),
            MenuItem::Matches => draw_matches(f, layout.main, app),
            MenuItem::Help => draw_placeholder(f, layout.main, HELP_TEXT),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Leagues => 0,
        MenuItem::Teams => 1,
        MenuItem::Standings => 2,
        MenuItem::Matches => 3,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Splits `inner` into a header line, a key legend and the content area.
fn header_areas(inner: Rect) -> [Rect; 3] {
    Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)]).areas(inner)
}

fn draw_header(f: &mut Frame, areas: &[Rect; 3], app: &App, header: String, legend: &str) {
    let mut spans = vec![Span::raw(header)];
    if let Some(err) = app.state.last_error.as_deref() {
        spans.push(Span::styled(format!("  {err}"), Style::default().fg(Color::Red)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), areas[0]);
    f.render_widget(
        Paragraph::new(legend.to_owned()).style(Style::default().fg(Color::DarkGray)),
        areas[1],
    );
}

fn draw_message(f: &mut Frame, area: Rect, app: &App, what: &str, idle: &str) {
    let msg = match app.state.last_error.as_deref() {
        Some(err) => format!("{what} failed:\n{err}"),
        None => idle.to_owned(),
    };
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_leagues(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Leagues ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let leagues = &app.state.leagues;
    if leagues.leagues.is_none() {
        draw_message(f, inner, app, "League load", "Loading leagues...");
        return;
    }

    let areas = header_areas(inner);
    let rows = leagues.rows();
    draw_header(
        f,
        &areas,
        app,
        format!(
            "Category: {} | {} leagues | updated {}",
            leagues.category.label(),
            rows.len(),
            leagues.last_loaded_at.as_deref().unwrap_or("-")
        ),
        "Keys: j/k=move  c=category  Enter=all teams  t=this league  r=reload  ?=help  q=quit",
    );

    if rows.is_empty() {
        f.render_widget(
            Paragraph::new("No leagues in this category").style(Style::default().fg(Color::DarkGray)),
            areas[2],
        );
        return;
    }

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(i, (region, league))| {
            let period = match (league.start_date, league.end_date) {
                (Some(start), Some(end)) => {
                    format!("{} – {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"))
                }
                (Some(start), None) => format!("from {}", start.format("%d/%m/%Y")),
                _ => String::new(),
            };
            let text = format!("{:<11} {:<44} {}", region.label(), fit(&league.name, 44), period);
            selectable_line(text, i == leagues.selected)
        })
        .collect();

    let scroll = scroll_for(leagues.selected, areas[2].height);
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), areas[2]);
}

fn draw_teams(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Teams ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let teams = &app.state.teams;
    if !teams.loaded {
        draw_message(
            f,
            inner,
            app,
            "Team load",
            "Pick leagues in the Leagues tab and press Enter",
        );
        return;
    }

    let areas = header_areas(inner);
    let cursor = if teams.filter_editing { "_" } else { "" };
    draw_header(
        f,
        &areas,
        app,
        format!(
            "Sort: {} {} | Filter: {}{cursor}",
            teams.sort_field.label(),
            teams.sort_direction.arrow(),
            teams.filter
        ),
        "Keys: j/k=move  s=sort field  d=direction  /=filter  Esc=clear  Enter=standings",
    );

    let mut lines = Vec::new();
    let mut index = 0;
    let mut selected_line = 0;
    for (league, members) in teams.grouped() {
        lines.push(Line::from(Span::styled(
            league,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for team in members {
            let text = team_row(team);
            if index == teams.selected {
                selected_line = lines.len();
            }
            lines.push(selectable_line(text, index == teams.selected));
            index += 1;
        }
    }

    if lines.is_empty() {
        lines.push(Line::from("No teams match"));
    }

    let scroll = scroll_for(selected_line, areas[2].height);
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), areas[2]);
}

fn draw_standings(f: &mut Frame, area: Rect, app: &App) {
    let team = &app.state.team;
    let title = if team.team_name.is_empty() {
        " Standings ".to_owned()
    } else {
        format!(" Standings: {} ", team.team_name)
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if team.team_id.is_none() {
        draw_message(f, inner, app, "Standings load", "Select a team in the Teams tab and press Enter");
        return;
    }
    if team.pools.is_empty() {
        draw_message(f, inner, app, "Standings load", "No standings for this team yet");
        return;
    }

    let heading = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();
    for (group, pools) in &team.pools {
        lines.push(Line::from(Span::styled(group.clone(), heading.fg(Color::Cyan))));
        for pool in pools {
            lines.push(Line::from(Span::styled(
                format!("  {}", pool.name),
                Style::default().add_modifier(Modifier::UNDERLINED),
            )));
            lines.push(Line::from(Span::styled(
                format!(
                    "  {:>3}  {:<28} {:>3} {:>3} {:>3} {:>9} {:>4} {:>9} {:>4}",
                    "#", "Team", "P", "W", "L", "Games", "+/-", "Points", "MP"
                ),
                Style::default().fg(Color::DarkGray),
            )));
            for row in &pool.standings {
                let style = if Some(row.team_id) == team.team_id {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(standing_row(row), style)));
            }
            lines.push(Line::default());
        }
    }

    f.render_widget(Paragraph::new(lines).scroll((team.standings_scroll, 0)), inner);
}

fn team_row(team: &Regional<TeamInfo>) -> String {
    let details = &team.value.team;
    let captain = details.captain().map(|p| p.name.as_str()).unwrap_or("-");
    format!(
        "  {:<28} {:<28} {:<20} {}",
        fit(&details.name, 28),
        fit(&details.club.name, 28),
        fit(captain, 20),
        team.region.label()
    )
}

fn standing_row(row: &TeamStanding) -> String {
    format!(
        "  {:>3}  {:<28} {:>3} {:>3} {:>3} {:>9} {:>4} {:>9} {:>4}",
        row.standing,
        fit(&row.team_name, 28),
        row.played,
        row.wins,
        row.losses,
        format!("{}-{}", row.games_won, row.games_lost),
        format!("{:+}", row.game_difference()),
        format!("{}-{}", row.scored_points, row.conceded_points),
        row.match_points
    )
}

fn draw_matches(f: &mut Frame, area: Rect, app: &App) {
    let team = &app.state.team;
    let block = default_border(Color::White).title(" Matches ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if team.team_id.is_none() {
        draw_message(f, inner, app, "Match load", "Select a team in the Teams tab and press Enter");
        return;
    }
    if team.matches.is_empty() {
        draw_message(f, inner, app, "Match load", "No matches scheduled");
        return;
    }

    let (list_area, detail_area) = match &team.match_details {
        Some(_) if inner.height >= 16 => {
            let [top, bottom] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(10)]).areas(inner);
            (top, Some(bottom))
        }
        _ => (inner, None),
    };

    let lines: Vec<Line> = team
        .matches
        .iter()
        .enumerate()
        .map(|(i, m)| selectable_line(match_row(m), i == team.selected_match))
        .collect();
    let scroll = scroll_for(team.selected_match, list_area.height);
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), list_area);

    if let (Some(detail_area), Some(details)) = (detail_area, team.match_details.as_ref()) {
        draw_match_details(f, detail_area, details);
    }
}

fn match_row(m: &TeamMatch) -> String {
    let date = m
        .date
        .map(|d| d.format("%d/%m %H:%M").to_string())
        .unwrap_or_else(|| "TBA".to_owned());
    let score = if m.is_played() {
        let (home, away) = m.set_score();
        format!("{home}-{away}")
    } else {
        "-".to_owned()
    };
    format!(
        "{:<11} {:>26} {:^5} {:<26} {}",
        date,
        fit(&m.home_team.name, 26),
        score,
        fit(&m.away_team.name, 26),
        m.pool_name
    )
}

fn draw_match_details(f: &mut Frame, area: Rect, details: &MatchDetails) {
    let block = default_border(Color::DarkGray).title(format!(" Match {} ", details.match_id));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    lines.push(Line::from(format!(
        "{} vs {}{}",
        details.home_team.name,
        details.away_team.name,
        details
            .location
            .as_deref()
            .map(|l| format!(" @ {l}"))
            .unwrap_or_default()
    )));

    let sets: Vec<String> = details.sets.iter().map(|s| format!("{}-{}", s.home, s.away)).collect();
    let result = match details.winner() {
        Some(winner) => format!("  Winner: {}", winner.name),
        None => String::new(),
    };
    lines.push(Line::from(format!("Sets: {}{result}", sets.join("  "))));
    lines.push(Line::from(format!("Home: {}", player_names(&details.home_players))));
    lines.push(Line::from(format!("Away: {}", player_names(&details.away_players))));

    f.render_widget(Paragraph::new(lines), inner);
}

fn player_names(players: &[Player]) -> String {
    if players.is_empty() {
        return "-".to_owned();
    }
    players
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(widget, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg.to_owned()).style(Style::default().fg(Color::Gray)),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

fn selectable_line(text: String, selected: bool) -> Line<'static> {
    if selected {
        Line::from(Span::styled(text, Style::default().add_modifier(Modifier::REVERSED)))
    } else {
        Line::from(text)
    }
}

/// First line offset that keeps `selected` on screen.
fn scroll_for(selected: usize, height: u16) -> u16 {
    let height = usize::from(height.max(1));
    u16::try_from(selected.saturating_sub(height - 1)).unwrap_or(u16::MAX)
}

/// Truncate to `width` characters, marking the cut with an ellipsis.
fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
