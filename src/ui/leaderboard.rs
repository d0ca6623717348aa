use antininja::{
    results::{Penalty, Standing},
    timer::format_clock,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, Widget},
};

use crate::App;

/// Pure presenter for a single leaderboard row
pub fn present_row(standing: &Standing, focused: bool) -> Row<'static> {
    let rank_display = match (standing.rank, standing.medal()) {
        (Some(rank), Some(medal)) => format!("{} {}", medal, rank),
        (Some(rank), None) => format!("   {}", rank),
        (None, _) => String::new(),
    };

    let (time_display, time_style) = match standing.entry {
        Some(entry) => match entry.penalty {
            // show the time that counts for the ranking
            Penalty::ThirtySeconds => (
                format_clock(entry.effective_time()),
                Style::default().fg(Color::Yellow),
            ),
            Penalty::Disqualified => (
                format_clock(entry.time),
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::CROSSED_OUT),
            ),
            Penalty::None => (format_clock(entry.time), Style::default()),
        },
        None => ("-".to_string(), Style::default().fg(Color::DarkGray)),
    };

    let (penalty_display, penalty_style) = match standing.entry.map(|e| e.penalty) {
        Some(Penalty::ThirtySeconds) => ("+30s", Style::default().fg(Color::Yellow)),
        Some(Penalty::Disqualified) => ("DQ", Style::default().fg(Color::Red)),
        _ => ("", Style::default()),
    };

    let mut row_style = match standing.rank {
        Some(rank) if rank <= 3 => Style::default().add_modifier(Modifier::BOLD),
        Some(_) => Style::default(),
        None => Style::default().fg(Color::DarkGray),
    };
    if focused {
        row_style = row_style.add_modifier(Modifier::REVERSED);
    }

    Row::new(vec![
        Cell::from(rank_display),
        Cell::from(standing.name.to_string()),
        Cell::from(time_display).style(time_style),
        Cell::from(penalty_display).style(penalty_style),
    ])
    .style(row_style)
}

pub struct LeaderboardView<'a> {
    pub app: &'a App,
}

impl Widget for LeaderboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = &self.app.game;
        let focused_name = self.app.focused_name();
        let standings = game.ledger().standings(game.participants());

        let header = Row::new(vec!["Rank", "Participant", "Time", ""]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = standings
            .iter()
            .map(|standing| present_row(standing, focused_name == Some(standing.name)))
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Min(10),
                Constraint::Length(7),
                Constraint::Length(5),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Leaderboard"));

        Widget::render(table, area, buf);
    }
}
