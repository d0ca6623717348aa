pub mod leaderboard;
pub mod screen;
pub mod settings;
pub mod star;

use antininja::timer::format_clock;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::{
    ui::{leaderboard::LeaderboardView, star::StarView},
    App,
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = &self.game;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        if game.participants().is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(Span::styled("No participants configured", bold_style)),
                Line::from(""),
                Line::from(Span::styled("(s)ettings / (esc)ape", italic_style)),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(40), Constraint::Min(3)])
                .split(area);
            empty.render(chunks[1], buf);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(3), // clock
                Constraint::Min(8),    // star + leaderboard
                Constraint::Length(1), // status
                Constraint::Length(1), // legend
            ])
            .split(area);

        let timer = game.timer();
        let clock_style = if game.alarm_exceeded() {
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK)
        } else if timer.is_running() {
            Style::default().fg(Color::Green).patch(bold_style)
        } else {
            Style::default().add_modifier(Modifier::DIM).patch(bold_style)
        };

        let mut clock_spans = vec![Span::styled(format_clock(timer.elapsed()), clock_style)];
        if let Some(name) = game.selected() {
            clock_spans.push(Span::raw("  "));
            clock_spans.push(Span::styled(
                name.to_string(),
                Style::default().fg(Color::Yellow).patch(bold_style),
            ));
        }
        if timer.alarm() > 0 {
            clock_spans.push(Span::styled(
                format!("  alarm {}", format_clock(timer.alarm())),
                italic_style,
            ));
        }
        let title = if game.is_session_complete() {
            "Anti Ninja Device - session complete"
        } else {
            "Anti Ninja Device"
        };
        Paragraph::new(Line::from(clock_spans))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title))
            .render(chunks[0], buf);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        StarView { app: self }.render(body[0], buf);
        LeaderboardView { app: self }.render(body[1], buf);

        if let Some(status) = &self.status {
            Paragraph::new(Span::styled(
                status.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
        }

        Paragraph::new(Span::styled(
            "(←/→) focus / (enter) pick / (space) random / (+) 30s / (d)isqualify / (0) clear / (r)eset / (s)ettings / (esc)ape",
            italic_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }
}
