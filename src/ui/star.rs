use std::f64::consts::PI;

use antininja::participants::ParticipantState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Widget,
    },
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const BOUND: f64 = 1.3;
const OUTER_RADIUS: f64 = 0.85;
const INNER_RADIUS: f64 = 0.35;
const LABEL_RADIUS: f64 = 1.05;

/// Angle of the n-th of `count` branches, starting at the top and going
/// clockwise on screen.
pub fn branch_angle(index: usize, count: usize) -> f64 {
    let step = 2.0 * PI / count.max(1) as f64;
    PI / 2.0 - index as f64 * step
}

/// Point at `radius` on branch `index` (canvas coordinates, y up)
pub fn branch_point(index: usize, count: usize, radius: f64) -> (f64, f64) {
    let angle = branch_angle(index, count);
    (radius * angle.cos(), radius * angle.sin())
}

/// Closed outline alternating outer tips and inner notches
pub fn star_outline(count: usize) -> Vec<(f64, f64)> {
    if count < 2 {
        return Vec::new();
    }
    let half_step = PI / count as f64;
    let mut points = Vec::with_capacity(count * 2 + 1);
    for i in 0..count {
        points.push(branch_point(i, count, OUTER_RADIUS));
        let inner = branch_angle(i, count) - half_step;
        points.push((INNER_RADIUS * inner.cos(), INNER_RADIUS * inner.sin()));
    }
    points.push(points[0]);
    points
}

pub fn state_style(state: ParticipantState) -> Style {
    match state {
        ParticipantState::Waiting => Style::default().fg(Color::White),
        ParticipantState::Selected => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        ParticipantState::Done => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT),
    }
}

/// The participants laid out around a star, the way they sit around a table
pub struct StarView<'a> {
    pub app: &'a App,
}

impl Widget for StarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = &self.app.game;
        let names = game.participants();
        let count = names.len();
        let outline = star_outline(count);

        let inner_width = area.width.saturating_sub(2).max(1) as f64;
        let cell_width = (2.0 * BOUND) / inner_width;
        let center_color = if game.alarm_exceeded() {
            Color::Red
        } else if game.timer().is_running() {
            Color::Yellow
        } else {
            Color::Magenta
        };

        let canvas = Canvas::default()
            .block(Block::default().borders(Borders::ALL).title("Participants"))
            .x_bounds([-BOUND, BOUND])
            .y_bounds([-BOUND, BOUND])
            .paint(|ctx| {
                for pair in outline.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].0,
                        y1: pair[0].1,
                        x2: pair[1].0,
                        y2: pair[1].1,
                        color: Color::Cyan,
                    });
                }

                for (idx, name) in names.iter().enumerate() {
                    let state = game.state_of(name).unwrap_or_default();
                    if state == ParticipantState::Selected {
                        let (x, y) = branch_point(idx, count, OUTER_RADIUS);
                        ctx.draw(&CanvasLine {
                            x1: 0.0,
                            y1: 0.0,
                            x2: x,
                            y2: y,
                            color: Color::Yellow,
                        });
                    }
                }

                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: 0.12,
                    color: center_color,
                });

                ctx.layer();

                for (idx, name) in names.iter().enumerate() {
                    let state = game.state_of(name).unwrap_or_default();
                    let mut style = state_style(state);
                    if idx == self.app.focus {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    let (x, y) = branch_point(idx, count, LABEL_RADIUS);
                    let x = x - name.width() as f64 * cell_width / 2.0;
                    ctx.print(x, y, Span::styled(name.clone(), style));
                }
            });

        canvas.render(area, buf);
    }
}
