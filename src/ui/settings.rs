use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use antininja::settings::MIN_PARTICIPANTS;

use crate::App;

pub fn render_settings(app: &App, f: &mut Frame) {
    let form = &app.form;
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(3),    // Participants
            Constraint::Length(3), // Alarm
            Constraint::Length(2), // Error
            Constraint::Length(2), // Instructions
        ])
        .split(area);

    let title = Paragraph::new(format!(
        "Participants (minimum {} names)",
        MIN_PARTICIPANTS
    ))
    .block(Block::default().borders(Borders::ALL).title("Settings"))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let visible = chunks[1].height.saturating_sub(2) as usize;
    let scroll = form.cursor.min(form.names.len()).saturating_sub(visible.saturating_sub(1));

    let name_lines: Vec<Line> = form
        .names
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible)
        .map(|(idx, name)| field_line(&format!("{:>2}. ", idx + 1), name, idx == form.cursor))
        .collect();
    f.render_widget(
        Paragraph::new(name_lines).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    let alarm = field_line("alarm (MM:SS or seconds, empty = off): ", &form.alarm, form.on_alarm());
    f.render_widget(
        Paragraph::new(alarm).block(Block::default().borders(Borders::ALL)),
        chunks[2],
    );

    if let Some(error) = &form.error {
        let error = Paragraph::new(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(error, chunks[3]);
    }

    let instructions = Paragraph::new(
        "(↑/↓) move | (enter) add name | (backspace) delete | (ctrl+s/F2) save | (esc) cancel",
    )
    .style(Style::default().fg(Color::Gray))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(instructions, chunks[4]);
}

fn field_line(label: &str, value: &str, active: bool) -> Line<'static> {
    let label_style = Style::default().fg(Color::Gray);
    if active {
        Line::from(vec![
            Span::styled(label.to_string(), label_style),
            Span::styled(
                value.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else {
        Line::from(vec![
            Span::styled(label.to_string(), label_style),
            Span::raw(value.to_string()),
        ])
    }
}
