use ratatui::Frame;

use crate::{ui::settings::render_settings, App, AppState};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Star screen - clock, participant star and leaderboard
pub struct StarScreen;

impl Screen for StarScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Settings screen - roster and alarm form
pub struct SettingsScreen;

impl Screen for SettingsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_settings(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Star => Box::new(StarScreen),
        AppState::Settings => Box::new(SettingsScreen),
    }
}
