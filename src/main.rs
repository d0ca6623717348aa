pub mod ui;

use antininja::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    game::{Game, Transition},
    history::HistoryLog,
    logging,
    results::Penalty,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner, Ticker},
    settings::{parse_alarm, GameSettings},
    storage::SessionStore,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{info, warn};

/// party game aid: pick participants, time their turns, rank the finishers
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Picks participants one at a time, manually or at random, times each turn and ranks the finishers on a penalty-aware leaderboard."
)]
pub struct Cli {
    /// comma separated participant names (at least 3); starts a new session
    #[clap(short = 'p', long, value_delimiter = ',')]
    participants: Option<Vec<String>>,

    /// alarm threshold as MM:SS or seconds (0 disables)
    #[clap(short = 'a', long)]
    alarm: Option<String>,

    /// clear the saved session before starting
    #[clap(long)]
    reset: bool,

    /// do not append finished sessions to the history file
    #[clap(long)]
    no_history: bool,

    /// directory for the saved session, history and log
    #[clap(long)]
    state_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Star,
    Settings,
}

/// Editable copy of the roster and alarm; only applied on save
#[derive(Debug, Default)]
pub struct SettingsForm {
    pub names: Vec<String>,
    pub alarm: String,
    /// rows `0..names.len()` are names, `names.len()` is the alarm field
    pub cursor: usize,
    pub error: Option<String>,
}

impl SettingsForm {
    pub fn from_game(game: &Game) -> Self {
        let mut names = game.participants().to_vec();
        if names.is_empty() {
            names.push(String::new());
        }
        let alarm = match game.timer().alarm() {
            0 => String::new(),
            secs => antininja::timer::format_clock(secs),
        };
        Self {
            names,
            alarm,
            cursor: 0,
            error: None,
        }
    }

    pub fn on_alarm(&self) -> bool {
        self.cursor == self.names.len()
    }

    fn current_field(&mut self) -> &mut String {
        if self.on_alarm() {
            &mut self.alarm
        } else {
            &mut self.names[self.cursor]
        }
    }

    fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn down(&mut self) {
        if self.cursor < self.names.len() {
            self.cursor += 1;
        }
    }

    fn insert_row(&mut self) {
        if self.on_alarm() {
            return;
        }
        self.cursor += 1;
        self.names.insert(self.cursor, String::new());
    }

    fn type_char(&mut self, c: char) {
        self.current_field().push(c);
    }

    fn backspace(&mut self) {
        if !self.on_alarm() && self.names[self.cursor].is_empty() && self.names.len() > 1 {
            self.names.remove(self.cursor);
            self.cursor = self.cursor.saturating_sub(1);
            return;
        }
        self.current_field().pop();
    }

    fn parse(&self) -> antininja::error::Result<GameSettings> {
        GameSettings::parse(self.names.as_slice(), &self.alarm)
    }
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub state: AppState,
    /// index into the roster of the highlighted participant
    pub focus: usize,
    pub form: SettingsForm,
    pub status: Option<String>,
    store: Option<SessionStore>,
    history: Option<HistoryLog>,
}

/// What the event loop should do after a key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    Continue,
    /// the clock was restarted; realign the tick cadence
    TimerRestarted,
    Quit,
}

impl App {
    pub fn new(game: Game, store: Option<SessionStore>, history: Option<HistoryLog>) -> Self {
        Self {
            game,
            state: AppState::Star,
            focus: 0,
            form: SettingsForm::default(),
            status: None,
            store,
            history,
        }
    }

    pub fn focused_name(&self) -> Option<&str> {
        self.game.participants().get(self.focus).map(String::as_str)
    }

    pub fn open_settings(&mut self) {
        self.form = SettingsForm::from_game(&self.game);
        self.state = AppState::Settings;
    }

    /// Returns true if the clock advanced.
    pub fn on_tick(&mut self) -> bool {
        if !self.game.timer().is_running() {
            return false;
        }
        self.game.tick();
        self.persist();
        true
    }

    pub fn on_key(&mut self, key: KeyEvent) -> KeyOutcome {
        // ctrl+c to quit
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        match self.state {
            AppState::Star => self.on_star_key(key),
            AppState::Settings => {
                self.on_settings_key(key);
                KeyOutcome::Continue
            }
        }
    }

    fn on_star_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let count = self.game.participants().len();
        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Right | KeyCode::Down if count > 0 => {
                self.focus = (self.focus + 1) % count;
            }
            KeyCode::Left | KeyCode::Up if count > 0 => {
                self.focus = (self.focus + count - 1) % count;
            }
            KeyCode::Enter => {
                if let Some(name) = self.focused_name().map(str::to_string) {
                    let transition = self.game.select_manually(&name);
                    return self.after_transition(transition);
                }
            }
            KeyCode::Char(' ') if count > 0 => {
                let transition = self.game.select_random();
                if let Some(name) = &transition.selected {
                    if let Some(idx) = self.game.participants().iter().position(|n| n == name) {
                        self.focus = idx;
                    }
                }
                return self.after_transition(transition);
            }
            KeyCode::Char('+') => self.penalise(Some(Penalty::ThirtySeconds)),
            KeyCode::Char('d') => self.penalise(Some(Penalty::Disqualified)),
            KeyCode::Char('0') => self.penalise(None),
            KeyCode::Char('r') => {
                self.game.reset();
                self.status = Some("session reset".to_string());
                self.persist();
            }
            KeyCode::Char('s') => self.open_settings(),
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn on_settings_key(&mut self, key: KeyEvent) {
        let save = (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s'))
            || key.code == KeyCode::F(2);
        if save {
            self.save_settings();
            return;
        }

        match key.code {
            KeyCode::Esc => self.state = AppState::Star,
            KeyCode::Up => self.form.up(),
            KeyCode::Down | KeyCode::Tab => self.form.down(),
            KeyCode::Enter => self.form.insert_row(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) => self.form.type_char(c),
            _ => {}
        }
    }

    fn save_settings(&mut self) {
        match self.form.parse() {
            Ok(settings) => {
                settings.apply(&mut self.game);
                self.form.error = None;
                self.focus = self.focus.min(self.game.participants().len().saturating_sub(1));
                self.status = Some("settings saved".to_string());
                self.state = AppState::Star;
                self.persist();
            }
            Err(err) => self.form.error = Some(err.to_string()),
        }
    }

    /// `None` clears any penalty on the focused participant.
    fn penalise(&mut self, penalty: Option<Penalty>) {
        let Some(name) = self.focused_name().map(str::to_string) else {
            return;
        };
        let applied = match penalty {
            Some(penalty) => self.game.toggle_penalty(&name, penalty),
            None => self.game.set_penalty(&name, Penalty::None),
        };
        if applied {
            self.persist();
        }
    }

    fn after_transition(&mut self, transition: Transition) -> KeyOutcome {
        if transition.is_noop() {
            return KeyOutcome::Continue;
        }

        self.status = match (&transition.finished, &transition.selected) {
            (Some((done, time)), Some(next)) => Some(format!(
                "{} finished in {} - {} is up",
                done,
                antininja::timer::format_clock(*time),
                next
            )),
            (Some((done, time)), None) => Some(format!(
                "{} finished in {}",
                done,
                antininja::timer::format_clock(*time)
            )),
            (None, Some(next)) => Some(format!("{} is up", next)),
            (None, None) => None,
        };

        if transition.session_complete {
            self.status = Some("everyone has played - (r)eset for another round".to_string());
            if transition.finished.is_some() {
                self.record_history();
            }
        }
        self.persist();

        if transition.selected.is_some() {
            KeyOutcome::TimerRestarted
        } else {
            KeyOutcome::Continue
        }
    }

    fn record_history(&self) {
        if let Some(history) = &self.history {
            match history.append(self.game.ledger()) {
                Ok(rows) => info!(rows, path = %history.path().display(), "history appended"),
                Err(err) => warn!(%err, "could not append history"),
            }
        }
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save(&self.game) {
                warn!(%err, "could not save session");
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = FileConfigStore::new().load();
    let mut app = match build_app(&cli, &config) {
        Ok(app) => app,
        Err(err) if err.is_validation() => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::ValueValidation, err).exit();
        }
        Err(err) => return Err(err.into()),
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

/// Load the saved session and apply command line overrides. Validation
/// errors leave the saved session untouched.
fn build_app(cli: &Cli, config: &Config) -> antininja::error::Result<App> {
    let state_dir = cli
        .state_dir
        .clone()
        .or_else(AppDirs::state_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    if let Err(err) = logging::init(&state_dir) {
        eprintln!("logging disabled: {}", err);
    }

    let store = SessionStore::in_dir(&state_dir);

    let alarm = cli.alarm.as_deref().map(parse_alarm).transpose()?;
    let settings = cli
        .participants
        .as_ref()
        .map(|names| GameSettings::parse(names.as_slice(), ""))
        .transpose()?;

    // a stored alarm of 0 means the user turned it off
    let fresh = !store.roster.path().exists();
    let mut game = store.load();
    if fresh {
        game.set_alarm(config.alarm_secs);
    }
    if cli.reset {
        game.reset();
    }
    if let Some(settings) = settings {
        game.configure(settings.participants);
    }
    if let Some(alarm) = alarm {
        game.set_alarm(alarm);
    }

    info!(
        participants = game.participants().len(),
        dir = %state_dir.display(),
        "session loaded"
    );

    let history = (config.history && !cli.no_history).then(|| HistoryLog::in_dir(&state_dir));
    let app = App::new(game, Some(store), history);
    app.persist();
    Ok(app)
}

fn start_tui<B: Backend, E: GameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            GameEvent::Tick => {
                if app.on_tick() {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            GameEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            GameEvent::Closed => {
                warn!("input source closed, exiting");
                break;
            }
            GameEvent::Key(key) => {
                match app.on_key(key) {
                    KeyOutcome::Quit => break,
                    KeyOutcome::TimerRestarted => runner.resync(),
                    KeyOutcome::Continue => {}
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    let screen = ui::screen::current_screen(&app.state);
    screen.render(app, f);
}
