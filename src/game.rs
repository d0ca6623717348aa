use rand::Rng;
use tracing::{debug, info};

use crate::participants::{ParticipantState, Registry};
use crate::results::{Ledger, Penalty};
use crate::timer::Timer;

/// What a selection operation changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// participant moved to `Done` and the time recorded for them
    pub finished: Option<(String, u64)>,
    /// participant moved to `Selected`; the timer was restarted
    pub selected: Option<String>,
    pub session_complete: bool,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.finished.is_none() && self.selected.is_none() && !self.session_complete
    }
}

/// Owns the roster, the clock and the results so every transition
/// captures, commits, resets and restarts in one step.
#[derive(Debug, Clone, Default)]
pub struct Game {
    registry: Registry,
    timer: Timer,
    ledger: Ledger,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(registry: Registry, timer: Timer, ledger: Ledger) -> Self {
        Self {
            registry,
            timer,
            ledger,
        }
    }

    /// Install a new roster. Starts a fresh session; the alarm setting
    /// survives.
    pub fn configure<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timer.reset();
        self.registry.set_participants(names);
        self.ledger.clear();
        info!(participants = self.registry.len(), "roster configured");
    }

    pub fn reset(&mut self) {
        self.timer.reset();
        self.registry.reset_states();
        self.ledger.clear();
        info!("session reset");
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn participants(&self) -> &[String] {
        self.registry.names()
    }

    pub fn state_of(&self, name: &str) -> Option<ParticipantState> {
        self.registry.state(name)
    }

    pub fn selected(&self) -> Option<&str> {
        self.registry.selected()
    }

    pub fn elapsed(&self) -> u64 {
        self.timer.elapsed()
    }

    pub fn alarm_exceeded(&self) -> bool {
        self.timer.alarm_exceeded()
    }

    pub fn is_session_complete(&self) -> bool {
        self.registry.all_done()
    }

    pub fn tick(&mut self) {
        self.timer.tick();
    }

    pub fn set_alarm(&mut self, seconds: u64) {
        self.timer.set_alarm(seconds);
    }

    /// Returns false if `name` has no result to annotate.
    pub fn set_penalty(&mut self, name: &str, penalty: Penalty) -> bool {
        let applied = self.ledger.set_penalty(name, penalty);
        if applied {
            info!(%name, %penalty, "penalty set");
        } else {
            debug!(%name, "penalty ignored: no result recorded");
        }
        applied
    }

    /// Flip a penalty on or off for `name`.
    pub fn toggle_penalty(&mut self, name: &str, penalty: Penalty) -> bool {
        let current = match self.ledger.get(name) {
            Some(entry) => entry.penalty,
            None => {
                debug!(%name, "penalty ignored: no result recorded");
                return false;
            }
        };
        self.set_penalty(name, current.toggled(penalty))
    }

    pub fn select_manually(&mut self, name: &str) -> Transition {
        match self.registry.state(name) {
            Some(ParticipantState::Waiting) => {
                let finished = self.finish_selected();
                self.begin_turn(name);
                Transition {
                    finished,
                    selected: Some(name.to_string()),
                    session_complete: false,
                }
            }
            Some(ParticipantState::Selected) => {
                let finished = self.finish_selected();
                self.timer.reset();
                Transition {
                    finished,
                    selected: None,
                    session_complete: self.complete_if_done(),
                }
            }
            Some(ParticipantState::Done) | None => {
                debug!(%name, "manual selection ignored");
                Transition::default()
            }
        }
    }

    pub fn select_random(&mut self) -> Transition {
        self.select_random_with(&mut rand::thread_rng())
    }

    /// Random selection among `Waiting` participants, drawing from `rng`.
    pub fn select_random_with<R: Rng>(&mut self, rng: &mut R) -> Transition {
        let waiting: Vec<String> = self
            .registry
            .names_in(ParticipantState::Waiting)
            .into_iter()
            .map(str::to_string)
            .collect();

        let finished = self.finish_selected();

        if waiting.is_empty() {
            self.timer.pause();
            let session_complete = self.complete_if_done();
            return Transition {
                finished,
                selected: None,
                session_complete,
            };
        }

        let pick = &waiting[rng.gen_range(0..waiting.len())];
        self.begin_turn(pick);
        Transition {
            finished,
            selected: Some(pick.clone()),
            session_complete: false,
        }
    }

    /// Move the selected participant to `Done`, recording the clock as it
    /// stands. The timer is left untouched for the caller to reset.
    fn finish_selected(&mut self) -> Option<(String, u64)> {
        let name = self.registry.selected()?.to_string();
        let time = self.timer.elapsed();
        self.registry.set_state(&name, ParticipantState::Done);
        self.ledger.add_result(&name, time);
        info!(%name, time, "turn finished");
        Some((name, time))
    }

    fn begin_turn(&mut self, name: &str) {
        self.registry.set_state(name, ParticipantState::Selected);
        self.timer.reset();
        self.timer.start();
        info!(%name, "turn started");
    }

    fn complete_if_done(&mut self) -> bool {
        if self.registry.all_done() {
            self.timer.pause();
            info!(results = self.ledger.len(), "session complete");
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game(names: &[&str]) -> Game {
        let mut game = Game::new();
        game.configure(names.iter().copied());
        game
    }

    fn run_ticks(game: &mut Game, n: u64) {
        for _ in 0..n {
            game.tick();
        }
    }

    fn selected_count(game: &Game) -> usize {
        game.registry()
            .names_in(ParticipantState::Selected)
            .len()
    }

    #[test]
    fn configure_starts_fresh() {
        let mut g = game(&["A", "B", "C"]);
        g.select_manually("A");
        run_ticks(&mut g, 3);
        g.select_manually("A");

        g.configure(["D", "E", "F"]);
        assert!(g.ledger().is_empty());
        assert_eq!(g.elapsed(), 0);
        assert!(!g.timer().is_running());
        for name in g.participants() {
            assert_eq!(g.state_of(name), Some(ParticipantState::Waiting));
        }
    }

    #[test]
    fn manual_select_waiting_starts_timer() {
        let mut g = game(&["A", "B", "C"]);
        let t = g.select_manually("B");
        assert_eq!(t.selected.as_deref(), Some("B"));
        assert_eq!(t.finished, None);
        assert_eq!(g.selected(), Some("B"));
        assert!(g.timer().is_running());
        assert_eq!(g.elapsed(), 0);
    }

    #[test]
    fn manual_select_other_finishes_current_before_reset() {
        let mut g = game(&["A", "B", "C"]);
        g.select_manually("A");
        run_ticks(&mut g, 7);

        let t = g.select_manually("C");
        assert_eq!(t.finished, Some(("A".to_string(), 7)));
        assert_eq!(g.state_of("A"), Some(ParticipantState::Done));
        assert_eq!(g.selected(), Some("C"));
        assert_eq!(g.ledger().get("A").unwrap().time, 7);
        assert_eq!(g.elapsed(), 0);
        assert!(g.timer().is_running());
    }

    #[test]
    fn manual_select_selected_finishes_and_waits() {
        let mut g = game(&["A", "B", "C"]);
        g.select_manually("A");
        run_ticks(&mut g, 5);

        let t = g.select_manually("A");
        assert_eq!(t.finished, Some(("A".to_string(), 5)));
        assert!(!t.session_complete);
        assert_eq!(g.state_of("A"), Some(ParticipantState::Done));
        assert_eq!(g.elapsed(), 0);
        assert!(!g.timer().is_running());
    }

    #[test]
    fn manual_select_done_is_noop() {
        let mut g = game(&["A", "B", "C"]);
        g.select_manually("A");
        run_ticks(&mut g, 2);
        g.select_manually("B");
        run_ticks(&mut g, 4);

        let t = g.select_manually("A");
        assert!(t.is_noop());
        assert_eq!(g.selected(), Some("B"));
        assert_eq!(g.elapsed(), 4);
        assert_eq!(g.ledger().get("A").unwrap().time, 2);
    }

    #[test]
    fn manual_select_unknown_is_noop() {
        let mut g = game(&["A", "B", "C"]);
        assert!(g.select_manually("Z").is_noop());
    }

    #[test]
    fn finishing_last_participant_completes_session() {
        let mut g = game(&["A", "B", "C"]);
        for name in ["A", "B", "C"] {
            g.select_manually(name);
            run_ticks(&mut g, 1);
        }
        let t = g.select_manually("C");
        assert!(t.session_complete);
        assert!(g.is_session_complete());
        assert!(!g.timer().is_running());
        assert_eq!(g.ledger().len(), 3);
    }

    #[test]
    fn random_never_picks_done() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut g = game(&["A", "B", "C"]);
        g.select_manually("A");
        g.select_manually("A");

        for _ in 0..2 {
            let t = g.select_random_with(&mut rng);
            assert_matches!(t.selected.as_deref(), Some("B") | Some("C"));
        }
    }

    #[test]
    fn random_exhaustion_is_terminal() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut g = game(&["A", "B", "C"]);
        for _ in 0..3 {
            g.select_random_with(&mut rng);
            run_ticks(&mut g, 2);
        }

        let t = g.select_random_with(&mut rng);
        assert_matches!(t.finished, Some((_, 2)));
        assert_eq!(t.selected, None);
        assert!(t.session_complete);
        assert!(!g.timer().is_running());

        let again = g.select_random_with(&mut rng);
        assert_eq!(again.selected, None);
        assert_eq!(again.finished, None);
        assert!(again.session_complete);
        assert_eq!(g.ledger().len(), 3);
    }

    #[test]
    fn at_most_one_selected_through_mixed_operations() {
        let mut rng = StdRng::seed_from_u64(42);
        let names = ["A", "B", "C", "D", "E"];
        let mut g = game(&names);
        for step in 0..40usize {
            if step % 3 == 0 {
                g.select_manually(names[step % names.len()]);
            } else {
                g.select_random_with(&mut rng);
            }
            g.tick();
            assert!(selected_count(&g) <= 1);
        }
    }

    #[test]
    fn penalty_toggle_through_game() {
        let mut g = game(&["A", "B", "C"]);
        assert!(!g.toggle_penalty("A", Penalty::ThirtySeconds));

        g.select_manually("A");
        g.select_manually("A");
        assert!(g.toggle_penalty("A", Penalty::ThirtySeconds));
        assert_eq!(g.ledger().get("A").unwrap().penalty, Penalty::ThirtySeconds);
        assert!(g.toggle_penalty("A", Penalty::ThirtySeconds));
        assert_eq!(g.ledger().get("A").unwrap().penalty, Penalty::None);
    }

    #[test]
    fn reset_keeps_roster_and_alarm() {
        let mut g = game(&["A", "B", "C"]);
        g.set_alarm(45);
        g.select_manually("A");
        run_ticks(&mut g, 3);
        g.reset();

        assert_eq!(g.participants(), ["A", "B", "C"]);
        assert_eq!(g.registry().names_in(ParticipantState::Waiting).len(), 3);
        assert!(g.ledger().is_empty());
        assert_eq!(g.elapsed(), 0);
        assert_eq!(g.timer().alarm(), 45);
    }
}
