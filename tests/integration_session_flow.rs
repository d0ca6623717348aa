use std::collections::HashMap;

use antininja::game::Game;
use antininja::participants::ParticipantState;
use antininja::results::{Ledger, Penalty};
use antininja::settings::GameSettings;
use assert_matches::assert_matches;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn game(names: &[&str]) -> Game {
    let settings = GameSettings::parse(names, "").unwrap();
    let mut game = Game::new();
    settings.apply(&mut game);
    game
}

#[test]
fn fresh_roster_is_all_waiting_with_empty_ledger() {
    let g = game(&["Ann", "Bob", "Cid", "Dee"]);
    assert!(g.ledger().is_empty());
    assert_eq!(g.registry().names_in(ParticipantState::Waiting).len(), 4);
    assert!(!g.is_session_complete());
}

#[test]
fn end_to_end_manual_finish_then_random() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut g = game(&["A", "B", "C"]);

    let first = g.select_random_with(&mut rng).selected.unwrap();
    for _ in 0..5 {
        g.tick();
    }

    let t = g.select_manually(&first);
    assert_eq!(t.finished, Some((first.clone(), 5)));
    assert_eq!(g.ledger().get(&first).unwrap().time, 5);
    assert_eq!(g.elapsed(), 0);
    assert!(!g.timer().is_running());
    assert!(!g.is_session_complete());

    for _ in 0..20 {
        let mut trial = g.clone();
        let picked = trial.select_random_with(&mut rng).selected.unwrap();
        assert_ne!(picked, first);
        assert!(trial.timer().is_running());
    }
}

#[test]
fn repeated_random_records_each_participant_once_with_captured_time() {
    let mut rng = StdRng::seed_from_u64(11);
    let names = ["A", "B", "C", "D", "E", "F"];
    let mut g = game(&names);
    let mut expected = HashMap::new();

    let mut turn = 0u64;
    loop {
        let t = g.select_random_with(&mut rng);
        if let Some((name, time)) = t.finished {
            assert_eq!(time, expected[&name]);
        }
        if t.session_complete {
            break;
        }
        let current = t.selected.unwrap();
        turn += 1;
        for _ in 0..turn {
            g.tick();
        }
        expected.insert(current, turn);
    }

    assert_eq!(g.ledger().len(), names.len());
    for (name, time) in &expected {
        assert_eq!(g.ledger().get(name).unwrap().time, *time);
    }
}

#[test]
fn random_selection_is_roughly_uniform() {
    let mut rng = StdRng::seed_from_u64(2024);
    let names = ["A", "B", "C", "D"];
    let base = game(&names);
    let trials = 8000;
    let mut counts: HashMap<String, usize> = HashMap::new();

    for _ in 0..trials {
        let mut g = base.clone();
        let picked = g.select_random_with(&mut rng).selected.unwrap();
        *counts.entry(picked).or_default() += 1;
    }

    let expected = trials as f64 / names.len() as f64;
    for name in names {
        let count = counts.get(name).copied().unwrap_or(0) as f64;
        assert!(
            (count - expected).abs() < expected * 0.1,
            "{name} picked {count} times, expected about {expected}"
        );
    }
}

#[test]
fn ranking_example_from_penalties() {
    let mut ledger = Ledger::new();
    ledger.add_result("A", 40);
    ledger.add_result("B", 30);
    ledger.add_result("C", 20);
    ledger.set_penalty("B", Penalty::ThirtySeconds);
    ledger.set_penalty("C", Penalty::Disqualified);

    let ranked: Vec<(&str, u64)> = ledger
        .ranked()
        .iter()
        .map(|e| (e.name.as_str(), e.effective_time()))
        .collect();
    assert_eq!(ranked, [("A", 40), ("B", 60), ("C", 20)]);
}

#[test]
fn rerecorded_time_replaces_entry() {
    let mut ledger = Ledger::new();
    ledger.add_result("A", 10);
    ledger.add_result("A", 12);
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.get("A").unwrap().time, 12);
}

#[test]
fn penalties_reorder_finished_session() {
    let mut g = game(&["A", "B", "C"]);
    for (name, secs) in [("A", 10), ("B", 20), ("C", 30)] {
        g.select_manually(name);
        for _ in 0..secs {
            g.tick();
        }
    }
    let t = g.select_manually("C");
    assert!(t.session_complete);

    g.set_penalty("A", Penalty::ThirtySeconds);
    let order: Vec<&str> = g.ledger().ranked().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(order, ["B", "C", "A"]);

    assert!(!g.set_penalty("Z", Penalty::Disqualified));
    assert_matches!(g.ledger().get("A").map(|e| e.penalty), Some(Penalty::ThirtySeconds));
}

#[test]
fn alarm_flags_without_stopping() {
    let mut g = game(&["A", "B", "C"]);
    GameSettings::parse(&["A", "B", "C"], "00:03")
        .unwrap()
        .apply(&mut g);
    g.select_manually("B");
    for _ in 0..4 {
        g.tick();
    }
    assert!(g.alarm_exceeded());
    assert!(g.timer().is_running());
    assert_eq!(g.elapsed(), 4);
}
