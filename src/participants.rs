use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParticipantState {
    #[default]
    Waiting,
    Selected,
    Done,
}

/// Ordered roster plus the lifecycle state of every name in it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    names: Vec<String>,
    states: HashMap<String, ParticipantState>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roster. Every name starts out `Waiting`.
    ///
    /// Names are expected to be validated already; an exact duplicate is
    /// dropped so the roster and the state map stay in step.
    pub fn set_participants<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.clear();
        self.states.clear();
        for name in names {
            let name = name.into();
            if self.states.contains_key(&name) {
                continue;
            }
            self.states.insert(name.clone(), ParticipantState::Waiting);
            self.names.push(name);
        }
    }

    /// Rebuild a registry from persisted parts, repairing anything that
    /// disagrees with the roster.
    pub fn restore(names: Vec<String>, mut states: HashMap<String, ParticipantState>) -> Self {
        let mut registry = Registry::new();
        registry.set_participants(names);

        let mut seen_selected = false;
        for name in &registry.names {
            let state = match states.remove(name) {
                Some(ParticipantState::Selected) if seen_selected => ParticipantState::Waiting,
                Some(ParticipantState::Selected) => {
                    seen_selected = true;
                    ParticipantState::Selected
                }
                Some(state) => state,
                None => ParticipantState::Waiting,
            };
            registry.states.insert(name.clone(), state);
        }
        registry
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn state(&self, name: &str) -> Option<ParticipantState> {
        self.states.get(name).copied()
    }

    pub fn states(&self) -> &HashMap<String, ParticipantState> {
        &self.states
    }

    /// Names in the given state, in roster order
    pub fn names_in(&self, state: ParticipantState) -> Vec<&str> {
        self.names
            .iter()
            .filter(|name| self.states.get(name.as_str()) == Some(&state))
            .map(String::as_str)
            .collect()
    }

    pub fn selected(&self) -> Option<&str> {
        self.names_in(ParticipantState::Selected).into_iter().next()
    }

    pub fn all_done(&self) -> bool {
        !self.names.is_empty()
            && self
                .states
                .values()
                .all(|state| *state == ParticipantState::Done)
    }

    pub fn reset_states(&mut self) {
        for state in self.states.values_mut() {
            *state = ParticipantState::Waiting;
        }
    }

    pub(crate) fn set_state(&mut self, name: &str, state: ParticipantState) {
        if let Some(current) = self.states.get_mut(name) {
            *current = state;
        }
    }
}
