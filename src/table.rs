use std::collections::BTreeSet;

use tracing::debug;

use crate::{label, Map, State, Transition};

mod cache;
pub use cache::TableCache;

#[cfg(feature = "render")]
mod render;

/// The canonical tabular view of an automaton: for every state and every input symbol the set
/// of states that can be reached.
///
/// Everything is keyed by state labels rather than ids. Each cell is a sorted list without
/// duplicates, which makes this the general representation of an NFA. A DFA is the special case
/// where no cell holds more than one state, see [`TransitionTable::is_deterministic`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionTable {
    /// Labels of all states, numbered labels in numeric order, see [`label::sort_state_labels`].
    pub states: Vec<String>,
    /// All symbols used by some transition, sorted. The epsilon marker is never part of it.
    pub alphabet: Vec<String>,
    /// Label of the initial state.
    pub initial: Option<String>,
    /// Labels of all final states, sorted.
    pub finals: Vec<String>,
    /// Maps a state label and a symbol to the sorted labels of the reachable states. The grid is
    /// dense: every state has an entry for every symbol, possibly empty.
    pub table: Map<String, Map<String, Vec<String>>>,
}

impl TransitionTable {
    /// Returns the targets reached from `state` on `symbol`, empty if there are none or if the
    /// state or symbol are unknown.
    pub fn cell(&self, state: &str, symbol: &str) -> &[String] {
        self.table
            .get(state)
            .and_then(|row| row.get(symbol))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates over the rows in the order of [`TransitionTable::states`], each row lists the
    /// cells in the order of [`TransitionTable::alphabet`].
    pub fn rows(&self) -> impl Iterator<Item = (&str, Vec<&[String]>)> + '_ {
        self.states.iter().map(move |state| {
            let cells = self
                .alphabet
                .iter()
                .map(|symbol| self.cell(state, symbol))
                .collect();
            (state.as_str(), cells)
        })
    }

    /// Returns true if there are no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns true if no cell holds more than one target state.
    pub fn is_deterministic(&self) -> bool {
        self.table
            .values()
            .flat_map(|row| row.values())
            .all(|targets| targets.len() <= 1)
    }

    /// Returns true if `state` is the initial state.
    pub fn is_initial(&self, state: &str) -> bool {
        self.initial.as_deref() == Some(state)
    }

    /// Returns true if `state` is a final state.
    pub fn is_final(&self, state: &str) -> bool {
        self.finals.iter().any(|label| label == state)
    }

    /// The alphabet as it is shown in the status line, e.g. `Σ = {a, b}`.
    pub fn alphabet_display(&self) -> String {
        label::alphabet_display(&self.alphabet)
    }
}

/// Derives the [`TransitionTable`] for the given states and transitions.
///
/// This is a pure function, calling it twice on the same input yields equal tables. Transitions
/// whose source or target is not among `states` are skipped, as are transitions with a blank
/// label. Epsilon symbols never show up in the table.
///
/// If two states share a label, they are merged into a single row.
pub fn build_transition_table(states: &[State], transitions: &[Transition]) -> TransitionTable {
    let labels: Map<&str, &str> = states
        .iter()
        .map(|state| (state.id.as_str(), state.label.as_str()))
        .collect();

    let mut sorted_states: Vec<String> = states.iter().map(|state| state.label.clone()).collect();
    label::sort_state_labels(&mut sorted_states);

    let alphabet: Vec<String> = transitions
        .iter()
        .flat_map(|transition| label::alphabet_symbols(&transition.label))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let initial = states
        .iter()
        .find(|state| state.is_initial())
        .map(|state| state.label.clone());

    let mut finals: Vec<String> = states
        .iter()
        .filter(|state| state.is_final())
        .map(|state| state.label.clone())
        .collect();
    finals.sort();

    let mut table: Map<String, Map<String, Vec<String>>> = sorted_states
        .iter()
        .map(|state| {
            let row = alphabet
                .iter()
                .map(|symbol| (symbol.clone(), Vec::new()))
                .collect();
            (state.clone(), row)
        })
        .collect();

    for transition in transitions {
        let (Some(source), Some(target)) = (
            labels.get(transition.source.as_str()),
            labels.get(transition.target.as_str()),
        ) else {
            debug!(
                "skipping transition {} with a missing endpoint",
                transition.id
            );
            continue;
        };
        if transition.label.trim().is_empty() {
            continue;
        }

        for symbol in label::symbols(&transition.label) {
            let Some(cell) = table.get_mut(*source).and_then(|row| row.get_mut(symbol)) else {
                continue;
            };
            if let Err(position) = cell.binary_search_by(|present| present.as_str().cmp(*target)) {
                cell.insert(position, (*target).to_string());
            }
        }
    }

    debug!(
        "derived transition table with {} states over {} symbols",
        sorted_states.len(),
        alphabet.len()
    );
    TransitionTable {
        states: sorted_states,
        alphabet,
        initial,
        finals,
        table,
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test_log::test]
    fn sample_table() {
        let table = crate::tests::sample().transition_table();

        assert_eq!(table.states, ["q0", "q1", "q2"]);
        assert_eq!(table.alphabet, ["a", "b", "c"]);
        assert_eq!(table.initial.as_deref(), Some("q0"));
        assert_eq!(table.finals, ["q2"]);

        assert_eq!(table.cell("q0", "a"), ["q1"]);
        assert_eq!(table.cell("q1", "b"), ["q2"]);
        assert_eq!(table.cell("q1", "c"), ["q2"]);
        for (state, symbol) in [
            ("q0", "b"),
            ("q0", "c"),
            ("q1", "a"),
            ("q2", "a"),
            ("q2", "b"),
            ("q2", "c"),
        ] {
            assert!(table.cell(state, symbol).is_empty(), "{state}.{symbol}");
        }
        assert!(table.is_deterministic());
    }

    #[test]
    fn grid_is_dense() {
        let table = crate::tests::sample().transition_table();
        assert_eq!(table.table.len(), 3);
        for row in table.table.values() {
            assert_eq!(row.len(), 3);
        }
        let rows: Vec<_> = table.rows().map(|(state, cells)| (state, cells.len())).collect();
        assert_eq!(rows, [("q0", 3), ("q1", 3), ("q2", 3)]);
    }

    #[test]
    fn idempotent() {
        let snapshot = crate::tests::sample().snapshot();
        assert_eq!(snapshot.transition_table(), snapshot.transition_table());
    }

    #[test]
    fn parallel_transitions_are_deduplicated() {
        let mut automaton = crate::tests::sample();
        automaton.add_transition(Transition::new("dup", "n0", "n1").with_label("a"));
        automaton.add_transition(Transition::new("twice", "n0", "n2").with_label("a, a"));

        let table = automaton.transition_table();
        assert_eq!(table.cell("q0", "a"), ["q1", "q2"]);
        assert!(!table.is_deterministic());
    }

    #[test]
    fn duplicate_symbol_within_label() {
        let mut automaton = Automaton::default();
        automaton.add_state(State::new("n0", "q0")).unwrap();
        automaton.add_state(State::new("n2", "q2")).unwrap();
        automaton.add_transition(Transition::new("e", "n0", "n2").with_label("a, a"));

        assert_eq!(automaton.transition_table().cell("q0", "a"), ["q2"]);
    }

    #[test]
    fn cells_are_sorted() {
        let mut automaton = Automaton::default();
        for (id, label) in [("a", "s"), ("b", "z"), ("c", "m"), ("d", "b")] {
            automaton.add_state(State::new(id, label)).unwrap();
        }
        automaton.add_transition(Transition::new("1", "a", "b").with_label("x"));
        automaton.add_transition(Transition::new("2", "a", "c").with_label("x"));
        automaton.add_transition(Transition::new("3", "a", "d").with_label("x, y"));

        let table = automaton.transition_table();
        assert_eq!(table.states, ["b", "m", "s", "z"]);
        assert_eq!(table.cell("s", "x"), ["b", "m", "z"]);
        assert_eq!(table.cell("s", "y"), ["b"]);
    }

    #[test]
    fn numeric_state_order() {
        let mut automaton = Automaton::default();
        for (id, label) in [("a", "q10"), ("b", "q2"), ("c", "q1")] {
            automaton.add_state(State::new(id, label)).unwrap();
        }
        assert_eq!(automaton.transition_table().states, ["q1", "q2", "q10"]);
    }

    #[test]
    fn epsilon_and_blank_labels() {
        let mut automaton = Automaton::default();
        automaton.add_state(State::new("n0", "q0")).unwrap();
        automaton.add_state(State::new("n1", "q1")).unwrap();
        automaton.add_transition(Transition::new("e0", "n0", "n1"));
        automaton.add_transition(Transition::new("e1", "n0", "n1").with_label("   "));
        automaton.add_transition(Transition::new("e2", "n1", "n0").with_label("ε"));

        let table = automaton.transition_table();
        assert!(table.alphabet.is_empty());
        assert_eq!(table.states, ["q0", "q1"]);
        assert!(table.table.values().all(|row| row.is_empty()));
        assert_eq!(table.alphabet_display(), "Σ = ∅");

        automaton.update_transition_label("e2", "ε, b");
        let table = automaton.transition_table();
        assert_eq!(table.alphabet, ["b"]);
        assert_eq!(table.cell("q1", "b"), ["q0"]);
        assert!(table.cell("q1", "ε").is_empty());
    }

    #[test]
    fn dangling_transitions_are_skipped() {
        let states = vec![State::new("n0", "q0")];
        let transitions = vec![
            Transition::new("e0", "n0", "gone").with_label("a"),
            Transition::new("e1", "gone", "n0").with_label("b"),
        ];

        let table = build_transition_table(&states, &transitions);
        assert_eq!(table.alphabet, strings(&["a", "b"]));
        assert!(table.cell("q0", "a").is_empty());
        assert!(table.cell("q0", "b").is_empty());
    }

    #[test]
    fn no_states() {
        let transitions = vec![Transition::new("e0", "x", "y").with_label("a")];
        let table = build_transition_table(&[], &transitions);
        assert!(table.is_empty());
        assert_eq!(table.alphabet, ["a"]);
        assert!(table.table.is_empty());
        assert_eq!(table.initial, None);
        assert!(table.finals.is_empty());
    }

    #[test]
    fn initial_and_finals() {
        let mut automaton = Automaton::default();
        automaton
            .add_state(State::new("n0", "q5").with_variant(StateVariant::Final))
            .unwrap();
        automaton
            .add_state(State::new("n1", "q3").with_variant(StateVariant::InitialFinal))
            .unwrap();
        automaton.add_state(State::new("n2", "q4")).unwrap();

        let table = automaton.transition_table();
        assert_eq!(table.initial.as_deref(), Some("q3"));
        assert_eq!(table.finals, ["q3", "q5"]);
        assert!(table.is_initial("q3"));
        assert!(table.is_final("q5"));
        assert!(!table.is_final("q4"));
    }

    #[test]
    fn shared_labels_merge_rows() {
        let options = AutomatonOptions::default().with_label_policy(LabelPolicy::Merge);
        let mut automaton = Automaton::with_options(options);
        automaton.add_state(State::new("a", "q0")).unwrap();
        automaton.add_state(State::new("b", "q0")).unwrap();
        automaton.add_state(State::new("c", "q1")).unwrap();
        automaton.add_transition(Transition::new("1", "a", "c").with_label("x"));
        automaton.add_transition(Transition::new("2", "b", "a").with_label("x"));

        let table = automaton.transition_table();
        assert_eq!(table.states, ["q0", "q0", "q1"]);
        assert_eq!(table.table.len(), 2);
        assert_eq!(table.cell("q0", "x"), ["q0", "q1"]);
    }
}
