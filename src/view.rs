use crate::{
    automaton::{StateId, StateVariant, TransitionId},
    Automaton, Map,
};

/// One end of a transition as seen from a state: the transition, its label and the state on
/// the other side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEnd {
    /// The transition.
    pub transition: TransitionId,
    /// Its label, a blank label shows as the epsilon marker.
    pub label: String,
    /// The state at the other end.
    pub state: StateId,
    /// Label of the state at the other end, or its raw id if that state does not exist.
    pub state_label: String,
}

/// Everything a side panel shows about a single state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInfo {
    /// The state.
    pub id: StateId,
    /// Its label.
    pub label: String,
    /// Its initial and final flags.
    pub variant: StateVariant,
    /// Transitions leaving the state, the other end is the target.
    pub outgoing: Vec<TransitionEnd>,
    /// Transitions entering the state, the other end is the source.
    pub incoming: Vec<TransitionEnd>,
}

impl StateInfo {
    /// Collects the information about the state `id`, `None` if it does not exist.
    pub fn of(automaton: &Automaton, id: &str) -> Option<Self> {
        let labels = label_lookup(automaton);
        Self::with_labels(automaton, id, &labels)
    }

    fn with_labels(automaton: &Automaton, id: &str, labels: &Map<&str, &str>) -> Option<Self> {
        let state = automaton.state(id)?;
        let other_end = |transition: &crate::Transition, other: &StateId| TransitionEnd {
            transition: transition.id.clone(),
            label: transition.display_label().to_string(),
            state: other.clone(),
            state_label: labels
                .get(other.as_str())
                .map_or_else(|| other.to_string(), |label| label.to_string()),
        };

        Some(Self {
            id: state.id.clone(),
            label: state.label.clone(),
            variant: state.variant,
            outgoing: automaton
                .transitions()
                .iter()
                .filter(|transition| transition.source == *id)
                .map(|transition| other_end(transition, &transition.target))
                .collect(),
            incoming: automaton
                .transitions()
                .iter()
                .filter(|transition| transition.target == *id)
                .map(|transition| other_end(transition, &transition.source))
                .collect(),
        })
    }
}

/// A single symbol of an outgoing transition, this is how transitions are listed for editing:
/// a transition labeled `a, b` shows up as two rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRow {
    /// The transition the symbol belongs to.
    pub transition: TransitionId,
    /// The symbol, the epsilon marker for a transition with a blank label.
    pub symbol: String,
    /// Target of the transition.
    pub target: StateId,
    /// Label of the target, or its raw id if the target does not exist.
    pub target_label: String,
    /// All symbols of the transition.
    pub all_symbols: Vec<String>,
}

/// Lists the outgoing transitions of the state `id` symbol by symbol.
pub fn symbol_rows(automaton: &Automaton, id: &str) -> Vec<SymbolRow> {
    let labels = label_lookup(automaton);
    automaton
        .transitions()
        .iter()
        .filter(|transition| transition.source == *id)
        .flat_map(|transition| {
            let all_symbols = transition.symbols();
            let target_label = labels
                .get(transition.target.as_str())
                .map_or_else(|| transition.target.to_string(), |label| label.to_string());
            all_symbols
                .clone()
                .into_iter()
                .map(move |symbol| SymbolRow {
                    transition: transition.id.clone(),
                    symbol,
                    target: transition.target.clone(),
                    target_label: target_label.clone(),
                    all_symbols: all_symbols.clone(),
                })
        })
        .collect()
}

fn label_lookup(automaton: &Automaton) -> Map<&str, &str> {
    automaton
        .states()
        .iter()
        .map(|state| (state.id.as_str(), state.label.as_str()))
        .collect()
}

/// The states currently selected in the editor, in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<StateId>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection.
    pub fn set<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<StateId>,
    {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    /// Adds a state to the selection unless it is selected already.
    pub fn add(&mut self, id: impl Into<StateId>) {
        let id = id.into();
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    /// Removes a state from the selection.
    pub fn remove(&mut self, id: &str) {
        self.ids.retain(|selected| *selected != *id);
    }

    /// Empties the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Returns true if the state is selected.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| *selected == *id)
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The selected ids in selection order.
    pub fn ids(&self) -> &[StateId] {
        &self.ids
    }

    /// Collects [`StateInfo`] for every selected state that still exists.
    pub fn info(&self, automaton: &Automaton) -> Vec<StateInfo> {
        if self.ids.is_empty() {
            return Vec::new();
        }
        let labels = label_lookup(automaton);
        self.ids
            .iter()
            .filter_map(|id| StateInfo::with_labels(automaton, id, &labels))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn state_info_lists_both_directions() {
        let automaton = crate::tests::sample();
        let info = StateInfo::of(&automaton, "n1").unwrap();

        assert_eq!(info.label, "q1");
        assert_eq!(info.variant, StateVariant::Default);
        let outgoing: Vec<_> = info
            .outgoing
            .iter()
            .map(|end| (end.label.as_str(), end.state_label.as_str()))
            .collect();
        assert_eq!(outgoing, [("b, c", "q2"), ("ε", "q1")]);
        let incoming: Vec<_> = info
            .incoming
            .iter()
            .map(|end| (end.transition.as_str(), end.state_label.as_str()))
            .collect();
        assert_eq!(incoming, [("e0", "q0"), ("e2", "q1")]);

        assert!(StateInfo::of(&automaton, "missing").is_none());
    }

    #[test]
    fn dangling_ends_fall_back_to_ids() {
        let mut automaton = crate::tests::sample();
        automaton.add_transition(Transition::new("ghost", "n0", "nowhere"));
        let info = StateInfo::of(&automaton, "n0").unwrap();
        let ghost = info
            .outgoing
            .iter()
            .find(|end| end.transition == "ghost")
            .unwrap();
        assert_eq!(ghost.state_label, "nowhere");
        assert_eq!(ghost.label, "ε");
    }

    #[test]
    fn rows_per_symbol() {
        let automaton = crate::tests::sample();
        let rows = symbol_rows(&automaton, "n1");
        let symbols: Vec<_> = rows
            .iter()
            .map(|row| (row.symbol.as_str(), row.target_label.as_str()))
            .collect();
        assert_eq!(symbols, [("b", "q2"), ("c", "q2"), ("ε", "q1")]);
        assert_eq!(rows[0].all_symbols, ["b", "c"]);

        let mut automaton = automaton;
        automaton.add_transition(Transition::new("blank", "n2", "n0"));
        let rows = symbol_rows(&automaton, "n2");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, EPSILON);
    }

    #[test]
    fn selection_is_a_set() {
        let mut selection = Selection::new();
        selection.add("n0");
        selection.add("n1");
        selection.add("n0");
        assert_eq!(selection.ids(), ["n0", "n1"]);

        selection.remove("n0");
        assert!(!selection.contains("n0"));
        assert!(selection.contains("n1"));

        selection.set(["n2", "n2", "n1"]);
        assert_eq!(selection.ids(), ["n2", "n1"]);

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn selection_info_skips_removed_states() {
        let mut automaton = crate::tests::sample();
        let mut selection = Selection::new();
        selection.set(["n2", "n0"]);
        automaton.remove_state("n2");

        let info = selection.info(&automaton);
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].label, "q0");
        assert_eq!(info[0].outgoing.len(), 1);
        assert_eq!(info[0].outgoing[0].state_label, "q1");
    }
}
