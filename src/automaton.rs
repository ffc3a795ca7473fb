use std::sync::Arc;

use tracing::{trace, warn};

use crate::{label, table::build_transition_table, AutomatonError, TransitionTable};

mod id;
pub use id::{StateId, TransitionId};

mod state;
pub use state::{Position, State, StateUpdate, StateVariant};

mod transition;
pub use transition::{is_valid_connection, Connection, DuplicatePolicy, Transition};

/// Decides whether two states may share a label.
///
/// The table is keyed by state labels, so two states with the same label are silently merged
/// into one row there. [`LabelPolicy::Unique`] rules this out, [`LabelPolicy::Merge`] accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPolicy {
    /// Adding or relabeling a state to a label that is already taken is rejected.
    #[default]
    Unique,
    /// Labels are not checked; states sharing a label are merged in the table.
    Merge,
}

/// Options that an [`Automaton`] is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutomatonOptions {
    /// How state labels are checked.
    pub label_policy: LabelPolicy,
}

impl AutomatonOptions {
    /// Sets the label policy, consuming and returning `self`.
    pub fn with_label_policy(mut self, label_policy: LabelPolicy) -> Self {
        self.label_policy = label_policy;
        self
    }
}

/// An immutable view of the states and transitions of an [`Automaton`] at one point in time.
///
/// Cloning a snapshot is cheap. As every mutation of the store replaces the collection it
/// touches, two snapshots whose collections are the same allocation are guaranteed to be equal,
/// see [`Snapshot::same_as`].
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// All states, in insertion order.
    pub states: Arc<[State]>,
    /// All transitions, in insertion order.
    pub transitions: Arc<[Transition]>,
}

impl Snapshot {
    /// Returns true if both collections of `self` and `other` are the very same allocations.
    pub fn same_as(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.states, &other.states)
            && Arc::ptr_eq(&self.transitions, &other.transitions)
    }

    /// Derives the transition table of this snapshot.
    pub fn transition_table(&self) -> TransitionTable {
        build_transition_table(&self.states, &self.transitions)
    }
}

/// The store that owns the automaton graph, i.e. its states and the transitions between them.
///
/// All mutations keep the graph consistent:
/// - removing a state removes every transition entering or leaving it in the same step,
/// - at most one state is initial, making a state initial demotes whichever state was initial
///   before (it keeps its final flag),
/// - with the default [`LabelPolicy::Unique`], no two states share a label.
///
/// Beyond that the store is permissive. Ids that are unknown to the store are ignored (the call
/// is a no-op), duplicate transitions are accepted (use [`Automaton::is_valid_connection`] to keep
/// them out) and transition labels are stored as given and parsed when read.
///
/// Mutations never modify a collection in place. Instead they build a new one and swap it in,
/// so a [`Snapshot`] taken earlier is unaffected and can be compared by identity.
///
/// ```
/// use ametista::prelude::*;
///
/// let mut automaton = Automaton::default();
/// let first = automaton.next_state_label();
/// automaton.add_state(State::new("a", first).with_variant(StateVariant::Initial))?;
/// let second = automaton.next_state_label();
/// assert_eq!(second, "q1");
/// automaton.add_state(State::new("b", second))?;
/// automaton.add_transition(Transition::new("t", "a", "b").with_label("0"));
///
/// automaton.remove_state("b");
/// assert!(automaton.transitions().is_empty());
/// # Ok::<(), AutomatonError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Arc<[State]>,
    transitions: Arc<[Transition]>,
    options: AutomatonOptions,
}

impl Default for Automaton {
    fn default() -> Self {
        Self::with_options(AutomatonOptions::default())
    }
}

impl Automaton {
    /// Creates an empty automaton with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty automaton with the given options.
    pub fn with_options(options: AutomatonOptions) -> Self {
        Self {
            states: Arc::from(Vec::new()),
            transitions: Arc::from(Vec::new()),
            options,
        }
    }

    /// Returns the options the automaton was created with.
    pub fn options(&self) -> AutomatonOptions {
        self.options
    }

    /// All states in insertion order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// All transitions in insertion order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns a cheap, immutable snapshot of the current graph.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            states: Arc::clone(&self.states),
            transitions: Arc::clone(&self.transitions),
        }
    }

    /// Returns true if there are no states (and thus no transitions).
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Looks up a state by id.
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|state| state.id == *id)
    }

    /// Looks up a transition by id.
    pub fn transition(&self, id: &str) -> Option<&Transition> {
        self.transitions.iter().find(|transition| transition.id == *id)
    }

    /// Returns the initial state, if there is one.
    pub fn initial(&self) -> Option<&State> {
        self.states.iter().find(|state| state.is_initial())
    }

    /// Adds a state. If the state is initial, any other initial state is demoted in the same step.
    ///
    /// Fails if the id is taken, or if the label is taken and the store runs with
    /// [`LabelPolicy::Unique`].
    pub fn add_state(&mut self, state: State) -> Result<(), AutomatonError> {
        if self.state(&state.id).is_some() {
            return Err(AutomatonError::DuplicateId {
                id: state.id.to_string(),
            });
        }
        self.check_label(&state.label, None)?;

        trace!("adding state {} labeled {}", state.id, state.label);
        let mut states = self.states.to_vec();
        if state.is_initial() {
            demote_initial(&mut states, &state.id);
        }
        states.push(state);
        self.states = states.into();
        Ok(())
    }

    /// Removes a state together with all transitions entering or leaving it.
    pub fn remove_state(&mut self, id: &str) {
        if self.state(id).is_none() {
            warn!("cannot remove state {id} that does not exist");
            return;
        }

        let states: Vec<_> = self
            .states
            .iter()
            .filter(|state| state.id != *id)
            .cloned()
            .collect();
        let transitions: Vec<_> = self
            .transitions
            .iter()
            .filter(|transition| !transition.is_incident_to(id))
            .cloned()
            .collect();
        trace!(
            "removing state {id} and {} incident transitions",
            self.transitions.len() - transitions.len()
        );

        self.states = states.into();
        if transitions.len() != self.transitions.len() {
            self.transitions = transitions.into();
        }
    }

    /// Merges the given fields into a state. Setting an initial variant demotes any other initial
    /// state in the same step.
    ///
    /// Fails if the new label is taken by another state and the store runs with
    /// [`LabelPolicy::Unique`]. An unknown id is ignored.
    pub fn update_state(&mut self, id: &str, update: StateUpdate) -> Result<(), AutomatonError> {
        let Some(position) = self.state_position(id) else {
            warn!("cannot update state {id} that does not exist");
            return Ok(());
        };
        if let Some(label) = &update.label {
            self.check_label(label, Some(id))?;
        }

        trace!("updating state {id} with {update:?}");
        let mut states = self.states.to_vec();
        if update.variant.is_some_and(StateVariant::is_initial) {
            demote_initial(&mut states, id);
        }
        update.apply_to(&mut states[position]);
        self.states = states.into();
        Ok(())
    }

    /// Adds a transition. Duplicates are not rejected here, callers check
    /// [`Automaton::is_valid_connection`] first.
    pub fn add_transition(&mut self, transition: Transition) {
        trace!(
            "adding transition {} from {} to {} on {:?}",
            transition.id,
            transition.source,
            transition.target,
            transition.label
        );
        let mut transitions = self.transitions.to_vec();
        transitions.push(transition);
        self.transitions = transitions.into();
    }

    /// Removes a transition, an unknown id is ignored.
    pub fn remove_transition(&mut self, id: &str) {
        if self.transition(id).is_none() {
            warn!("cannot remove transition {id} that does not exist");
            return;
        }
        trace!("removing transition {id}");
        self.transitions = self
            .transitions
            .iter()
            .filter(|transition| transition.id != *id)
            .cloned()
            .collect::<Vec<_>>()
            .into();
    }

    /// Replaces the label of a transition as is, without parsing it. An unknown id is ignored.
    pub fn update_transition_label(&mut self, id: &str, label: impl Into<String>) {
        let label = label.into();
        self.map_transition(id, move |transition| transition.label = label);
    }

    /// Returns true if there is a transition from `source` to `target`, regardless of handles.
    pub fn has_transition(&self, source: &str, target: &str) -> bool {
        self.transitions
            .iter()
            .any(|transition| transition.source == *source && transition.target == *target)
    }

    /// Returns false if `candidate` duplicates an existing transition under `policy`.
    pub fn is_valid_connection(&self, candidate: &Connection, policy: DuplicatePolicy) -> bool {
        is_valid_connection(&self.transitions, candidate, policy)
    }

    /// Computes the label for the next state: `q<N>` where `N` is one more than the largest
    /// number among the labels of the form `q<N>`, or `q0` if there is none.
    ///
    /// Labels of any other form are not taken into account, so after renaming `q3` to `end` the
    /// next label may well be a smaller number again.
    pub fn next_state_label(&self) -> String {
        let next = self
            .states
            .iter()
            .filter_map(|state| label::state_number(&state.label))
            .max()
            .map_or(0, |max| max.saturating_add(1));
        format!("q{next}")
    }

    /// Marks a state as initial or not, keeping its final flag. Marking a state as initial
    /// demotes the previous initial state in the same step.
    pub fn set_initial(&mut self, id: &str, initial: bool) {
        let Some(position) = self.state_position(id) else {
            warn!("cannot set initial flag of state {id} that does not exist");
            return;
        };

        trace!("setting initial flag of state {id} to {initial}");
        let mut states = self.states.to_vec();
        if initial {
            demote_initial(&mut states, id);
        }
        let state = &mut states[position];
        state.variant = state.variant.with_initial(initial);
        self.states = states.into();
    }

    /// Marks a state as final or not, keeping its initial flag. Other states are not affected.
    pub fn set_final(&mut self, id: &str, accepting: bool) {
        let Some(position) = self.state_position(id) else {
            warn!("cannot set final flag of state {id} that does not exist");
            return;
        };

        trace!("setting final flag of state {id} to {accepting}");
        let mut states = self.states.to_vec();
        let state = &mut states[position];
        state.variant = state.variant.with_final(accepting);
        self.states = states.into();
    }

    /// Removes all states and transitions.
    pub fn reset(&mut self) {
        trace!("resetting automaton");
        self.states = Arc::from(Vec::new());
        self.transitions = Arc::from(Vec::new());
    }

    /// Replaces every occurrence of the symbol `old` in the label of a transition by `new`. The
    /// label is rewritten in the canonical `"a, b"` form. `new` is trimmed first. Nothing happens
    /// if the transition does not exist or does not carry `old`, or if `new` is blank or contains
    /// a comma.
    pub fn rename_symbol(&mut self, id: &str, old: &str, new: &str) {
        let Some(symbols) = self.transition(id).map(Transition::symbols) else {
            warn!("cannot rename symbol of transition {id} that does not exist");
            return;
        };
        let new = new.trim();
        if new.is_empty() || new.contains(',') {
            warn!("cannot rename symbol {old} of transition {id} to `{new}`");
            return;
        }
        if !symbols.iter().any(|symbol| symbol == old) {
            return;
        }

        let label = label::join_symbols(
            symbols
                .iter()
                .map(|symbol| if symbol == old { new } else { symbol.as_str() }),
        );
        self.update_transition_label(id, label);
    }

    /// Removes a symbol from the label of a transition. If it is the only symbol the transition
    /// carries, the transition itself is removed. A symbol the transition does not carry is
    /// ignored.
    pub fn remove_symbol(&mut self, id: &str, symbol: &str) {
        let Some(symbols) = self.transition(id).map(Transition::symbols) else {
            warn!("cannot remove symbol of transition {id} that does not exist");
            return;
        };

        if !symbols.iter().any(|s| s == symbol) {
            return;
        }
        if symbols.len() <= 1 {
            self.remove_transition(id);
        } else {
            let label = label::join_symbols(symbols.iter().filter(|s| *s != symbol));
            self.update_transition_label(id, label);
        }
    }

    /// Turns a transition into an empty (epsilon) transition, or back into one reading `a`.
    pub fn set_epsilon(&mut self, id: &str, epsilon: bool) {
        let label = if epsilon { label::EPSILON } else { "a" };
        self.update_transition_label(id, label);
    }

    /// Derives the transition table of the current graph, see [`build_transition_table`].
    pub fn transition_table(&self) -> TransitionTable {
        build_transition_table(&self.states, &self.transitions)
    }

    fn state_position(&self, id: &str) -> Option<usize> {
        self.states.iter().position(|state| state.id == *id)
    }

    fn map_transition<F: FnOnce(&mut Transition)>(&mut self, id: &str, f: F) {
        let Some(position) = self
            .transitions
            .iter()
            .position(|transition| transition.id == *id)
        else {
            warn!("cannot update transition {id} that does not exist");
            return;
        };

        let mut transitions = self.transitions.to_vec();
        f(&mut transitions[position]);
        trace!(
            "updated transition {id}, label is now {:?}",
            transitions[position].label
        );
        self.transitions = transitions.into();
    }

    fn check_label(&self, label: &str, except: Option<&str>) -> Result<(), AutomatonError> {
        if self.options.label_policy == LabelPolicy::Merge {
            return Ok(());
        }
        let taken = self
            .states
            .iter()
            .any(|state| state.label == label && except.map_or(true, |id| state.id != *id));
        if taken {
            return Err(AutomatonError::DuplicateLabel {
                label: label.to_string(),
            });
        }
        Ok(())
    }
}

/// Clears the initial flag of every state except `keep`.
fn demote_initial(states: &mut [State], keep: &str) {
    for state in states
        .iter_mut()
        .filter(|state| state.id != *keep && state.is_initial())
    {
        trace!("demoting previous initial state {}", state.id);
        state.variant = state.variant.with_initial(false);
    }
}
