//! Data model and derivation engine behind a visual editor for finite automata.
//!
//! The crate is split into two cooperating halves. The [`Automaton`] store owns the canonical
//! graph, that is a list of [`State`]s connected by labeled [`Transition`]s, and only exposes
//! mutations that keep the graph a well-formed finite state machine: deleting a state takes its
//! transitions with it and at most one state is ever marked initial. Every mutation swaps in a
//! fresh immutable snapshot of the collection it touches, so a consumer holding on to a previous
//! [`Snapshot`] can detect a change by pointer comparison alone.
//!
//! The second half is [`build_transition_table`], a pure function from a snapshot to a
//! [`TransitionTable`]. Transition labels are free text (`"a, b"`), which is parsed on read by the
//! helpers in [`label`]. The table is the NFA-general view: each cell holds a sorted set of target
//! labels, and a DFA is the special case where no cell holds more than one. As recomputing on every
//! read is cheap but not free, [`TableCache`] memoizes the table by snapshot identity.
//!
//! On top of the store sit thin, optional layers used by an interactive front end: per-state
//! views in [`view`] and tool dispatch in [`editor`]. Neither is needed to use the core.
//!
//! ```
//! use ametista::prelude::*;
//!
//! let mut automaton = Automaton::default();
//! automaton.add_state(State::new("s0", "q0").with_variant(StateVariant::Initial))?;
//! automaton.add_state(State::new("s1", "q1").with_variant(StateVariant::Final))?;
//! automaton.add_transition(Transition::new("t0", "s0", "s1").with_label("a, b"));
//!
//! let table = automaton.transition_table();
//! assert_eq!(table.alphabet, ["a", "b"]);
//! assert_eq!(table.cell("q0", "b"), ["q1"]);
//! # Ok::<(), AutomatonError>(())
//! ```
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use ametista::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{
            is_valid_connection, Automaton, AutomatonOptions, Connection, DuplicatePolicy,
            LabelPolicy, Position, Snapshot, State, StateId, StateUpdate, StateVariant,
            Transition, TransitionId,
        },
        editor::{Editor, Tool},
        error::AutomatonError,
        label::{self, EPSILON},
        table::{build_transition_table, TableCache, TransitionTable},
        view::{Selection, StateInfo, SymbolRow, TransitionEnd},
        Map, Set, Show,
    };
}

/// Contains the [`Automaton`] store together with the states and transitions it holds.
pub mod automaton;
pub use automaton::{Automaton, Snapshot, State, Transition};

/// Symbol parsing and label ordering helpers shared by the store and the table builder.
pub mod label;

/// Derivation of the [`TransitionTable`] from a snapshot of the store.
pub mod table;
pub use table::{build_transition_table, TableCache, TransitionTable};

/// Derived per-state views and the selection they are computed for.
pub mod view;

/// Tool-driven editing on top of the store.
pub mod editor;

mod error;
pub use error::AutomatonError;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Helper trait which can be used to display states, labels and cells of the table.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state this should be its
    /// label and for a set of targets something like `{q1, q2}`.
    fn show(&self) -> String;
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        match self {
            [] => "-".to_string(),
            [single] => single.show(),
            many => format!(
                "{{{}}}",
                itertools::Itertools::join(&mut many.iter().map(Show::show), ", ")
            ),
        }
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// The small NFA used throughout the tests: `q0 -a-> q1`, `q1 -b,c-> q2` and an
    /// epsilon loop on `q1`.
    pub fn sample() -> Automaton {
        let mut automaton = Automaton::default();
        automaton
            .add_state(State::new("n0", "q0").with_variant(StateVariant::Initial))
            .unwrap();
        automaton.add_state(State::new("n1", "q1")).unwrap();
        automaton
            .add_state(State::new("n2", "q2").with_variant(StateVariant::Final))
            .unwrap();
        automaton.add_transition(Transition::new("e0", "n0", "n1").with_label("a"));
        automaton.add_transition(Transition::new("e1", "n1", "n2").with_label("b, c"));
        automaton.add_transition(Transition::new("e2", "n1", "n1").with_label(EPSILON));
        automaton
    }

    #[test]
    fn show_cells() {
        assert_eq!(Vec::<String>::new().show(), "-");
        assert_eq!(vec!["q1".to_string()].show(), "q1");
        assert_eq!(vec!["q1".to_string(), "q2".to_string()].show(), "{q1, q2}");
    }

    #[test]
    fn sample_is_consistent() {
        let automaton = sample();
        assert_eq!(automaton.states().len(), 3);
        assert_eq!(automaton.transitions().len(), 3);
        assert_eq!(automaton.initial().map(|q| q.label.as_str()), Some("q0"));
    }
}
