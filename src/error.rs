use thiserror::Error;

/// Errors that can be raised by mutations of an [`Automaton`](crate::Automaton).
///
/// Almost every operation on the store is total and silently ignores ids it does not know.
/// Two mutations are rejected: adding a state under an id that is already taken, and giving two
/// states the same label while the store runs with
/// [`LabelPolicy::Unique`](crate::prelude::LabelPolicy::Unique).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// Another state already carries the requested label.
    #[error("a state labeled `{label}` already exists")]
    DuplicateLabel {
        /// The label that collided.
        label: String,
    },
    /// A state with the given id is already part of the automaton.
    #[error("a state with id `{id}` already exists")]
    DuplicateId {
        /// The id that collided.
        id: String,
    },
}
