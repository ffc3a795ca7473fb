use crate::label;

use super::{StateId, TransitionId};

/// A directed edge of the automaton graph.
///
/// The label is free text and is only parsed when a derived view is built, see [`label`].
/// A transition with a blank label carries no input symbol and is treated like one labeled
/// [`EPSILON`](label::EPSILON).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    /// Identifies the transition.
    pub id: TransitionId,
    /// The state the transition leaves.
    pub source: StateId,
    /// The state the transition enters.
    pub target: StateId,
    /// Which side of the source state the transition is attached to, only used for drawing.
    pub source_handle: Option<String>,
    /// Which side of the target state the transition is attached to, only used for drawing.
    pub target_handle: Option<String>,
    /// Comma separated input symbols or the epsilon marker.
    pub label: String,
}

impl Transition {
    /// Creates an unlabeled transition without handles.
    pub fn new(
        id: impl Into<TransitionId>,
        source: impl Into<StateId>,
        target: impl Into<StateId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            label: String::new(),
        }
    }

    /// Creates the transition described by a [`Connection`].
    pub fn from_connection(id: impl Into<TransitionId>, connection: Connection) -> Self {
        Self {
            id: id.into(),
            source: connection.source,
            target: connection.target,
            source_handle: connection.source_handle,
            target_handle: connection.target_handle,
            label: String::new(),
        }
    }

    /// Sets the label, consuming and returning `self`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets both handles, consuming and returning `self`.
    pub fn with_handles(
        mut self,
        source_handle: Option<impl Into<String>>,
        target_handle: Option<impl Into<String>>,
    ) -> Self {
        self.source_handle = source_handle.map(Into::into);
        self.target_handle = target_handle.map(Into::into);
        self
    }

    /// Returns true if the transition touches the given state.
    pub fn is_incident_to(&self, state: &str) -> bool {
        self.source == *state || self.target == *state
    }

    /// Returns true if the transition carries no input symbol, it is drawn as an empty
    /// transition then.
    pub fn is_empty(&self) -> bool {
        label::is_empty_label(&self.label)
    }

    /// Returns true if the label is exactly the epsilon marker.
    pub fn is_epsilon(&self) -> bool {
        label::is_epsilon(&self.label)
    }

    /// The symbols of this transition as they are listed in the per-state editor: the parsed
    /// label, or just the epsilon marker if the label is blank.
    pub fn symbols(&self) -> Vec<String> {
        let symbols: Vec<String> = label::symbols(&self.label).map(str::to_string).collect();
        if symbols.is_empty() {
            vec![label::EPSILON.to_string()]
        } else {
            symbols
        }
    }

    /// The label as it should be displayed, blank labels show as the epsilon marker.
    pub fn display_label(&self) -> &str {
        match self.label.trim() {
            "" => label::EPSILON,
            _ => self.label.as_str(),
        }
    }

    fn connects(&self, candidate: &Connection, policy: DuplicatePolicy) -> bool {
        self.source == candidate.source
            && self.target == candidate.target
            && match policy {
                DuplicatePolicy::IgnoreHandles => true,
                DuplicatePolicy::MatchHandles => {
                    self.source_handle == candidate.source_handle
                        && self.target_handle == candidate.target_handle
                }
            }
    }
}

/// A prospective transition between two states, as produced when the user connects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    /// The state the transition would leave.
    pub source: StateId,
    /// The state the transition would enter.
    pub target: StateId,
    /// Handle on the source state, if any.
    pub source_handle: Option<String>,
    /// Handle on the target state, if any.
    pub target_handle: Option<String>,
}

impl Connection {
    /// A connection between two states that does not use handles.
    pub fn new(source: impl Into<StateId>, target: impl Into<StateId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Sets both handles, consuming and returning `self`.
    pub fn with_handles(
        mut self,
        source_handle: Option<impl Into<String>>,
        target_handle: Option<impl Into<String>>,
    ) -> Self {
        self.source_handle = source_handle.map(Into::into);
        self.target_handle = target_handle.map(Into::into);
        self
    }
}

/// Decides when two transitions between the same pair of states count as duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Duplicates must also agree on both handles, a missing handle only equals a missing handle.
    /// This is what dragging a connection between two handles uses.
    #[default]
    MatchHandles,
    /// Any existing transition from the same source to the same target is a duplicate. This is
    /// what the transition tool uses.
    IgnoreHandles,
}

/// Returns false if `candidate` would duplicate one of the `transitions` under the given policy.
///
/// The store itself accepts duplicates, this predicate is what callers use to keep them out.
pub fn is_valid_connection(
    transitions: &[Transition],
    candidate: &Connection,
    policy: DuplicatePolicy,
) -> bool {
    !transitions
        .iter()
        .any(|transition| transition.connects(candidate, policy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Vec<Transition> {
        vec![
            Transition::new("e0", "a", "b").with_handles(Some("right"), None::<String>),
            Transition::new("e1", "b", "c"),
        ]
    }

    #[test]
    fn handle_aware_duplicates() {
        let transitions = existing();
        let policy = DuplicatePolicy::MatchHandles;

        assert!(!is_valid_connection(
            &transitions,
            &Connection::new("b", "c"),
            policy
        ));
        assert!(!is_valid_connection(
            &transitions,
            &Connection::new("a", "b").with_handles(Some("right"), None::<String>),
            policy
        ));
        assert!(is_valid_connection(
            &transitions,
            &Connection::new("a", "b"),
            policy
        ));
        assert!(is_valid_connection(
            &transitions,
            &Connection::new("a", "b").with_handles(Some("left"), None::<String>),
            policy
        ));
        assert!(is_valid_connection(
            &transitions,
            &Connection::new("c", "b"),
            policy
        ));
    }

    #[test]
    fn handle_ignorant_duplicates() {
        let transitions = existing();
        let policy = DuplicatePolicy::IgnoreHandles;

        assert!(!is_valid_connection(
            &transitions,
            &Connection::new("a", "b"),
            policy
        ));
        assert!(!is_valid_connection(
            &transitions,
            &Connection::new("a", "b").with_handles(Some("left"), Some("top")),
            policy
        ));
        assert!(is_valid_connection(
            &transitions,
            &Connection::new("b", "a"),
            policy
        ));
    }

    #[test]
    fn incidence() {
        let transitions = existing();
        let (ab, bc) = (&transitions[0], &transitions[1]);
        assert!(ab.is_incident_to("a") && ab.is_incident_to("b"));
        assert!(!ab.is_incident_to("c"));
        assert!(bc.is_incident_to("c"));

        let looping = Transition::new("e2", "d", "d");
        assert!(looping.is_incident_to("d"));
        assert!(!looping.is_incident_to("a"));
    }

    #[test]
    fn empty_and_epsilon() {
        let blank = Transition::new("e", "a", "b");
        assert!(blank.is_empty());
        assert!(!blank.is_epsilon());
        assert_eq!(blank.symbols(), ["ε"]);
        assert_eq!(blank.display_label(), "ε");

        let labeled = blank.with_label("a, b");
        assert!(!labeled.is_empty());
        assert_eq!(labeled.symbols(), ["a", "b"]);
        assert_eq!(labeled.display_label(), "a, b");
    }
}
