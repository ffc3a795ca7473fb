//! The interaction layer of the editor. Whatever a user does on the canvas, clicking the empty
//! pane, a state or a transition, or dragging a connection between two states, ends up as one of
//! the methods on [`Editor`], which picks the store mutation that fits the active [`Tool`].

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use tracing::{debug, trace, warn};

use crate::{
    automaton::{Connection, DuplicatePolicy, Position, StateId, StateVariant, TransitionId},
    label,
    view::Selection,
    Automaton, AutomatonError, State, TableCache, Transition, TransitionTable,
};

/// The tool that decides what a click on the canvas does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    /// Select and move things, transitions are created by dragging between handles.
    #[default]
    Select,
    /// Place a new state.
    State,
    /// Place a new final state.
    StateFinal,
    /// Click two states to connect them.
    Transition,
    /// Delete what is clicked.
    Delete,
}

/// Hands out stamps for new ids: milliseconds since the epoch, but strictly increasing, so two
/// ids created within the same millisecond still differ.
#[derive(Debug, Default, Clone)]
struct Clock {
    last: u64,
}

impl Clock {
    fn stamp(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
            });
        self.last = now.max(self.last + 1);
        self.last
    }
}

/// Owns an [`Automaton`] together with the editing state around it: the active tool, the
/// selection, a pending transition source and the transition whose label is being edited.
#[derive(Debug, Default)]
pub struct Editor {
    automaton: Automaton,
    selection: Selection,
    tool: Tool,
    transition_source: Option<StateId>,
    editing: Option<TransitionId>,
    clock: Clock,
    cache: TableCache,
}

impl Editor {
    /// Creates an editor working on the given automaton.
    pub fn new(automaton: Automaton) -> Self {
        Self {
            automaton,
            ..Default::default()
        }
    }

    /// The automaton being edited.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Mutable access to the automaton, for mutations that do not go through a tool.
    pub fn automaton_mut(&mut self) -> &mut Automaton {
        &mut self.automaton
    }

    /// The selected states.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mutable access to the selection.
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// The active tool.
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switches the tool, which also forgets a pending transition source.
    pub fn set_tool(&mut self, tool: Tool) {
        trace!("switching to tool {tool:?}");
        self.tool = tool;
        self.transition_source = None;
    }

    /// The state picked as source by the transition tool, waiting for a target.
    pub fn transition_source(&self) -> Option<&StateId> {
        self.transition_source.as_ref()
    }

    /// The transition whose label is being edited.
    pub fn editing(&self) -> Option<&TransitionId> {
        self.editing.as_ref()
    }

    /// Handles a click on the empty canvas.
    ///
    /// With one of the state tools, a new state labeled [`Automaton::next_state_label`] is placed
    /// at `position` and its id is returned. The first state of an empty automaton becomes the
    /// initial state. Afterwards the editor returns to [`Tool::Select`]. The transition tool
    /// forgets its pending source instead.
    pub fn click_pane<P: Into<Position>>(
        &mut self,
        position: P,
    ) -> Result<Option<StateId>, AutomatonError> {
        let accepting = match self.tool {
            Tool::Transition => {
                self.transition_source = None;
                return Ok(None);
            }
            Tool::State => false,
            Tool::StateFinal => true,
            Tool::Select | Tool::Delete => return Ok(None),
        };

        let initial = self.automaton.is_empty();
        let label = self.automaton.next_state_label();
        let id = StateId::placed(&label, self.clock.stamp());
        let state = State::new(id.clone(), label)
            .with_variant(StateVariant::from_flags(initial, accepting))
            .at(position);
        debug!("placing state {id}");
        self.automaton.add_state(state)?;
        self.set_tool(Tool::Select);
        Ok(Some(id))
    }

    /// Handles a click on a state.
    ///
    /// The delete tool removes the state along with its transitions and deselects it. The
    /// transition tool remembers the first state clicked and connects it to the second one,
    /// unless the two are connected already. The id of a newly created transition is returned
    /// and its label is opened for editing.
    pub fn click_state(&mut self, id: &str) -> Option<TransitionId> {
        match self.tool {
            Tool::Delete => {
                self.automaton.remove_state(id);
                self.selection.remove(id);
                None
            }
            Tool::Transition => {
                let source = match self.transition_source.take() {
                    Some(source) if self.automaton.state(&source).is_some() => source,
                    _ => {
                        if self.automaton.state(id).is_some() {
                            self.transition_source = Some(id.into());
                        }
                        return None;
                    }
                };
                if self.automaton.state(id).is_none() {
                    warn!("cannot connect {source} to state {id} that does not exist");
                    return None;
                }

                let connection = Connection::new(source, id);
                let created = self
                    .automaton
                    .is_valid_connection(&connection, DuplicatePolicy::IgnoreHandles)
                    .then(|| self.create_transition(connection));
                self.set_tool(Tool::Select);
                created
            }
            Tool::Select | Tool::State | Tool::StateFinal => None,
        }
    }

    /// Handles a click on a transition, the delete tool removes it.
    pub fn click_transition(&mut self, id: &str) {
        if self.tool == Tool::Delete {
            self.automaton.remove_transition(id);
            if self.editing.as_ref().is_some_and(|editing| *editing == *id) {
                self.editing = None;
            }
        }
    }

    /// Handles a connection dragged between two handles. It is only created if no transition
    /// with the same endpoints and handles exists and both endpoints are states of the
    /// automaton, in which case it is opened for editing.
    pub fn connect(&mut self, connection: Connection) -> Option<TransitionId> {
        if let Some(missing) = [&connection.source, &connection.target]
            .into_iter()
            .find(|end| self.automaton.state(end).is_none())
        {
            warn!("cannot connect to state {missing} that does not exist");
            return None;
        }
        if !self
            .automaton
            .is_valid_connection(&connection, DuplicatePolicy::MatchHandles)
        {
            debug!(
                "rejecting duplicate connection from {} to {}",
                connection.source, connection.target
            );
            return None;
        }
        Some(self.create_transition(connection))
    }

    /// Opens the label of a transition for editing.
    pub fn start_editing(&mut self, id: impl Into<TransitionId>) {
        self.editing = Some(id.into());
    }

    /// Stores the edited label and closes the editing session. Blank input turns the transition
    /// into an epsilon transition.
    pub fn commit_label(&mut self, value: &str) {
        if let Some(id) = self.editing.take() {
            self.automaton
                .update_transition_label(&id, label::normalize_label(value));
        }
    }

    /// Closes the editing session without touching the label.
    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    /// Returns the transition table of the current automaton, recomputed only if the automaton
    /// changed since the last call.
    pub fn transition_table(&mut self) -> Arc<TransitionTable> {
        self.cache.get(&self.automaton.snapshot())
    }

    /// Clears the automaton along with all editing state.
    pub fn reset(&mut self) {
        self.automaton.reset();
        self.selection.clear();
        self.transition_source = None;
        self.editing = None;
    }

    fn create_transition(&mut self, connection: Connection) -> TransitionId {
        let id = TransitionId::connecting(
            &connection.source,
            &connection.target,
            self.clock.stamp(),
        );
        self.automaton
            .add_transition(Transition::from_connection(id.clone(), connection));
        self.start_editing(id.clone());
        id
    }
}
