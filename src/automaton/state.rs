use crate::Show;

use super::StateId;

/// Whether a state is initial, final, both or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StateVariant {
    /// A plain state.
    #[default]
    Default,
    /// The state in which runs start.
    Initial,
    /// An accepting state.
    Final,
    /// A state that is both initial and accepting.
    InitialFinal,
}

impl StateVariant {
    /// Combines the two flags into a variant.
    pub fn from_flags(initial: bool, accepting: bool) -> Self {
        match (initial, accepting) {
            (true, true) => Self::InitialFinal,
            (true, false) => Self::Initial,
            (false, true) => Self::Final,
            (false, false) => Self::Default,
        }
    }

    /// Returns true for [`StateVariant::Initial`] and [`StateVariant::InitialFinal`].
    pub fn is_initial(self) -> bool {
        matches!(self, Self::Initial | Self::InitialFinal)
    }

    /// Returns true for [`StateVariant::Final`] and [`StateVariant::InitialFinal`].
    pub fn is_final(self) -> bool {
        matches!(self, Self::Final | Self::InitialFinal)
    }

    /// Replaces the initial component, keeping the final one.
    pub fn with_initial(self, initial: bool) -> Self {
        Self::from_flags(initial, self.is_final())
    }

    /// Replaces the final component, keeping the initial one.
    pub fn with_final(self, accepting: bool) -> Self {
        Self::from_flags(self.is_initial(), accepting)
    }
}

impl Show for StateVariant {
    fn show(&self) -> String {
        match self {
            Self::Default => "default",
            Self::Initial => "initial",
            Self::Final => "final",
            Self::InitialFinal => "initial-final",
        }
        .to_string()
    }
}

/// Position of a state on the canvas. It has no meaning for the automaton itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Creates a position from its coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A node of the automaton graph.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// Identifies the state for its whole lifetime.
    pub id: StateId,
    /// Short display name like `q0`, this is what rows and columns of the table are keyed by.
    pub label: String,
    /// Initial and final flags.
    pub variant: StateVariant,
    /// Where the state is drawn.
    pub position: Position,
}

impl State {
    /// Creates a plain state at the origin.
    pub fn new(id: impl Into<StateId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            variant: StateVariant::Default,
            position: Position::default(),
        }
    }

    /// Sets the variant, consuming and returning `self`.
    pub fn with_variant(mut self, variant: StateVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets the position, consuming and returning `self`.
    pub fn at<P: Into<Position>>(mut self, position: P) -> Self {
        self.position = position.into();
        self
    }

    /// Returns true if this is the initial state.
    pub fn is_initial(&self) -> bool {
        self.variant.is_initial()
    }

    /// Returns true if this is an accepting state.
    pub fn is_final(&self) -> bool {
        self.variant.is_final()
    }
}

/// A partial update of a [`State`], fields that are `None` are left untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateUpdate {
    /// New label.
    pub label: Option<String>,
    /// New variant.
    pub variant: Option<StateVariant>,
    /// New position.
    pub position: Option<Position>,
}

impl StateUpdate {
    /// An update that only changes the label.
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    /// An update that only changes the variant.
    pub fn variant(variant: StateVariant) -> Self {
        Self {
            variant: Some(variant),
            ..Default::default()
        }
    }

    /// An update that only moves the state.
    pub fn position<P: Into<Position>>(position: P) -> Self {
        Self {
            position: Some(position.into()),
            ..Default::default()
        }
    }

    pub(super) fn apply_to(self, state: &mut State) {
        if let Some(label) = self.label {
            state.label = label;
        }
        if let Some(variant) = self.variant {
            state.variant = variant;
        }
        if let Some(position) = self.position {
            state.position = position;
        }
    }
}
