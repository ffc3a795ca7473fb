use std::{
    fmt::{Debug, Display},
    ops::Deref,
};

macro_rules! impl_string_id {
    ($($(#[$meta:meta])* $name:ident),*) => {
        $(
            $(#[$meta])*
            #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub struct $name(String);

            impl $name {
                /// Creates an id from anything that can be turned into a string.
                pub fn new(id: impl Into<String>) -> Self {
                    Self(id.into())
                }

                /// Returns the id as a string slice.
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl Deref for $name {
                type Target = str;

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }

            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }

            impl Debug for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "#{}", self.0)
                }
            }

            impl Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<&str> for $name {
                fn from(id: &str) -> Self {
                    Self::new(id)
                }
            }

            impl From<String> for $name {
                fn from(id: String) -> Self {
                    Self(id)
                }
            }

            impl PartialEq<str> for $name {
                fn eq(&self, other: &str) -> bool {
                    self.0 == other
                }
            }

            impl PartialEq<&str> for $name {
                fn eq(&self, other: &&str) -> bool {
                    self.0 == *other
                }
            }
        )*
    }
}

impl_string_id!(
    /// Opaque identifier of a [`State`](super::State). It is assigned when the state is created,
    /// stays the same for its whole lifetime and is never handed out twice.
    StateId,
    /// Opaque identifier of a [`Transition`](super::Transition).
    TransitionId
);

impl StateId {
    /// The id the editor gives to a freshly placed state: `node-<label>-<stamp>`.
    pub fn placed(label: &str, stamp: u64) -> Self {
        Self(format!("node-{label}-{stamp}"))
    }
}

impl TransitionId {
    /// The id the editor gives to a new transition: `e<source>-<target>-<stamp>`. The stamp only
    /// serves to avoid collisions between transitions connecting the same pair of states.
    pub fn connecting(source: &StateId, target: &StateId, stamp: u64) -> Self {
        Self(format!("e{source}-{target}-{stamp}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids() {
        let source = StateId::placed("q0", 17);
        let target = StateId::placed("q1", 18);
        assert_eq!(source, "node-q0-17");
        assert_eq!(
            TransitionId::connecting(&source, &target, 19).as_str(),
            "enode-q0-17-node-q1-18-19"
        );
        assert_eq!(format!("{:?}", StateId::from("s")), "#s");
    }
}
