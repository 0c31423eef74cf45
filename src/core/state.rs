//! State labels, event labels, and composite state descriptors.
//!
//! A machine's state is a tuple of 1..N components. Any component may be
//! left unset, which makes it a wildcard: it matches every value of its slot
//! when descriptors are matched against each other.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Debug};

/// Trait for the labels that make up one component of a state.
///
/// Labels are supplied by the embedding application, usually as unit enums
/// generated with [`state_enum!`](crate::state_enum).
///
/// # Example
///
/// ```rust
/// use stateflow::core::State;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Review {
///     Draft,
///     Approved,
/// }
///
/// impl State for Review {
///     fn name(&self) -> &str {
///         match self {
///             Self::Draft => "Draft",
///             Self::Approved => "Approved",
///         }
///     }
/// }
/// ```
pub trait State: Clone + PartialEq + Debug + Send + Sync {
    /// Get the label's name for display/logging.
    fn name(&self) -> &str;
}

/// Trait for event labels that trigger transitions.
pub trait Event: Clone + PartialEq + Debug + Send + Sync {
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}

/// A state value that can also act as a wildcard pattern.
///
/// The machine matches registered descriptors (transition sources, listener
/// keys) against the states produced at dispatch time through this trait.
pub trait StateDescriptor: Clone + PartialEq + Debug + Send + Sync {
    /// True iff every component is unset on either side or equal on both.
    fn matches(&self, query: &Self) -> bool;

    /// True iff no component is a wildcard.
    fn is_fully_concrete(&self) -> bool;

    /// True iff at least one component is set.
    fn has_concrete_component(&self) -> bool;
}

/// An N-component state whose components may be wildcards.
///
/// Equality is structural: a wildcard only equals a wildcard. Use
/// [`StateDescriptor::matches`] for wildcard-aware comparison.
///
/// # Example
///
/// ```rust
/// use stateflow::core::{CompositeState, StateDescriptor};
/// use stateflow::state_enum;
///
/// state_enum! {
///     enum Stage { Draft, Review }
/// }
///
/// let any_draft = CompositeState::pair(Some(Stage::Draft), None);
/// let current = CompositeState::pair(Some(Stage::Draft), Some(Stage::Review));
///
/// assert!(any_draft.matches(&current));
/// assert_ne!(any_draft, current);
/// assert!(current.is_fully_concrete());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompositeState<S, const N: usize> {
    components: [Option<S>; N],
}

/// One-component state.
pub type Single<S> = CompositeState<S, 1>;
/// Two-component state.
pub type Pair<S> = CompositeState<S, 2>;
/// Three-component state.
pub type Triple<S> = CompositeState<S, 3>;

impl<S, const N: usize> CompositeState<S, N> {
    pub fn new(components: [Option<S>; N]) -> Self {
        Self { components }
    }

    /// Build a state with every component set.
    pub fn concrete(components: [S; N]) -> Self {
        Self {
            components: components.map(Some),
        }
    }

    pub fn component(&self, index: usize) -> Option<&S> {
        self.components.get(index).and_then(Option::as_ref)
    }

    pub fn components(&self) -> &[Option<S>; N] {
        &self.components
    }
}

impl<S> CompositeState<S, 1> {
    pub fn single(state: S) -> Self {
        Self::new([Some(state)])
    }
}

impl<S> CompositeState<S, 2> {
    pub fn pair(first: Option<S>, second: Option<S>) -> Self {
        Self::new([first, second])
    }
}

impl<S> CompositeState<S, 3> {
    pub fn triple(first: Option<S>, second: Option<S>, third: Option<S>) -> Self {
        Self::new([first, second, third])
    }
}

impl<S> From<S> for CompositeState<S, 1> {
    fn from(state: S) -> Self {
        Self::single(state)
    }
}

impl<S: State, const N: usize> StateDescriptor for CompositeState<S, N> {
    fn matches(&self, query: &Self) -> bool {
        self.components
            .iter()
            .zip(query.components.iter())
            .all(|pair| match pair {
                (Some(stored), Some(queried)) => stored == queried,
                _ => true,
            })
    }

    fn is_fully_concrete(&self) -> bool {
        self.components.iter().all(Option::is_some)
    }

    fn has_concrete_component(&self) -> bool {
        self.components.iter().any(Option::is_some)
    }
}

/// Renders as `(Draft, *, Paid)`, with `*` for wildcards.
impl<S: State, const N: usize> fmt::Display for CompositeState<S, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match component {
                Some(state) => f.write_str(state.name())?,
                None => f.write_str("*")?,
            }
        }
        f.write_str(")")
    }
}

impl<S: Serialize, const N: usize> Serialize for CompositeState<S, N> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.components.iter())
    }
}

impl<'de, S: Deserialize<'de>, const N: usize> Deserialize<'de> for CompositeState<S, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let components: Vec<Option<S>> = Vec::deserialize(deserializer)?;
        let len = components.len();
        let components: [Option<S>; N] = components
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"one entry per state component"))?;
        Ok(Self { components })
    }
}
