//! Core value types: state labels, composite state descriptors, and guards.
//!
//! These types carry no dispatch logic. The machine in [`crate::machine`]
//! combines them into a transition table.

mod guard;
mod state;

pub use guard::{Guard, Predicate};
pub use state::{CompositeState, Event, Pair, Single, State, StateDescriptor, Triple};
