//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for declaring labels,
//! transitions and listeners before producing an immutable machine.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::{BuildError, BuildErrors};
pub use machine::StateMachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::Guard;
use crate::expr::CompileError;
use crate::machine::Transition;

/// Create an unconditional transition.
///
/// # Example
///
/// ```
/// use stateflow::builder::simple_transition;
/// use stateflow::core::Single;
/// use stateflow::machine::Transition;
/// use stateflow::{event_enum, state_enum};
///
/// state_enum! {
///     enum MyState {
///         Start,
///         End,
///     }
/// }
/// event_enum! {
///     enum MyEvent { Finish }
/// }
///
/// let transition: Transition<(), _, _, ()> = simple_transition(
///     Single::single(MyState::Start),
///     MyEvent::Finish,
///     Single::single(MyState::End),
/// );
/// assert!(transition.guard.is_none());
/// ```
pub fn simple_transition<T, St, E, C>(from: St, event: E, to: St) -> Transition<T, St, E, C> {
    Transition {
        from,
        event,
        to,
        guard: None,
    }
}

/// Create a transition with a guard predicate.
pub fn guarded_transition<T, St, E, C, F>(
    from: St,
    event: E,
    to: St,
    predicate: F,
) -> Transition<T, St, E, C>
where
    F: Fn(&T, &St, &E, Option<&C>) -> bool + Send + Sync + 'static,
{
    Transition {
        from,
        event,
        to,
        guard: Some(Guard::new(predicate)),
    }
}

/// Create a transition guarded by guard text.
pub fn text_transition<T, St, E, C>(
    from: St,
    event: E,
    to: St,
    text: &str,
) -> Result<Transition<T, St, E, C>, CompileError> {
    Ok(Transition {
        from,
        event,
        to,
        guard: Some(Guard::text(text)?),
    })
}
