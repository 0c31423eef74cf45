//! Registered transitions.

use crate::core::{Guard, StateDescriptor};
use crate::expr::{EvalError, FieldAccess};

/// An edge `from --event[guard]--> to` in the transition table.
///
/// Several transitions may share the same source and event; at dispatch
/// time exactly one of them must pass its guard.
pub struct Transition<T, St, E, C> {
    pub from: St,
    pub event: E,
    pub to: St,
    pub guard: Option<Guard<T, St, E, C>>,
}

impl<T, St, E, C> Transition<T, St, E, C>
where
    St: StateDescriptor,
    E: PartialEq,
{
    /// Check whether this transition applies to `current` and `event`, then
    /// evaluate its guard (absent guards pass).
    pub fn can_fire(
        &self,
        subject: &T,
        current: &St,
        event: &E,
        context: Option<&C>,
    ) -> Result<bool, EvalError>
    where
        T: FieldAccess,
        C: FieldAccess,
    {
        if self.event != *event || !self.from.matches(current) {
            return Ok(false);
        }

        match &self.guard {
            Some(guard) => guard.evaluate(subject, current, event, context),
            None => Ok(true),
        }
    }
}

impl<T, St: Clone, E: Clone, C> Clone for Transition<T, St, E, C> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            event: self.event.clone(),
            to: self.to.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<T, St: std::fmt::Debug, E: std::fmt::Debug, C> std::fmt::Debug for Transition<T, St, E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("event", &self.event)
            .field("to", &self.to)
            .field("guard", &self.guard)
            .finish()
    }
}
