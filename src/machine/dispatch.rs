//! The dispatcher: resolves one transition per event and runs the listener
//! phases around it.

use crate::core::{Event, StateDescriptor};
use crate::expr::{EvalError, FieldAccess};
use crate::machine::listener::{Listeners, StatePhase, Timing};
use crate::machine::transition::Transition;
use tracing::{debug, trace, warn};

/// Reads the current state from a subject.
pub type StateGetter<T, St> = Box<dyn Fn(&T) -> St + Send + Sync>;

/// Writes a new state into a subject.
pub type StateSetter<T, St> = Box<dyn Fn(&mut T, St) + Send + Sync>;

/// Builds the caller's error when an event cannot be resolved to exactly
/// one transition. Receives `(subject, from, event)`.
pub type ErrorFactory<T, St, E, X> = Box<dyn Fn(&T, &St, &E) -> X + Send + Sync>;

/// Accessor pair used to read and write a subject's state.
pub struct StateAccessor<T, St> {
    pub(crate) get: StateGetter<T, St>,
    pub(crate) set: StateSetter<T, St>,
}

impl<T, St> StateAccessor<T, St> {
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn(&T) -> St + Send + Sync + 'static,
        S: Fn(&mut T, St) + Send + Sync + 'static,
    {
        Self {
            get: Box::new(get),
            set: Box::new(set),
        }
    }
}

/// A configured, immutable state machine.
///
/// Built with [`StateMachineBuilder`](crate::builder::StateMachineBuilder).
/// The machine holds no per-subject data, so one instance can serve many
/// subjects, from many threads, at once.
///
/// Type parameters: `T` subject, `St` state descriptor, `E` event,
/// `C` per-call context, `X` the caller's error type.
pub struct StateMachine<T, St, E, C, X> {
    pub(crate) transitions: Vec<Transition<T, St, E, C>>,
    pub(crate) listeners: Listeners<T, St, E, C>,
    pub(crate) accessor: StateAccessor<T, St>,
    pub(crate) on_unresolved: ErrorFactory<T, St, E, X>,
}

impl<T, St, E, C, X> StateMachine<T, St, E, C, X>
where
    T: FieldAccess,
    St: StateDescriptor,
    E: Event,
    C: FieldAccess,
    X: From<EvalError>,
{
    /// Dispatch `event` from the subject's current state.
    pub fn send_event(&self, subject: &mut T, event: &E, context: Option<&C>) -> Result<St, X> {
        let from = (self.accessor.get)(subject);
        self.send_event_from(subject, &from, event, context)
    }

    /// Dispatch `event` from an explicitly supplied state.
    ///
    /// Machine-pre, exit-state and event-pre listeners run before resolution,
    /// so they fire even when the event turns out to have no transition. On a
    /// resolution failure the subject's state is left untouched and the error
    /// factory's value is returned. A guard that fails to evaluate aborts the
    /// dispatch the same way, with its [`EvalError`] converted into `X`.
    pub fn send_event_from(
        &self,
        subject: &mut T,
        from: &St,
        event: &E,
        context: Option<&C>,
    ) -> Result<St, X> {
        debug!(from = ?from, event = event.name(), "dispatch started");

        trace!("machine listeners (pre)");
        for listener in self.listeners.machine(Timing::Pre) {
            listener(subject, from, event);
        }

        trace!("state listeners (exit)");
        for listener in self.listeners.state(from, StatePhase::Exit) {
            listener(subject, event);
        }

        trace!("event listeners (pre)");
        for listener in self.listeners.event(event, Timing::Pre) {
            listener(subject, from, None, context);
        }

        let to = self.resolve(subject, from, event, context)?;
        debug!(from = ?from, to = ?to, event = event.name(), "transition resolved");
        (self.accessor.set)(subject, to.clone());

        trace!("transform listeners");
        for listener in self.listeners.transform(from, &to) {
            listener(subject, event);
        }

        trace!("event listeners (post)");
        for listener in self.listeners.event(event, Timing::Post) {
            listener(subject, from, Some(&to), context);
        }

        trace!("state listeners (enter)");
        for listener in self.listeners.state(&to, StatePhase::Enter) {
            listener(subject, event);
        }

        trace!("actions");
        for action in &self.listeners.action {
            action(subject, from, event, &to, context);
        }

        trace!("machine listeners (post)");
        for listener in self.listeners.machine(Timing::Post) {
            listener(subject, &to, event);
        }

        debug!(to = ?to, event = event.name(), "dispatch finished");
        Ok(to)
    }

    fn resolve(&self, subject: &T, from: &St, event: &E, context: Option<&C>) -> Result<St, X> {
        let mut survivors = Vec::new();
        for transition in &self.transitions {
            if transition.can_fire(subject, from, event, context)? {
                survivors.push(&transition.to);
            }
        }

        match survivors.as_slice() {
            [to] => Ok((*to).clone()),
            [] => {
                warn!(from = ?from, event = event.name(), "no transition matched");
                Err((self.on_unresolved)(subject, from, event))
            }
            ambiguous => {
                warn!(
                    from = ?from,
                    event = event.name(),
                    candidates = ambiguous.len(),
                    "ambiguous transition"
                );
                Err((self.on_unresolved)(subject, from, event))
            }
        }
    }
}

impl<T, St, E, C, X> StateMachine<T, St, E, C, X>
where
    St: StateDescriptor,
{
    /// All registered transitions, in registration order.
    pub fn transitions(&self) -> &[Transition<T, St, E, C>] {
        &self.transitions
    }

    /// Transitions whose source descriptor matches `state`, for any event.
    pub fn transitions_from<'a>(
        &'a self,
        state: &'a St,
    ) -> impl Iterator<Item = &'a Transition<T, St, E, C>> {
        self.transitions.iter().filter(move |t| t.from.matches(state))
    }
}
