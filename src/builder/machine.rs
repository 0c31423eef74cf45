//! Builder for constructing state machines.

use crate::builder::error::{BuildError, BuildErrors};
use crate::builder::transition::TransitionBuilder;
use crate::core::{Guard, StateDescriptor};
use crate::machine::{
    ErrorFactory, EventListener, Listeners, MachineListener, StateAccessor, StateListener,
    StateMachine, StatePhase, Timing, Transition, TransformListener,
};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing state machines with a fluent API.
///
/// Registration happens entirely on the builder; [`build`](Self::build)
/// hands back an immutable [`StateMachine`] ready for dispatch.
///
/// # Example
///
/// ```
/// use stateflow::builder::StateMachineBuilder;
/// use stateflow::core::Single;
/// use stateflow::expr::EvalError;
/// use stateflow::{event_enum, state_enum};
/// use serde_json::json;
///
/// state_enum! {
///     enum Door { Open, Closed }
/// }
/// event_enum! {
///     enum Push { Close }
/// }
///
/// let machine = StateMachineBuilder::<serde_json::Value, Single<Door>, Push, (), EvalError>::new()
///     .state_accessor(
///         |_| Single::single(Door::Open),
///         |subject, state| subject["door"] = json!(format!("{state}")),
///     )
///     .on_unresolved(|_, _, _| EvalError::DivisionByZero)
///     .add_state(Single::single(Door::Open), Push::Close, Single::single(Door::Closed))
///     .build()
///     .unwrap();
///
/// let mut subject = json!({});
/// let state = machine.send_event(&mut subject, &Push::Close, None).unwrap();
/// assert_eq!(state, Single::single(Door::Closed));
/// assert_eq!(subject["door"], "(Closed)");
/// ```
pub struct StateMachineBuilder<T, St, E, C, X> {
    accessor: Option<StateAccessor<T, St>>,
    on_unresolved: Option<ErrorFactory<T, St, E, X>>,
    transitions: Vec<Transition<T, St, E, C>>,
    listeners: Listeners<T, St, E, C>,
}

impl<T, St, E, C, X> StateMachineBuilder<T, St, E, C, X>
where
    St: StateDescriptor,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            accessor: None,
            on_unresolved: None,
            transitions: Vec::new(),
            listeners: Listeners::default(),
        }
    }

    /// Set how the machine reads and writes a subject's state (required).
    pub fn state_accessor<G, S>(mut self, get: G, set: S) -> Self
    where
        G: Fn(&T) -> St + Send + Sync + 'static,
        S: Fn(&mut T, St) + Send + Sync + 'static,
    {
        self.accessor = Some(StateAccessor::new(get, set));
        self
    }

    /// Set the error produced when an event resolves to zero or several
    /// transitions (required).
    pub fn on_unresolved<F>(mut self, factory: F) -> Self
    where
        F: Fn(&T, &St, &E) -> X + Send + Sync + 'static,
    {
        self.on_unresolved = Some(Box::new(factory));
        self
    }

    /// Register an unguarded transition.
    pub fn add_state(self, from: St, event: E, to: St) -> Self {
        self.add_transition(Transition {
            from,
            event,
            to,
            guard: None,
        })
    }

    /// Register a transition gated by a native predicate.
    pub fn add_state_when<F>(self, from: St, event: E, to: St, predicate: F) -> Self
    where
        F: Fn(&T, &St, &E, Option<&C>) -> bool + Send + Sync + 'static,
    {
        self.add_transition(Transition {
            from,
            event,
            to,
            guard: Some(Guard::new(predicate)),
        })
    }

    /// Register a transition gated by guard text.
    /// Returns an error if the text does not compile.
    pub fn add_text_state(self, from: St, event: E, to: St, text: &str) -> Result<Self, BuildError> {
        let guard = Guard::text(text)?;
        Ok(self.add_transition(Transition {
            from,
            event,
            to,
            guard: Some(guard),
        }))
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(
        self,
        builder: TransitionBuilder<T, St, E, C>,
    ) -> Result<Self, BuildErrors> {
        let transition = builder.build()?;
        Ok(self.add_transition(transition))
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<T, St, E, C>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<T, St, E, C>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Listen to every dispatch, before (`Pre`) or after (`Post`) it runs.
    pub fn add_machine_listener<F>(mut self, timing: Timing, listener: F) -> Self
    where
        F: Fn(&mut T, &St, &E) + Send + Sync + 'static,
    {
        self.listeners.machine.push(MachineListener {
            timing,
            callback: Box::new(listener),
        });
        self
    }

    /// Listen to one event. `Pre` listeners see `to == None`.
    pub fn add_event_listener<F>(mut self, event: E, timing: Timing, listener: F) -> Self
    where
        F: Fn(&mut T, &St, Option<&St>, Option<&C>) + Send + Sync + 'static,
    {
        self.listeners.event.push(EventListener {
            event,
            timing,
            callback: Box::new(listener),
        });
        self
    }

    /// Listen to leaving or entering every state matched by `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` has no concrete component.
    pub fn add_state_listener<F>(mut self, state: St, phase: StatePhase, listener: F) -> Self
    where
        F: Fn(&mut T, &E) + Send + Sync + 'static,
    {
        assert!(
            state.has_concrete_component(),
            "state listener descriptor {state:?} has no concrete component"
        );
        self.listeners.state.push(StateListener {
            state,
            phase,
            callback: Box::new(listener),
        });
        self
    }

    /// Listen to transitions from states matched by `source` into states
    /// matched by `target`.
    ///
    /// # Panics
    ///
    /// Panics if either descriptor has no concrete component.
    pub fn add_transform_listener<F>(mut self, source: St, target: St, listener: F) -> Self
    where
        F: Fn(&mut T, &E) + Send + Sync + 'static,
    {
        assert!(
            source.has_concrete_component(),
            "transform listener source {source:?} has no concrete component"
        );
        assert!(
            target.has_concrete_component(),
            "transform listener target {target:?} has no concrete component"
        );
        self.listeners.transform.push(TransformListener {
            source,
            target,
            callback: Box::new(listener),
        });
        self
    }

    /// Run `action` after every successful transition.
    pub fn add_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut T, &St, &E, &St, Option<&C>) + Send + Sync + 'static,
    {
        self.listeners.action.push(Box::new(action));
        self
    }

    /// Build the state machine.
    /// Returns every missing requirement, not just the first.
    pub fn build(self) -> Result<StateMachine<T, St, E, C, X>, BuildErrors> {
        let checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = vec![
            if self.accessor.is_some() {
                Validation::success(())
            } else {
                Validation::fail(BuildError::MissingStateAccessor)
            },
            if self.on_unresolved.is_some() {
                Validation::success(())
            } else {
                Validation::fail(BuildError::MissingErrorFactory)
            },
            if self.transitions.is_empty() {
                Validation::fail(BuildError::NoTransitions)
            } else {
                Validation::success(())
            },
        ];

        if let Validation::Failure(errors) = Validation::all_vec(checks).map(|_| ()) {
            return Err(BuildErrors(errors.iter().cloned().collect()));
        }

        match (self.accessor, self.on_unresolved) {
            (Some(accessor), Some(on_unresolved)) => Ok(StateMachine {
                transitions: self.transitions,
                listeners: self.listeners,
                accessor,
                on_unresolved,
            }),
            (None, _) => Err(BuildError::MissingStateAccessor.into()),
            (_, None) => Err(BuildError::MissingErrorFactory.into()),
        }
    }
}

impl<T, St, E, C, X> Default for StateMachineBuilder<T, St, E, C, X>
where
    St: StateDescriptor,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Single;
    use crate::expr::EvalError;
    use crate::{event_enum, state_enum};
    use serde_json::{json, Value};

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
        }
    }

    event_enum! {
        enum TestEvent {
            Start,
            Finish,
        }
    }

    type Builder = StateMachineBuilder<Value, Single<TestState>, TestEvent, (), EvalError>;

    fn s(state: TestState) -> Single<TestState> {
        Single::single(state)
    }

    fn configured() -> Builder {
        Builder::new()
            .state_accessor(
                |_| s(TestState::Initial),
                |subject, state| subject["state"] = json!(state.to_string()),
            )
            .on_unresolved(|_, _, _| EvalError::DivisionByZero)
    }

    #[test]
    fn builder_accumulates_every_missing_requirement() {
        let errors = Builder::new().build().err().unwrap();

        assert_eq!(
            errors.errors(),
            &[
                BuildError::MissingStateAccessor,
                BuildError::MissingErrorFactory,
                BuildError::NoTransitions,
            ]
        );
    }

    #[test]
    fn builder_requires_transitions() {
        let errors = configured().build().err().unwrap();
        assert_eq!(errors.errors(), &[BuildError::NoTransitions]);
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = configured()
            .add_state(s(TestState::Initial), TestEvent::Start, s(TestState::Processing))
            .add_state(s(TestState::Processing), TestEvent::Finish, s(TestState::Complete))
            .build()
            .unwrap();

        assert_eq!(machine.transitions().len(), 2);
    }

    #[test]
    fn text_state_rejects_malformed_guard() {
        let result = configured().add_text_state(
            s(TestState::Initial),
            TestEvent::Start,
            s(TestState::Processing),
            "#.ready == ",
        );

        assert!(matches!(result, Err(BuildError::InvalidGuard(_))));
    }

    #[test]
    fn transition_builder_errors_propagate() {
        let result = configured().transition(TransitionBuilder::new().from(s(TestState::Initial)));
        let errors = result.err().unwrap();
        assert!(errors.contains(&BuildError::MissingEvent));
    }

    #[test]
    fn add_multiple_transitions() {
        let machine = configured()
            .transitions(vec![
                crate::builder::simple_transition(
                    s(TestState::Initial),
                    TestEvent::Start,
                    s(TestState::Processing),
                ),
                crate::builder::simple_transition(
                    s(TestState::Processing),
                    TestEvent::Finish,
                    s(TestState::Complete),
                ),
            ])
            .build()
            .unwrap();

        assert_eq!(machine.transitions_from(&s(TestState::Processing)).count(), 1);
    }

    #[test]
    #[should_panic(expected = "no concrete component")]
    fn state_listener_requires_concrete_component() {
        let wildcard: Single<TestState> = Single::new([None]);
        let _ = configured().add_state_listener(wildcard, StatePhase::Enter, |_, _| {});
    }

    #[test]
    #[should_panic(expected = "transform listener target")]
    fn transform_listener_checks_both_sides() {
        let wildcard: Single<TestState> = Single::new([None]);
        let _ = configured().add_transform_listener(s(TestState::Initial), wildcard, |_, _| {});
    }
}
