//! Builder for constructing state transitions.

use crate::builder::error::{BuildError, BuildErrors};
use crate::core::Guard;
use crate::expr::CompileError;
use crate::machine::Transition;
use stillwater::validation::{ValidateAll, Validation};
use stillwater::NonEmptyVec;

type Check<V> = Validation<V, NonEmptyVec<BuildError>>;

fn require<V>(value: Option<V>, error: BuildError) -> Check<V> {
    match value {
        Some(value) => Validation::success(value),
        None => Validation::fail(error),
    }
}

/// Builder for constructing transitions with a fluent API.
///
/// # Example
///
/// ```
/// use stateflow::builder::TransitionBuilder;
/// use stateflow::core::Single;
/// use stateflow::machine::Transition;
/// use stateflow::{event_enum, state_enum};
///
/// state_enum! {
///     enum Phase { Draft, Review }
/// }
/// event_enum! {
///     enum Action { Submit }
/// }
///
/// let transition: Transition<serde_json::Value, Single<Phase>, Action, ()> =
///     TransitionBuilder::new()
///         .from(Single::single(Phase::Draft))
///         .on(Action::Submit)
///         .to(Single::single(Phase::Review))
///         .when_text("#.complete == true;")
///         .build()
///         .unwrap();
///
/// assert!(transition.guard.is_some());
/// ```
pub struct TransitionBuilder<T, St, E, C> {
    from: Option<St>,
    event: Option<E>,
    to: Option<St>,
    guard: Option<Result<Guard<T, St, E, C>, CompileError>>,
}

impl<T, St, E, C> TransitionBuilder<T, St, E, C> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            event: None,
            to: None,
            guard: None,
        }
    }

    /// Set the source state (required). Unset components act as wildcards.
    pub fn from(mut self, state: St) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the triggering event (required).
    pub fn on(mut self, event: E) -> Self {
        self.event = Some(event);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: St) -> Self {
        self.to = Some(state);
        self
    }

    /// Add a prepared guard (optional).
    pub fn guard(mut self, guard: Guard<T, St, E, C>) -> Self {
        self.guard = Some(Ok(guard));
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T, &St, &E, Option<&C>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Ok(Guard::new(predicate)));
        self
    }

    /// Add a guard written in the guard language (optional).
    ///
    /// The text is compiled right away; a syntax error is reported by
    /// [`build`](Self::build).
    pub fn when_text(mut self, text: &str) -> Self {
        self.guard = Some(Guard::text(text));
        self
    }

    /// Build the transition, reporting every missing or invalid part.
    pub fn build(self) -> Result<Transition<T, St, E, C>, BuildErrors> {
        let guard: Check<Option<Guard<T, St, E, C>>> = match self.guard {
            Some(Err(err)) => Validation::fail(BuildError::InvalidGuard(err)),
            Some(Ok(guard)) => Validation::success(Some(guard)),
            None => Validation::success(None),
        };

        let checks = (
            require(self.from, BuildError::MissingFromState),
            require(self.event, BuildError::MissingEvent),
            require(self.to, BuildError::MissingToState),
            guard,
        );

        match checks.validate_all() {
            Validation::Success((from, event, to, guard)) => Ok(Transition {
                from,
                event,
                to,
                guard,
            }),
            Validation::Failure(errors) => Err(BuildErrors(errors.iter().cloned().collect())),
        }
    }
}

impl<T, St, E, C> Default for TransitionBuilder<T, St, E, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pair;
    use crate::{event_enum, state_enum};
    use serde_json::json;

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
        }
    }

    type Builder = TransitionBuilder<serde_json::Value, Pair<TestState>, TestEvent, ()>;

    fn initial() -> Pair<TestState> {
        Pair::pair(Some(TestState::Initial), None)
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = Builder::new().from(initial()).build();

        let errors = result.unwrap_err();
        assert_eq!(
            errors.errors(),
            &[BuildError::MissingEvent, BuildError::MissingToState]
        );
    }

    #[test]
    fn each_missing_part_is_reported_by_name() {
        let no_source = Builder::new().on(TestEvent::Start).to(initial()).build();
        assert_eq!(no_source.unwrap_err().errors(), &[BuildError::MissingFromState]);

        let no_event = Builder::new().from(initial()).to(initial()).build();
        assert_eq!(no_event.unwrap_err().errors(), &[BuildError::MissingEvent]);

        let no_target = Builder::new().from(initial()).on(TestEvent::Start).build();
        assert_eq!(no_target.unwrap_err().errors(), &[BuildError::MissingToState]);
    }

    #[test]
    fn builder_reports_every_problem_at_once() {
        let errors = Builder::new().when_text("#.a = 1;").build().unwrap_err();

        assert_eq!(errors.errors().len(), 4);
        assert!(errors.contains(&BuildError::MissingFromState));
        assert!(matches!(errors.errors()[3], BuildError::InvalidGuard(_)));
    }

    #[test]
    fn transition_builder_with_closure_guard() {
        let transition = Builder::new()
            .from(initial())
            .on(TestEvent::Start)
            .to(Pair::pair(Some(TestState::Processing), None))
            .when(|subject, _, _, _| subject["ready"] == json!(true))
            .build()
            .unwrap();

        let current = Pair::concrete([TestState::Initial, TestState::Complete]);
        assert_eq!(
            transition.can_fire(&json!({ "ready": true }), &current, &TestEvent::Start, None),
            Ok(true)
        );
        assert_eq!(
            transition.can_fire(&json!({ "ready": false }), &current, &TestEvent::Start, None),
            Ok(false)
        );
    }

    #[test]
    fn fluent_api_builds_transition() {
        let transition = Builder::new()
            .from(initial())
            .on(TestEvent::Start)
            .to(Pair::pair(Some(TestState::Complete), None))
            .build()
            .unwrap();

        assert_eq!(transition.from, initial());
        assert_eq!(transition.to, Pair::pair(Some(TestState::Complete), None));
        assert!(transition.guard.is_none());
    }
}
