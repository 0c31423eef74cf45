//! Guards that decide whether a candidate transition may fire.
//!
//! A guard is either always true, a native predicate, or compiled guard text.
//! All three are evaluated against the same inputs: the subject, the state
//! the transition starts from, the event, and the optional dispatch context.

use crate::expr::{CompileError, EvalError, FieldAccess, TextGuard};
use std::fmt;
use std::sync::Arc;

/// Native guard predicate.
pub type Predicate<T, St, E, C> = Arc<dyn Fn(&T, &St, &E, Option<&C>) -> bool + Send + Sync>;

/// Predicate that determines if a transition can fire.
///
/// # Example
///
/// ```rust
/// use stateflow::core::{Guard, Single};
/// use stateflow::{event_enum, state_enum};
///
/// state_enum! {
///     enum Phase { Open, Closed }
/// }
/// event_enum! {
///     enum Signal { Close }
/// }
///
/// let guard: Guard<serde_json::Value, Single<Phase>, Signal, ()> =
///     Guard::text("#.balance == 0;").unwrap();
///
/// let account = serde_json::json!({ "balance": 0.00 });
/// let open = Single::single(Phase::Open);
/// assert_eq!(guard.evaluate(&account, &open, &Signal::Close, None), Ok(true));
/// ```
pub enum Guard<T, St, E, C> {
    Always,
    Predicate(Predicate<T, St, E, C>),
    Text(TextGuard),
}

impl<T, St, E, C> Guard<T, St, E, C> {
    /// Create a guard from a native predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T, &St, &E, Option<&C>) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Compile guard text. Fails immediately on malformed text.
    pub fn text(text: &str) -> Result<Self, CompileError> {
        TextGuard::compile(text).map(Self::Text)
    }

    /// Evaluate the guard. Only text guards can fail.
    pub fn evaluate(
        &self,
        subject: &T,
        from: &St,
        event: &E,
        context: Option<&C>,
    ) -> Result<bool, EvalError>
    where
        T: FieldAccess,
        C: FieldAccess,
    {
        match self {
            Self::Always => Ok(true),
            Self::Predicate(predicate) => Ok(predicate(subject, from, event, context)),
            Self::Text(guard) => guard.evaluate(subject, context.map(|c| c as &dyn FieldAccess)),
        }
    }
}

impl<T, St, E, C> Clone for Guard<T, St, E, C> {
    fn clone(&self) -> Self {
        match self {
            Self::Always => Self::Always,
            Self::Predicate(predicate) => Self::Predicate(Arc::clone(predicate)),
            Self::Text(guard) => Self::Text(guard.clone()),
        }
    }
}

impl<T, St, E, C> fmt::Debug for Guard<T, St, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::Text(guard) => f.debug_tuple("Text").field(&guard.text()).finish(),
        }
    }
}
