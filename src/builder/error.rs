//! Build errors for state machine and transition builders.

use crate::expr::CompileError;
use thiserror::Error;

/// Errors that can occur when building state machines and transitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("State accessor not specified. Call .state_accessor(get, set) before .build()")]
    MissingStateAccessor,

    #[error("Error factory not specified. Call .on_unresolved(factory) before .build()")]
    MissingErrorFactory,

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition event not specified. Call .on(event)")]
    MissingEvent,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Invalid guard: {0}")]
    InvalidGuard(#[from] CompileError),
}

/// Every problem found by a single `build()` call.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} build error(s): {}", .0.len(), join(.0))]
pub struct BuildErrors(pub Vec<BuildError>);

impl BuildErrors {
    pub fn errors(&self) -> &[BuildError] {
        &self.0
    }

    pub fn contains(&self, error: &BuildError) -> bool {
        self.0.contains(error)
    }
}

impl From<BuildError> for BuildErrors {
    fn from(error: BuildError) -> Self {
        Self(vec![error])
    }
}

fn join(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_errors_list_every_problem() {
        let errors = BuildErrors(vec![BuildError::MissingStateAccessor, BuildError::NoTransitions]);
        let message = errors.to_string();

        assert!(message.starts_with("2 build error(s): "));
        assert!(message.contains("state_accessor"));
        assert!(message.contains("No transitions"));
    }

    #[test]
    fn compile_errors_convert_to_invalid_guard() {
        let compile = crate::expr::TextGuard::compile("#.a ==").unwrap_err();
        let error = BuildError::from(compile.clone());
        assert_eq!(error, BuildError::InvalidGuard(compile));
        assert!(error.to_string().starts_with("Invalid guard: "));
    }
}
