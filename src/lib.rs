//! Stateflow: an event-driven state machine with guarded transitions.
//!
//! A machine is a table of `(from, event, to, guard)` transitions over
//! composite states, plus listeners that run in a fixed order around every
//! dispatch. States are tuples of labels where any component may be left
//! unset to act as a wildcard. Guards are native closures or text in a small
//! expression language that reads the subject (`#.path`) and the dispatch
//! context (`$.path`).
//!
//! # Core Concepts
//!
//! - **State**: [`CompositeState`](core::CompositeState), an N-component label tuple
//! - **Guards**: predicates or compiled [`TextGuard`](expr::TextGuard)s that gate transitions
//! - **Dispatch**: [`StateMachine::send_event`](machine::StateMachine::send_event)
//!   resolves exactly one transition or returns the caller's error
//! - **Listeners**: machine, event, state, transform and action callbacks
//!
//! # Example
//!
//! ```rust
//! use stateflow::builder::StateMachineBuilder;
//! use stateflow::core::Pair;
//! use stateflow::expr::EvalError;
//! use stateflow::machine::Timing;
//! use stateflow::{event_enum, state_enum};
//! use serde_json::json;
//!
//! state_enum! {
//!     #[derive(serde::Serialize, serde::Deserialize)]
//!     enum Order { Draft, Submitted, Approved, Rejected }
//! }
//! event_enum! {
//!     enum Review { Submit, Decide }
//! }
//!
//! #[derive(Debug)]
//! enum OrderError {
//!     NoTransition(String),
//!     Guard(EvalError),
//! }
//!
//! impl From<EvalError> for OrderError {
//!     fn from(err: EvalError) -> Self {
//!         Self::Guard(err)
//!     }
//! }
//!
//! type Json = serde_json::Value;
//!
//! let draft = Pair::pair(Some(Order::Draft), None);
//! let submitted = Pair::pair(Some(Order::Submitted), None);
//! let approved = Pair::pair(Some(Order::Approved), None);
//! let rejected = Pair::pair(Some(Order::Rejected), None);
//!
//! let machine = StateMachineBuilder::<Json, Pair<Order>, Review, Json, OrderError>::new()
//!     .state_accessor(
//!         |order| serde_json::from_value(order["state"].clone()).unwrap_or(Pair::new([None, None])),
//!         |order, state| order["state"] = json!(state),
//!     )
//!     .on_unresolved(|_, from, event| OrderError::NoTransition(format!("{from} on {event:?}")))
//!     .add_state(draft, Review::Submit, submitted.clone())
//!     .add_text_state(submitted.clone(), Review::Decide, approved.clone(), "$.verdict == \"PASS\";")
//!     .unwrap()
//!     .add_text_state(submitted, Review::Decide, rejected, "$.verdict <> \"PASS\";")
//!     .unwrap()
//!     .add_machine_listener(Timing::Post, |order, state, _| {
//!         order["seen"] = json!(state.to_string());
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut order = json!({ "state": ["Draft", null] });
//! machine.send_event(&mut order, &Review::Submit, None).unwrap();
//!
//! let verdict = json!({ "verdict": "PASS" });
//! let state = machine.send_event(&mut order, &Review::Decide, Some(&verdict)).unwrap();
//! assert_eq!(state, approved);
//! assert_eq!(order["seen"], "(Approved, *)");
//! ```

pub mod builder;
pub mod core;
pub mod expr;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, BuildErrors, StateMachineBuilder, TransitionBuilder};
pub use core::{CompositeState, Event, Guard, State, StateDescriptor};
pub use expr::{CompileError, EvalError, FieldAccess, TextGuard, Value};
pub use machine::{StatePhase, StateMachine, Timing, Transition};
