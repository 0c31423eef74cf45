//! Transition table, listeners and dispatch.

mod dispatch;
mod listener;
mod transition;

pub use dispatch::{ErrorFactory, StateAccessor, StateGetter, StateMachine, StateSetter};
pub use listener::{
    ActionFn, EventListenerFn, MachineListenerFn, StateListenerFn, StatePhase, Timing,
};
pub use transition::Transition;

pub(crate) use listener::{
    EventListener, Listeners, MachineListener, StateListener, TransformListener,
};
