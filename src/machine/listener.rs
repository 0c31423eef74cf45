//! Lifecycle listeners and the phases they run in.
//!
//! Each listener kind lives in its own insertion-ordered list. Dispatch
//! walks a list and keeps the entries whose key and phase select them.

use crate::core::StateDescriptor;

/// Whether a machine or event listener runs before or after resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timing {
    Pre,
    Post,
}

/// Whether a state listener fires when leaving or entering its state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatePhase {
    Exit,
    Enter,
}

/// `(subject, state, event)`: the source state before, the target state after.
pub type MachineListenerFn<T, St, E> = Box<dyn Fn(&mut T, &St, &E) + Send + Sync>;

/// `(subject, from, to, context)`: `to` is `None` in the pre phase.
pub type EventListenerFn<T, St, C> =
    Box<dyn Fn(&mut T, &St, Option<&St>, Option<&C>) + Send + Sync>;

/// `(subject, event)`: used by state and transform listeners.
pub type StateListenerFn<T, E> = Box<dyn Fn(&mut T, &E) + Send + Sync>;

/// `(subject, from, event, to, context)`.
pub type ActionFn<T, St, E, C> = Box<dyn Fn(&mut T, &St, &E, &St, Option<&C>) + Send + Sync>;

pub(crate) struct MachineListener<T, St, E> {
    pub timing: Timing,
    pub callback: MachineListenerFn<T, St, E>,
}

pub(crate) struct EventListener<T, St, E, C> {
    pub event: E,
    pub timing: Timing,
    pub callback: EventListenerFn<T, St, C>,
}

pub(crate) struct StateListener<T, St, E> {
    pub state: St,
    pub phase: StatePhase,
    pub callback: StateListenerFn<T, E>,
}

pub(crate) struct TransformListener<T, St, E> {
    pub source: St,
    pub target: St,
    pub callback: StateListenerFn<T, E>,
}

/// Every registered listener, grouped by kind.
pub(crate) struct Listeners<T, St, E, C> {
    pub machine: Vec<MachineListener<T, St, E>>,
    pub event: Vec<EventListener<T, St, E, C>>,
    pub state: Vec<StateListener<T, St, E>>,
    pub transform: Vec<TransformListener<T, St, E>>,
    pub action: Vec<ActionFn<T, St, E, C>>,
}

impl<T, St, E, C> Default for Listeners<T, St, E, C> {
    fn default() -> Self {
        Self {
            machine: Vec::new(),
            event: Vec::new(),
            state: Vec::new(),
            transform: Vec::new(),
            action: Vec::new(),
        }
    }
}

impl<T, St: StateDescriptor, E: PartialEq, C> Listeners<T, St, E, C> {
    pub fn machine(&self, timing: Timing) -> impl Iterator<Item = &MachineListenerFn<T, St, E>> {
        self.machine
            .iter()
            .filter(move |l| l.timing == timing)
            .map(|l| &l.callback)
    }

    pub fn event<'a>(
        &'a self,
        event: &'a E,
        timing: Timing,
    ) -> impl Iterator<Item = &'a EventListenerFn<T, St, C>> {
        self.event
            .iter()
            .filter(move |l| l.timing == timing && l.event == *event)
            .map(|l| &l.callback)
    }

    pub fn state<'a>(
        &'a self,
        state: &'a St,
        phase: StatePhase,
    ) -> impl Iterator<Item = &'a StateListenerFn<T, E>> {
        self.state
            .iter()
            .filter(move |l| l.phase == phase && l.state.matches(state))
            .map(|l| &l.callback)
    }

    pub fn transform<'a>(
        &'a self,
        from: &'a St,
        to: &'a St,
    ) -> impl Iterator<Item = &'a StateListenerFn<T, E>> {
        self.transform
            .iter()
            .filter(move |l| l.source.matches(from) && l.target.matches(to))
            .map(|l| &l.callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pair;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum Light {
            Red,
            Green,
        }
    }

    event_enum! {
        enum Signal {
            Go,
            Stop,
        }
    }

    type TestListeners = Listeners<Vec<&'static str>, Pair<Light>, Signal, ()>;

    fn run_state(listeners: &TestListeners, state: &Pair<Light>, phase: StatePhase) -> Vec<&'static str> {
        let mut log = Vec::new();
        for callback in listeners.state(state, phase) {
            callback(&mut log, &Signal::Go);
        }
        log
    }

    #[test]
    fn state_listeners_filter_by_descriptor_and_phase() {
        let mut listeners = TestListeners::default();
        listeners.state.push(StateListener {
            state: Pair::pair(Some(Light::Red), None),
            phase: StatePhase::Exit,
            callback: Box::new(|log, _| log.push("exit red")),
        });
        listeners.state.push(StateListener {
            state: Pair::pair(None, Some(Light::Green)),
            phase: StatePhase::Exit,
            callback: Box::new(|log, _| log.push("exit *-green")),
        });
        listeners.state.push(StateListener {
            state: Pair::pair(Some(Light::Red), None),
            phase: StatePhase::Enter,
            callback: Box::new(|log, _| log.push("enter red")),
        });

        let red_green = Pair::concrete([Light::Red, Light::Green]);
        assert_eq!(
            run_state(&listeners, &red_green, StatePhase::Exit),
            vec!["exit red", "exit *-green"]
        );

        let green_red = Pair::concrete([Light::Green, Light::Red]);
        assert!(run_state(&listeners, &green_red, StatePhase::Exit).is_empty());
    }

    #[test]
    fn event_listeners_filter_by_event_and_timing() {
        let mut listeners = TestListeners::default();
        listeners.event.push(EventListener {
            event: Signal::Go,
            timing: Timing::Pre,
            callback: Box::new(|log, _, _, _| log.push("pre go")),
        });
        listeners.event.push(EventListener {
            event: Signal::Stop,
            timing: Timing::Pre,
            callback: Box::new(|log, _, _, _| log.push("pre stop")),
        });

        let state = Pair::concrete([Light::Red, Light::Red]);
        let mut log = Vec::new();
        for callback in listeners.event(&Signal::Go, Timing::Pre) {
            callback(&mut log, &state, None, None);
        }
        assert_eq!(log, vec!["pre go"]);
        assert_eq!(listeners.event(&Signal::Go, Timing::Post).count(), 0);
    }

    #[test]
    fn transform_listeners_match_both_sides() {
        let mut listeners = TestListeners::default();
        listeners.transform.push(TransformListener {
            source: Pair::pair(Some(Light::Red), None),
            target: Pair::pair(Some(Light::Green), None),
            callback: Box::new(|log, _| log.push("red to green")),
        });

        let red = Pair::concrete([Light::Red, Light::Red]);
        let green = Pair::concrete([Light::Green, Light::Red]);
        assert_eq!(listeners.transform(&red, &green).count(), 1);
        assert_eq!(listeners.transform(&green, &red).count(), 0);
    }

    #[test]
    fn machine_listeners_keep_insertion_order() {
        let mut listeners = TestListeners::default();
        for (timing, name) in [(Timing::Pre, "a"), (Timing::Post, "b"), (Timing::Pre, "c")] {
            listeners.machine.push(MachineListener {
                timing,
                callback: Box::new(move |log, _, _| log.push(name)),
            });
        }

        let state = Pair::concrete([Light::Red, Light::Red]);
        let mut log = Vec::new();
        for callback in listeners.machine(Timing::Pre) {
            callback(&mut log, &state, &Signal::Go);
        }
        assert_eq!(log, vec!["a", "c"]);
    }
}
