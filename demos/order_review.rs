//! Order Review
//!
//! This example walks a purchase order through submission, review and
//! fulfilment using a two-component state: the order stage and the payment
//! status.
//!
//! Key concepts:
//! - Composite states with wildcard components
//! - Text guards reading the order (`#.`) and the reviewer's verdict (`$.`)
//! - Native guard predicates
//! - Listeners for every lifecycle phase
//!
//! Run with: RUST_LOG=stateflow=debug cargo run --example order_review

use stateflow::builder::StateMachineBuilder;
use stateflow::core::Pair;
use stateflow::expr::{EvalError, FieldAccess, FieldValue};
use stateflow::machine::{StatePhase, Timing};
use stateflow::{event_enum, state_enum};
use std::fmt;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Step {
        // Order stage
        Draft,
        Submitted,
        Approved,
        Rejected,
        Shipped,
        // Payment status
        Unpaid,
        Paid,
    }
}

event_enum! {
    enum OrderEvent {
        Submit,
        Review,
        Pay,
        Ship,
    }
}

struct Customer {
    trusted: bool,
}

impl FieldAccess for Customer {
    fn get_field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "trusted" => Some(FieldValue::scalar(self.trusted)),
            _ => None,
        }
    }
}

struct Order {
    id: u32,
    total: i64,
    stage: Step,
    payment: Step,
    customer: Option<Customer>,
    notes: Vec<String>,
}

impl FieldAccess for Order {
    fn get_field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::scalar(self.id)),
            "total" => Some(FieldValue::scalar(self.total)),
            "customer" => self.customer.as_ref().map(FieldValue::object),
            _ => None,
        }
    }
}

struct Verdict {
    status: &'static str,
}

impl FieldAccess for Verdict {
    fn get_field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "status" => Some(FieldValue::scalar(self.status)),
            _ => None,
        }
    }
}

#[derive(Debug)]
enum OrderError {
    NoTransition { order: u32, from: String, event: OrderEvent },
    Guard(EvalError),
}

impl From<EvalError> for OrderError {
    fn from(err: EvalError) -> Self {
        Self::Guard(err)
    }
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTransition { order, from, event } => {
                write!(f, "order {order}: no transition from {from} on {event:?}")
            }
            Self::Guard(err) => write!(f, "guard failed: {err}"),
        }
    }
}

fn stage(step: Step) -> Pair<Step> {
    Pair::pair(Some(step), None)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Order Review ===\n");

    let machine = StateMachineBuilder::<Order, Pair<Step>, OrderEvent, Verdict, OrderError>::new()
        .state_accessor(
            |order| Pair::concrete([order.stage, order.payment]),
            |order, state| {
                if let Some(step) = state.component(0) {
                    order.stage = *step;
                }
                if let Some(step) = state.component(1) {
                    order.payment = *step;
                }
            },
        )
        .on_unresolved(|order, from, event| OrderError::NoTransition {
            order: order.id,
            from: from.to_string(),
            event: *event,
        })
        .add_state(stage(Step::Draft), OrderEvent::Submit, stage(Step::Submitted))
        // Large orders from untrusted customers need an explicit pass.
        .add_text_state(
            stage(Step::Submitted),
            OrderEvent::Review,
            stage(Step::Approved),
            "$.status == \"PASS\" || (#.total < 1000 && #.customer.trusted);",
        )
        .and_then(|b| {
            b.add_text_state(
                stage(Step::Submitted),
                OrderEvent::Review,
                stage(Step::Rejected),
                "$.status <> \"PASS\" && !(#.total < 1000 && #.customer.trusted);",
            )
        })
        .expect("review guards compile")
        .add_state(
            Pair::pair(None, Some(Step::Unpaid)),
            OrderEvent::Pay,
            Pair::pair(None, Some(Step::Paid)),
        )
        .add_state_when(
            Pair::concrete([Step::Approved, Step::Paid]),
            OrderEvent::Ship,
            stage(Step::Shipped),
            |order, _, _, _| order.total > 0,
        )
        .add_machine_listener(Timing::Pre, |order, state, event| {
            order.notes.push(format!("{event:?} received in {state}"));
        })
        .add_state_listener(stage(Step::Submitted), StatePhase::Enter, |order, _| {
            order.notes.push("queued for review".to_string());
        })
        .add_event_listener(OrderEvent::Review, Timing::Post, |order, _, to, verdict| {
            let status = verdict.map_or("none", |v| v.status);
            order.notes.push(format!("reviewed ({status}) -> {}", to.map_or(String::new(), |s| s.to_string())));
        })
        .add_transform_listener(stage(Step::Approved), stage(Step::Shipped), |order, _| {
            order.notes.push("handed to carrier".to_string());
        })
        .add_action(|order, from, event, to, _| {
            order.notes.push(format!("{from} --{event:?}--> {to}"));
        })
        .build()
        .expect("machine configuration is complete");

    let mut small = Order {
        id: 1,
        total: 250,
        stage: Step::Draft,
        payment: Step::Unpaid,
        customer: Some(Customer { trusted: true }),
        notes: Vec::new(),
    };

    println!("Order {} (total {}):", small.id, small.total);
    for event in [OrderEvent::Submit, OrderEvent::Review, OrderEvent::Pay, OrderEvent::Ship] {
        match machine.send_event(&mut small, &event, None) {
            Ok(state) => println!("  {event:?} -> {state}"),
            Err(err) => println!("  {event:?} failed: {err}"),
        }
    }

    let mut large = Order {
        id: 2,
        total: 5000,
        stage: Step::Draft,
        payment: Step::Unpaid,
        customer: None,
        notes: Vec::new(),
    };
    let reject = Verdict { status: "REJECT" };

    println!("\nOrder {} (total {}):", large.id, large.total);
    for (event, verdict) in [
        (OrderEvent::Submit, None),
        (OrderEvent::Review, Some(&reject)),
        (OrderEvent::Ship, None),
    ] {
        match machine.send_event(&mut large, &event, verdict) {
            Ok(state) => println!("  {event:?} -> {state}"),
            Err(err) => println!("  {event:?} failed: {err}"),
        }
    }

    println!("\nListener notes for order {}:", small.id);
    for note in &small.notes {
        println!("  {note}");
    }
}
