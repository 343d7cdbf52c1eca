//! Effectful State Machine
//!
//! This example demonstrates side effects and listeners using the environment pattern.
//!
//! Key concepts:
//! - Environment pattern for dependency injection
//! - Rules read the environment to decide the target state
//! - Side effects and enter/exit listeners thread the context
//! - A global listener records every transition
//!
//! Run with: cargo run --example effectful_state_machine

use statewise::prelude::*;
use std::sync::{Arc, Mutex};
use stillwater::effect::BoxedEffect;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
enum Matter {
    Solid,
    Liquid,
    Gas,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
enum Change {
    Heat,
    Cool,
}

// Context carried through one transition
#[derive(Clone, Debug, Default)]
struct Batch {
    id: u64,
    notes: Vec<String>,
}

// Environment capabilities as traits
trait Thermometer {
    fn celsius(&self) -> i32;
}

trait Logbook {
    fn log(&self, message: &str);
}

// Lab environment implementation
#[derive(Clone)]
struct Lab {
    celsius: i32,
    entries: Arc<Mutex<Vec<String>>>,
}

impl Thermometer for Lab {
    fn celsius(&self) -> i32 {
        self.celsius
    }
}

impl Logbook for Lab {
    fn log(&self, message: &str) {
        println!("  [Log] {}", message);
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(message.to_string());
        }
    }
}

// Side effects are plain values the global listener can inspect
#[derive(Clone, Debug, PartialEq)]
enum Procedure {
    Record(&'static str),
}

impl SideEffect<Batch, Change, Lab> for Procedure {
    fn apply(&self, batch: Batch, _event: &Change) -> BoxedEffect<Batch, ActionError, Lab> {
        let Procedure::Record(what) = self.clone();
        from_fn(move |lab: &Lab| {
            let mut batch = batch.clone();
            lab.log(&format!("Batch {} {} at {}C", batch.id, what, lab.celsius()));
            batch.notes.push(what.to_string());
            Ok(batch)
        })
        .boxed()
    }
}

// Effectful rule - the thermometer decides where to go
fn heat_to(
    target: Matter,
    threshold: i32,
    what: &'static str,
) -> impl Fn(&Matter, &Batch, &Change) -> BoxedEffect<TransitionTo<Matter, Procedure>, ActionError, Lab>
       + Send
       + Sync
       + 'static {
    move |_: &Matter, _: &Batch, _: &Change| {
        let target = target.clone();
        from_fn(move |lab: &Lab| {
            if lab.celsius() >= threshold {
                Ok(transition_to(target.clone()).with_side_effect(Procedure::Record(what)))
            } else {
                Ok(dont_transition())
            }
        })
        .boxed()
    }
}

fn note(
    message: &'static str,
) -> impl Fn(&Matter, Batch, &Change) -> BoxedEffect<Batch, ActionError, Lab> + Send + Sync + 'static
{
    move |_: &Matter, mut batch: Batch, _: &Change| {
        batch.notes.push(message.to_string());
        pure(batch).boxed()
    }
}

fn lab_machine(history: &TransitionLog<Matter, Change>) -> StateMachine<Matter, Change, Batch, Procedure, Lab> {
    StateMachine::create(|graph| {
        graph
            .state(variant!(Matter::Solid), |state| {
                state
                    .on(variant!(Change::Heat), heat_to(Matter::Liquid, 1, "melted"))
                    .on_exit(note("left solid"))
            })
            .state(variant!(Matter::Liquid), |state| {
                state
                    .on(variant!(Change::Heat), heat_to(Matter::Gas, 100, "boiled"))
                    .on_pure(variant!(Change::Cool), |_, _, _| {
                        transition_to(Matter::Solid).with_side_effect(Procedure::Record("frozen"))
                    })
                    .on_enter(note("entered liquid"))
            })
            .state(variant!(Matter::Gas), |state| state.on_enter(note("entered gas")))
            .on_transition(history.listener())
    })
}

#[tokio::main]
async fn main() {
    println!("=== Effectful State Machine Example ===\n");

    let history = TransitionLog::new();
    let machine = lab_machine(&history);
    let entries = Arc::new(Mutex::new(Vec::new()));

    let mut state = Matter::Solid;
    let mut batch = Batch {
        id: 42,
        notes: Vec::new(),
    };

    // Same machine, different environments
    for celsius in [20, 50, 120] {
        let lab = Lab {
            celsius,
            entries: Arc::clone(&entries),
        };
        println!("Heating at {}C:", celsius);
        match machine.transition(state.clone(), batch.clone(), Change::Heat, &lab).await {
            Ok((next, updated)) => {
                println!("  {:?} -> {:?}\n", state, next);
                state = next;
                batch = updated;
            }
            Err(e) => println!("  Error: {}\n", e),
        }
    }

    println!("Batch notes: {:?}", batch.notes);
    println!("Path: {:?}", history.path());
    match history.to_json() {
        Ok(json) => println!("History as JSON: {}", json),
        Err(e) => println!("Could not export history: {}", e),
    }

    println!("\nKey Takeaways:");
    println!("- Rules are effects: they can read the environment before choosing a target");
    println!("- Side effects are values, so global listeners can inspect them");
    println!("- Exit and enter listeners run in order and thread the context");
    println!("- dont_transition() keeps the state but still runs the listeners");

    println!("\n=== Example Complete ===");
}
