//! Basic State Machine
//!
//! This example demonstrates a state machine with pure transition rules.
//!
//! Key concepts:
//! - States and events are plain enums
//! - Matchers select state definitions and rules (first match wins)
//! - The caller owns the current state; the machine only holds the graph
//! - Unhandled events are reported as errors, not silently ignored
//!
//! Run with: cargo run --example basic_state_machine

use statewise::prelude::*;

#[derive(Clone, Debug, PartialEq)]
enum Matter {
    Solid,
    Liquid,
    Gas,
}

#[derive(Clone, Debug, PartialEq)]
enum Change {
    OnMelted,
    OnFrozen,
    OnVaporized,
    OnCondensed,
}

type MatterMachine = StateMachine<Matter, Change, (), Action<(), Change, ()>, ()>;

#[tokio::main]
async fn main() {
    println!("=== Basic State Machine Example ===\n");

    // Every state gets a definition; rules map events to targets
    let machine: MatterMachine = StateMachine::create(|graph| {
        graph
            .state(variant!(Matter::Solid), |state| {
                state.on_pure(variant!(Change::OnMelted), |_, _, _| transition_to(Matter::Liquid))
            })
            .state(variant!(Matter::Liquid), |state| {
                state
                    .on_pure(variant!(Change::OnFrozen), |_, _, _| transition_to(Matter::Solid))
                    .on_pure(variant!(Change::OnVaporized), |_, _, _| transition_to(Matter::Gas))
            })
            .state(variant!(Matter::Gas), |state| {
                state.on_pure(variant!(Change::OnCondensed), |_, _, _| transition_to(Matter::Liquid))
            })
    });

    println!("State machine created with {} state definitions", machine.graph().len());

    let mut state = Matter::Solid;
    println!("Initial state: {:?}\n", state);

    for change in [Change::OnMelted, Change::OnVaporized, Change::OnCondensed] {
        match machine.transition(state.clone(), (), change.clone(), &()).await {
            Ok((next, ())) => {
                println!("  {:?} --{:?}--> {:?}", state, change, next);
                state = next;
            }
            Err(e) => println!("  Error: {}", e),
        }
    }

    // Liquid has no rule for OnCondensed
    println!("\nApplying an event the current state does not handle:");
    match machine.transition(state.clone(), (), Change::OnCondensed, &()).await {
        Ok((next, ())) => println!("  Unexpected transition to {:?}", next),
        Err(e) => println!("  Rejected: {}", e),
    }

    println!("\nFinal state: {:?}", state);
    println!("\n=== Example Complete ===");
}
