//! Statewise: a matcher-driven finite state machine engine
//!
//! A state machine is a frozen [`Graph`](graph::Graph) plus a transition
//! engine. For any `(state, context, event)` triple the engine selects a
//! state definition and a transition rule with [`Matcher`](core::Matcher)s
//! (first match wins), runs the rule's side effect, the exit listeners of
//! the source state, the enter listeners of the target state and finally
//! the global transition listeners, then returns the new state and context.
//!
//! Every effectful step is a stillwater effect, awaited in order.
//!
//! # Example
//!
//! ```rust
//! use statewise::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Matter {
//!     Solid,
//!     Liquid,
//!     Gas,
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Change {
//!     OnMelted,
//!     OnFrozen,
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Log {
//!     value: String,
//! }
//!
//! type Record = Action<Log, Change, ()>;
//!
//! fn record(value: &'static str) -> Record {
//!     Action::new(value, move |_log: Log, _event: &Change| {
//!         pure(Log { value: value.to_string() }).boxed()
//!     })
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let machine: StateMachine<Matter, Change, Log, Record, ()> = StateMachine::create(|graph| {
//!     graph
//!         .state(variant!(Matter::Solid), |state| {
//!             state.on_pure(variant!(Change::OnMelted), |_, _, _| {
//!                 transition_to(Matter::Liquid).with_side_effect(record("melted"))
//!             })
//!         })
//!         .state(variant!(Matter::Liquid), |state| {
//!             state.on_pure(variant!(Change::OnFrozen), |_, _, _| {
//!                 transition_to(Matter::Solid).with_side_effect(record("frozen"))
//!             })
//!         })
//!         .state(variant!(Matter::Gas), |state| state)
//! });
//!
//! let (state, log) = machine
//!     .transition(Matter::Solid, Log { value: String::new() }, Change::OnMelted, &())
//!     .await
//!     .unwrap();
//! assert_eq!(state, Matter::Liquid);
//! assert_eq!(log.value, "melted");
//!
//! let rejected = machine
//!     .transition(Matter::Gas, log, Change::OnMelted, &())
//!     .await;
//! assert!(rejected.unwrap_err().is_no_transition());
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod effects;
pub mod graph;

// Re-export commonly used types
pub use crate::builder::{dont_transition, transition_to, GraphBuilder, StateDefinitionBuilder};
pub use crate::core::{Matcher, TransitionLog, TransitionRecord};
pub use crate::effects::{
    Action, ActionError, Phase, SideEffect, StateMachine, Transition, TransitionError,
    TransitionTo,
};
pub use crate::graph::{Graph, GraphError, StateDefinition};

/// Everything needed to declare and run a machine, including the
/// stillwater effect constructors.
pub mod prelude {
    pub use crate::builder::{dont_transition, transition_to, GraphBuilder};
    pub use crate::core::{Matcher, TransitionLog};
    pub use crate::effects::{
        Action, ActionError, SideEffect, StateMachine, Transition, TransitionError, TransitionTo,
    };
    pub use crate::graph::Graph;
    pub use crate::variant;
    pub use stillwater::prelude::*;
}
