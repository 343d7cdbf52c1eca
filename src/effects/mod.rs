//! The transition engine and the effectful values it composes.
//!
//! Rules, side effects and listeners all return stillwater effects. The
//! engine runs each one against the caller's environment and awaits it
//! before starting the next, so one transition is a linear chain:
//!
//! rule -> side effect -> exit listeners -> enter listeners -> global listeners
//!
//! Graphs store effect factories (`Arc<dyn Fn(..) -> BoxedEffect<..>>`), so
//! each step allocates one boxed effect per run. Callers build effects with
//! stillwater's free constructors such as `pure()`, `fail()` and `from_fn()`.

mod machine;
mod transition;

pub use machine::StateMachine;
pub use transition::{
    Action, ActionError, Phase, SideEffect, Transition, TransitionError, TransitionTo,
};
