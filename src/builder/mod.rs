//! Builder API for assembling transition graphs.
//!
//! This module provides fluent builders and the [`variant!`](crate::variant)
//! macro for declaring states, transition rules and listeners once at
//! startup, then freezing them into an immutable [`Graph`](crate::graph::Graph).

pub mod graph;
pub mod macros;
pub mod state;

pub use graph::GraphBuilder;
pub use state::StateDefinitionBuilder;

use crate::effects::TransitionTo;

/// Target for a rule moving to `state`.
///
/// # Example
///
/// ```
/// use statewise::builder::transition_to;
/// use statewise::effects::TransitionTo;
///
/// let target: TransitionTo<&str, ()> = transition_to("Liquid");
/// assert_eq!(target.to_state, Some("Liquid"));
/// ```
pub fn transition_to<S, F>(state: S) -> TransitionTo<S, F> {
    TransitionTo::new(state)
}

/// Target for a rule that keeps the current state.
///
/// Exit and enter listeners of the current state still run.
///
/// # Example
///
/// ```
/// use statewise::builder::dont_transition;
/// use statewise::effects::TransitionTo;
///
/// let target: TransitionTo<&str, &str> = dont_transition().with_side_effect("beep");
/// assert_eq!(target.to_state, None);
/// assert_eq!(target.side_effect, Some("beep"));
/// ```
pub fn dont_transition<S, F>() -> TransitionTo<S, F> {
    TransitionTo::stay()
}
