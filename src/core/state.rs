//! Bounds shared by every state machine built with this crate.
//!
//! States, events and contexts are plain caller-owned values. The engine
//! never inspects them beyond the matchers registered in a graph, so the
//! traits here only collect the auto-trait and `Debug` requirements needed
//! to move them through effects and into error messages.

use std::fmt::Debug;

/// Trait for state machine states.
///
/// Implemented automatically for every `Clone + Debug + Send + Sync` type.
/// Enums work best: a variant tag becomes the "type" a matcher checks,
/// and variant payloads can be narrowed into with [`crate::variant!`].
///
/// # Example
///
/// ```rust
/// use statewise::core::State;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Phase {
///     Solid,
///     Liquid,
///     Gas,
/// }
///
/// fn assert_state<S: State>(_: &S) {}
/// assert_state(&Phase::Liquid);
/// ```
pub trait State: Clone + Debug + Send + Sync + 'static {}

impl<T> State for T where T: Clone + Debug + Send + Sync + 'static {}

/// Trait for the events fed into a state machine.
///
/// Carries the same requirements as [`State`]: events are cloned into the
/// [`crate::effects::Transition`] handed to global listeners and into errors.
pub trait Event: Clone + Debug + Send + Sync + 'static {}

impl<T> Event for T where T: Clone + Debug + Send + Sync + 'static {}

/// Trait for the context threaded through one transition.
///
/// Contexts are moved, never shared: each side effect and listener takes
/// ownership of the current context and yields the next one.
pub trait Context: Send + 'static {}

impl<T> Context for T where T: Send + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Initial,
        Complete,
    }

    #[derive(Clone, Debug)]
    struct Tick;

    struct Payload {
        _buffer: Vec<u8>,
    }

    fn is_state<S: State>(_: &S) -> bool {
        true
    }

    fn is_event<E: Event>(_: &E) -> bool {
        true
    }

    fn is_context<C: Context>(_: &C) -> bool {
        true
    }

    #[test]
    fn enums_are_states() {
        assert!(is_state(&TestState::Initial));
        assert!(is_state(&TestState::Complete));
    }

    #[test]
    fn unit_structs_are_events() {
        assert!(is_event(&Tick));
    }

    #[test]
    fn contexts_need_not_be_clone_or_debug() {
        assert!(is_context(&Payload {
            _buffer: Vec::new()
        }));
    }
}
