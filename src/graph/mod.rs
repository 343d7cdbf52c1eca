//! The frozen transition graph.
//!
//! A [`Graph`] maps state matchers to [`StateDefinition`]s in registration
//! order and carries the global transition listeners. Graphs are assembled
//! once with [`crate::builder::GraphBuilder`] and never mutated afterwards,
//! so they can be shared freely between concurrent transitions.

mod validation;

pub use validation::GraphError;

use crate::core::Matcher;
use crate::effects::{ActionError, Transition, TransitionTo};
use std::fmt;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;

/// Transition rule with its state and event already narrowed away.
///
/// Returns `None` only when the narrowing performed at registration no
/// longer accepts the values, which the engine treats as "no rule".
pub type Rule<S, E, C, F, Env> =
    Arc<dyn Fn(&S, &C, &E) -> Option<BoxedEffect<TransitionTo<S, F>, ActionError, Env>> + Send + Sync>;

/// Enter or exit listener: `(context, state, cause) -> context`.
pub type Listener<S, E, C, Env> =
    Arc<dyn Fn(C, &S, &E) -> BoxedEffect<C, ActionError, Env> + Send + Sync>;

/// Global listener observing every successful transition.
pub type TransitionListener<S, E, F> = Arc<dyn Fn(&Transition<S, E, F>) + Send + Sync>;

/// An event matcher paired with the rule it selects.
pub struct EventRule<S, E, C, F, Env> {
    pub(crate) matcher: Matcher<E>,
    pub(crate) rule: Rule<S, E, C, F, Env>,
}

impl<S, E, C, F, Env> EventRule<S, E, C, F, Env> {
    /// Matcher selecting the events this rule handles.
    pub fn matcher(&self) -> &Matcher<E> {
        &self.matcher
    }

    pub(crate) fn invoke(
        &self,
        state: &S,
        context: &C,
        event: &E,
    ) -> Option<BoxedEffect<TransitionTo<S, F>, ActionError, Env>> {
        (self.rule)(state, context, event)
    }
}

impl<S, E, C, F, Env> Clone for EventRule<S, E, C, F, Env> {
    fn clone(&self) -> Self {
        Self {
            matcher: self.matcher.clone(),
            rule: Arc::clone(&self.rule),
        }
    }
}

/// Everything registered for the states one matcher selects.
pub struct StateDefinition<S, E, C, F, Env> {
    pub(crate) transitions: Vec<EventRule<S, E, C, F, Env>>,
    pub(crate) on_enter: Vec<Listener<S, E, C, Env>>,
    pub(crate) on_exit: Vec<Listener<S, E, C, Env>>,
}

impl<S, E, C, F, Env> StateDefinition<S, E, C, F, Env> {
    pub(crate) fn new() -> Self {
        Self {
            transitions: Vec::new(),
            on_enter: Vec::new(),
            on_exit: Vec::new(),
        }
    }

    /// The first rule, in registration order, whose matcher accepts `event`.
    pub fn rule_for(&self, event: &E) -> Option<&EventRule<S, E, C, F, Env>> {
        self.transitions
            .iter()
            .find(|rule| rule.matcher.matches(event))
    }

    /// Rules in registration order.
    pub fn transitions(&self) -> &[EventRule<S, E, C, F, Env>] {
        &self.transitions
    }

    /// Listeners run when a transition enters these states.
    pub fn on_enter_listeners(&self) -> &[Listener<S, E, C, Env>] {
        &self.on_enter
    }

    /// Listeners run when a transition leaves these states.
    pub fn on_exit_listeners(&self) -> &[Listener<S, E, C, Env>] {
        &self.on_exit
    }
}

impl<S, E, C, F, Env> fmt::Debug for StateDefinition<S, E, C, F, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let events: Vec<&str> = self
            .transitions
            .iter()
            .map(|rule| rule.matcher.description())
            .collect();
        f.debug_struct("StateDefinition")
            .field("events", &events)
            .field("on_enter", &self.on_enter.len())
            .field("on_exit", &self.on_exit.len())
            .finish()
    }
}

/// Immutable mapping from state matchers to their definitions.
pub struct Graph<S, E, C, F, Env> {
    pub(crate) definitions: Vec<(Matcher<S>, Arc<StateDefinition<S, E, C, F, Env>>)>,
    pub(crate) on_transition: Vec<TransitionListener<S, E, F>>,
}

impl<S, E, C, F, Env> Graph<S, E, C, F, Env> {
    /// The definition of the first state matcher, in registration order,
    /// accepting `state`.
    pub fn definition_for(&self, state: &S) -> Option<&StateDefinition<S, E, C, F, Env>> {
        self.definitions
            .iter()
            .find(|(matcher, _)| matcher.matches(state))
            .map(|(_, definition)| definition.as_ref())
    }

    /// Every state matcher with its definition, in registration order.
    pub fn definitions(
        &self,
    ) -> impl Iterator<Item = (&Matcher<S>, &StateDefinition<S, E, C, F, Env>)> {
        self.definitions
            .iter()
            .map(|(matcher, definition)| (matcher, definition.as_ref()))
    }

    /// Global listeners, in registration order.
    pub fn on_transition_listeners(&self) -> &[TransitionListener<S, E, F>] {
        &self.on_transition
    }

    /// Number of state definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if no state is defined.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub(crate) fn notify_on_transition(&self, transition: &Transition<S, E, F>) {
        for listener in &self.on_transition {
            listener(transition);
        }
    }
}

impl<S, E, C, F, Env> Clone for Graph<S, E, C, F, Env> {
    fn clone(&self) -> Self {
        Self {
            definitions: self.definitions.clone(),
            on_transition: self.on_transition.clone(),
        }
    }
}

impl<S, E, C, F, Env> fmt::Debug for Graph<S, E, C, F, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states = f.debug_map();
        for (matcher, definition) in &self.definitions {
            states.entry(&matcher.description(), definition);
        }
        states.finish()
    }
}
