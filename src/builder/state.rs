//! Builder for the definition of one state matcher.

use crate::core::{Context, Event, Matcher, State};
use crate::effects::{ActionError, TransitionTo};
use crate::graph::{EventRule, Listener, Rule, StateDefinition};
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;

/// Registers transition rules and lifecycle listeners for the states
/// selected by one matcher.
///
/// `R` is the narrowed view of the state the matcher produces; rules and
/// listeners receive it instead of the full state.
pub struct StateDefinitionBuilder<S, E, C, F, Env, R = S> {
    state_matcher: Matcher<S, R>,
    definition: StateDefinition<S, E, C, F, Env>,
}

impl<S, E, C, F, Env, R> StateDefinitionBuilder<S, E, C, F, Env, R>
where
    S: State,
    E: Event,
    C: Context,
    F: Send + 'static,
    Env: Clone + Send + Sync + 'static,
    R: 'static,
{
    pub(crate) fn new(state_matcher: Matcher<S, R>) -> Self {
        Self {
            state_matcher,
            definition: StateDefinition::new(),
        }
    }

    /// Add a rule for events accepted by `event_matcher`.
    ///
    /// Rules are tried in registration order; the first matching one wins.
    pub fn on<RE, T>(mut self, event_matcher: Matcher<E, RE>, rule: T) -> Self
    where
        RE: 'static,
        T: Fn(&R, &C, &RE) -> BoxedEffect<TransitionTo<S, F>, ActionError, Env>
            + Send
            + Sync
            + 'static,
    {
        let state_matcher = self.state_matcher.clone();
        let narrow_event = event_matcher.clone();
        let erased: Rule<S, E, C, F, Env> = Arc::new(move |state: &S, context: &C, event: &E| {
            let state = state_matcher.narrow(state)?;
            let event = narrow_event.narrow(event)?;
            Some(rule(state, context, event))
        });
        self.definition.transitions.push(EventRule {
            matcher: event_matcher.erase(),
            rule: erased,
        });
        self
    }

    /// Add a rule that decides synchronously.
    pub fn on_pure<RE, T>(self, event_matcher: Matcher<E, RE>, rule: T) -> Self
    where
        RE: 'static,
        T: Fn(&R, &C, &RE) -> TransitionTo<S, F> + Send + Sync + 'static,
    {
        self.on(event_matcher, move |state, context, event| {
            pure(rule(state, context, event)).boxed()
        })
    }

    /// Add a rule for events equal to `event`.
    pub fn on_eq<T>(self, event: E, rule: T) -> Self
    where
        E: PartialEq,
        T: Fn(&R, &C, &E) -> BoxedEffect<TransitionTo<S, F>, ActionError, Env>
            + Send
            + Sync
            + 'static,
    {
        self.on(Matcher::eq(event), rule)
    }

    /// Add a listener run when a transition enters one of these states.
    pub fn on_enter<L>(mut self, listener: L) -> Self
    where
        L: Fn(&R, C, &E) -> BoxedEffect<C, ActionError, Env> + Send + Sync + 'static,
    {
        let listener = self.narrow_listener(listener);
        self.definition.on_enter.push(listener);
        self
    }

    /// Add a listener run when a transition leaves one of these states.
    pub fn on_exit<L>(mut self, listener: L) -> Self
    where
        L: Fn(&R, C, &E) -> BoxedEffect<C, ActionError, Env> + Send + Sync + 'static,
    {
        let listener = self.narrow_listener(listener);
        self.definition.on_exit.push(listener);
        self
    }

    pub(crate) fn build(self) -> (Matcher<S>, StateDefinition<S, E, C, F, Env>) {
        (self.state_matcher.erase(), self.definition)
    }

    fn narrow_listener<L>(&self, listener: L) -> Listener<S, E, C, Env>
    where
        L: Fn(&R, C, &E) -> BoxedEffect<C, ActionError, Env> + Send + Sync + 'static,
    {
        let state_matcher = self.state_matcher.clone();
        Arc::new(
            move |context: C, state: &S, event: &E| match state_matcher.narrow(state) {
                Some(state) => listener(state, context, event),
                None => pure(context).boxed(),
            },
        )
    }
}
