//! Builder for constructing transition graphs.

use crate::builder::state::StateDefinitionBuilder;
use crate::core::{Context, Event, Matcher, State};
use crate::effects::Transition;
use crate::graph::{Graph, StateDefinition, TransitionListener};
use std::sync::Arc;

/// Builder for constructing graphs with a fluent API.
///
/// Registration order is significant: state matchers and event matchers
/// are both resolved first-match-wins.
pub struct GraphBuilder<S, E, C, F, Env> {
    definitions: Vec<(Matcher<S>, Arc<StateDefinition<S, E, C, F, Env>>)>,
    on_transition: Vec<TransitionListener<S, E, F>>,
}

impl<S, E, C, F, Env> GraphBuilder<S, E, C, F, Env>
where
    S: State,
    E: Event,
    C: Context,
    F: Send + 'static,
    Env: Clone + Send + Sync + 'static,
{
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
            on_transition: Vec::new(),
        }
    }

    /// Start from the registrations of an existing graph.
    ///
    /// New state definitions are appended after the existing ones, so they
    /// only apply to states the graph did not already cover.
    pub fn from_graph(graph: &Graph<S, E, C, F, Env>) -> Self {
        Self {
            definitions: graph.definitions.clone(),
            on_transition: graph.on_transition.clone(),
        }
    }

    /// Define the states selected by `matcher`.
    pub fn state<R, I>(mut self, matcher: Matcher<S, R>, init: I) -> Self
    where
        R: 'static,
        I: FnOnce(
            StateDefinitionBuilder<S, E, C, F, Env, R>,
        ) -> StateDefinitionBuilder<S, E, C, F, Env, R>,
    {
        let (matcher, definition) = init(StateDefinitionBuilder::new(matcher)).build();
        self.definitions.push((matcher, Arc::new(definition)));
        self
    }

    /// Define the single state equal to `state`.
    pub fn state_eq<I>(self, state: S, init: I) -> Self
    where
        S: PartialEq,
        I: FnOnce(StateDefinitionBuilder<S, E, C, F, Env>) -> StateDefinitionBuilder<S, E, C, F, Env>,
    {
        self.state(Matcher::eq(state), init)
    }

    /// Add a listener observing every successful transition.
    pub fn on_transition<L>(mut self, listener: L) -> Self
    where
        L: Fn(&Transition<S, E, F>) + Send + Sync + 'static,
    {
        self.on_transition.push(Arc::new(listener));
        self
    }

    /// Freeze the registrations into an immutable graph.
    pub fn build(self) -> Graph<S, E, C, F, Env> {
        Graph {
            definitions: self.definitions,
            on_transition: self.on_transition,
        }
    }
}

impl<S, E, C, F, Env> Default for GraphBuilder<S, E, C, F, Env>
where
    S: State,
    E: Event,
    C: Context,
    F: Send + 'static,
    Env: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{Action, TransitionTo};
    use crate::variant;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Initial,
        Processing,
        Complete,
    }

    #[derive(Clone, PartialEq, Debug)]
    enum TestEvent {
        Start,
    }

    type TestBuilder = GraphBuilder<TestState, TestEvent, (), Action<(), TestEvent, ()>, ()>;

    #[test]
    fn empty_builder_builds_empty_graph() {
        let graph = TestBuilder::new().build();

        assert!(graph.is_empty());
        assert!(graph.on_transition_listeners().is_empty());
    }

    #[test]
    fn fluent_api_builds_graph() {
        let graph = TestBuilder::new()
            .state_eq(TestState::Initial, |state| {
                state.on_pure(variant!(TestEvent::Start), |_, _, _| {
                    TransitionTo::new(TestState::Processing)
                })
            })
            .state(variant!(TestState::Processing | TestState::Complete), |state| state)
            .on_transition(|_| {})
            .build();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.on_transition_listeners().len(), 1);

        let initial = graph.definition_for(&TestState::Initial).unwrap();
        assert!(initial.rule_for(&TestEvent::Start).is_some());

        let complete = graph.definition_for(&TestState::Complete).unwrap();
        assert!(complete.rule_for(&TestEvent::Start).is_none());
    }

    #[test]
    fn state_definitions_keep_registration_order() {
        let graph = TestBuilder::new()
            .state(variant!(TestState::Initial).described("first"), |state| state)
            .state(Matcher::all().described("catch-all"), |state| state)
            .build();

        let descriptions: Vec<&str> = graph
            .definitions()
            .map(|(matcher, _)| matcher.description())
            .collect();

        assert_eq!(descriptions, vec!["first", "catch-all"]);
    }

    #[test]
    fn from_graph_extends_without_touching_the_original() {
        let original = TestBuilder::new()
            .state_eq(TestState::Initial, |state| state)
            .build();

        let extended = GraphBuilder::from_graph(&original)
            .state_eq(TestState::Complete, |state| state)
            .build();

        assert_eq!(original.len(), 1);
        assert_eq!(extended.len(), 2);
        assert!(original.definition_for(&TestState::Complete).is_none());
        assert!(extended.definition_for(&TestState::Complete).is_some());
    }

    #[test]
    fn transition_listeners_are_stored_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let first = Arc::clone(&calls);
        let second = Arc::clone(&calls);

        let graph = TestBuilder::new()
            .on_transition(move |_| {
                first.fetch_add(1, Ordering::SeqCst);
            })
            .on_transition(move |_| {
                second.fetch_add(10, Ordering::SeqCst);
            })
            .build();

        graph.notify_on_transition(&Transition::Valid {
            from_state: TestState::Initial,
            event: TestEvent::Start,
            to_state: TestState::Processing,
            side_effect: None,
        });

        assert_eq!(calls.load(Ordering::SeqCst), 11);
    }
}
