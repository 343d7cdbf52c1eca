//! State machine that resolves transitions over a frozen graph.

use crate::builder::GraphBuilder;
use crate::core::{Context, Event, State};
use crate::effects::transition::{
    ActionError, Phase, SideEffect, Transition, TransitionError, TransitionTo,
};
use crate::graph::{Graph, Listener, StateDefinition};
use std::sync::Arc;
use stillwater::effect::Effect;
use tracing::{debug, trace, warn};

/// Transition engine bound to one immutable graph.
///
/// The machine holds no state of its own: the caller supplies the current
/// state, context and event on every call. Clones share the graph, and
/// concurrent transitions over the same machine are independent.
pub struct StateMachine<S, E, C, F, Env> {
    graph: Arc<Graph<S, E, C, F, Env>>,
}

impl<S, E, C, F, Env> StateMachine<S, E, C, F, Env>
where
    S: State,
    E: Event,
    C: Context,
    F: SideEffect<C, E, Env>,
    Env: Clone + Send + Sync + 'static,
{
    /// Create a machine over an already built graph.
    pub fn new(graph: Graph<S, E, C, F, Env>) -> Self {
        Self {
            graph: Arc::new(graph),
        }
    }

    /// Build the graph with `init` and create a machine over it.
    pub fn create<I>(init: I) -> Self
    where
        I: FnOnce(GraphBuilder<S, E, C, F, Env>) -> GraphBuilder<S, E, C, F, Env>,
    {
        Self::new(init(GraphBuilder::new()).build())
    }

    /// Create a new machine whose graph extends this one with `init`.
    ///
    /// This machine is left untouched.
    pub fn with<I>(&self, init: I) -> Self
    where
        I: FnOnce(GraphBuilder<S, E, C, F, Env>) -> GraphBuilder<S, E, C, F, Env>,
    {
        Self::new(init(GraphBuilder::from_graph(&self.graph)).build())
    }

    /// The frozen graph, for inspection.
    pub fn graph(&self) -> &Graph<S, E, C, F, Env> {
        &self.graph
    }

    /// Resolve which transition `event` triggers from `from`.
    ///
    /// Runs the matched rule but no side effect or listener. An unhandled
    /// event yields `Ok(Transition::Invalid)`; only a missing state
    /// definition or a failing rule is an error.
    pub async fn resolve(
        &self,
        from: &S,
        context: &C,
        event: &E,
        env: &Env,
    ) -> Result<Transition<S, E, F>, TransitionError<S, E>> {
        let definition = self.definition_for(from)?;
        self.resolve_in(definition, from, context, event, env).await
    }

    /// Apply `event` to `from`, returning the next state and context.
    ///
    /// Steps run strictly in sequence, each awaited before the next starts:
    /// the matched rule, its side effect, the exit listeners of the source
    /// definition, the enter listeners of the target definition, and
    /// finally the global transition listeners. Dropping the returned
    /// future stops further steps from starting; steps already completed
    /// are not rolled back.
    pub async fn transition(
        &self,
        from: S,
        context: C,
        event: E,
        env: &Env,
    ) -> Result<(S, C), TransitionError<S, E>> {
        let source = self.definition_for(&from)?;
        let transition = self.resolve_in(source, &from, &context, &event, env).await?;

        let (to_state, side_effect) = match &transition {
            Transition::Valid {
                to_state,
                side_effect,
                ..
            } => (to_state.clone(), side_effect.clone()),
            Transition::Invalid { .. } => {
                debug!(?from, ?event, "no transition for event");
                return Err(TransitionError::NoTransition { from, event });
            }
        };
        let target = self.definition_for(&to_state)?;

        let context = match side_effect {
            Some(side_effect) => {
                trace!(?from, ?side_effect, "running side effect");
                side_effect
                    .apply(context, &event)
                    .run(env)
                    .await
                    .map_err(|source| failed(Phase::SideEffect, &from, source))?
            }
            None => context,
        };

        let context = notify(
            source.on_exit_listeners(),
            Phase::Exit,
            context,
            &from,
            &event,
            env,
        )
        .await?;
        let context = notify(
            target.on_enter_listeners(),
            Phase::Enter,
            context,
            &to_state,
            &event,
            env,
        )
        .await?;

        debug!(?from, ?event, to = ?to_state, "transition complete");
        self.graph.notify_on_transition(&transition);

        Ok((to_state, context))
    }

    fn definition_for(
        &self,
        state: &S,
    ) -> Result<&StateDefinition<S, E, C, F, Env>, TransitionError<S, E>> {
        self.graph.definition_for(state).ok_or_else(|| {
            warn!(?state, "missing state definition");
            TransitionError::MissingStateDefinition {
                state: state.clone(),
            }
        })
    }

    async fn resolve_in(
        &self,
        definition: &StateDefinition<S, E, C, F, Env>,
        from: &S,
        context: &C,
        event: &E,
        env: &Env,
    ) -> Result<Transition<S, E, F>, TransitionError<S, E>> {
        let invalid = || Transition::Invalid {
            from_state: from.clone(),
            event: event.clone(),
        };

        let Some(rule) = definition.rule_for(event) else {
            return Ok(invalid());
        };
        let Some(effect) = rule.invoke(from, context, event) else {
            return Ok(invalid());
        };

        let TransitionTo {
            to_state,
            side_effect,
        } = effect
            .run(env)
            .await
            .map_err(|source| failed(Phase::Rule, from, source))?;

        Ok(Transition::Valid {
            from_state: from.clone(),
            event: event.clone(),
            to_state: to_state.unwrap_or_else(|| from.clone()),
            side_effect,
        })
    }
}

impl<S, E, C, F, Env> Clone for StateMachine<S, E, C, F, Env> {
    fn clone(&self) -> Self {
        Self {
            graph: Arc::clone(&self.graph),
        }
    }
}

/// Run `listeners` in order, threading the context through each.
async fn notify<S, E, C, Env>(
    listeners: &[Listener<S, E, C, Env>],
    phase: Phase,
    mut context: C,
    state: &S,
    event: &E,
    env: &Env,
) -> Result<C, TransitionError<S, E>>
where
    S: State,
    E: Event,
    C: Context,
    Env: Clone + Send + Sync + 'static,
{
    for (index, listener) in listeners.iter().enumerate() {
        trace!(%phase, index, ?state, "notifying listener");
        context = listener(context, state, event)
            .run(env)
            .await
            .map_err(|source| failed(phase, state, source))?;
    }
    Ok(context)
}

fn failed<S: State, E>(phase: Phase, state: &S, source: ActionError) -> TransitionError<S, E> {
    warn!(%phase, ?state, error = %source, "transition step failed");
    TransitionError::ActionFailed {
        phase,
        state: state.clone(),
        source,
    }
}
