//! Transition values, side effects and transition errors.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use thiserror::Error;

/// Outcome of resolving one `(state, event)` pair.
///
/// Produced fresh for every resolution and handed to global listeners;
/// the engine never stores it.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition<S, E, F> {
    /// A rule accepted the event.
    Valid {
        from_state: S,
        event: E,
        to_state: S,
        side_effect: Option<F>,
    },

    /// No rule of the source state accepts the event.
    Invalid { from_state: S, event: E },
}

impl<S, E, F> Transition<S, E, F> {
    /// State the event was applied to.
    pub fn from_state(&self) -> &S {
        match self {
            Self::Valid { from_state, .. } | Self::Invalid { from_state, .. } => from_state,
        }
    }

    /// Event that triggered the resolution.
    pub fn event(&self) -> &E {
        match self {
            Self::Valid { event, .. } | Self::Invalid { event, .. } => event,
        }
    }

    /// Target state, or `None` for an invalid transition.
    pub fn to_state(&self) -> Option<&S> {
        match self {
            Self::Valid { to_state, .. } => Some(to_state),
            Self::Invalid { .. } => None,
        }
    }

    /// Side effect chosen by the rule, if any.
    pub fn side_effect(&self) -> Option<&F> {
        match self {
            Self::Valid { side_effect, .. } => side_effect.as_ref(),
            Self::Invalid { .. } => None,
        }
    }

    /// Whether a rule accepted the event.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// What a transition rule decides: where to go and what to run on the way.
///
/// A `to_state` of `None` keeps the machine in its source state.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionTo<S, F> {
    pub to_state: Option<S>,
    pub side_effect: Option<F>,
}

impl<S, F> TransitionTo<S, F> {
    /// Move to `to_state` without a side effect.
    pub fn new(to_state: S) -> Self {
        Self {
            to_state: Some(to_state),
            side_effect: None,
        }
    }

    /// Stay in the source state.
    pub fn stay() -> Self {
        Self {
            to_state: None,
            side_effect: None,
        }
    }

    /// Run `side_effect` before the exit listeners of the source state.
    pub fn with_side_effect(mut self, side_effect: F) -> Self {
        self.side_effect = Some(side_effect);
        self
    }
}

/// Effect run exactly once per successful transition.
///
/// Implement this for a caller-defined enum when global listeners need to
/// see which side effect ran, or use [`Action`] to wrap a closure.
pub trait SideEffect<C, E, Env>: Clone + fmt::Debug + Send + Sync + 'static {
    /// Produce the effect updating `context` for `event`.
    fn apply(&self, context: C, event: &E) -> BoxedEffect<C, ActionError, Env>;
}

type ActionFn<C, E, Env> = Arc<dyn Fn(C, &E) -> BoxedEffect<C, ActionError, Env> + Send + Sync>;

/// Closure-backed [`SideEffect`].
///
/// # Example
///
/// ```rust
/// use statewise::effects::{Action, SideEffect};
/// use stillwater::prelude::*;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let melt: Action<String, (), ()> =
///     Action::new("melt", |_context: String, _event: &()| pure("melted".to_string()).boxed());
///
/// let context = melt.apply(String::new(), &()).run(&()).await.unwrap();
/// assert_eq!(context, "melted");
/// assert_eq!(melt.name(), "melt");
/// # }
/// ```
pub struct Action<C, E, Env> {
    name: Cow<'static, str>,
    action: ActionFn<C, E, Env>,
}

impl<C, E, Env> Action<C, E, Env> {
    /// Wrap `action` under `name`, shown by `Debug`.
    pub fn new<A>(name: impl Into<Cow<'static, str>>, action: A) -> Self
    where
        A: Fn(C, &E) -> BoxedEffect<C, ActionError, Env> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(action),
        }
    }

    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<C, E, Env> Clone for Action<C, E, Env> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

impl<C, E, Env> fmt::Debug for Action<C, E, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.name).finish()
    }
}

impl<C, E, Env> SideEffect<C, E, Env> for Action<C, E, Env>
where
    C: 'static,
    E: 'static,
    Env: 'static,
{
    fn apply(&self, context: C, event: &E) -> BoxedEffect<C, ActionError, Env> {
        (self.action)(context, event)
    }
}

/// Failure reported by a caller-supplied rule, side effect or listener.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ActionError {
    message: String,
}

impl ActionError {
    /// Create an error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Step of the transition pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The matched transition rule.
    Rule,
    /// The side effect chosen by the rule.
    SideEffect,
    /// An exit listener of the source state.
    Exit,
    /// An enter listener of the target state.
    Enter,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rule => "transition rule",
            Self::SideEffect => "side effect",
            Self::Exit => "exit listener",
            Self::Enter => "enter listener",
        };
        f.write_str(name)
    }
}

/// Errors delivered by [`crate::effects::StateMachine::transition`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError<S, E> {
    /// The source state has no rule accepting the event.
    #[error("No transition in state {from:?} for event {event:?}")]
    NoTransition { from: S, event: E },

    /// No state matcher of the graph accepts the state.
    #[error("Missing definition for state {state:?}")]
    MissingStateDefinition { state: S },

    /// An effect supplied by the caller failed; later steps did not run.
    #[error("{phase} failed in state {state:?}: {source}")]
    ActionFailed {
        phase: Phase,
        state: S,
        #[source]
        source: ActionError,
    },
}

impl<S, E> TransitionError<S, E> {
    /// Returns true if no rule accepted the event.
    pub fn is_no_transition(&self) -> bool {
        matches!(self, Self::NoTransition { .. })
    }

    /// True for configuration defects rather than rejected events.
    pub fn is_missing_definition(&self) -> bool {
        matches!(self, Self::MissingStateDefinition { .. })
    }
}
