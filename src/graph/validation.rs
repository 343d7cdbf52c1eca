//! Coverage validation for graphs.
//!
//! The engine resolves state definitions positionally and only discovers
//! an incompletely defined state space when a transition reaches it. This
//! check runs sample states through the graph up front and accumulates
//! every coverage defect with `Validation` instead of stopping at the first.

use super::Graph;
use std::fmt::Debug;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Coverage defects found by [`Graph::validate_coverage`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphError<S> {
    #[error("No state definition matches {state:?}")]
    MissingStateDefinition { state: S },

    /// Allowed at run time (the first definition wins) but usually a
    /// registration mistake.
    #[error("{matches} state definitions match {state:?}; the first registered one is used")]
    AmbiguousStateDefinition { state: S, matches: usize },
}

impl<S: Clone + Debug, E, C, F, Env> Graph<S, E, C, F, Env> {
    /// Check that every state in `states` is covered by exactly one definition.
    ///
    /// Returns `Validation::Failure` with ALL defects if any state is
    /// uncovered or matched by several definitions.
    pub fn validate_coverage<I>(&self, states: I) -> Validation<(), NonEmptyVec<GraphError<S>>>
    where
        I: IntoIterator<Item = S>,
    {
        let checks: Vec<Validation<(), NonEmptyVec<GraphError<S>>>> = states
            .into_iter()
            .map(|state| {
                let matches = self
                    .definitions
                    .iter()
                    .filter(|(matcher, _)| matcher.matches(&state))
                    .count();
                match matches {
                    0 => Validation::fail(GraphError::MissingStateDefinition { state }),
                    1 => Validation::success(()),
                    _ => Validation::fail(GraphError::AmbiguousStateDefinition { state, matches }),
                }
            })
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }
}
