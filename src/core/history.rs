//! Transition history for introspection.
//!
//! A [`TransitionLog`] is an in-memory recorder that can be registered as a
//! global transition listener. It only observes: nothing recorded here is
//! ever fed back into a machine.

use crate::core::state::{Event, State};
use crate::effects::Transition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Record of a single successful transition.
///
/// # Example
///
/// ```rust
/// use statewise::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: "Solid",
///     event: "OnMelted",
///     to: "Liquid",
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "Liquid");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord<S, E> {
    /// The state being transitioned from
    pub from: S,
    /// The event that caused the transition
    pub event: E,
    /// The state being transitioned to
    pub to: S,
    /// When the transition was observed
    pub timestamp: DateTime<Utc>,
}

/// Shared, append-only log of observed transitions.
///
/// Clones share the same underlying log, so one clone can be handed to
/// [`crate::builder::GraphBuilder::on_transition`] while another is kept
/// for inspection.
///
/// # Example
///
/// ```rust
/// use statewise::prelude::*;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Light { Red, Green }
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Signal { Go, Stop }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let log = TransitionLog::new();
/// let machine = StateMachine::<Light, Signal, (), Action<(), Signal, ()>, ()>::create(|graph| {
///     graph
///         .state(variant!(Light::Red), |state| {
///             state.on_pure(variant!(Signal::Go), |_, _, _| transition_to(Light::Green))
///         })
///         .state(variant!(Light::Green), |state| {
///             state.on_pure(variant!(Signal::Stop), |_, _, _| transition_to(Light::Red))
///         })
///         .on_transition(log.listener())
/// });
///
/// machine.transition(Light::Red, (), Signal::Go, &()).await.unwrap();
/// machine.transition(Light::Green, (), Signal::Stop, &()).await.unwrap();
///
/// assert_eq!(log.path(), vec![Light::Red, Light::Green, Light::Red]);
/// # }
/// ```
#[derive(Debug)]
pub struct TransitionLog<S, E> {
    records: Arc<Mutex<Vec<TransitionRecord<S, E>>>>,
}

impl<S: State, E: Event> TransitionLog<S, E> {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append a record for `transition` if it is valid.
    ///
    /// Invalid transitions carry no target state and are skipped.
    pub fn observe<F>(&self, transition: &Transition<S, E, F>) {
        if let Transition::Valid {
            from_state,
            event,
            to_state,
            ..
        } = transition
        {
            self.lock().push(TransitionRecord {
                from: from_state.clone(),
                event: event.clone(),
                to: to_state.clone(),
                timestamp: Utc::now(),
            });
        }
    }

    /// A global transition listener feeding this log.
    pub fn listener<F: 'static>(&self) -> impl Fn(&Transition<S, E, F>) + Send + Sync + 'static {
        let log = self.clone();
        move |transition: &Transition<S, E, F>| log.observe(transition)
    }

    /// Snapshot of all records in observation order.
    pub fn records(&self) -> Vec<TransitionRecord<S, E>> {
        self.lock().clone()
    }

    /// Number of recorded transitions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// States traversed: the first source state, then every target.
    ///
    /// Consecutive records are not required to chain; the path simply
    /// lists what was observed.
    pub fn path(&self) -> Vec<S> {
        let records = self.lock();
        let mut path = Vec::with_capacity(records.len() + 1);
        if let Some(first) = records.first() {
            path.push(first.from.clone());
        }
        path.extend(records.iter().map(|record| record.to.clone()));
        path
    }

    /// Time between the first and last observed transition.
    ///
    /// Returns `None` if nothing has been observed.
    pub fn duration(&self) -> Option<Duration> {
        let records = self.lock();
        let (first, last) = (records.first()?, records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Export the records as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error>
    where
        S: Serialize,
        E: Serialize,
    {
        serde_json::to_string(&*self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TransitionRecord<S, E>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, E> Clone for TransitionLog<S, E> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<S: State, E: Event> Default for TransitionLog<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Initial,
        Processing,
        Complete,
    }

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestEvent {
        Start,
        Finish,
    }

    fn valid(from: TestState, event: TestEvent, to: TestState) -> Transition<TestState, TestEvent, ()> {
        Transition::Valid {
            from_state: from,
            event,
            to_state: to,
            side_effect: None,
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log: TransitionLog<TestState, TestEvent> = TransitionLog::new();

        assert!(log.is_empty());
        assert!(log.path().is_empty());
        assert!(log.duration().is_none());
    }

    #[test]
    fn observe_records_valid_transitions() {
        let log = TransitionLog::new();

        log.observe(&valid(
            TestState::Initial,
            TestEvent::Start,
            TestState::Processing,
        ));

        let records = log.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].from, TestState::Initial);
        assert_eq!(records[0].event, TestEvent::Start);
        assert_eq!(records[0].to, TestState::Processing);
    }

    #[test]
    fn observe_skips_invalid_transitions() {
        let log = TransitionLog::new();

        log.observe(&Transition::<TestState, TestEvent, ()>::Invalid {
            from_state: TestState::Complete,
            event: TestEvent::Start,
        });

        assert!(log.is_empty());
    }

    #[test]
    fn path_returns_state_sequence() {
        let log = TransitionLog::new();
        log.observe(&valid(
            TestState::Initial,
            TestEvent::Start,
            TestState::Processing,
        ));
        log.observe(&valid(
            TestState::Processing,
            TestEvent::Finish,
            TestState::Complete,
        ));

        assert_eq!(
            log.path(),
            vec![
                TestState::Initial,
                TestState::Processing,
                TestState::Complete
            ]
        );
    }

    #[test]
    fn clones_share_records() {
        let log = TransitionLog::new();
        let listener = log.listener();

        listener(&valid(
            TestState::Initial,
            TestEvent::Start,
            TestState::Processing,
        ));

        assert_eq!(log.len(), 1);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let log = TransitionLog::new();
        log.observe(&valid(
            TestState::Initial,
            TestEvent::Start,
            TestState::Processing,
        ));

        std::thread::sleep(std::time::Duration::from_millis(10));

        log.observe(&valid(
            TestState::Processing,
            TestEvent::Finish,
            TestState::Complete,
        ));

        let duration = log.duration();
        assert!(duration.is_some());
        assert!(duration.unwrap() >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn records_export_as_json() {
        let log = TransitionLog::new();
        log.observe(&valid(
            TestState::Initial,
            TestEvent::Start,
            TestState::Processing,
        ));

        let json = log.to_json().unwrap();
        let records: Vec<TransitionRecord<TestState, TestEvent>> =
            serde_json::from_str(&json).unwrap();

        assert_eq!(records, log.records());
    }
}
