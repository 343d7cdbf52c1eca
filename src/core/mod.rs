//! Core value types.
//!
//! This module contains the pure parts of the state machine:
//! - Bounds for states, events and contexts
//! - Matchers selecting state definitions and transition rules
//! - Transition history for introspection

mod history;
mod matcher;
mod state;

pub use history::{TransitionLog, TransitionRecord};
pub use matcher::Matcher;
pub use state::{Context, Event, State};
