//! Condition classification: the priority ladder and the hysteresis filter
//! that stabilizes its output

pub mod hysteresis;
pub mod ladder;

pub use hysteresis::{ConditionHistory, HysteresisOutcome};
pub use ladder::{classify, ClassifierInput};
