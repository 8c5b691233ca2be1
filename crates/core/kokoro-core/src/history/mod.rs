//! Multi-turn history analysis
//!
//! Pattern recognition over the recent turn window and shift smoothing
//! against the immediately previous turn. Both operate on caller-supplied
//! [`TurnRecord`](crate::types::TurnRecord) slices; the pipeline owns no
//! history of its own.

pub mod pattern;
pub mod smoothing;

pub use pattern::PatternRecognizer;
pub use smoothing::TransitionSmoother;
