//! Bounded affection state machine
//!
//! Accumulates the pipeline's final deltas into a per-session affection
//! level in [0, 100], maps the level onto six ordered relationship stages,
//! and ramps large swings in gradually through a lazily drained queue of
//! scheduled increments. State persists through the
//! [`SessionStore`](crate::store::SessionStore) contract.

pub mod session;
pub mod stage;
pub mod tracker;

// Re-export the state machine surface
pub use session::{AffectionSession, PendingChange, SentimentRecord};
pub use stage::{RelationshipStage, StageProfile};
pub use tracker::{AffectionTracker, AffectionUpdate, TrackerStats};
