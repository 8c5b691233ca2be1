//! Tsundere persona override for the Kokoro sentiment pipeline
//!
//! The core pipeline reads wording at face value, which mis-scores a persona
//! whose voice is built on contradiction: insults wrapped around affection,
//! denial of gratitude that is gratitude, brush-off goodbyes that mean
//! nothing. This crate is the second pass that knows the character:
//!
//! - Reinterpretation of contradiction-style phrase families, habitual
//!   interjections, and in-voice speech habits
//! - Farewell classification against a fixed vocabulary, so goodbyes stop
//!   reading as rejection
//! - Per-session loop detection (repeated farewells, repeated phrases,
//!   negative spirals) with a circuit breaker that pulls the conversation
//!   out of the spiral
//! - A trust-scaled rejection policy for sexually tagged content that
//!   overrides everything else
//! - An [`LlmContext`] bag of structured guidance for the response generator
//!
//! # Example: reviewing one turn
//!
//! ```no_run
//! use std::sync::Arc;
//! use kokoro_core::{AffectionTracker, MemorySessionStore, SentimentPipeline, TrackerConfig};
//! use kokoro_plugin_tsundere::TsundereSentimentService;
//!
//! let tracker = Arc::new(AffectionTracker::new(
//!     TrackerConfig::default(),
//!     Arc::new(MemorySessionStore::new()),
//! ));
//! let service = TsundereSentimentService::new(tracker);
//!
//! let analysis = SentimentPipeline::new().analyze("別に、ありがとね", &[]);
//! let review = service.review("別に、ありがとね", &analysis, None, None);
//! assert!(review.assessment.is_tsundere);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod detector;
pub mod loops;
pub mod patterns;
pub mod policy;
pub mod service;

pub use context::LlmContext;
pub use detector::{FarewellAssessment, TsundereAssessment, TsundereDetector};
pub use loops::{Intervention, LoopAssessment, SentimentLoopDetector};
pub use patterns::{CulturalRegister, FarewellKind, FarewellTone};
pub use policy::{apply_sexual_rejection, sexual_severity};
pub use service::{OverrideOutcome, TsundereSentimentService, TurnOutcome};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_is_reexported() {
        let assessment = TsundereDetector::new().detect("別に、ありがとね");
        assert!(assessment.is_tsundere);
    }
}
