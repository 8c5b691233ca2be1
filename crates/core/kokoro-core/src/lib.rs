//! Kokoro Core
//!
//! Sentiment-to-affection scoring for persona-driven chat companions. This
//! crate provides the full analysis pipeline and the state it feeds:
//!
//! - Multi-stage sentiment analysis (lexical keywords, contextual emotion,
//!   non-literal language, intensity, mixed emotion)
//! - Multi-turn pattern recognition and transition smoothing
//! - Confidence scoring with impact adjustment, so uncertain readings move
//!   the relationship less
//! - A bounded affection state machine with six relationship stages and
//!   gradual-change scheduling
//! - Session persistence behind an async store contract
//!
//! # Example: scoring one turn
//!
//! ```no_run
//! use kokoro_core::pipeline::SentimentPipeline;
//!
//! let pipeline = SentimentPipeline::new();
//! let analysis = pipeline.analyze("ありがとう", &[]);
//! assert!(analysis.final_delta >= 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export commonly used types
pub use uuid::Uuid;

// Core modules
pub mod affection;
pub mod analysis;
pub mod confidence;
pub mod config;
pub mod error;
pub mod history;
pub mod lexicon;
pub mod pipeline;
pub mod service;
pub mod store;
pub mod types;

// Re-export main types
pub use affection::{
    AffectionSession, AffectionTracker, AffectionUpdate, RelationshipStage, StageProfile,
    TrackerStats,
};
pub use analysis::{
    ContextAnalyzer, IntensityDetector, LexicalAnalyzer, MixedEmotionHandler, NonLiteralDetector,
};
pub use config::{
    get_env_bool, get_env_float, get_env_int, get_env_or, get_required_env, load_env,
    load_env_from_path, AffectionConfig, TrackerConfig,
};
pub use confidence::{ConfidenceCalculator, ImpactAdjuster};
pub use error::{KokoroError, Result};
pub use history::{PatternRecognizer, TransitionSmoother};
pub use pipeline::{FallbackHandler, SentimentPipeline, TurnAnalysis};
pub use service::{Service, ServiceHealth};
pub use store::{MemorySessionStore, SessionStore};
pub use types::{
    ContextualAnalysis, Emotion, InteractionType, SentimentResult, SentimentTag, TurnRecord,
};
