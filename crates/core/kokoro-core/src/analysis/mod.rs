//! Message-level analyzers feeding the sentiment pipeline
//!
//! Each analyzer is independent and stateless: the lexical scorer over the
//! keyword tables, the contextual emotion analyzer, the non-literal
//! (sarcasm/irony) detector, the intensity detector, and the mixed-emotion
//! handler. The pipeline composes their outputs.

pub mod context;
pub mod intensity;
pub mod lexical;
pub mod mixed;
pub mod nonliteral;

// Re-export the analyzer entry points
pub use context::ContextAnalyzer;
pub use intensity::IntensityDetector;
pub use lexical::LexicalAnalyzer;
pub use mixed::{MixedEmotionHandler, MixedImpact};
pub use nonliteral::{ConversationCues, NonLiteralAnalysis, NonLiteralDetector};
