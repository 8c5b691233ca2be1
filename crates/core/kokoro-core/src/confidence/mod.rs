//! Confidence assessment and confidence-weighted impact adjustment

pub mod calculator;
pub mod impact;

pub use calculator::ConfidenceCalculator;
pub use impact::ImpactAdjuster;
