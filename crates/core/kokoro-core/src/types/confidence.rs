//! Confidence aggregation and impact adjustment types

use serde::{Deserialize, Serialize};

/// Per-factor breakdown feeding the overall confidence score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    /// Keyword-stage confidence
    pub keyword: f32,
    /// Context-stage (emotion) confidence
    pub context: f32,
    /// Pattern-derived confidence, when history was available
    pub pattern: Option<f32>,
    /// Penalty from detected contradictions
    pub contradiction_penalty: f32,
    /// Penalty from ambiguity patterns and uncertainty keywords
    pub ambiguity_penalty: f32,
    /// Penalty from sarcasm/irony probability
    pub sarcasm_penalty: f32,
    /// Penalty from an unbalanced or conflicted emotion mix
    pub emotion_balance_penalty: f32,
    /// Bonus from clear intensity modifiers
    pub intensity_bonus: f32,
}

/// Aggregated confidence assessment for one turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    /// Final confidence, clamped to [0.1, 1.0]
    pub overall_confidence: f32,
    /// Contributing factors, kept for observability
    pub factors: ConfidenceFactors,
    /// Ambiguity estimate in [0, 1]
    pub ambiguity_score: f32,
    /// Weight the impact adjuster should start from, in [0.2, 1.0]
    pub recommended_weight: f32,
}

impl ConfidenceAssessment {
    /// Assessment used when no analysis ran (terminal fallback)
    pub fn minimal() -> Self {
        Self {
            overall_confidence: 0.1,
            factors: ConfidenceFactors::default(),
            ambiguity_score: 0.0,
            recommended_weight: 0.2,
        }
    }
}

/// Discount rule applied by the impact adjuster, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactRule {
    /// Contradictions detected: ×0.8
    Contradiction,
    /// Sarcasm or irony above threshold: ×0.7
    SarcasmIrony,
    /// Ambiguity above 0.5: ×0.7
    HighAmbiguity,
    /// Confidence below 0.3: factor capped at 0.3
    VeryLowConfidence,
    /// Confidence below 0.6: factor capped at 0.6
    LowConfidence,
    /// Hard ±1/±2 clamp for confidence below 0.3
    HardCap,
}

/// Result of scaling a raw delta by the confidence-derived factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustedImpact {
    /// Delta after scaling and caps, in [-10, 10]
    pub final_delta: i32,
    /// Multiplicative factor that was applied, in [0.1, 1.0]
    pub impact_factor: f32,
    /// Rules that fired, in application order
    pub applied_rules: Vec<ImpactRule>,
    /// Whether the low-confidence hard cap overrode the scaled value
    pub hard_capped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_assessment() {
        let assessment = ConfidenceAssessment::minimal();
        assert_eq!(assessment.overall_confidence, 0.1);
        assert_eq!(assessment.recommended_weight, 0.2);
    }
}
