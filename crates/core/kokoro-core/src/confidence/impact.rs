//! Confidence-based impact adjustment.
//!
//! Scales the raw affection delta by a factor derived from the confidence
//! assessment. Discounts apply in priority order, a single rule at a time,
//! and very low confidence additionally hard-caps the result so an
//! uncertain reading can never move affection far.

use tracing::debug;

use crate::types::{AdjustedImpact, ConfidenceAssessment, ImpactRule};

/// Scales affection deltas by analysis confidence.
#[derive(Debug, Default, Clone)]
pub struct ImpactAdjuster;

impl ImpactAdjuster {
    /// Creates a new adjuster.
    pub fn new() -> Self {
        Self
    }

    /// Adjusts a raw delta according to the confidence assessment.
    pub fn adjust(&self, raw_delta: i32, assessment: &ConfidenceAssessment) -> AdjustedImpact {
        let confidence = assessment.overall_confidence;
        let mut factor = assessment.recommended_weight;
        let mut applied_rules = Vec::new();

        if assessment.factors.contradiction_penalty > 0.1 {
            factor *= 0.8;
            applied_rules.push(ImpactRule::Contradiction);
        } else if assessment.factors.sarcasm_penalty > 0.1 {
            factor *= 0.7;
            applied_rules.push(ImpactRule::SarcasmIrony);
        } else if assessment.ambiguity_score > 0.5 {
            factor *= 0.7;
            applied_rules.push(ImpactRule::HighAmbiguity);
        } else if confidence < 0.3 {
            factor = factor.min(0.3);
            applied_rules.push(ImpactRule::VeryLowConfidence);
        } else if confidence < 0.6 {
            factor = factor.min(0.6);
            applied_rules.push(ImpactRule::LowConfidence);
        }

        let factor = factor.clamp(0.1, 1.0);
        let mut final_delta = (raw_delta as f32 * factor) as i32;

        let mut hard_capped = false;
        if confidence < 0.3 {
            let cap = if confidence < 0.2 { 1 } else { 2 };
            let capped = final_delta.clamp(-cap, cap);
            if capped != final_delta {
                hard_capped = true;
                applied_rules.push(ImpactRule::HardCap);
            }
            final_delta = capped;
        }

        let final_delta = final_delta.clamp(-10, 10);

        debug!(raw_delta, final_delta, factor, confidence, "impact adjusted");

        AdjustedImpact { final_delta, impact_factor: factor, applied_rules, hard_capped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConfidenceFactors;

    fn assessment(confidence: f32) -> ConfidenceAssessment {
        ConfidenceAssessment {
            overall_confidence: confidence,
            factors: ConfidenceFactors::default(),
            ambiguity_score: 0.0,
            recommended_weight: confidence.max(0.2),
        }
    }

    #[test]
    fn high_confidence_passes_delta_through() {
        let adjuster = ImpactAdjuster::new();
        let adjusted = adjuster.adjust(8, &assessment(0.9));
        // 8 * 0.9 truncates to 7
        assert_eq!(adjusted.final_delta, 7);
        assert!(adjusted.applied_rules.is_empty());
        assert!(!adjusted.hard_capped);
    }

    #[test]
    fn contradictions_take_priority_over_sarcasm() {
        let adjuster = ImpactAdjuster::new();
        let mut assessment = assessment(0.8);
        assessment.factors.contradiction_penalty = 0.2;
        assessment.factors.sarcasm_penalty = 0.24;
        let adjusted = adjuster.adjust(10, &assessment);
        assert_eq!(adjusted.applied_rules, vec![ImpactRule::Contradiction]);
        // 10 * (0.8 * 0.8) = 6.4 truncates to 6
        assert_eq!(adjusted.final_delta, 6);
    }

    #[test]
    fn sarcasm_discount_applies_without_contradictions() {
        let adjuster = ImpactAdjuster::new();
        let mut assessment = assessment(0.8);
        assessment.factors.sarcasm_penalty = 0.24;
        let adjusted = adjuster.adjust(10, &assessment);
        assert_eq!(adjusted.applied_rules, vec![ImpactRule::SarcasmIrony]);
        // 10 * (0.8 * 0.7) = 5.6 truncates to 5
        assert_eq!(adjusted.final_delta, 5);
    }

    #[test]
    fn high_ambiguity_discounts() {
        let adjuster = ImpactAdjuster::new();
        let mut assessment = assessment(0.8);
        assessment.ambiguity_score = 0.6;
        let adjusted = adjuster.adjust(10, &assessment);
        assert_eq!(adjusted.applied_rules, vec![ImpactRule::HighAmbiguity]);
        assert_eq!(adjusted.final_delta, 5);
    }

    #[test]
    fn moderate_confidence_caps_factor() {
        let adjuster = ImpactAdjuster::new();
        let adjusted = adjuster.adjust(10, &assessment(0.5));
        assert_eq!(adjusted.applied_rules, vec![ImpactRule::LowConfidence]);
        assert_eq!(adjusted.final_delta, 5);
    }

    #[test]
    fn very_low_confidence_hard_caps() {
        let adjuster = ImpactAdjuster::new();
        let adjusted = adjuster.adjust(10, &assessment(0.15));
        // factor floor 0.2 would give 2, the hard cap brings it to 1
        assert_eq!(adjusted.final_delta, 1);
        assert!(adjusted.hard_capped);
        assert!(adjusted.applied_rules.contains(&ImpactRule::HardCap));

        // With the factor already capped at 0.3, the ±2 band cannot bite.
        let adjusted = adjuster.adjust(-10, &assessment(0.25));
        assert_eq!(adjusted.final_delta, -2);
        assert_eq!(adjusted.applied_rules, vec![ImpactRule::VeryLowConfidence]);
        assert!(!adjusted.hard_capped);
    }

    #[test]
    fn discounts_never_flip_sign() {
        let adjuster = ImpactAdjuster::new();
        let mut low = assessment(0.8);
        low.factors.contradiction_penalty = 0.3;
        let adjusted = adjuster.adjust(-6, &low);
        assert!(adjusted.final_delta <= 0);
        assert!(adjusted.final_delta >= -6);
    }
}
