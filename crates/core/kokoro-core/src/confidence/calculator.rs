//! Confidence aggregation across analysis stages.
//!
//! Starts from the keyword and context confidences, subtracts penalties for
//! contradictions, ambiguity patterns, hedging language, sarcasm, and an
//! unbalanced emotion mix, adds a small bonus for clear intensity
//! modifiers, and blends in pattern stability when history was available.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::trace;

use crate::lexicon;
use crate::types::{
    ConfidenceAssessment, ConfidenceFactors, ContextualAnalysis, ConversationPattern, Emotion,
    SentimentResult,
};

/// Aggregates stage confidences into one assessment.
#[derive(Debug, Default, Clone)]
pub struct ConfidenceCalculator;

impl ConfidenceCalculator {
    /// Creates a new calculator.
    pub fn new() -> Self {
        Self
    }

    /// Assesses overall confidence for one turn.
    pub fn assess(
        &self,
        sentiment: &SentimentResult,
        context: &ContextualAnalysis,
        pattern: Option<&ConversationPattern>,
        text: &str,
        contradictions: &[String],
    ) -> ConfidenceAssessment {
        let lowered = text.to_lowercase();

        let keyword = sentiment.confidence;
        let context_confidence = context.emotion_confidence;

        let contradiction_penalty = (contradictions.len() as f32 * 0.1).min(0.5);

        let mut ambiguity_score = 0.0f32;
        for (_, regex) in lexicon::AMBIGUITY_PATTERNS.iter() {
            if regex.is_match(&lowered) {
                ambiguity_score += 0.1;
            }
        }
        ambiguity_score = ambiguity_score.min(0.7);

        let mut uncertainty_count = 0usize;
        for (_, keywords) in lexicon::UNCERTAINTY_KEYWORDS {
            for keyword in *keywords {
                if lowered.contains(keyword) {
                    uncertainty_count += 1;
                }
            }
        }
        let uncertainty_penalty = (uncertainty_count as f32 * 0.05).min(0.3);

        let sarcasm_penalty =
            if context.sarcasm_probability > 0.5 || context.irony_probability > 0.5 {
                context.sarcasm_probability.max(context.irony_probability) * 0.3
            } else {
                0.0
            };

        let intensity_bonus = (context.modifiers.len() as f32 * 0.05).min(0.2);

        let emotion_balance_penalty = emotion_balance_penalty(&context.emotion_scores);

        let base = (keyword + context_confidence) / 2.0;
        let mut adjusted = base - contradiction_penalty - ambiguity_score - uncertainty_penalty
            - sarcasm_penalty
            - emotion_balance_penalty
            + intensity_bonus;

        let pattern_confidence = pattern.map(|p| (0.5 + p.stability * 0.5).min(1.0));
        if let Some(stability_confidence) = pattern_confidence {
            adjusted = adjusted * 0.7 + stability_confidence * 0.3;
        }

        let overall_confidence = adjusted.clamp(0.1, 1.0);
        let recommended_weight = overall_confidence.max(0.2);

        trace!(
            overall_confidence,
            ambiguity_score,
            contradiction_penalty,
            sarcasm_penalty,
            "confidence assessed"
        );

        ConfidenceAssessment {
            overall_confidence,
            factors: ConfidenceFactors {
                keyword,
                context: context_confidence,
                pattern: pattern_confidence,
                contradiction_penalty,
                ambiguity_penalty: ambiguity_score + uncertainty_penalty,
                sarcasm_penalty,
                emotion_balance_penalty,
                intensity_bonus,
            },
            ambiguity_score,
            recommended_weight,
        }
    }
}

/// Penalty for an unclear emotion mix: near-equal top emotions, many
/// significant emotions, or positive and negative mass in conflict.
fn emotion_balance_penalty(emotion_scores: &HashMap<Emotion, f32>) -> f32 {
    if emotion_scores.len() < 2 {
        return 0.0;
    }
    let total: f32 = emotion_scores.values().sum();
    if total == 0.0 {
        return 0.0;
    }

    let mut sorted: Vec<f32> = emotion_scores.values().copied().collect();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    let top = sorted[0];
    let second = sorted[1];
    let balance_ratio = if top == 0.0 { 0.0 } else { second / top };

    let significant = emotion_scores.values().filter(|s| **s > 0.1).count();
    let diversity = (significant as f32 / 4.0).min(1.0);

    let positive: f32 = emotion_scores
        .iter()
        .filter(|(e, _)| e.is_positive())
        .map(|(_, s)| s)
        .sum();
    let negative: f32 = emotion_scores
        .iter()
        .filter(|(e, _)| e.is_negative())
        .map(|(_, s)| s)
        .sum();

    let mut penalty = 0.0;
    if balance_ratio > 0.7 {
        penalty += 0.2;
    } else if balance_ratio > 0.5 {
        penalty += 0.1;
    }
    if diversity > 0.75 {
        penalty += 0.1;
    }
    if positive > 0.0 && negative > 0.0 {
        let polar = positive + negative;
        penalty += positive.min(negative) / polar * 0.3;
    }
    penalty.min(0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentiment(confidence: f32) -> SentimentResult {
        let mut result = SentimentResult::neutral();
        result.confidence = confidence;
        result
    }

    fn context(confidence: f32) -> ContextualAnalysis {
        let mut analysis = ContextualAnalysis::default();
        analysis.emotion_confidence = confidence;
        analysis.emotion_scores.clear();
        analysis
    }

    #[test]
    fn clean_input_averages_stage_confidences() {
        let calc = ConfidenceCalculator::new();
        let assessment = calc.assess(&sentiment(0.8), &context(1.0), None, "i am happy", &[]);
        assert!((assessment.overall_confidence - 0.9).abs() < 1e-6);
        assert!((assessment.recommended_weight - 0.9).abs() < 1e-6);
    }

    #[test]
    fn contradictions_subtract_tenth_each() {
        let calc = ConfidenceCalculator::new();
        let contradictions =
            vec!["negated_positive".to_string(), "likely_sarcastic_positive".to_string()];
        let assessment =
            calc.assess(&sentiment(0.8), &context(1.0), None, "i am happy", &contradictions);
        assert!((assessment.overall_confidence - 0.7).abs() < 1e-6);
        assert!((assessment.factors.contradiction_penalty - 0.2).abs() < 1e-6);
    }

    #[test]
    fn mixed_signal_text_raises_ambiguity() {
        let calc = ConfidenceCalculator::new();
        let assessment =
            calc.assess(&sentiment(0.4), &context(0.6), None, "i am happy but also sad", &[]);
        // mixed_signals and ambivalent patterns both match
        assert!((assessment.ambiguity_score - 0.2).abs() < 1e-6);
        assert!((assessment.overall_confidence - 0.3).abs() < 1e-6);
    }

    #[test]
    fn hedging_keywords_are_penalized() {
        let calc = ConfidenceCalculator::new();
        let assessment = calc.assess(&sentiment(0.5), &context(0.5), None, "maybe, not sure", &[]);
        assert!((assessment.overall_confidence - 0.4).abs() < 1e-6);
        assert_eq!(assessment.ambiguity_score, 0.0);
    }

    #[test]
    fn sarcasm_probability_discounts() {
        let calc = ConfidenceCalculator::new();
        let mut ctx = context(0.6);
        ctx.sarcasm_probability = 0.8;
        let assessment = calc.assess(&sentiment(0.6), &ctx, None, "great", &[]);
        assert!((assessment.factors.sarcasm_penalty - 0.24).abs() < 1e-6);
        assert!((assessment.overall_confidence - 0.36).abs() < 1e-4);
    }

    #[test]
    fn balanced_opposed_emotions_are_penalized() {
        let balanced: HashMap<Emotion, f32> =
            [(Emotion::Joy, 0.5), (Emotion::Sadness, 0.5)].into_iter().collect();
        // ratio 1.0 adds 0.2, perfect conflict adds 0.15
        assert!((emotion_balance_penalty(&balanced) - 0.35).abs() < 1e-6);

        let single: HashMap<Emotion, f32> = [(Emotion::Joy, 1.0)].into_iter().collect();
        assert_eq!(emotion_balance_penalty(&single), 0.0);
    }

    #[test]
    fn pattern_stability_blends_in() {
        let calc = ConfidenceCalculator::new();
        let mut pattern = ConversationPattern::insufficient_data();
        pattern.stability = 1.0;
        let assessment =
            calc.assess(&sentiment(0.5), &context(0.5), Some(&pattern), "hello", &[]);
        // 0.5 * 0.7 + 1.0 * 0.3
        assert!((assessment.overall_confidence - 0.65).abs() < 1e-6);
        assert_eq!(assessment.factors.pattern, Some(1.0));
    }

    #[test]
    fn confidence_never_leaves_bounds() {
        let calc = ConfidenceCalculator::new();
        let mut ctx = context(0.1);
        ctx.sarcasm_probability = 1.0;
        let contradictions: Vec<String> =
            (0..6).map(|i| format!("contradiction_{i}")).collect();
        let assessment = calc.assess(
            &sentiment(0.1),
            &ctx,
            None,
            "maybe good but bad, not sure if it would help",
            &contradictions,
        );
        assert!((assessment.overall_confidence - 0.1).abs() < 1e-6);
        assert!((assessment.recommended_weight - 0.2).abs() < 1e-6);
    }
}
