//! End-to-end sentiment analysis for a single conversation turn.
//!
//! [`SentimentPipeline`] chains every analyzer in this crate: keyword
//! scoring, contextual emotion reading, contradiction handling, history
//! pattern effects, intensity scaling, mixed-emotion blending, transition
//! smoothing, and finally confidence-weighted impact adjustment. The
//! output keeps every intermediate stage so callers can log or surface
//! any of them.

pub mod fallback;

pub use fallback::{FallbackHandler, FallbackOutcome, FallbackStats, PartialAnalysis};

use tracing::debug;

use crate::analysis::{ContextAnalyzer, IntensityDetector, LexicalAnalyzer, MixedEmotionHandler};
use crate::confidence::{ConfidenceCalculator, ImpactAdjuster};
use crate::history::{PatternRecognizer, TransitionSmoother};
use crate::lexicon;
use crate::types::{
    AdjustedImpact, ConfidenceAssessment, ContextualAnalysis, ConversationPattern,
    EmotionCategory, IntensityAnalysis, IntensityCategory, InteractionType, MixedEmotionAnalysis,
    SentimentResult, SentimentShift, SentimentTag, TurnRecord,
};

/// Complete analysis of one message.
///
/// `adjusted_*` values reflect context, pattern, intensity, mixed-emotion,
/// and smoothing corrections; `final_delta` additionally folds in the
/// confidence-based impact adjustment and is the value to apply.
#[derive(Debug, Clone)]
pub struct TurnAnalysis {
    /// Keyword-only result, before any correction.
    pub raw: SentimentResult,
    /// Emotional context of the message within the conversation.
    pub contextual: ContextualAnalysis,
    /// Recognized multi-turn pattern, when history was supplied.
    pub pattern: Option<ConversationPattern>,
    /// Expression intensity.
    pub intensity: IntensityAnalysis,
    /// Mixed-emotion reading.
    pub mixed: MixedEmotionAnalysis,
    /// Shift against the previous turn, when history was supplied.
    pub shift: Option<SentimentShift>,
    /// Confidence assessment over all signals.
    pub assessment: ConfidenceAssessment,
    /// Impact adjustment derived from the assessment.
    pub impact: AdjustedImpact,
    /// Corrected sentiment score in [-1, 1].
    pub adjusted_score: f32,
    /// Corrected affection delta in [-10, 10], before impact adjustment.
    pub adjusted_delta: i32,
    /// Affection delta to apply, in [-10, 10].
    pub final_delta: i32,
    /// Confidence of the contextual emotion reading after corrections.
    pub context_confidence: f32,
    /// Best confidence across keyword and contextual signals.
    pub confidence: f32,
    /// Interaction kind after contextual correction.
    pub interaction_type: InteractionType,
    /// Contradiction families found between keywords and context.
    pub contradictions: Vec<String>,
    /// Contextual evidence reversed or replaced the keyword reading.
    pub context_override_applied: bool,
}

/// Runs the full analyzer chain over single turns.
///
/// The pipeline is stateless; conversation memory lives in the history
/// slice the caller passes in, so one instance can serve any number of
/// sessions concurrently.
#[derive(Debug, Default, Clone)]
pub struct SentimentPipeline {
    lexical: LexicalAnalyzer,
    context: ContextAnalyzer,
    intensity: IntensityDetector,
    mixed: MixedEmotionHandler,
    patterns: PatternRecognizer,
    smoother: TransitionSmoother,
    confidence: ConfidenceCalculator,
    impact: ImpactAdjuster,
}

impl SentimentPipeline {
    /// Creates a pipeline with default tunables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzes one message against the recent conversation history.
    pub fn analyze(&self, text: &str, history: &[TurnRecord]) -> TurnAnalysis {
        let raw = self.lexical.analyze(text);
        let contextual = self.context.analyze(text, history);
        let intensity = self.intensity.detect(text);
        let contradictions = detect_contradictions(text, &raw, &contextual);

        let pattern = (!history.is_empty()).then(|| self.patterns.analyze(history));

        let (mut score, mut delta, mut context_confidence, context_override_applied) =
            adjust_for_context(&raw, &contextual, &contradictions);

        if let Some(pattern) = &pattern {
            let (s, d, c) =
                self.patterns.apply_pattern_effects(score, delta, context_confidence, pattern);
            score = s;
            delta = d;
            context_confidence = c;
        }

        let (s, d) = apply_intensity(score, delta, &intensity);
        score = s;
        delta = d;

        let mixed = self.mixed.detect(text);
        let (s, d, c) = self.apply_mixed(score, delta, context_confidence, &mixed);
        score = s;
        delta = d;
        context_confidence = c;

        let mut shift = None;
        if let Some(previous) = history.last() {
            let (smoothed_score, smoothed_delta, detected) = self.smoother.smooth(
                previous,
                score,
                delta,
                contextual.dominant_emotion,
                history.len(),
            );
            if detected.smoothing_applied {
                score = smoothed_score;
                delta = smoothed_delta;
            }
            shift = Some(detected);
        }

        let assessment =
            self.confidence.assess(&raw, &contextual, pattern.as_ref(), text, &contradictions);
        let impact = self.impact.adjust(delta, &assessment);

        let interaction_type = final_interaction_type(score, &raw, &contextual);
        let confidence = raw.confidence.max(context_confidence);

        debug!(
            raw_score = raw.score,
            raw_delta = raw.raw_delta,
            adjusted_score = score,
            final_delta = impact.final_delta,
            overall_confidence = assessment.overall_confidence,
            ?interaction_type,
            "turn analysis complete"
        );

        TurnAnalysis {
            final_delta: impact.final_delta,
            raw,
            contextual,
            pattern,
            intensity,
            mixed,
            shift,
            assessment,
            impact,
            adjusted_score: score,
            adjusted_delta: delta,
            context_confidence,
            confidence,
            interaction_type,
            contradictions,
            context_override_applied,
        }
    }

    /// Folds the mixed-emotion reading into the running score and delta.
    fn apply_mixed(
        &self,
        score: f32,
        delta: i32,
        confidence: f32,
        mixed: &MixedEmotionAnalysis,
    ) -> (f32, i32, f32) {
        if !mixed.is_mixed {
            return (score, delta, confidence);
        }
        let impact = self.mixed.affection_impact(mixed);
        let mut score = score;
        let mut delta = delta;
        let mut confidence = confidence;

        if mixed.category == EmotionCategory::Ambivalent {
            // Opposed emotions pull the turn toward the mix's own verdict.
            let weight = 0.3 + mixed.ambivalence * 0.4;
            score = score * (1.0 - weight) + impact.score * weight;
            delta = (delta as f32 * (1.0 - weight) + impact.delta as f32 * weight) as i32;
            confidence = confidence.min(impact.confidence);
        } else if mixed.complexity > 0.5 {
            let keep = 1.0 - mixed.complexity * 0.3;
            score *= keep;
            delta = (delta as f32 * keep) as i32;
            confidence *= 1.0 - mixed.complexity * 0.2;
        } else {
            if mixed.confidence > 0.7 {
                // A one-sided mix can overrule a keyword reading of the
                // opposite sign.
                if mixed.category == EmotionCategory::Positive && score < 0.0 {
                    score = score.abs() * 0.7;
                    if delta < 0 {
                        delta = delta.abs() / 2;
                    }
                } else if mixed.category == EmotionCategory::Negative && score > 0.0 {
                    score = -score.abs() * 0.7;
                    if delta > 0 {
                        delta = -(delta.abs() / 2);
                    }
                }
            }
            if let Some(secondary) = mixed.secondary_emotion {
                let dominant_score =
                    mixed.emotions.get(&mixed.dominant_emotion).copied().unwrap_or(0.0);
                let secondary_score = mixed.emotions.get(&secondary).copied().unwrap_or(0.0);
                let secondary_weight = if dominant_score > 0.0 {
                    (secondary_score / dominant_score * 0.5).min(0.4)
                } else {
                    0.0
                };
                if secondary_weight > 0.1 {
                    score *= 1.0 - secondary_weight;
                    delta = (delta as f32 * (1.0 - secondary_weight)) as i32;
                    confidence *= 1.0 - secondary_weight * 0.5;
                }
            }
        }

        if impact.confidence < 0.5 {
            let keep = 0.5 + impact.confidence * 0.5;
            score *= keep;
            delta = (delta as f32 * keep) as i32;
        }

        (score.clamp(-1.0, 1.0), delta.clamp(-10, 10), confidence.clamp(0.0, 1.0))
    }
}

/// Finds contradictions between what the keywords say and what the context
/// says: negations, sarcasm framings, conditionals, and keyword/emotion
/// mismatches. Each family is reported at most once.
fn detect_contradictions(
    text: &str,
    raw: &SentimentResult,
    contextual: &ContextualAnalysis,
) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for (family, pattern) in lexicon::KEYWORD_CONTEXT_PATTERNS.iter() {
        if found.iter().any(|f| f == family) {
            continue;
        }
        if pattern.is_match(&lowered) {
            found.push((*family).to_string());
        }
    }

    if raw.score > 0.3 && contextual.dominant_emotion.is_negative() {
        found.push("positive_keywords_negative_context".to_string());
    } else if raw.score < -0.3 && contextual.dominant_emotion.is_positive() {
        found.push("negative_keywords_positive_context".to_string());
    }

    if contextual.sarcasm_probability > 0.6 || contextual.irony_probability > 0.6 {
        if raw.score > 0.0 {
            found.push("likely_sarcastic_positive".to_string());
        } else {
            found.push("likely_sarcastic_negative".to_string());
        }
    }

    found
}

/// Corrects the keyword score and delta against the contextual reading.
///
/// Contradictions take precedence: the first matching family determines the
/// correction. Without contradictions, a confident contextual emotion is
/// blended in at 40%. Modifier words scale whatever survives.
///
/// Returns (score, delta, context confidence, whether context overrode the
/// keyword reading).
fn adjust_for_context(
    raw: &SentimentResult,
    contextual: &ContextualAnalysis,
    contradictions: &[String],
) -> (f32, i32, f32, bool) {
    let mut score = raw.score;
    let mut delta = raw.raw_delta;
    let mut confidence = contextual.emotion_confidence;
    let mut overridden = false;

    let has = |name: &str| contradictions.iter().any(|c| c == name);

    if !contradictions.is_empty() {
        if has("negated_positive") {
            score = -raw.score * 0.7;
            delta = (-raw.raw_delta).div_euclid(2);
            overridden = true;
        } else if has("negated_negative") {
            score = -raw.score * 0.5;
            delta = (-raw.raw_delta).div_euclid(3);
            overridden = true;
        } else if has("sarcastic_positive") || has("likely_sarcastic_positive") {
            score = -raw.score * 0.8;
            delta = -raw.raw_delta;
            confidence *= 0.7;
            overridden = true;
        } else if has("conditional_sentiment") {
            score = raw.score * 0.3;
            delta = raw.raw_delta.div_euclid(3);
            confidence *= 0.5;
        } else if has("positive_keywords_negative_context") {
            let strength = if contextual.dominant_emotion.is_negative() { 0.7 } else { 0.0 };
            score = -0.3 - strength * 0.3;
            delta = raw.raw_delta.div_euclid(2).min(-1);
            confidence *= 0.8;
            overridden = true;
        } else if has("negative_keywords_positive_context") {
            let strength = if contextual.dominant_emotion.is_positive() { 0.7 } else { 0.0 };
            score = 0.3 + strength * 0.3;
            delta = raw.raw_delta.div_euclid(2).max(1);
            confidence *= 0.8;
            overridden = true;
        }
    } else if contextual.emotion_confidence > 0.7 {
        let contextual_sentiment = if contextual.dominant_emotion.is_positive() {
            0.5 + contextual.emotion_confidence * 0.5
        } else if contextual.dominant_emotion.is_negative() {
            -(0.5 + contextual.emotion_confidence * 0.5)
        } else {
            0.0
        };
        score = raw.score * 0.6 + contextual_sentiment * 0.4;
        let contextual_delta = (contextual_sentiment * 10.0) as i32;
        delta = (raw.raw_delta as f32 * 0.6 + contextual_delta as f32 * 0.4) as i32;
    }

    let mut multiplier = 1.0f32;
    for modifier in &contextual.modifiers {
        match modifier.as_str() {
            "very" | "really" | "extremely" | "とても" | "非常に" | "めちゃ" => multiplier *= 1.3,
            "somewhat" | "slightly" | "a bit" | "少し" | "ちょっと" => multiplier *= 0.7,
            _ => {}
        }
    }
    if (multiplier - 1.0).abs() > f32::EPSILON {
        score *= multiplier;
        delta = (delta as f32 * multiplier) as i32;
    }

    (score.clamp(-1.0, 1.0), delta.clamp(-10, 10), confidence, overridden)
}

/// Scales score and delta by expression intensity, weighted by how
/// confident the intensity reading is.
fn apply_intensity(score: f32, delta: i32, intensity: &IntensityAnalysis) -> (f32, i32) {
    let scaling = intensity.category.scale_factor();
    let confidence_weight = 0.5 + intensity.confidence * 0.5;
    let effective = 1.0 + (scaling - 1.0) * confidence_weight;

    let score = (score * effective).clamp(-1.0, 1.0);
    let mut delta = if intensity.category == IntensityCategory::Extreme {
        // Extreme expression always moves the needle a full extra point.
        if delta > 0 {
            ((delta as f32 * effective) as i32 + 1).min(10)
        } else if delta < 0 {
            ((delta as f32 * effective) as i32 - 1).max(-10)
        } else {
            0
        }
    } else {
        (delta as f32 * effective) as i32
    };

    if !intensity.intensifiers.is_empty() && !intensity.qualifiers.is_empty() {
        // Clashing modifiers ("really kind of good") soften the push.
        delta = (delta as f32 * 0.9) as i32;
    }

    (score, delta.clamp(-10, 10))
}

/// Resolves the final interaction type: keyword tags win in priority order,
/// then non-literal verdicts, then the contextual emotion, then the score.
fn final_interaction_type(
    score: f32,
    raw: &SentimentResult,
    contextual: &ContextualAnalysis,
) -> InteractionType {
    const TAG_PRIORITY: &[(SentimentTag, InteractionType)] = &[
        (SentimentTag::Sexual, InteractionType::Sexual),
        (SentimentTag::Hostile, InteractionType::Hostile),
        (SentimentTag::Appreciative, InteractionType::Appreciative),
        (SentimentTag::Caring, InteractionType::Caring),
        (SentimentTag::Interest, InteractionType::Interest),
        (SentimentTag::Dismissive, InteractionType::Dismissive),
        (SentimentTag::Positive, InteractionType::Positive),
        (SentimentTag::Negative, InteractionType::Negative),
    ];
    for (tag, kind) in TAG_PRIORITY {
        if raw.has_tag(*tag) {
            return *kind;
        }
    }

    if contextual.sarcasm_probability > 0.7 {
        return InteractionType::Negative;
    }
    if contextual.irony_probability > 0.7 {
        return if score > 0.0 { InteractionType::Positive } else { InteractionType::Negative };
    }
    if contextual.emotion_confidence > 0.7 {
        return if contextual.dominant_emotion.is_positive() {
            InteractionType::Positive
        } else if contextual.dominant_emotion.is_negative() {
            InteractionType::Negative
        } else {
            InteractionType::Neutral
        };
    }

    if score > 0.3 {
        InteractionType::Positive
    } else if score < -0.3 {
        InteractionType::Negative
    } else {
        InteractionType::Neutral
    }
}
