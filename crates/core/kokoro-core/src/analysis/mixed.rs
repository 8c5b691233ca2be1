//! Mixed and conflicting emotion handling.
//!
//! A message like "嬉しいけど悲しい" carries two opposed emotions at once.
//! This module detects such mixes, measures how many-way and how evenly
//! opposed they are, and recommends how much of the keyword impact should
//! survive the ambivalence.

use std::collections::HashMap;

use tracing::trace;

use crate::lexicon;
use crate::types::{Emotion, EmotionCategory, MixedEmotionAnalysis};

/// Recommended affection impact once ambivalence is accounted for.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedImpact {
    /// Sentiment score the mix supports on its own, in [-1, 1].
    pub score: f32,
    /// Affection delta the mix supports on its own.
    pub delta: i32,
    /// Confidence in the recommendation, in [0, 1].
    pub confidence: f32,
}

/// Detects simultaneous, possibly conflicting emotions in a message.
#[derive(Debug, Default, Clone)]
pub struct MixedEmotionHandler;

impl MixedEmotionHandler {
    /// Creates a new handler.
    pub fn new() -> Self {
        Self
    }

    /// Analyzes a message for mixed emotions.
    pub fn detect(&self, text: &str) -> MixedEmotionAnalysis {
        let lowered = text.to_lowercase();

        let mut scores = analyze_emotions(&lowered);
        let weights = contextual_weights(&lowered, &scores);

        let pattern_matched = lexicon::MIXED_EMOTION_PATTERNS.iter().any(|re| re.is_match(text));

        let ratio = emotion_ratio(&scores);
        let mut conflicting = is_conflicting(&scores, &ratio);
        if lowered.contains("bittersweet") {
            conflicting = true;
        }

        let is_mixed = pattern_matched || significant(&scores, 0.2).len() >= 2;
        let complexity = complexity_of(&scores);
        let ambivalence = ambivalence_of(&ratio);

        let (dominant, secondary, confidence) = dominant_emotions(&scores, &weights);
        let category = overall_category(&ratio, conflicting);

        // Keep the map normalized for downstream weight ratios.
        normalize(&mut scores);

        trace!(
            ?dominant,
            ?secondary,
            is_mixed,
            conflicting,
            complexity,
            ambivalence,
            "mixed emotion analysis complete"
        );

        MixedEmotionAnalysis {
            emotions: scores,
            dominant_emotion: dominant,
            secondary_emotion: secondary,
            confidence,
            category,
            is_mixed,
            conflicting,
            complexity,
            ambivalence,
        }
    }

    /// Recommends the affection impact a mix supports on its own. Complex
    /// or ambivalent mixes are progressively discounted.
    pub fn affection_impact(&self, analysis: &MixedEmotionAnalysis) -> MixedImpact {
        let (mut score, mut delta) = match analysis.category {
            EmotionCategory::Positive => (0.5, 3.0f32),
            EmotionCategory::Negative => (-0.5, -3.0),
            EmotionCategory::Ambivalent => {
                let positive = analysis
                    .emotions
                    .iter()
                    .filter(|(e, _)| e.is_positive())
                    .map(|(_, s)| s)
                    .sum::<f32>();
                let negative = analysis
                    .emotions
                    .iter()
                    .filter(|(e, _)| e.is_negative())
                    .map(|(_, s)| s)
                    .sum::<f32>();
                if positive > negative {
                    (0.2, 1.0)
                } else if negative > positive {
                    (-0.2, -1.0)
                } else {
                    (0.0, 0.0)
                }
            }
            EmotionCategory::Neutral => (0.0, 0.0),
        };

        let mut confidence = analysis.confidence.max(0.75);
        if analysis.category == EmotionCategory::Ambivalent {
            confidence = analysis.confidence;
        }

        if analysis.complexity > 0.5 {
            let keep = 1.0 - analysis.complexity * 0.3;
            score *= keep;
            delta *= keep;
        }
        if analysis.ambivalence > 0.5 {
            let keep = 1.0 - analysis.ambivalence * 0.4;
            score *= keep;
            delta *= keep;
        }
        if analysis.confidence < 0.7 {
            score *= analysis.confidence;
            delta *= analysis.confidence;
        }

        MixedImpact { score, delta: delta as i32, confidence }
    }
}

/// Scores each emotion from its phrase table. Occurrences stack, phrases at
/// the edges of the message weigh more, and longer phrases weigh more.
fn analyze_emotions(lowered: &str) -> HashMap<Emotion, f32> {
    let mut scores: HashMap<Emotion, f32> = HashMap::new();

    for (emotion, phrases) in lexicon::EMOTION_PHRASES {
        if *emotion == Emotion::Neutral {
            continue;
        }
        let mut score = 0.0f32;
        for phrase in *phrases {
            let occurrences = lowered.matches(phrase).count();
            if occurrences == 0 {
                continue;
            }
            let mut base = 0.3 * occurrences as f32;
            if lowered.starts_with(phrase) || lowered.ends_with(phrase) {
                base *= 1.2;
            }
            let length_factor = (phrase.chars().count() as f32 / 5.0).clamp(1.0, 1.5);
            score += base * length_factor;
        }
        if score > 0.0 {
            scores.insert(*emotion, score.min(1.0));
        }
    }

    apply_negations(lowered, &mut scores);

    if scores.is_empty() {
        scores.insert(Emotion::Neutral, 0.5);
    }
    normalize(&mut scores);
    scores
}

/// A negated emotion phrase keeps only 30% of its score and feeds the
/// opposite valence: negated positives add sadness, negated negatives add joy.
fn apply_negations(lowered: &str, scores: &mut HashMap<Emotion, f32>) {
    let emotions: Vec<Emotion> = scores.keys().copied().collect();
    for negation in lexicon::NEGATION_WORDS {
        let prefix = format!("{negation} ");
        if !lowered.contains(&prefix) {
            continue;
        }
        for emotion in &emotions {
            let phrases = lexicon::EMOTION_PHRASES
                .iter()
                .find(|(e, _)| e == emotion)
                .map(|(_, p)| *p)
                .unwrap_or(&[]);
            let negated = phrases.iter().any(|phrase| {
                lowered.contains(&format!("{negation} {phrase}"))
            });
            if !negated {
                continue;
            }
            if let Some(score) = scores.get_mut(emotion) {
                *score *= 0.3;
            }
            if emotion.is_positive() {
                *scores.entry(Emotion::Sadness).or_insert(0.0) += 0.3;
            } else if emotion.is_negative() {
                *scores.entry(Emotion::Joy).or_insert(0.0) += 0.3;
            }
        }
    }
}

/// Context weights start at the raw scores. Uniform boosts wash out under
/// normalization, so only negation reshapes the distribution.
fn contextual_weights(
    lowered: &str,
    scores: &HashMap<Emotion, f32>,
) -> HashMap<Emotion, f32> {
    let mut weights = scores.clone();
    let negated = lexicon::NEGATION_WORDS
        .iter()
        .any(|negation| lowered.contains(&format!("{negation} ")));
    if negated {
        let emotions: Vec<Emotion> = weights.keys().copied().collect();
        for emotion in emotions {
            if let Some(weight) = weights.get_mut(&emotion) {
                *weight *= 0.5;
            }
            if emotion.is_positive() {
                *weights.entry(Emotion::Sadness).or_insert(0.0) += 0.3;
            } else if emotion.is_negative() {
                *weights.entry(Emotion::Joy).or_insert(0.0) += 0.3;
            }
        }
    }
    normalize(&mut weights);
    weights
}

fn normalize(scores: &mut HashMap<Emotion, f32>) {
    let total: f32 = scores.values().sum();
    if total > 0.0 {
        for score in scores.values_mut() {
            *score = (*score / total).min(1.0);
        }
    }
}

fn significant(scores: &HashMap<Emotion, f32>, threshold: f32) -> Vec<Emotion> {
    scores
        .iter()
        .filter(|(_, s)| **s > threshold)
        .map(|(e, _)| *e)
        .collect()
}

fn emotion_ratio(scores: &HashMap<Emotion, f32>) -> (f32, f32, f32) {
    let mut positive = 0.0f32;
    let mut negative = 0.0f32;
    let mut neutral = 0.0f32;
    for (emotion, score) in scores {
        if emotion.is_positive() {
            positive += score;
        } else if emotion.is_negative() {
            negative += score;
        } else {
            neutral += score;
        }
    }
    let total = positive + negative + neutral;
    if total > 0.0 {
        (positive / total, negative / total, neutral / total)
    } else {
        (0.0, 0.0, 1.0)
    }
}

const CONFLICTING_PAIRS: &[(Emotion, Emotion)] = &[
    (Emotion::Joy, Emotion::Sadness),
    (Emotion::Trust, Emotion::Disgust),
    (Emotion::Anticipation, Emotion::Fear),
    (Emotion::Surprise, Emotion::Anger),
];

fn is_conflicting(scores: &HashMap<Emotion, f32>, ratio: &(f32, f32, f32)) -> bool {
    if ratio.0 > 0.3 && ratio.1 > 0.3 {
        return true;
    }
    CONFLICTING_PAIRS.iter().any(|(a, b)| {
        scores.get(a).copied().unwrap_or(0.0) > 0.2 && scores.get(b).copied().unwrap_or(0.0) > 0.2
    })
}

fn complexity_of(scores: &HashMap<Emotion, f32>) -> f32 {
    match significant(scores, 0.1).len() {
        0 | 1 => 0.0,
        2 => 0.35,
        3 => 0.6,
        4 => 0.8,
        _ => 1.0,
    }
}

/// Peaks at 1.0 when positive and negative mass are perfectly balanced.
fn ambivalence_of(ratio: &(f32, f32, f32)) -> f32 {
    let (positive, negative, _) = *ratio;
    if positive == 0.0 || negative == 0.0 {
        return 0.0;
    }
    let total_polar = positive + negative;
    (positive.min(negative) / total_polar) * 2.0
}

fn dominant_emotions(
    scores: &HashMap<Emotion, f32>,
    weights: &HashMap<Emotion, f32>,
) -> (Emotion, Option<Emotion>, f32) {
    if scores.is_empty() {
        return (Emotion::Neutral, None, 0.5);
    }

    let mut combined: Vec<(Emotion, f32)> = scores
        .iter()
        .map(|(emotion, score)| {
            let weight = weights.get(emotion).copied().unwrap_or(0.0);
            (*emotion, (score + weight) / 2.0)
        })
        .collect();
    // Name order breaks ties so results are stable across runs.
    combined.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.as_str().cmp(b.0.as_str()))
    });

    let (dominant, dominant_score) = combined[0];
    let mut confidence = dominant_score;
    let mut secondary = None;

    if combined.len() > 1 {
        let (second, second_score) = combined[1];
        secondary = Some(second);
        if second_score > dominant_score * 0.8 {
            confidence = dominant_score * (1.0 - (second_score / dominant_score) * 0.5);
        }
        let significant_count = significant(scores, 0.2).len();
        if significant_count > 2 {
            confidence *= 1.0 - (significant_count as f32 - 2.0) * 0.1;
        }
        let cross_category = (dominant.is_positive() && second.is_negative())
            || (dominant.is_negative() && second.is_positive());
        if cross_category {
            confidence *= 0.9;
        }
    }

    (dominant, secondary, confidence.clamp(0.1, 1.0))
}

fn overall_category(ratio: &(f32, f32, f32), conflicting: bool) -> EmotionCategory {
    let (positive, negative, neutral) = *ratio;
    if conflicting && positive > 0.3 && negative > 0.3 {
        return EmotionCategory::Ambivalent;
    }
    if positive > negative && positive > neutral {
        EmotionCategory::Positive
    } else if negative > positive && negative > neutral {
        EmotionCategory::Negative
    } else {
        EmotionCategory::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_mixed() {
        let handler = MixedEmotionHandler::new();
        let result = handler.detect("see you tomorrow at the station");
        assert!(!result.is_mixed);
        assert!(!result.conflicting);
        assert_eq!(result.dominant_emotion, Emotion::Neutral);
        assert_eq!(result.category, EmotionCategory::Neutral);
    }

    #[test]
    fn explicit_contrast_is_mixed_and_conflicting() {
        let handler = MixedEmotionHandler::new();
        let result = handler.detect("I am happy but however also sad about it");
        assert!(result.is_mixed);
        assert!(result.conflicting);
        assert_eq!(result.category, EmotionCategory::Ambivalent);
        assert!(result.ambivalence > 0.5);
    }

    #[test]
    fn bittersweet_marks_conflict() {
        let handler = MixedEmotionHandler::new();
        let result = handler.detect("it was a bittersweet ending");
        assert!(result.conflicting);
        assert!(result.is_mixed);
    }

    #[test]
    fn japanese_contrast_pattern_detected() {
        let handler = MixedEmotionHandler::new();
        let result = handler.detect("嬉しいけど、でも悲しい");
        assert!(result.is_mixed);
        assert!(result.conflicting);
    }

    #[test]
    fn single_emotion_is_not_ambivalent() {
        let handler = MixedEmotionHandler::new();
        let result = handler.detect("I am so happy today");
        assert_eq!(result.dominant_emotion, Emotion::Joy);
        assert_eq!(result.ambivalence, 0.0);
        assert_eq!(result.category, EmotionCategory::Positive);
    }

    #[test]
    fn ambivalent_impact_is_discounted() {
        let handler = MixedEmotionHandler::new();
        let mixed = handler.detect("I am happy but however also sad about it");
        let impact = handler.affection_impact(&mixed);
        assert!(impact.delta.abs() <= 1);
        assert!(impact.score.abs() <= 0.2);
    }

    #[test]
    fn positive_mix_recommends_positive_impact() {
        let handler = MixedEmotionHandler::new();
        let analysis = handler.detect("I am delighted and grateful");
        let impact = handler.affection_impact(&analysis);
        assert_eq!(analysis.category, EmotionCategory::Positive);
        assert!(impact.score > 0.0);
        assert!(impact.delta >= 0);
    }

    #[test]
    fn complexity_steps_with_emotion_count() {
        let mut scores = HashMap::new();
        scores.insert(Emotion::Joy, 0.5);
        assert_eq!(complexity_of(&scores), 0.0);
        scores.insert(Emotion::Sadness, 0.3);
        assert_eq!(complexity_of(&scores), 0.35);
        scores.insert(Emotion::Fear, 0.2);
        assert_eq!(complexity_of(&scores), 0.6);
    }

    #[test]
    fn negation_flips_valence() {
        let handler = MixedEmotionHandler::new();
        let result = handler.detect("i am not happy about this");
        let sadness = result.emotions.get(&Emotion::Sadness).copied().unwrap_or(0.0);
        let joy = result.emotions.get(&Emotion::Joy).copied().unwrap_or(0.0);
        assert!(sadness > joy);
    }
}
