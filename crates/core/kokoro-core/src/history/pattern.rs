//! Multi-turn sentiment pattern recognition.
//!
//! Classifies the recent turn window as consistent, escalating,
//! de-escalating, or fluctuating, and derives a strengthening factor that
//! amplifies sentiment aligned with an established pattern. Fluctuating
//! conversations instead lose confidence.

use std::collections::HashMap;

use tracing::debug;

use crate::config::PatternConfig;
use crate::types::{ConversationPattern, Emotion, PatternType, TurnRecord};

/// Turns considered when classifying a pattern.
const PATTERN_WINDOW: usize = 10;

/// Recognizes sentiment patterns across recent turns.
#[derive(Debug, Clone)]
pub struct PatternRecognizer {
    config: PatternConfig,
}

impl Default for PatternRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRecognizer {
    /// Creates a recognizer with default tunables.
    pub fn new() -> Self {
        Self { config: PatternConfig::default() }
    }

    /// Creates a recognizer with explicit tunables.
    pub fn with_config(config: PatternConfig) -> Self {
        Self { config }
    }

    /// Classifies the recent window of turns.
    pub fn analyze(&self, history: &[TurnRecord]) -> ConversationPattern {
        if history.len() < self.config.min_pattern_length {
            return ConversationPattern::insufficient_data();
        }

        let window_start = history.len().saturating_sub(PATTERN_WINDOW);
        let window = &history[window_start..];
        let scores: Vec<f32> = window.iter().map(|t| t.sentiment_score).collect();
        let emotions: Vec<Emotion> = window.iter().map(|t| t.dominant_emotion).collect();

        let stability = compute_stability(&scores, &emotions);
        let intensity_trend = intensity_trend(&scores);
        let pattern_type = self.classify(intensity_trend, stability);

        let duration = window.len();
        let confidence = 0.5 * stability
            + 0.3 * (duration as f32 / 3.0).min(1.0)
            + 0.2 * (history.len() as f32 / 6.0).min(1.0);

        let strengthening_factor =
            self.strengthening_factor(pattern_type, duration, stability, confidence);

        let (dominant_emotion, secondary_emotions) = rank_emotions(&emotions);

        debug!(
            ?pattern_type,
            stability,
            intensity_trend,
            strengthening_factor,
            "pattern recognized"
        );

        ConversationPattern {
            pattern_type,
            duration,
            dominant_emotion,
            secondary_emotions,
            intensity_trend,
            stability,
            confidence,
            strengthening_factor,
        }
    }

    /// Folds a recognized pattern into the current turn's values.
    ///
    /// Aligned patterns amplify score, delta, and confidence by the
    /// strengthening factor. Fluctuating conversations reduce confidence
    /// instead, since single turns are less trustworthy there.
    pub fn apply_pattern_effects(
        &self,
        score: f32,
        delta: i32,
        confidence: f32,
        pattern: &ConversationPattern,
    ) -> (f32, i32, f32) {
        match pattern.pattern_type {
            PatternType::InsufficientData => (score, delta, confidence),
            PatternType::Fluctuating => (score, delta, confidence * 0.8),
            _ => {
                let amplifier = 1.0 + pattern.strengthening_factor;
                let adjusted_score = (score * amplifier).clamp(-1.0, 1.0);
                let adjusted_delta = ((delta as f32 * amplifier) as i32).clamp(-10, 10);
                let adjusted_confidence = (confidence * amplifier).min(1.0);
                (adjusted_score, adjusted_delta, adjusted_confidence)
            }
        }
    }

    /// Share of topic mentions in the window held by the most common topic.
    pub fn topic_continuity(&self, history: &[TurnRecord]) -> f32 {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut total = 0usize;
        for turn in history {
            for topic in &turn.topics {
                *counts.entry(topic.as_str()).or_insert(0) += 1;
                total += 1;
            }
        }
        if total == 0 {
            return 0.0;
        }
        let most_common = counts.values().copied().max().unwrap_or(0);
        most_common as f32 / total as f32
    }

    fn classify(&self, trend: f32, stability: f32) -> PatternType {
        if trend > 0.2 {
            PatternType::Escalating
        } else if trend < -0.2 {
            PatternType::DeEscalating
        } else if stability >= self.config.stability_threshold {
            PatternType::Consistent
        } else {
            PatternType::Fluctuating
        }
    }

    fn strengthening_factor(
        &self,
        pattern_type: PatternType,
        duration: usize,
        stability: f32,
        confidence: f32,
    ) -> f32 {
        let multiplier = pattern_type.strengthening_multiplier();
        if multiplier == 0.0 {
            return 0.0;
        }
        let duration_base = 0.25 * (1.0 + (duration as f32 - 3.0) / 10.0);
        let base = duration_base.min(self.config.max_strengthening_factor);
        (base * stability * confidence * multiplier).clamp(0.0, self.config.max_strengthening_factor)
    }
}

/// Blends score variance, sign flips, and emotion churn into one [0, 1]
/// stability value. Strictly alternating signs force a low floor.
fn compute_stability(scores: &[f32], emotions: &[Emotion]) -> f32 {
    let n = scores.len();
    if n == 0 {
        return 1.0;
    }

    let mean: f32 = scores.iter().sum::<f32>() / n as f32;
    let variance: f32 = scores.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / n as f32;
    let sign_changes = scores.windows(2).filter(|w| w[0] * w[1] < 0.0).count();
    let score_stability =
        (1.0 - (variance * 2.0).min(1.0) - (sign_changes as f32 * 0.2).min(0.5)).max(0.0);

    let mut counts: HashMap<Emotion, usize> = HashMap::new();
    for emotion in emotions {
        *counts.entry(*emotion).or_insert(0) += 1;
    }
    let dominant_count = counts.values().copied().max().unwrap_or(0);
    let unique = counts.len();
    let emotion_stability = (dominant_count as f32 / n as f32)
        * (1.0 - ((unique.saturating_sub(1)) as f32 * 0.2).min(0.5));

    let combined = 0.6 * score_stability + 0.4 * emotion_stability;

    let alternating = n >= 4 && scores.windows(2).all(|w| w[0] * w[1] < 0.0);
    if alternating {
        0.3
    } else {
        combined
    }
}

/// Least-squares slope of |score| over the window, scaled to [-1, 1].
fn intensity_trend(scores: &[f32]) -> f32 {
    let n = scores.len();
    if n < 2 {
        return 0.0;
    }
    let xs: Vec<f32> = (0..n).map(|i| i as f32).collect();
    let ys: Vec<f32> = scores.iter().map(|s| s.abs()).collect();
    let mean_x: f32 = xs.iter().sum::<f32>() / n as f32;
    let mean_y: f32 = ys.iter().sum::<f32>() / n as f32;
    let numerator: f32 = xs.iter().zip(&ys).map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let denominator: f32 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    if denominator == 0.0 {
        return 0.0;
    }
    ((numerator / denominator) * 5.0).clamp(-1.0, 1.0)
}

fn rank_emotions(emotions: &[Emotion]) -> (Emotion, Vec<Emotion>) {
    let mut counts: HashMap<Emotion, usize> = HashMap::new();
    for emotion in emotions {
        *counts.entry(*emotion).or_insert(0) += 1;
    }
    let mut ranked: Vec<(Emotion, usize)> = counts.into_iter().collect();
    // Count first, then name, so equal counts rank deterministically.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
    let dominant = ranked.first().map(|(e, _)| *e).unwrap_or(Emotion::Neutral);
    let secondary = ranked.iter().skip(1).map(|(e, _)| *e).collect();
    (dominant, secondary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turns(scores: &[f32], emotion: Emotion) -> Vec<TurnRecord> {
        scores.iter().map(|s| TurnRecord::simple("", *s, emotion)).collect()
    }

    #[test]
    fn short_history_is_insufficient() {
        let recognizer = PatternRecognizer::new();
        let pattern = recognizer.analyze(&turns(&[0.5, 0.5], Emotion::Joy));
        assert_eq!(pattern.pattern_type, PatternType::InsufficientData);
        assert_eq!(pattern.strengthening_factor, 0.0);
    }

    #[test]
    fn steady_positive_turns_are_consistent() {
        let recognizer = PatternRecognizer::new();
        let pattern = recognizer.analyze(&turns(&[0.5, 0.5, 0.5, 0.5], Emotion::Joy));
        assert_eq!(pattern.pattern_type, PatternType::Consistent);
        assert!((pattern.stability - 1.0).abs() < 1e-6);
        assert_eq!(pattern.dominant_emotion, Emotion::Joy);
        // 0.275 * 1.0 * 0.9333 with the consistent multiplier
        assert!(pattern.strengthening_factor > 0.2 && pattern.strengthening_factor < 0.3);
    }

    #[test]
    fn rising_magnitude_is_escalating() {
        let recognizer = PatternRecognizer::new();
        let pattern = recognizer.analyze(&turns(&[0.1, 0.3, 0.5, 0.7, 0.9], Emotion::Joy));
        assert_eq!(pattern.pattern_type, PatternType::Escalating);
        assert!(pattern.intensity_trend > 0.2);
    }

    #[test]
    fn falling_magnitude_is_deescalating() {
        let recognizer = PatternRecognizer::new();
        let pattern = recognizer.analyze(&turns(&[-0.9, -0.7, -0.5, -0.3, -0.1], Emotion::Anger));
        assert_eq!(pattern.pattern_type, PatternType::DeEscalating);
        assert!(pattern.intensity_trend < -0.2);
    }

    #[test]
    fn alternating_signs_floor_stability() {
        let recognizer = PatternRecognizer::new();
        let pattern = recognizer.analyze(&turns(&[0.5, -0.5, 0.5, -0.5], Emotion::Joy));
        assert!((pattern.stability - 0.3).abs() < 1e-6);
        assert_eq!(pattern.pattern_type, PatternType::Fluctuating);
        assert_eq!(pattern.strengthening_factor, 0.0);
    }

    #[test]
    fn fluctuating_pattern_reduces_confidence_only() {
        let recognizer = PatternRecognizer::new();
        let mut pattern = ConversationPattern::insufficient_data();
        pattern.pattern_type = PatternType::Fluctuating;
        let (score, delta, confidence) =
            recognizer.apply_pattern_effects(0.5, 5, 0.5, &pattern);
        assert_eq!(score, 0.5);
        assert_eq!(delta, 5);
        assert!((confidence - 0.4).abs() < 1e-6);
    }

    #[test]
    fn aligned_pattern_amplifies() {
        let recognizer = PatternRecognizer::new();
        let mut pattern = ConversationPattern::insufficient_data();
        pattern.pattern_type = PatternType::Consistent;
        pattern.strengthening_factor = 0.2;
        let (score, delta, confidence) =
            recognizer.apply_pattern_effects(0.5, 5, 0.5, &pattern);
        assert!((score - 0.6).abs() < 1e-6);
        assert_eq!(delta, 6);
        assert!((confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn topic_continuity_is_share_of_most_common() {
        let recognizer = PatternRecognizer::new();
        let mut history = turns(&[0.1, 0.2, 0.3], Emotion::Joy);
        history[0].topics = vec!["food".to_string()];
        history[1].topics = vec!["food".to_string()];
        history[2].topics = vec!["games".to_string()];
        let continuity = recognizer.topic_continuity(&history);
        assert!((continuity - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(recognizer.topic_continuity(&turns(&[0.0], Emotion::Neutral)), 0.0);
    }
}
