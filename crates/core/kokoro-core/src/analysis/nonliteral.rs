//! Sarcasm and irony detection.
//!
//! Non-literal language is the main failure mode of keyword scoring: "oh
//! great, thanks a lot" reads as praise to the lexicon. This detector
//! estimates sarcasm and irony probabilities from pattern families,
//! typographic cues, contradiction signals, and conversation history, and
//! reports how ambiguous its own verdict is.

use std::collections::HashMap;

use tracing::debug;

use crate::lexicon;
use crate::types::{Emotion, NonLiteralType};

/// Conversation-level signals that sharpen non-literal detection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversationCues {
    /// Keyword sentiment and contextual emotion point in opposite directions.
    pub sentiment_contradiction: bool,
    /// Number of recent turns flagged as sarcastic.
    pub sarcasm_history: u32,
    /// Current tone clashes with the running conversation tone.
    pub sentiment_mismatch: bool,
    /// The topic changed abruptly since the previous turn.
    pub topic_shift: bool,
}

impl ConversationCues {
    fn active_factors(&self) -> u32 {
        u32::from(self.sentiment_contradiction)
            + u32::from(self.sarcasm_history > 0)
            + u32::from(self.sentiment_mismatch)
            + u32::from(self.topic_shift)
    }
}

/// Result of non-literal language detection.
#[derive(Debug, Clone, Default)]
pub struct NonLiteralAnalysis {
    /// Probability the message is sarcastic, in [0, 1].
    pub sarcasm_probability: f32,
    /// Probability the message is ironic, in [0, 1].
    pub irony_probability: f32,
    /// Confidence in this verdict, in [0.1, 0.95].
    pub confidence: f32,
    /// Matched pattern families, prefixed with "sarcasm:", "irony:", or
    /// "contradiction:".
    pub detected_patterns: Vec<String>,
    /// Matched context indicator families (punctuation, formatting, ...).
    pub context_indicators: Vec<String>,
    /// Classification when either probability crosses 0.5.
    pub non_literal_type: Option<NonLiteralType>,
    /// Emotions co-occurring in the non-literal framing.
    pub mixed_emotions: HashMap<Emotion, f32>,
    /// How ambiguous the verdict is, in [0, 1].
    pub ambiguity: f32,
    /// Share of the verdict owed to conversation history, in [0, 1].
    pub context_impact: f32,
}

/// Detects sarcasm and irony in a message.
#[derive(Debug, Default, Clone)]
pub struct NonLiteralDetector;

impl NonLiteralDetector {
    /// Creates a new detector.
    pub fn new() -> Self {
        Self
    }

    /// Runs detection over a message, optionally informed by conversation
    /// cues from earlier turns.
    pub fn detect(&self, text: &str, cues: Option<&ConversationCues>) -> NonLiteralAnalysis {
        let lowered = text.to_lowercase();
        let mut sarcasm = 0.0f32;
        let mut irony = 0.0f32;
        let mut patterns = Vec::new();
        let mut indicators = Vec::new();

        // Confidence contributions are tracked per source and weighted
        // differently when combined.
        let mut pattern_strength = 0.0f32;
        let mut context_strength = 0.0f32;
        let mut special_strength = 0.0f32;
        let mut contextual_info = 0.0f32;
        let mut contradiction_strength = 0.0f32;

        for (family, regex) in lexicon::SARCASM_PATTERNS.iter() {
            if regex.is_match(&lowered) {
                sarcasm += 0.25;
                patterns.push(format!("sarcasm:{family}"));
                pattern_strength += 0.15;
            }
        }
        for (family, regex) in lexicon::IRONY_PATTERNS.iter() {
            if regex.is_match(&lowered) {
                irony += 0.25;
                patterns.push(format!("irony:{family}"));
                pattern_strength += 0.15;
            }
        }
        // Indicators run on the original text so ALL CAPS is meaningful.
        for (family, regex) in lexicon::CONTEXT_INDICATOR_PATTERNS.iter() {
            if regex.is_match(text) {
                sarcasm += 0.1;
                irony += 0.1;
                indicators.push((*family).to_string());
                context_strength += 0.1;
            }
        }
        for (family, regex) in lexicon::CONTRADICTION_PATTERNS.iter() {
            if regex.is_match(&lowered) {
                sarcasm += 0.2;
                irony += 0.2;
                patterns.push(format!("contradiction:{family}"));
                contradiction_strength += 0.15;
            }
        }
        for phrase in lexicon::SARCASTIC_PHRASES {
            if lowered.contains(phrase) {
                sarcasm += 0.3;
                patterns.push("sarcasm:common_phrase".to_string());
                special_strength += 0.2;
                break;
            }
        }
        for (positive, negatives, is_sarcasm) in lexicon::JA_SARCASM_PAIRS {
            if text.contains(positive) && negatives.iter().any(|neg| text.contains(neg)) {
                if *is_sarcasm {
                    sarcasm += 0.4;
                    patterns.push("sarcasm:japanese_contradiction".to_string());
                } else {
                    irony += 0.4;
                    patterns.push("irony:japanese_contradiction".to_string());
                }
                special_strength += 0.25;
            }
        }

        if let Some(cues) = cues {
            if cues.sentiment_contradiction {
                sarcasm += 0.2;
                irony += 0.2;
                contextual_info += 0.15;
            }
            if cues.sarcasm_history > 0 {
                sarcasm += 0.1 * (cues.sarcasm_history.min(3) as f32) / 3.0;
                contextual_info += 0.1;
            }
            if cues.sentiment_mismatch {
                sarcasm += 0.15;
                irony += 0.15;
                contextual_info += 0.1;
            }
            if cues.topic_shift {
                sarcasm += 0.1;
                contextual_info += 0.05;
            }
        }

        // Short messages rarely carry enough signal to call.
        let word_count = text.split_whitespace().count();
        let length_penalty = if word_count < 3 {
            -0.2
        } else if word_count < 5 {
            -0.1
        } else {
            0.0
        };

        sarcasm = sarcasm.min(1.0);
        irony = irony.min(1.0);

        let mut confidence = 0.3
            + pattern_strength
            + context_strength * 0.8
            + special_strength * 1.2
            + contextual_info * 0.7
            + contradiction_strength * 0.9
            + length_penalty;
        confidence = confidence.clamp(0.1, 0.95);

        let non_literal_type = if sarcasm >= 0.5 && irony >= 0.5 {
            Some(NonLiteralType::Mixed)
        } else if sarcasm >= 0.5 {
            Some(NonLiteralType::Sarcasm)
        } else if irony >= 0.5 {
            Some(NonLiteralType::Irony)
        } else {
            None
        };

        let threshold_distance = (sarcasm - 0.5).abs().min((irony - 0.5).abs());
        if threshold_distance < 0.1 {
            confidence *= 0.8;
        }

        let mixed_emotions = detect_mixed_emotions(&lowered);
        let ambiguity = ambiguity_score(sarcasm, irony, &patterns, &mixed_emotions);
        if ambiguity > 0.0 {
            confidence = (confidence - 0.1 * ambiguity).clamp(0.1, 0.95);
        }

        let context_impact = cues
            .map(|c| (c.active_factors() as f32 * 0.25).min(1.0))
            .unwrap_or(0.0);

        if non_literal_type.is_some() {
            debug!(
                sarcasm,
                irony,
                confidence,
                ambiguity,
                patterns = patterns.len(),
                "non-literal language detected"
            );
        }

        NonLiteralAnalysis {
            sarcasm_probability: sarcasm,
            irony_probability: irony,
            confidence,
            detected_patterns: patterns,
            context_indicators: indicators,
            non_literal_type,
            mixed_emotions,
            ambiguity,
            context_impact,
        }
    }
}

/// Emotions voiced inside the potentially non-literal framing. Each matched
/// keyword adds 0.2; stock two-sided phrases add 0.3 to both sides.
fn detect_mixed_emotions(lowered: &str) -> HashMap<Emotion, f32> {
    let mut scores: HashMap<Emotion, f32> = HashMap::new();
    for (emotion, keywords) in lexicon::EMOTION_KEYWORDS {
        for keyword in *keywords {
            if lowered.contains(keyword) {
                *scores.entry(*emotion).or_insert(0.0) += 0.2;
            }
        }
    }

    let two_sided: &[(&str, Emotion, Emotion)] = &[
        ("happy but sad", Emotion::Joy, Emotion::Sadness),
        ("happy and sad", Emotion::Joy, Emotion::Sadness),
        ("laugh and cry", Emotion::Joy, Emotion::Sadness),
        ("laughing and crying", Emotion::Joy, Emotion::Sadness),
        ("love and hate", Emotion::Joy, Emotion::Anger),
        ("love-hate", Emotion::Joy, Emotion::Anger),
    ];
    for (phrase, first, second) in two_sided {
        if lowered.contains(phrase) {
            *scores.entry(*first).or_insert(0.0) += 0.3;
            *scores.entry(*second).or_insert(0.0) += 0.3;
        }
    }

    for score in scores.values_mut() {
        *score = score.min(1.0);
    }
    scores
}

fn ambiguity_score(
    sarcasm: f32,
    irony: f32,
    patterns: &[String],
    mixed_emotions: &HashMap<Emotion, f32>,
) -> f32 {
    let mut ambiguity = 0.0f32;

    let threshold_distance = (sarcasm - 0.5).abs().min((irony - 0.5).abs());
    if threshold_distance < 0.1 {
        ambiguity += 0.3;
    } else if threshold_distance < 0.2 {
        ambiguity += 0.2;
    }

    if sarcasm >= 0.4 && irony >= 0.4 {
        let difference = (sarcasm - irony).abs();
        if difference < 0.1 {
            ambiguity += 0.3;
        } else if difference < 0.2 {
            ambiguity += 0.2;
        }
    }

    if mixed_emotions.len() > 1 {
        let mut values: Vec<f32> = mixed_emotions.values().copied().collect();
        values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        if values[0] - values[1] < 0.2 {
            ambiguity += 0.2;
        }
    }

    let mut families: Vec<&str> = patterns
        .iter()
        .filter_map(|p| p.split(':').next())
        .collect();
    families.sort_unstable();
    families.dedup();
    if families.len() > 1 {
        ambiguity += 0.1;
    }

    ambiguity.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_praise_is_literal() {
        let detector = NonLiteralDetector::new();
        let result = detector.detect("thank you for the help today, it worked", None);
        assert!(result.sarcasm_probability < 0.5);
        assert!(result.irony_probability < 0.5);
        assert_eq!(result.non_literal_type, None);
    }

    #[test]
    fn mock_agreement_reads_as_sarcasm() {
        let detector = NonLiteralDetector::new();
        let result = detector.detect("yeah sure, whatever you say, that is totally fine", None);
        assert!(result.sarcasm_probability >= 0.5);
        assert_eq!(result.non_literal_type, Some(NonLiteralType::Sarcasm));
        assert!(result.detected_patterns.iter().any(|p| p.starts_with("sarcasm:")));
    }

    #[test]
    fn japanese_praise_with_failure_reads_as_sarcasm() {
        let detector = NonLiteralDetector::new();
        let result = detector.detect("素晴らしいですね、また失敗しましたよ、本当にすごいです", None);
        assert!(result.sarcasm_probability >= 0.4);
        assert!(result
            .detected_patterns
            .iter()
            .any(|p| p == "sarcasm:japanese_contradiction"));
    }

    #[test]
    fn short_messages_lose_confidence() {
        let detector = NonLiteralDetector::new();
        let long = detector.detect("yeah sure whatever you say my friend, truly great", None);
        let short = detector.detect("yeah sure", None);
        assert!(short.confidence < long.confidence);
    }

    #[test]
    fn history_of_sarcasm_raises_probability() {
        let detector = NonLiteralDetector::new();
        let text = "oh wow thanks, what a great and helpful answer";
        let cold = detector.detect(text, None);
        let cues = ConversationCues {
            sarcasm_history: 3,
            sentiment_mismatch: true,
            ..ConversationCues::default()
        };
        let warm = detector.detect(text, Some(&cues));
        assert!(warm.sarcasm_probability > cold.sarcasm_probability);
        assert!(warm.context_impact > 0.0);
    }

    #[test]
    fn competing_types_raise_ambiguity() {
        let high = ambiguity_score(0.55, 0.52, &[], &HashMap::new());
        let low = ambiguity_score(0.9, 0.0, &[], &HashMap::new());
        assert!(high > low);
    }

    #[test]
    fn tone_marker_is_a_strong_indicator() {
        let detector = NonLiteralDetector::new();
        let result = detector.detect("i really love this new schedule /s", None);
        assert!(result.context_indicators.iter().any(|i| i == "tone_markers"));
        assert!(result.sarcasm_probability > 0.0);
    }

    #[test]
    fn context_free_detection_has_zero_context_impact() {
        let detector = NonLiteralDetector::new();
        let result = detector.detect("perfect timing as always, just what i needed", None);
        assert_eq!(result.context_impact, 0.0);
    }
}
