//! Contextual emotion analysis.
//!
//! Looks past individual keywords at the emotional framing of a message:
//! which basic emotions it voices (with negation awareness), which topics it
//! touches, which modifier words color it, and how likely the whole thing is
//! to be sarcastic given the conversation so far.

use std::collections::HashMap;

use tracing::trace;

use crate::analysis::nonliteral::{ConversationCues, NonLiteralDetector};
use crate::lexicon;
use crate::types::{ContextualAnalysis, Emotion, TurnRecord};

// Small modifier sets for context extraction. The full weighted tables in
// the lexicon belong to intensity scoring; context adjustment only needs
// presence of the common ones.
const CONTEXT_INTENSIFIERS: &[&str] = &[
    "very", "really", "extremely", "incredibly", "absolutely", "totally", "completely",
    "とても", "非常に", "めちゃ", "すごく", "かなり", "本当に",
];
const CONTEXT_DIMINISHERS: &[&str] =
    &["slightly", "somewhat", "a bit", "a little", "kind of", "sort of", "ちょっと", "少し", "やや", "多少"];

/// Analyzes the emotional context of a message within a conversation.
#[derive(Debug, Default, Clone)]
pub struct ContextAnalyzer {
    nonliteral: NonLiteralDetector,
}

impl ContextAnalyzer {
    /// Creates a new analyzer.
    pub fn new() -> Self {
        Self { nonliteral: NonLiteralDetector::new() }
    }

    /// Analyzes a message, optionally informed by prior turns.
    pub fn analyze(&self, text: &str, history: &[TurnRecord]) -> ContextualAnalysis {
        let modifiers = extract_modifiers(text);
        let topics = detect_topics(text);
        let emotion_scores = detect_emotional_context(text);

        let (dominant_emotion, emotion_confidence) = dominant_of(&emotion_scores);

        let cues = if history.is_empty() {
            None
        } else {
            Some(conversation_cues(history, dominant_emotion, &topics))
        };

        let non_literal = self.nonliteral.detect(text, cues.as_ref());

        let topic_sentiments: HashMap<String, f32> =
            topics.iter().map(|t| (t.clone(), emotion_confidence)).collect();

        trace!(
            ?dominant_emotion,
            emotion_confidence,
            topics = topics.len(),
            sarcasm = non_literal.sarcasm_probability,
            "context analysis complete"
        );

        ContextualAnalysis {
            dominant_emotion,
            emotion_confidence,
            emotion_scores,
            modifiers,
            topics,
            topic_sentiments,
            sarcasm_probability: non_literal.sarcasm_probability,
            irony_probability: non_literal.irony_probability,
            non_literal_type: non_literal.non_literal_type,
            ambiguity: non_literal.ambiguity,
        }
    }
}

/// Lowercases, strips punctuation except apostrophes, and collapses
/// whitespace. CJK punctuation is not alphanumeric, so one pass covers both
/// scripts.
pub(crate) fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    let replaced: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || c == '\'' || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_modifiers(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut modifiers = Vec::new();
    for word in CONTEXT_INTENSIFIERS.iter().chain(CONTEXT_DIMINISHERS).chain(lexicon::NEGATION_WORDS) {
        if lowered.contains(word) {
            modifiers.push((*word).to_string());
        }
    }
    modifiers
}

fn detect_topics(text: &str) -> Vec<String> {
    let preprocessed = preprocess(text);
    let mut topics = Vec::new();
    for (topic, keywords) in lexicon::TOPIC_KEYWORDS {
        if keywords.iter().any(|kw| preprocessed.contains(kw)) {
            topics.push((*topic).to_string());
        }
    }
    topics
}

/// Scores each basic emotion from its keyword set. A keyword directly after
/// a negation word feeds the opposite emotion instead.
fn detect_emotional_context(text: &str) -> HashMap<Emotion, f32> {
    let preprocessed = preprocess(text);
    let words: Vec<&str> = preprocessed.split(' ').filter(|w| !w.is_empty()).collect();

    let mut negated_positions = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if lexicon::NEGATION_WORDS.contains(word) && i + 1 < words.len() {
            negated_positions.push(i + 1);
        }
    }

    let mut scores: HashMap<Emotion, f32> = HashMap::new();
    for (emotion, keywords) in lexicon::EMOTION_KEYWORDS {
        let mut score = 0.0f32;
        for keyword in *keywords {
            if !preprocessed.contains(keyword) {
                continue;
            }
            for (i, word) in words.iter().enumerate() {
                if word.contains(keyword) {
                    if negated_positions.contains(&i) {
                        *scores.entry(emotion.opposite()).or_insert(0.0) += 0.3;
                    } else {
                        score += 0.3;
                    }
                }
            }
        }
        if score > 0.0 {
            *scores.entry(*emotion).or_insert(0.0) += score;
        }
    }

    if scores.is_empty() {
        scores.insert(Emotion::Neutral, 0.5);
    }

    let total: f32 = scores.values().sum();
    if total > 0.0 {
        for score in scores.values_mut() {
            *score = (*score / total).min(1.0);
        }
    }
    scores
}

fn dominant_of(scores: &HashMap<Emotion, f32>) -> (Emotion, f32) {
    let mut entries: Vec<(&Emotion, &f32)> = scores.iter().collect();
    // Name order breaks ties so results are stable across runs.
    entries.sort_by(|a, b| {
        b.1.partial_cmp(a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.as_str().cmp(b.0.as_str()))
    });
    entries
        .first()
        .map(|(e, s)| (**e, **s))
        .unwrap_or((Emotion::Neutral, 0.5))
}

/// Derives sarcasm cues from recent turns: how often sarcasm appeared in the
/// last five, whether the tone flipped against the previous turn, and
/// whether the topic changed with no overlap.
fn conversation_cues(
    history: &[TurnRecord],
    dominant_emotion: Emotion,
    topics: &[String],
) -> ConversationCues {
    let recent = history.iter().rev().take(5);
    let sarcasm_history = recent.filter(|t| t.sarcastic).count() as u32;

    let mut sentiment_mismatch = false;
    let mut topic_shift = false;
    if history.len() >= 2 {
        if let Some(prev) = history.last() {
            if (prev.sentiment_score > 0.3 && dominant_emotion.is_negative())
                || (prev.sentiment_score < -0.3 && dominant_emotion.is_positive())
            {
                sentiment_mismatch = true;
            }
            if !topics.is_empty()
                && !prev.topics.is_empty()
                && !topics.iter().any(|t| prev.topics.contains(t))
            {
                topic_shift = true;
            }
        }
    }

    ConversationCues {
        sentiment_contradiction: false,
        sarcasm_history,
        sentiment_mismatch,
        topic_shift,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn turn(score: f32, topics: &[&str], sarcastic: bool) -> TurnRecord {
        TurnRecord {
            text: String::new(),
            sentiment_score: score,
            dominant_emotion: Emotion::Neutral,
            emotion_confidence: 0.5,
            affection_delta: 0,
            topics: topics.iter().map(|t| t.to_string()).collect(),
            sarcastic,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn preprocess_strips_punctuation_and_casing() {
        assert_eq!(preprocess("Hello,   World!"), "hello world");
        assert_eq!(preprocess("嬉しい、楽しい！"), "嬉しい 楽しい");
        assert_eq!(preprocess("don't stop"), "don't stop");
    }

    #[test]
    fn happy_text_yields_joy() {
        let analyzer = ContextAnalyzer::new();
        let result = analyzer.analyze("i am happy today", &[]);
        assert_eq!(result.dominant_emotion, Emotion::Joy);
        assert_eq!(result.emotion_confidence, 1.0);
    }

    #[test]
    fn negated_joy_flips_to_sadness() {
        let analyzer = ContextAnalyzer::new();
        let result = analyzer.analyze("i am not happy", &[]);
        assert_eq!(result.dominant_emotion, Emotion::Sadness);
    }

    #[test]
    fn no_emotion_is_neutral_with_full_weight() {
        let analyzer = ContextAnalyzer::new();
        let result = analyzer.analyze("the train leaves at seven", &[]);
        assert_eq!(result.dominant_emotion, Emotion::Neutral);
        // Normalization leaves the lone neutral entry at full weight.
        assert_eq!(result.emotion_confidence, 1.0);
    }

    #[test]
    fn topics_are_detected_bilingually() {
        let analyzer = ContextAnalyzer::new();
        let en = analyzer.analyze("we watched anime and ate ramen", &[]);
        assert!(en.topics.contains(&"anime".to_string()));
        assert!(en.topics.contains(&"food".to_string()));
        let ja = analyzer.analyze("ラーメンが好き", &[]);
        assert!(ja.topics.contains(&"food".to_string()));
    }

    #[test]
    fn modifiers_include_intensifiers_and_negators() {
        let analyzer = ContextAnalyzer::new();
        let result = analyzer.analyze("i am very happy, not sad", &[]);
        assert!(result.modifiers.contains(&"very".to_string()));
        assert!(result.modifiers.contains(&"not".to_string()));
    }

    #[test]
    fn topic_sentiments_carry_emotion_confidence() {
        let analyzer = ContextAnalyzer::new();
        let result = analyzer.analyze("i am happy we watched anime", &[]);
        let sentiment = result.topic_sentiments.get("anime").copied();
        assert_eq!(sentiment, Some(result.emotion_confidence));
    }

    #[test]
    fn cues_reflect_history() {
        let history = vec![
            turn(0.0, &["food"], true),
            turn(0.6, &["food"], true),
        ];
        let cues = conversation_cues(&history, Emotion::Sadness, &["work".to_string()]);
        assert_eq!(cues.sarcasm_history, 2);
        assert!(cues.sentiment_mismatch);
        assert!(cues.topic_shift);
    }

    #[test]
    fn single_turn_history_gives_no_shift_signals() {
        let history = vec![turn(0.6, &["food"], false)];
        let cues = conversation_cues(&history, Emotion::Sadness, &["work".to_string()]);
        assert!(!cues.sentiment_mismatch);
        assert!(!cues.topic_shift);
        assert_eq!(cues.sarcasm_history, 0);
    }
}
