//! Graceful degradation when a turn cannot be analyzed end to end.
//!
//! The pipeline normally produces a full [`TurnAnalysis`](super::TurnAnalysis),
//! but a storage hiccup or a panic-guarded stage can leave a turn with only
//! partial results. The handler here salvages whatever survived, in order of
//! preference: a completed keyword pass at discounted confidence, a contextual
//! reading converted into an approximate result, a fresh keyword-only scan,
//! and finally a low-confidence neutral result so the caller always has
//! something to apply.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, warn};

use crate::analysis::LexicalAnalyzer;
use crate::error::KokoroError;
use crate::types::{ContextualAnalysis, InteractionType, SentimentResult, SentimentTag};

/// Stage outputs that survived a failed analysis attempt.
#[derive(Debug, Default, Clone, Copy)]
pub struct PartialAnalysis<'a> {
    /// Keyword result, when the lexical stage completed before the failure.
    pub raw: Option<&'a SentimentResult>,
    /// Contextual reading, when the context stage completed.
    pub contextual: Option<&'a ContextualAnalysis>,
}

/// Result of a recovery attempt.
#[derive(Debug, Clone)]
pub struct FallbackOutcome {
    /// Best-effort sentiment result to use for the turn.
    pub result: SentimentResult,
    /// Degradation level: 1 reuses partial results, 2 re-runs keywords,
    /// 3 is the neutral floor.
    pub level: u8,
    /// Name of the strategy that produced the result.
    pub strategy: &'static str,
    /// Whether anything better than the neutral floor was recovered.
    pub recovered: bool,
}

/// Running counters describing how often recovery ran and how well it went.
#[derive(Debug, Default, Clone, Serialize)]
pub struct FallbackStats {
    /// Total recovery attempts.
    pub total_fallbacks: u64,
    /// Attempts that recovered a usable result (levels 1 and 2).
    pub successful_recoveries: u64,
    /// Level 1 recoveries built from partial stage output.
    pub partial_recoveries: u64,
    /// Level 2 recoveries from a fresh keyword-only scan.
    pub keyword_recoveries: u64,
    /// Level 3 neutral results when nothing else was available.
    pub neutral_fallbacks: u64,
    /// Failure counts keyed by [`KokoroError::kind`].
    pub error_counts: HashMap<String, u64>,
}

/// Recovers a usable sentiment result after an analysis failure.
#[derive(Debug, Default)]
pub struct FallbackHandler {
    lexical: LexicalAnalyzer,
    stats: Mutex<FallbackStats>,
}

impl FallbackHandler {
    /// Creates a handler with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces the best available result for a turn whose analysis failed.
    ///
    /// Never fails itself: the worst case is a neutral result at confidence
    /// 0.1 with `recovered == false`.
    pub fn recover(
        &self,
        text: &str,
        error: &KokoroError,
        partial: PartialAnalysis<'_>,
    ) -> FallbackOutcome {
        {
            let mut stats = self.stats.lock().unwrap();
            stats.total_fallbacks += 1;
            *stats
                .error_counts
                .entry(error.kind().to_string())
                .or_insert(0) += 1;
        }
        warn!(error = %error, "analysis failed, attempting recovery");

        if let Some(raw) = partial.raw {
            let mut result = raw.clone();
            result.confidence = (result.confidence * 0.8).clamp(0.0, 1.0);
            return self.record(FallbackOutcome {
                result,
                level: 1,
                strategy: "partial_sentiment",
                recovered: true,
            });
        }

        if let Some(contextual) = partial.contextual {
            return self.record(FallbackOutcome {
                result: approximate_from_context(contextual),
                level: 1,
                strategy: "partial_context",
                recovered: true,
            });
        }

        if !text.trim().is_empty() {
            return self.record(FallbackOutcome {
                result: self.lexical.analyze(text),
                level: 2,
                strategy: "keyword_only",
                recovered: true,
            });
        }

        let mut result = SentimentResult::neutral();
        result.confidence = 0.1;
        self.record(FallbackOutcome {
            result,
            level: 3,
            strategy: "neutral",
            recovered: false,
        })
    }

    fn record(&self, outcome: FallbackOutcome) -> FallbackOutcome {
        {
            let mut stats = self.stats.lock().unwrap();
            match outcome.level {
                1 => {
                    stats.partial_recoveries += 1;
                    stats.successful_recoveries += 1;
                }
                2 => {
                    stats.keyword_recoveries += 1;
                    stats.successful_recoveries += 1;
                }
                _ => stats.neutral_fallbacks += 1,
            }
        }
        debug!(
            level = outcome.level,
            strategy = outcome.strategy,
            recovered = outcome.recovered,
            "fallback recovery complete"
        );
        outcome
    }

    /// Snapshot of the recovery counters.
    pub fn stats(&self) -> FallbackStats {
        self.stats.lock().unwrap().clone()
    }

    /// Clears the recovery counters.
    pub fn reset_stats(&self) {
        *self.stats.lock().unwrap() = FallbackStats::default();
    }
}

/// Converts a contextual reading into an approximate sentiment result.
///
/// The dominant emotion family fixes the sign, the emotion confidence the
/// magnitude. Confidence is discounted since the keyword evidence is missing.
fn approximate_from_context(contextual: &ContextualAnalysis) -> SentimentResult {
    let emotion_confidence = contextual.emotion_confidence;
    let score = if contextual.dominant_emotion.is_positive() {
        0.3 + emotion_confidence * 0.5
    } else if contextual.dominant_emotion.is_negative() {
        -(0.3 + emotion_confidence * 0.5)
    } else {
        0.0
    };
    let (interaction_type, tag) = if score > 0.0 {
        (InteractionType::Positive, SentimentTag::Positive)
    } else if score < 0.0 {
        (InteractionType::Negative, SentimentTag::Negative)
    } else {
        (InteractionType::Neutral, SentimentTag::Neutral)
    };
    SentimentResult {
        score: score.clamp(-1.0, 1.0),
        interaction_type,
        raw_delta: ((score * 10.0) as i32).clamp(-10, 10),
        confidence: (emotion_confidence * 0.7).clamp(0.0, 1.0),
        matched_keywords: Vec::new(),
        tags: vec![tag],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Emotion;

    fn positive_raw() -> SentimentResult {
        SentimentResult {
            score: 0.4,
            interaction_type: InteractionType::Appreciative,
            raw_delta: 6,
            confidence: 0.5,
            matched_keywords: vec!["ありがとう".to_string()],
            tags: vec![SentimentTag::Positive],
        }
    }

    #[test]
    fn partial_raw_result_is_reused_with_discounted_confidence() {
        let handler = FallbackHandler::new();
        let raw = positive_raw();
        let outcome = handler.recover(
            "ありがとう",
            &KokoroError::storage("disk full"),
            PartialAnalysis {
                raw: Some(&raw),
                contextual: None,
            },
        );

        assert_eq!(outcome.level, 1);
        assert_eq!(outcome.strategy, "partial_sentiment");
        assert!(outcome.recovered);
        assert_eq!(outcome.result.raw_delta, 6);
        assert!((outcome.result.confidence - 0.4).abs() < 1e-6);
        assert_eq!(
            outcome.result.interaction_type,
            InteractionType::Appreciative
        );
    }

    #[test]
    fn contextual_reading_alone_yields_signed_approximation() {
        let handler = FallbackHandler::new();
        let contextual = ContextualAnalysis {
            dominant_emotion: Emotion::Joy,
            emotion_confidence: 0.8,
            ..ContextualAnalysis::default()
        };
        let outcome = handler.recover(
            "",
            &KokoroError::analysis("keyword stage panicked"),
            PartialAnalysis {
                raw: None,
                contextual: Some(&contextual),
            },
        );

        assert_eq!(outcome.strategy, "partial_context");
        assert!((outcome.result.score - 0.7).abs() < 1e-6);
        assert_eq!(outcome.result.raw_delta, 7);
        assert!((outcome.result.confidence - 0.56).abs() < 1e-6);
        assert_eq!(outcome.result.interaction_type, InteractionType::Positive);
    }

    #[test]
    fn negative_emotion_family_flips_the_approximation() {
        let handler = FallbackHandler::new();
        let contextual = ContextualAnalysis {
            dominant_emotion: Emotion::Anger,
            emotion_confidence: 0.6,
            ..ContextualAnalysis::default()
        };
        let outcome = handler.recover(
            "",
            &KokoroError::analysis("keyword stage panicked"),
            PartialAnalysis {
                raw: None,
                contextual: Some(&contextual),
            },
        );

        assert!((outcome.result.score + 0.6).abs() < 1e-6);
        assert_eq!(outcome.result.raw_delta, -6);
        assert_eq!(outcome.result.interaction_type, InteractionType::Negative);
        assert_eq!(outcome.result.tags, vec![SentimentTag::Negative]);
    }

    #[test]
    fn keyword_scan_recovers_when_no_partials_survive() {
        let handler = FallbackHandler::new();
        let outcome = handler.recover(
            "ありがとう",
            &KokoroError::service("context analyzer unavailable"),
            PartialAnalysis::default(),
        );

        assert_eq!(outcome.level, 2);
        assert_eq!(outcome.strategy, "keyword_only");
        assert!(outcome.recovered);
        assert_eq!(outcome.result.raw_delta, 6);
        assert!(outcome.result.has_tag(SentimentTag::Positive));
    }

    #[test]
    fn empty_text_falls_through_to_neutral_floor() {
        let handler = FallbackHandler::new();
        let outcome = handler.recover(
            "   ",
            &KokoroError::service("context analyzer unavailable"),
            PartialAnalysis::default(),
        );

        assert_eq!(outcome.level, 3);
        assert_eq!(outcome.strategy, "neutral");
        assert!(!outcome.recovered);
        assert_eq!(outcome.result.score, 0.0);
        assert_eq!(outcome.result.raw_delta, 0);
        assert!((outcome.result.confidence - 0.1).abs() < 1e-6);
    }

    #[test]
    fn stats_count_levels_and_error_kinds() {
        let handler = FallbackHandler::new();
        let raw = positive_raw();
        handler.recover(
            "a",
            &KokoroError::storage("x"),
            PartialAnalysis {
                raw: Some(&raw),
                contextual: None,
            },
        );
        handler.recover("うざい", &KokoroError::storage("x"), PartialAnalysis::default());
        handler.recover("", &KokoroError::analysis("y"), PartialAnalysis::default());

        let stats = handler.stats();
        assert_eq!(stats.total_fallbacks, 3);
        assert_eq!(stats.successful_recoveries, 2);
        assert_eq!(stats.partial_recoveries, 1);
        assert_eq!(stats.keyword_recoveries, 1);
        assert_eq!(stats.neutral_fallbacks, 1);
        assert_eq!(stats.error_counts.get("storage"), Some(&2));
        assert_eq!(stats.error_counts.get("analysis"), Some(&1));

        handler.reset_stats();
        assert_eq!(handler.stats().total_fallbacks, 0);
        assert!(handler.stats().error_counts.is_empty());
    }
}
