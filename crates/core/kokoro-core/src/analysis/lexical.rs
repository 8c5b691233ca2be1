//! Keyword-weighted sentiment scoring.
//!
//! First stage of the pipeline: scans the message against the weighted
//! lexicon tables and produces a raw score, a provisional affection delta,
//! and the set of sentiment tags the later stages refine.

use tracing::debug;

use crate::lexicon::{self, WeightedLexicon};
use crate::types::{InteractionType, SentimentResult, SentimentTag};

/// Scans messages against the weighted keyword tables.
///
/// Matching is substring containment on the lowercased message, which
/// handles Japanese text without tokenization. Every matching entry
/// contributes its weight once, so nested forms stack (大好き also
/// matches 好き).
#[derive(Debug, Default, Clone)]
pub struct LexicalAnalyzer;

impl LexicalAnalyzer {
    /// Creates a new analyzer.
    pub fn new() -> Self {
        Self
    }

    /// Scores a single message. Empty or whitespace-only input yields the
    /// neutral result with zero confidence.
    pub fn analyze(&self, text: &str) -> SentimentResult {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return SentimentResult::neutral();
        }

        let mut matched = Vec::new();
        let positive = scan(&normalized, lexicon::POSITIVE_KEYWORDS, &mut matched);
        let negative = scan(&normalized, lexicon::NEGATIVE_KEYWORDS, &mut matched);
        let caring = scan(&normalized, lexicon::CARING_KEYWORDS, &mut matched);
        let dismissive = scan(&normalized, lexicon::DISMISSIVE_KEYWORDS, &mut matched);
        let appreciative = scan(&normalized, lexicon::APPRECIATIVE_KEYWORDS, &mut matched);
        let hostile = scan(&normalized, lexicon::HOSTILE_KEYWORDS, &mut matched);
        let interest = scan(&normalized, lexicon::INTEREST_KEYWORDS, &mut matched);
        let sexual_penalty = sexual_content_penalty(&normalized);

        let mut tags = Vec::new();
        if positive > 0 {
            tags.push(SentimentTag::Positive);
        }
        if negative < 0 {
            tags.push(SentimentTag::Negative);
        }
        if caring > 0 {
            tags.push(SentimentTag::Caring);
        }
        if dismissive < 0 {
            tags.push(SentimentTag::Dismissive);
        }
        if appreciative > 0 {
            tags.push(SentimentTag::Appreciative);
        }
        if hostile < 0 {
            tags.push(SentimentTag::Hostile);
        }
        if sexual_penalty < 0 {
            tags.push(SentimentTag::Sexual);
        }
        if interest > 0 {
            tags.push(SentimentTag::Interest);
        }
        if tags.is_empty() {
            tags.push(SentimentTag::Neutral);
        }

        let raw = positive + caring + appreciative + interest + negative + dismissive + hostile
            + sexual_penalty;
        let score = (raw as f32 / 10.0).clamp(-1.0, 1.0);

        // Positive interactions earn affection faster than negative ones
        // lose it, so the persona stays winnable.
        let raw_delta = if raw > 0 {
            ((raw as f32 * 1.5) as i32).clamp(-10, 10)
        } else {
            raw.clamp(-10, 10)
        };

        let interaction_type = resolve_interaction_type(&tags, score);
        let confidence = (matched.len() as f32 * 0.2).min(1.0);

        debug!(
            score,
            raw_delta,
            matches = matched.len(),
            ?interaction_type,
            "lexical analysis complete"
        );

        SentimentResult {
            score,
            interaction_type,
            raw_delta,
            confidence,
            matched_keywords: matched,
            tags,
        }
    }
}

fn scan(text: &str, table: WeightedLexicon, matched: &mut Vec<String>) -> i32 {
    let mut total = 0;
    for (keyword, weight) in table {
        if text.contains(keyword) {
            total += i32::from(*weight);
            matched.push((*keyword).to_string());
        }
    }
    total
}

/// Penalty for sexual content: -3 per distinct matched term plus a length
/// penalty of at least -1 that grows with message size.
fn sexual_content_penalty(text: &str) -> i32 {
    let hits = lexicon::SEXUAL_TERMS.iter().filter(|term| text.contains(*term)).count() as i32;
    if hits == 0 {
        return 0;
    }
    let chars = text.chars().count() as i32;
    let length_penalty = (-((chars + 49) / 50)).min(-1);
    let total = -3 * hits + length_penalty;
    debug!(hits, length_penalty, total, "sexual content detected");
    total
}

fn resolve_interaction_type(tags: &[SentimentTag], score: f32) -> InteractionType {
    let has = |tag| tags.contains(&tag);
    if has(SentimentTag::Sexual) {
        InteractionType::Sexual
    } else if has(SentimentTag::Hostile) {
        InteractionType::Hostile
    } else if has(SentimentTag::Appreciative) {
        InteractionType::Appreciative
    } else if has(SentimentTag::Caring) {
        InteractionType::Caring
    } else if has(SentimentTag::Interest) {
        InteractionType::Interest
    } else if has(SentimentTag::Dismissive) {
        InteractionType::Dismissive
    } else if has(SentimentTag::Positive) {
        InteractionType::Positive
    } else if has(SentimentTag::Negative) {
        InteractionType::Negative
    } else if score > 0.3 {
        InteractionType::Positive
    } else if score < -0.3 {
        InteractionType::Negative
    } else {
        InteractionType::Neutral
    }
}
