//! Emotional intensity detection.
//!
//! Measures how strongly a message expresses whatever it expresses, from
//! modifier words (intensifiers and qualifiers), emotion-bearing vocabulary,
//! and typographic cues like repeated punctuation or ALL CAPS.

use tracing::trace;

use crate::lexicon;
use crate::types::{IntensityAnalysis, IntensityCategory};

/// Detects the emotional intensity of a message.
#[derive(Debug, Default, Clone)]
pub struct IntensityDetector;

impl IntensityDetector {
    /// Creates a new detector.
    pub fn new() -> Self {
        Self
    }

    /// Analyzes a message for emotional intensity.
    ///
    /// Modifier words multiply the base intensity drawn from emotion
    /// vocabulary; typographic patterns add on top. The result is always
    /// in `[0.0, 1.0]`.
    pub fn detect(&self, text: &str) -> IntensityAnalysis {
        let normalized = text.to_lowercase();

        let (intensifiers, intensifier_score) = identify_intensifiers(&normalized);
        let (qualifiers, qualifier_score) = identify_qualifiers(&normalized);
        let base = base_intensity(&normalized);
        // Pattern matching runs on the original text so ALL CAPS survives.
        let pattern_boost = pattern_intensity(text);

        let score = (base * intensifier_score * qualifier_score + pattern_boost * 0.7)
            .clamp(0.0, 1.0);
        let category = IntensityCategory::from_score(score);
        let confidence = intensity_confidence(
            base,
            intensifiers.len() + qualifiers.len(),
            pattern_boost,
        );

        trace!(score, ?category, confidence, "intensity detected");

        IntensityAnalysis {
            intensity_score: score,
            category,
            intensifiers,
            qualifiers,
            confidence,
        }
    }
}

fn identify_intensifiers(text: &str) -> (Vec<String>, f32) {
    let mut found = Vec::new();
    let mut total = 1.0f32;
    for (word, multiplier) in lexicon::INTENSIFIERS {
        if text.contains(word) {
            found.push((*word).to_string());
            total *= multiplier;
        }
    }
    (found, total.min(2.5))
}

fn identify_qualifiers(text: &str) -> (Vec<String>, f32) {
    let mut found = Vec::new();
    let mut total = 1.0f32;
    for (word, multiplier) in lexicon::QUALIFIERS {
        if text.contains(word) {
            found.push((*word).to_string());
            total *= multiplier;
        }
    }
    (found, total.max(0.3))
}

/// Base intensity blends the strongest indicator with the average of all
/// matched indicators, 70/30. No indicators means a low floor of 0.3.
fn base_intensity(text: &str) -> f32 {
    let mut max = 0.0f32;
    let mut total = 0.0f32;
    let mut count = 0u32;
    for (word, value) in lexicon::EMOTION_INDICATORS {
        if text.contains(word) {
            max = max.max(*value);
            total += value;
            count += 1;
        }
    }
    if count == 0 {
        return 0.3;
    }
    max * 0.7 + (total / count as f32) * 0.3
}

fn pattern_intensity(text: &str) -> f32 {
    let mut boost = 0.0f32;
    for (regex, value) in lexicon::INTENSITY_PATTERNS.iter() {
        let matches = regex.find_iter(text).count();
        if matches > 0 {
            boost += value * (matches.min(3) as f32) / 3.0;
        }
    }
    let repeats = repetition_runs(text);
    if repeats > 0 {
        boost += 0.2 * (repeats.min(3) as f32) / 3.0;
    }
    boost.min(0.5)
}

/// Counts emphasis-by-repetition: runs of three or more identical letters
/// ("nooooo") or the same word repeated three or more times in a row.
fn repetition_runs(text: &str) -> usize {
    let mut runs = 0;
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let mut j = i + 1;
        while j < chars.len() && chars[j] == chars[i] {
            j += 1;
        }
        if j - i >= 3 && chars[i].is_alphanumeric() {
            runs += 1;
        }
        i = j;
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut i = 0;
    while i < words.len() {
        let mut j = i + 1;
        while j < words.len() && words[j].eq_ignore_ascii_case(words[i]) {
            j += 1;
        }
        if j - i >= 3 {
            runs += 1;
        }
        i = j;
    }
    runs
}

fn intensity_confidence(base: f32, modifier_count: usize, pattern_boost: f32) -> f32 {
    let mut confidence = 0.5f32;
    if base > 0.5 {
        confidence += 0.1;
    }
    if modifier_count > 0 {
        confidence += (modifier_count as f32 * 0.05).min(0.2);
    }
    if pattern_boost > 0.0 {
        confidence += (pattern_boost * 0.4).min(0.2);
    }
    confidence.clamp(0.0, 1.0)
}
