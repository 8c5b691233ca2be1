//! Multi-turn history types: turn records, recognized patterns, shifts

use crate::types::Emotion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One prior turn as supplied by the caller
///
/// This is the only shape history consumers rely on; callers may persist it
/// or rebuild it from their own logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    /// The user's text for that turn
    pub text: String,
    /// Sentiment score the pipeline produced for that turn
    pub sentiment_score: f32,
    /// Dominant emotion for that turn
    pub dominant_emotion: Emotion,
    /// Emotion confidence for that turn
    pub emotion_confidence: f32,
    /// Affection delta applied for that turn
    pub affection_delta: i32,
    /// Topics detected that turn, if any
    #[serde(default)]
    pub topics: Vec<String>,
    /// Whether the turn was flagged as sarcastic
    #[serde(default)]
    pub sarcastic: bool,
    /// When the turn happened
    pub timestamp: DateTime<Utc>,
}

impl TurnRecord {
    /// Minimal record carrying only a score and emotion, for tests and
    /// callers without full metadata
    pub fn simple(text: impl Into<String>, score: f32, emotion: Emotion) -> Self {
        Self {
            text: text.into(),
            sentiment_score: score,
            dominant_emotion: emotion,
            emotion_confidence: 0.5,
            affection_delta: 0,
            topics: Vec::new(),
            sarcastic: false,
            timestamp: Utc::now(),
        }
    }
}

/// Shape of sentiment over the recent turn window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Stable sentiment with little movement
    Consistent,
    /// Intensity rising over the window
    Escalating,
    /// Intensity falling over the window
    DeEscalating,
    /// No stable direction
    Fluctuating,
    /// Fewer turns than the minimum window
    InsufficientData,
}

impl PatternType {
    /// Multiplier applied when computing the strengthening factor.
    /// De-escalation strengthens least to avoid amplifying a cooldown.
    pub fn strengthening_multiplier(&self) -> f32 {
        match self {
            PatternType::Consistent => 1.0,
            PatternType::Escalating => 0.9,
            PatternType::DeEscalating => 0.7,
            PatternType::Fluctuating | PatternType::InsufficientData => 0.0,
        }
    }
}

/// Recognized multi-turn sentiment pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationPattern {
    /// Pattern classification
    pub pattern_type: PatternType,
    /// Turns covered, capped at 10
    pub duration: usize,
    /// Most frequent emotion in the window
    pub dominant_emotion: Emotion,
    /// Other emotions seen, by frequency
    pub secondary_emotions: Vec<Emotion>,
    /// Slope of |score| over the window, normalized to [-1, 1]
    pub intensity_trend: f32,
    /// Combined score/emotion stability in [0, 1]
    pub stability: f32,
    /// Confidence in the classification, in [0, 1]
    pub confidence: f32,
    /// Amplification applied to aligned sentiment, in [0, 0.5]
    pub strengthening_factor: f32,
}

impl ConversationPattern {
    /// Pattern returned when fewer than the minimum turns are available
    pub fn insufficient_data() -> Self {
        Self {
            pattern_type: PatternType::InsufficientData,
            duration: 0,
            dominant_emotion: Emotion::Neutral,
            secondary_emotions: Vec::new(),
            intensity_trend: 0.0,
            stability: 1.0,
            confidence: 0.0,
            strengthening_factor: 0.0,
        }
    }
}

/// Magnitude bucket for a single-turn sentiment shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    /// Magnitude in [0.2, 0.3)
    Mild,
    /// Magnitude in [0.3, 0.4)
    Moderate,
    /// Magnitude in [0.4, 0.6)
    Significant,
    /// Magnitude ≥ 0.6
    Dramatic,
}

impl ShiftType {
    /// Base smoothing factor for this bucket
    pub fn base_smoothing_factor(&self) -> f32 {
        match self {
            ShiftType::Mild => 0.2,
            ShiftType::Moderate => 0.4,
            ShiftType::Significant => 0.6,
            ShiftType::Dramatic => 0.8,
        }
    }
}

/// Detected change between the current turn and the previous one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentShift {
    /// Whether any shift was detected
    pub detected: bool,
    /// max(|Δscore|, emotion-change bonus)
    pub magnitude: f32,
    /// Magnitude bucket, when detected
    pub shift_type: Option<ShiftType>,
    /// Previous turn's dominant emotion
    pub previous_emotion: Emotion,
    /// Current turn's dominant emotion
    pub current_emotion: Emotion,
    /// Magnitude crossed the dramatic threshold
    pub is_dramatic: bool,
    /// Whether smoothing was applied to the current values
    pub smoothing_applied: bool,
    /// Blend factor used when smoothing was applied
    pub smoothing_factor: f32,
}

impl SentimentShift {
    /// A no-shift result
    pub fn none(previous: Emotion, current: Emotion) -> Self {
        Self {
            detected: false,
            magnitude: 0.0,
            shift_type: None,
            previous_emotion: previous,
            current_emotion: current,
            is_dramatic: false,
            smoothing_applied: false,
            smoothing_factor: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_pattern() {
        let pattern = ConversationPattern::insufficient_data();
        assert_eq!(pattern.pattern_type, PatternType::InsufficientData);
        assert_eq!(pattern.stability, 1.0);
        assert_eq!(pattern.strengthening_factor, 0.0);
    }

    #[test]
    fn test_strengthening_multipliers() {
        assert_eq!(PatternType::Consistent.strengthening_multiplier(), 1.0);
        assert_eq!(PatternType::Escalating.strengthening_multiplier(), 0.9);
        assert_eq!(PatternType::DeEscalating.strengthening_multiplier(), 0.7);
        assert_eq!(PatternType::Fluctuating.strengthening_multiplier(), 0.0);
    }

    #[test]
    fn test_shift_bucket_factors() {
        assert_eq!(ShiftType::Mild.base_smoothing_factor(), 0.2);
        assert_eq!(ShiftType::Dramatic.base_smoothing_factor(), 0.8);
    }
}
