//! Single-turn sentiment transition smoothing.
//!
//! A sudden swing against the previous turn is blended back toward it so
//! one outlier message cannot whipsaw the affection level. The blend weight
//! grows with shift magnitude and with how much history backs the previous
//! reading, and is capped so the current turn always retains some weight.

use tracing::debug;

use crate::config::SmootherConfig;
use crate::types::{Emotion, SentimentShift, ShiftType, TurnRecord};

/// Smooths abrupt sentiment transitions between consecutive turns.
#[derive(Debug, Clone)]
pub struct TransitionSmoother {
    config: SmootherConfig,
}

impl Default for TransitionSmoother {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionSmoother {
    /// Creates a smoother with default tunables.
    pub fn new() -> Self {
        Self { config: SmootherConfig::default() }
    }

    /// Creates a smoother with explicit tunables.
    pub fn with_config(config: SmootherConfig) -> Self {
        Self { config }
    }

    /// Measures the shift between the previous turn and the current values.
    pub fn detect_shift(
        &self,
        previous: &TurnRecord,
        current_score: f32,
        current_emotion: Emotion,
    ) -> SentimentShift {
        let score_change = (current_score - previous.sentiment_score).abs();
        let emotion_shift = emotion_shift(previous.dominant_emotion, current_emotion);
        let magnitude = score_change.max(emotion_shift);

        if magnitude <= 0.2 {
            return SentimentShift::none(previous.dominant_emotion, current_emotion);
        }

        let shift_type = if magnitude >= 0.6 {
            ShiftType::Dramatic
        } else if magnitude >= 0.4 {
            ShiftType::Significant
        } else if magnitude >= 0.3 {
            ShiftType::Moderate
        } else {
            ShiftType::Mild
        };

        SentimentShift {
            detected: true,
            magnitude,
            shift_type: Some(shift_type),
            previous_emotion: previous.dominant_emotion,
            current_emotion,
            is_dramatic: magnitude >= self.config.dramatic_shift_threshold,
            smoothing_applied: false,
            smoothing_factor: 0.0,
        }
    }

    /// Blends the current score and delta back toward the previous turn when
    /// a shift is detected. Returns the (possibly smoothed) values with the
    /// shift record.
    pub fn smooth(
        &self,
        previous: &TurnRecord,
        current_score: f32,
        current_delta: i32,
        current_emotion: Emotion,
        history_len: usize,
    ) -> (f32, i32, SentimentShift) {
        let mut shift = self.detect_shift(previous, current_score, current_emotion);
        let Some(shift_type) = shift.shift_type else {
            return (current_score, current_delta, shift);
        };

        let mut factor = shift_type.base_smoothing_factor() * (history_len as f32 / 5.0).min(1.0);
        // A positive-to-negative crash gets extra damping.
        if previous.sentiment_score > 0.0 && current_score < 0.0 {
            factor *= 1.2;
        }
        factor = factor.min(self.config.max_smoothing_factor);

        let smoothed_score = current_score * (1.0 - factor) + previous.sentiment_score * factor;
        let smoothed_delta = (current_delta as f32 * (1.0 - factor)
            + previous.affection_delta as f32 * factor) as i32;

        shift.smoothing_applied = true;
        shift.smoothing_factor = factor;

        debug!(
            magnitude = shift.magnitude,
            factor,
            smoothed_score,
            smoothed_delta,
            "transition smoothed"
        );

        (smoothed_score, smoothed_delta, shift)
    }
}

/// Emotion-change contribution to shift magnitude. Crossing the
/// positive/negative family boundary weighs more than movement within a
/// family.
fn emotion_shift(previous: Emotion, current: Emotion) -> f32 {
    if previous == current {
        0.0
    } else if (previous.is_positive() && current.is_negative())
        || (previous.is_negative() && current.is_positive())
    {
        0.5
    } else {
        0.3
    }
}
