//! Per-session detection of degenerate conversation loops.
//!
//! Tracks three independent signals per session: consecutive farewells,
//! exact-phrase repetition inside a five-turn window, and consecutive
//! negative-sentiment turns. Crossing a threshold proposes a corrective
//! intervention and an affection recovery amount; the circuit breaker
//! turns that proposal into an actual score/delta correction.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde::Serialize;
use tracing::info;

const PHRASE_WINDOW: usize = 5;
const NEGATIVE_SCORE_CUTOFF: f32 = -0.3;

/// Corrective action proposed when a loop is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intervention {
    /// Stop treating the repeated goodbye as a real attempt to leave.
    ResetFarewellContext,
    /// Steer the conversation onto a fresh topic.
    IntroduceTopicChange,
    /// Respond more positively than the inputs suggest.
    ApplySentimentSmoothing,
}

impl Intervention {
    /// Snake-case form used in the LLM context bag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intervention::ResetFarewellContext => "reset_farewell_context",
            Intervention::IntroduceTopicChange => "introduce_topic_change",
            Intervention::ApplySentimentSmoothing => "apply_sentiment_smoothing",
        }
    }
}

/// Loop reading for one observed turn.
#[derive(Debug, Clone, Serialize)]
pub struct LoopAssessment {
    /// Whether any loop threshold was crossed.
    pub detected: bool,
    /// Severity of the loop in [0, 1].
    pub severity: f32,
    /// Labels of the loop patterns that fired this turn.
    pub patterns: Vec<&'static str>,
    /// How many turns the strongest signal has lasted.
    pub duration: u32,
    /// Proposed corrective action.
    pub intervention: Option<Intervention>,
    /// Affection recovery the circuit breaker may apply.
    pub recovery: i32,
}

impl LoopAssessment {
    fn none() -> Self {
        Self {
            detected: false,
            severity: 0.0,
            patterns: Vec::new(),
            duration: 0,
            intervention: None,
            recovery: 0,
        }
    }

    /// Applies the proposed recovery to a score/delta pair.
    ///
    /// Severe loops force the score near neutral and apply the full
    /// recovery; milder ones apply half. No-op when nothing was detected.
    pub fn apply_circuit_breaker(&self, score: f32, delta: i32) -> (f32, i32) {
        if !self.detected {
            return (score, delta);
        }
        if self.severity > 0.7 {
            ((score + 0.4).max(-0.1), (delta + self.recovery).max(-1))
        } else {
            ((score + 0.2).max(-0.2), (delta + self.recovery / 2).max(-2))
        }
    }
}

#[derive(Debug, Default)]
struct LoopState {
    farewell_count: u32,
    negative_turns: u32,
    recent_phrases: VecDeque<String>,
}

/// Watches each session's turns for degenerate repetition.
#[derive(Debug, Default)]
pub struct SentimentLoopDetector {
    sessions: Mutex<HashMap<String, LoopState>>,
}

impl SentimentLoopDetector {
    /// Creates a detector with no session history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one turn for a session and reports any loop it completes.
    ///
    /// `score` is the pre-override sentiment score; a non-matching turn
    /// resets the corresponding counter. Later checks overwrite severity,
    /// duration, intervention, and recovery; pattern labels accumulate.
    pub fn observe(
        &self,
        session_id: &str,
        text: &str,
        is_farewell: bool,
        score: f32,
    ) -> LoopAssessment {
        let mut sessions = self.sessions.lock().unwrap();
        let state = sessions.entry(session_id.to_string()).or_default();
        let mut assessment = LoopAssessment::none();

        if is_farewell {
            state.farewell_count += 1;
            if state.farewell_count >= 2 {
                assessment.detected = true;
                assessment.severity = 0.7;
                assessment.patterns.push("repeated_farewell");
                assessment.duration = state.farewell_count;
                assessment.intervention = Some(Intervention::ResetFarewellContext);
                assessment.recovery = 5;
                info!(
                    session_id,
                    count = state.farewell_count,
                    "farewell loop detected"
                );
            }
        } else {
            state.farewell_count = 0;
        }

        let normalized = text.trim().to_lowercase();
        let repeats = 1 + state
            .recent_phrases
            .iter()
            .filter(|phrase| **phrase == normalized)
            .count() as u32;
        if repeats >= 3 {
            assessment.detected = true;
            assessment.severity = 0.8;
            assessment.patterns.push("repeated_phrase");
            assessment.duration = repeats;
            assessment.intervention = Some(Intervention::IntroduceTopicChange);
            assessment.recovery = 8;
            info!(
                session_id,
                phrase = %normalized,
                count = repeats,
                "phrase repetition loop detected"
            );
        }

        if score < NEGATIVE_SCORE_CUTOFF {
            state.negative_turns += 1;
            if state.negative_turns >= 3 {
                assessment.detected = true;
                assessment.severity = 0.6;
                assessment.patterns.push("negative_sentiment_pattern");
                assessment.duration = state.negative_turns;
                assessment.intervention = Some(Intervention::ApplySentimentSmoothing);
                assessment.recovery = 3 * state.negative_turns as i32;
                info!(
                    session_id,
                    turns = state.negative_turns,
                    "negative sentiment loop detected"
                );
            }
        } else {
            state.negative_turns = 0;
        }

        state.recent_phrases.push_back(normalized);
        if state.recent_phrases.len() > PHRASE_WINDOW {
            state.recent_phrases.pop_front();
        }

        assessment
    }

    /// Number of sessions with live loop state.
    pub fn tracked_sessions(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_farewell_triggers_the_loop() {
        let detector = SentimentLoopDetector::new();
        let first = detector.observe("s", "じゃあな", true, 0.0);
        assert!(!first.detected);

        let second = detector.observe("s", "じゃあな", true, 0.0);
        assert!(second.detected);
        assert!((second.severity - 0.7).abs() < 1e-6);
        assert_eq!(second.intervention, Some(Intervention::ResetFarewellContext));
        assert_eq!(second.recovery, 5);
        assert_eq!(second.duration, 2);
    }

    #[test]
    fn non_farewell_turn_resets_the_farewell_count() {
        let detector = SentimentLoopDetector::new();
        detector.observe("s", "じゃあな", true, 0.0);
        detector.observe("s", "ラーメンの話しよう", false, 0.2);
        let third = detector.observe("s", "じゃあな", true, 0.0);
        assert!(!third.detected);
    }

    #[test]
    fn third_identical_phrase_triggers_the_loop() {
        let detector = SentimentLoopDetector::new();
        detector.observe("s", "same thing", false, 0.0);
        detector.observe("s", "  Same Thing  ", false, 0.0);
        let third = detector.observe("s", "SAME THING", false, 0.0);
        assert!(third.detected);
        assert!((third.severity - 0.8).abs() < 1e-6);
        assert_eq!(third.intervention, Some(Intervention::IntroduceTopicChange));
        assert_eq!(third.recovery, 8);
        assert_eq!(third.duration, 3);
    }

    #[test]
    fn phrase_window_forgets_old_repeats() {
        let detector = SentimentLoopDetector::new();
        detector.observe("s", "hello", false, 0.0);
        detector.observe("s", "hello", false, 0.0);
        for filler in ["a", "b", "c", "d", "e"] {
            detector.observe("s", filler, false, 0.0);
        }
        // Both earlier copies have left the five-turn window.
        let again = detector.observe("s", "hello", false, 0.0);
        assert!(!again.detected);
    }

    #[test]
    fn three_negative_turns_trigger_scaled_recovery() {
        let detector = SentimentLoopDetector::new();
        detector.observe("s", "嫌いだ", false, -0.5);
        detector.observe("s", "うんざりする", false, -0.4);
        let third = detector.observe("s", "もう最悪", false, -0.6);
        assert!(third.detected);
        assert!((third.severity - 0.6).abs() < 1e-6);
        assert_eq!(third.intervention, Some(Intervention::ApplySentimentSmoothing));
        assert_eq!(third.recovery, 9);

        detector.observe("s", "ごめん、言いすぎた", false, 0.3);
        let reset = detector.observe("s", "やっぱり無理", false, -0.5);
        assert!(!reset.detected);
    }

    #[test]
    fn repeated_farewell_phrase_reports_both_patterns() {
        let detector = SentimentLoopDetector::new();
        detector.observe("s", "じゃあな！", true, 0.0);
        detector.observe("s", "じゃあな！", true, 0.0);
        let third = detector.observe("s", "じゃあな！", true, 0.0);
        assert!(third.patterns.contains(&"repeated_farewell"));
        assert!(third.patterns.contains(&"repeated_phrase"));
        // The phrase check runs later and overwrites severity and recovery.
        assert!((third.severity - 0.8).abs() < 1e-6);
        assert_eq!(third.recovery, 8);
    }

    #[test]
    fn sessions_are_tracked_independently() {
        let detector = SentimentLoopDetector::new();
        detector.observe("a", "bye", true, 0.0);
        let other = detector.observe("b", "bye", true, 0.0);
        assert!(!other.detected);
        assert_eq!(detector.tracked_sessions(), 2);
    }

    #[test]
    fn circuit_breaker_bounds_hold() {
        let severe = LoopAssessment {
            detected: true,
            severity: 0.8,
            patterns: vec!["repeated_phrase"],
            duration: 3,
            intervention: Some(Intervention::IntroduceTopicChange),
            recovery: 8,
        };
        let (score, delta) = severe.apply_circuit_breaker(0.0, 0);
        assert!((score - 0.4).abs() < 1e-6);
        assert_eq!(delta, 8);

        let moderate = LoopAssessment {
            detected: true,
            severity: 0.7,
            patterns: vec!["repeated_farewell"],
            duration: 2,
            intervention: Some(Intervention::ResetFarewellContext),
            recovery: 5,
        };
        let (score, delta) = moderate.apply_circuit_breaker(-0.5, -6);
        assert!((score - (-0.2)).abs() < 1e-6);
        assert_eq!(delta, -2);

        let quiet = LoopAssessment::none();
        assert_eq!(quiet.apply_circuit_breaker(-0.5, -6), (-0.5, -6));
    }
}
