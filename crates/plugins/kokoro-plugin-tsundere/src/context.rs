//! Structured persona guidance for the response generator.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::detector::TsundereAssessment;
use crate::loops::{Intervention, LoopAssessment};
use crate::patterns::{CulturalRegister, FarewellKind};

/// Context bag handed to the prompt builder alongside the turn result.
///
/// [`to_context_map`](LlmContext::to_context_map) renders the JSON shape
/// downstream consumers key on; optional sections are omitted entirely
/// rather than serialized as null.
#[derive(Debug, Clone, Serialize)]
pub struct LlmContext {
    /// Whether the utterance reads as persona-typical contradiction.
    pub tsundere_detected: bool,
    /// Confidence of the reinterpretation.
    pub tsundere_confidence: f32,
    /// Voice-consistency score.
    pub character_consistency: f32,
    /// How the wording should be read.
    pub suggested_interpretation: &'static str,
    /// Labels of every matched pattern.
    pub detected_patterns: Vec<String>,
    /// Whether the utterance is a farewell.
    pub is_farewell: bool,
    /// Shape of the farewell, when one matched.
    pub farewell_type: Option<FarewellKind>,
    /// Language register of the farewell, when one matched.
    pub cultural_context: Option<CulturalRegister>,
    /// Whether the conversation appears to be ending.
    pub is_conversation_ending: bool,
    /// How to respond to the farewell.
    pub farewell_guidance: Option<&'static str>,
    /// Whether sexual content was tagged this turn.
    pub sexual_content_detected: bool,
    /// Rejection severity for the tagged content, 0 to 3.
    pub sexual_content_severity: u8,
    /// How to reject the content at this severity.
    pub sexual_content_guidance: Option<&'static str>,
    /// Whether a degenerate loop completed this turn.
    pub sentiment_loop_detected: bool,
    /// Severity of the detected loop.
    pub loop_severity: f32,
    /// Labels of the loop patterns that fired.
    pub loop_patterns: Vec<&'static str>,
    /// Proposed corrective action.
    pub suggested_intervention: Option<Intervention>,
    /// How to break the loop.
    pub loop_guidance: Option<&'static str>,
}

impl LlmContext {
    /// Builds the bag from the turn's assessments.
    pub fn assemble(
        assessment: &TsundereAssessment,
        loop_assessment: Option<&LoopAssessment>,
        sexual_severity: Option<u8>,
    ) -> Self {
        let farewell = assessment.farewell.as_ref();
        let detected_loop = loop_assessment.filter(|l| l.detected);
        Self {
            tsundere_detected: assessment.is_tsundere,
            tsundere_confidence: assessment.confidence,
            character_consistency: assessment.speech_consistency,
            suggested_interpretation: assessment.interpretation,
            detected_patterns: assessment.detected_patterns.clone(),
            is_farewell: farewell.is_some(),
            farewell_type: farewell.map(|f| f.kind),
            cultural_context: farewell.map(|f| f.register),
            is_conversation_ending: farewell.map_or(false, |f| f.conversation_ending),
            farewell_guidance: farewell
                .and_then(|f| farewell_guidance(f.kind, assessment.is_tsundere)),
            sexual_content_detected: sexual_severity.is_some(),
            sexual_content_severity: sexual_severity.unwrap_or(0),
            sexual_content_guidance: sexual_severity.map(sexual_guidance),
            sentiment_loop_detected: detected_loop.is_some(),
            loop_severity: detected_loop.map_or(0.0, |l| l.severity),
            loop_patterns: detected_loop.map(|l| l.patterns.clone()).unwrap_or_default(),
            suggested_intervention: detected_loop.and_then(|l| l.intervention),
            loop_guidance: detected_loop.and_then(|l| loop_guidance(&l.patterns)),
        }
    }

    /// Renders the contract keys as a JSON object.
    pub fn to_context_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("tsundere_detected".into(), json!(self.tsundere_detected));
        map.insert("tsundere_confidence".into(), json!(self.tsundere_confidence));
        map.insert(
            "character_consistency".into(),
            json!(self.character_consistency),
        );
        map.insert(
            "suggested_interpretation".into(),
            json!(self.suggested_interpretation),
        );
        map.insert("is_farewell".into(), json!(self.is_farewell));
        map.insert(
            "is_conversation_ending".into(),
            json!(self.is_conversation_ending),
        );
        if !self.detected_patterns.is_empty() {
            map.insert("detected_patterns".into(), json!(self.detected_patterns));
        }
        if self.sexual_content_detected {
            map.insert("sexual_content_detected".into(), json!(true));
            map.insert(
                "sexual_content_severity".into(),
                json!(self.sexual_content_severity),
            );
            if let Some(guidance) = self.sexual_content_guidance {
                map.insert("sexual_content_guidance".into(), json!(guidance));
            }
        }
        if self.is_farewell {
            if let Some(kind) = self.farewell_type {
                map.insert("farewell_type".into(), json!(kind.as_str()));
            }
            if let Some(register) = self.cultural_context {
                map.insert("cultural_context".into(), json!(register.as_str()));
            }
            if let Some(guidance) = self.farewell_guidance {
                map.insert("farewell_guidance".into(), json!(guidance));
            }
        }
        if self.sentiment_loop_detected {
            map.insert("sentiment_loop_detected".into(), json!(true));
            map.insert("loop_severity".into(), json!(self.loop_severity));
            map.insert("loop_patterns".into(), json!(self.loop_patterns));
            if let Some(intervention) = self.suggested_intervention {
                map.insert(
                    "suggested_intervention".into(),
                    json!(intervention.as_str()),
                );
            }
            if let Some(guidance) = self.loop_guidance {
                map.insert("loop_guidance".into(), json!(guidance));
            }
        }
        map
    }
}

fn sexual_guidance(severity: u8) -> &'static str {
    match severity {
        s if s >= 3 => {
            "Extremely strong rejection of sexual content is required. \
             Character should show disgust, anger, and strong negative emotions. \
             This is a serious violation of character boundaries."
        }
        2 => {
            "Strong rejection of sexual content is required. \
             Character should show clear discomfort and rejection. \
             This is inappropriate for the current relationship level."
        }
        1 => {
            "Moderate rejection of sexual content is required. \
             Character should show discomfort but less severe reaction. \
             This is pushing boundaries but not a complete violation."
        }
        _ => {
            "Mild discomfort with sexual content should be shown. \
             Character may be embarrassed but not completely rejecting. \
             This is acceptable but still somewhat uncomfortable."
        }
    }
}

fn farewell_guidance(kind: FarewellKind, character_typical: bool) -> Option<&'static str> {
    match kind {
        FarewellKind::Casual if character_typical => Some(
            "This is a casual tsundere-style farewell phrase. \
             It should be interpreted as a normal goodbye rather than hostility.",
        ),
        FarewellKind::Casual => None,
        FarewellKind::Formal => {
            Some("This is a formal farewell phrase indicating the end of a conversation.")
        }
        FarewellKind::Action => {
            Some("This indicates the character is leaving or ending the conversation.")
        }
    }
}

fn loop_guidance(patterns: &[&'static str]) -> Option<&'static str> {
    if patterns.contains(&"repeated_farewell") {
        Some(
            "The conversation appears to be stuck in a farewell loop. \
             Consider acknowledging the farewell but changing the subject to continue the conversation.",
        )
    } else if patterns.contains(&"repeated_phrase") {
        Some(
            "The same phrase is being repeated multiple times. \
             Consider introducing a new topic or asking a question to break the loop.",
        )
    } else if patterns.contains(&"negative_sentiment_pattern") {
        Some(
            "The conversation is stuck in a negative sentiment pattern. \
             Consider shifting to a more positive or neutral topic.",
        )
    } else {
        None
    }
}
