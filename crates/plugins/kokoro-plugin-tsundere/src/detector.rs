//! Persona-aware reinterpretation of a single utterance.

use serde::Serialize;

use crate::patterns::{
    CulturalRegister, FarewellKind, FarewellTone, COMPILED_FAREWELLS, COMPILED_OVERRIDES,
    FAREWELL_PHRASES, INTERJECTIONS, SPEECH_PATTERNS,
};

/// Farewell classification pulled out of the fixed vocabulary.
#[derive(Debug, Clone, Serialize)]
pub struct FarewellAssessment {
    /// Shape of the goodbye.
    pub kind: FarewellKind,
    /// Language register of the matched phrase.
    pub register: CulturalRegister,
    /// Whether the phrase is typical for the persona's own voice.
    pub character_typical: bool,
    /// Whether the phrase signals the conversation is over.
    pub conversation_ending: bool,
    /// Baseline tone of the phrase.
    pub tone: FarewellTone,
    /// Exact table entry that matched; `None` when only the looser
    /// farewell shapes matched.
    pub matched_phrase: Option<&'static str>,
}

/// What the persona layer concluded about one utterance.
#[derive(Debug, Clone, Serialize)]
pub struct TsundereAssessment {
    /// Whether the wording reads as persona-typical contradiction.
    pub is_tsundere: bool,
    /// Confidence of the reinterpretation, capped at 0.9.
    pub confidence: f32,
    /// Labels of every matched pattern, in scan order.
    pub detected_patterns: Vec<String>,
    /// Average weight of matched speech habits, 0 when none matched.
    pub speech_consistency: f32,
    /// How the wording should be read.
    pub interpretation: &'static str,
    /// Affection nudge the reinterpretation carries.
    pub affection_nudge: i32,
    /// Sentiment score nudge the reinterpretation carries.
    pub score_nudge: f32,
    /// Farewell classification, when the utterance is a goodbye.
    pub farewell: Option<FarewellAssessment>,
}

/// Matches utterances against the persona tables.
///
/// The detector is stateless; loop tracking lives in
/// [`SentimentLoopDetector`](crate::SentimentLoopDetector).
#[derive(Debug, Default, Clone)]
pub struct TsundereDetector;

impl TsundereDetector {
    /// Creates a detector over the built-in persona tables.
    pub fn new() -> Self {
        Self
    }

    /// Classifies the utterance as a farewell, if it is one.
    ///
    /// The exact-phrase table wins over the looser regex shapes; a
    /// regex-only hit is treated as a character-typical casual goodbye.
    pub fn classify_farewell(&self, text: &str) -> Option<FarewellAssessment> {
        let lowered = text.to_lowercase();
        for entry in FAREWELL_PHRASES {
            if lowered.contains(entry.phrase) {
                return Some(FarewellAssessment {
                    kind: entry.kind,
                    register: entry.register,
                    character_typical: entry.character_typical,
                    conversation_ending: entry.conversation_ending,
                    tone: entry.tone,
                    matched_phrase: Some(entry.phrase),
                });
            }
        }
        if COMPILED_FAREWELLS.iter().any(|re| re.is_match(text)) {
            return Some(FarewellAssessment {
                kind: FarewellKind::Casual,
                register: CulturalRegister::Japanese,
                character_typical: true,
                conversation_ending: true,
                tone: FarewellTone::Neutral,
                matched_phrase: None,
            });
        }
        None
    }

    /// Runs the full persona reading over one utterance.
    ///
    /// Farewells short-circuit pattern matching; otherwise the
    /// contradiction families, speech habits, and habitual interjections
    /// are consulted in that order, with interjections overriding
    /// whatever the earlier stages earned.
    pub fn detect(&self, text: &str) -> TsundereAssessment {
        if let Some(farewell) = self.classify_farewell(text) {
            return assess_farewell(text, farewell);
        }

        let mut is_tsundere = false;
        let mut confidence = 0.0f32;
        let mut detected_patterns: Vec<String> = Vec::new();
        let mut consistency = 0.0f32;
        let mut interpretation = "neutral";
        let mut affection_nudge = 0i32;
        let mut score_nudge = 0.0f32;

        for (pattern, regex) in COMPILED_OVERRIDES.iter() {
            if regex.is_match(text) {
                is_tsundere = true;
                confidence += 0.2;
                detected_patterns.push(format!("tsundere:{}", pattern.family));
                affection_nudge += pattern.affection_nudge;
                score_nudge += pattern.score_nudge;
                interpretation = pattern.interpretation;
            }
        }

        let mut speech_hits = 0u32;
        for (phrase, weight) in SPEECH_PATTERNS {
            if text.contains(phrase) {
                speech_hits += 1;
                consistency += weight;
                detected_patterns.push(format!("speech_pattern:{phrase}"));
            }
        }
        if speech_hits > 0 {
            consistency /= speech_hits as f32;
        }

        confidence = confidence.min(0.9);

        // A strongly in-voice message counts even without an explicit
        // contradiction pattern.
        if consistency > 0.7 && !is_tsundere {
            is_tsundere = true;
            confidence = 0.6;
            interpretation = "character_consistent_expression";
            affection_nudge = 1;
            score_nudge = 0.1;
        }

        // Habitual interjections override whatever the wording earned:
        // the affection penalty is neutralized, the score drifts up.
        for interjection in INTERJECTIONS {
            if interjection.variants.iter().any(|v| text.contains(v)) {
                is_tsundere = true;
                confidence = 0.7;
                detected_patterns.push(format!("common_phrase:{}", interjection.label));
                consistency = 0.8;
                interpretation = "character_consistent_expression";
                affection_nudge = 0;
                score_nudge = 0.3;
            }
        }

        TsundereAssessment {
            is_tsundere,
            confidence,
            detected_patterns,
            speech_consistency: consistency,
            interpretation,
            affection_nudge,
            score_nudge,
            farewell: None,
        }
    }
}

fn assess_farewell(text: &str, farewell: FarewellAssessment) -> TsundereAssessment {
    if !farewell.character_typical {
        return TsundereAssessment {
            is_tsundere: false,
            confidence: 0.0,
            detected_patterns: Vec::new(),
            speech_consistency: 0.0,
            interpretation: "neutral",
            affection_nudge: 0,
            score_nudge: 0.0,
            farewell: Some(farewell),
        };
    }

    let mut detected_patterns = vec![format!("farewell:{}", farewell.kind.as_str())];
    let mut consistency = 0.0f32;
    let mut interpretation = "neutral";

    // The signature brush-off goodbye doubles as a voice marker.
    if ["じゃあな", "じゃーな", "じゃな"].iter().any(|v| text.contains(v)) {
        detected_patterns.push("tsundere_farewell:じゃあな".to_string());
        consistency = 0.9;
        interpretation = "casual_farewell";
    }

    // Exact table hits shift harder toward neutral than loose shapes.
    let score_nudge = if farewell.matched_phrase.is_some() { 0.5 } else { 0.3 };

    TsundereAssessment {
        is_tsundere: true,
        confidence: 0.8,
        detected_patterns,
        speech_consistency: consistency,
        interpretation,
        affection_nudge: 0,
        score_nudge,
        farewell: Some(farewell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> TsundereAssessment {
        TsundereDetector::new().detect(text)
    }

    #[test]
    fn dismissive_denial_reads_as_positive() {
        let assessment = detect("別にあんたのことが好きなわけじゃない");
        assert!(assessment.is_tsundere);
        assert!((assessment.confidence - 0.2).abs() < 1e-6);
        assert_eq!(assessment.interpretation, "positive_despite_wording");
        assert_eq!(assessment.affection_nudge, 2);
        assert!((assessment.score_nudge - 0.3).abs() < 1e-6);
        assert!(assessment
            .detected_patterns
            .iter()
            .any(|p| p == "tsundere:dismissive_affection"));
        assert!(assessment.farewell.is_none());
    }

    #[test]
    fn reluctant_gratitude_carries_the_largest_nudge() {
        let assessment = detect("別に、ありがとね");
        assert_eq!(assessment.interpretation, "grateful_despite_reluctance");
        assert_eq!(assessment.affection_nudge, 3);
        assert!((assessment.score_nudge - 0.4).abs() < 1e-6);
    }

    #[test]
    fn interjection_neutralizes_the_insult_families() {
        let assessment = detect("バカかよ、でも大好きだ");
        // insult_affection matched first, then the バカ interjection
        // overrode its nudges.
        assert!(assessment
            .detected_patterns
            .iter()
            .any(|p| p == "tsundere:insult_affection"));
        assert!(assessment.detected_patterns.iter().any(|p| p == "common_phrase:バカ"));
        assert!((assessment.confidence - 0.7).abs() < 1e-6);
        assert_eq!(assessment.interpretation, "character_consistent_expression");
        assert_eq!(assessment.affection_nudge, 0);
        assert!((assessment.score_nudge - 0.3).abs() < 1e-6);
        assert!((assessment.speech_consistency - 0.8).abs() < 1e-6);
    }

    #[test]
    fn signature_farewell_is_confident_and_harmless() {
        let assessment = detect("じゃあな！");
        assert!(assessment.is_tsundere);
        assert!((assessment.confidence - 0.8).abs() < 1e-6);
        assert_eq!(assessment.affection_nudge, 0);
        assert!((assessment.score_nudge - 0.5).abs() < 1e-6);
        assert_eq!(assessment.interpretation, "casual_farewell");
        assert!((assessment.speech_consistency - 0.9).abs() < 1e-6);
        let farewell = assessment.farewell.expect("farewell classification");
        assert_eq!(farewell.kind, FarewellKind::Casual);
        assert!(farewell.character_typical);
        assert!(farewell.conversation_ending);
    }

    #[test]
    fn friendly_farewell_is_not_a_persona_expression() {
        let assessment = detect("またね！");
        assert!(!assessment.is_tsundere);
        assert!(assessment.confidence.abs() < 1e-6);
        assert!(assessment.detected_patterns.is_empty());
        assert!(assessment.farewell.is_some());
    }

    #[test]
    fn shape_only_farewell_gets_the_smaller_shift() {
        let assessment = detect("また明日");
        let farewell = assessment.farewell.expect("farewell classification");
        assert!(farewell.matched_phrase.is_none());
        assert!(farewell.character_typical);
        assert!((assessment.score_nudge - 0.3).abs() < 1e-6);
        assert!((assessment.confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn in_voice_message_counts_without_an_explicit_pattern() {
        let assessment = detect("ふん、知らねーよ");
        assert!(assessment.is_tsundere);
        assert!((assessment.confidence - 0.6).abs() < 1e-6);
        assert!((assessment.speech_consistency - 0.75).abs() < 1e-6);
        assert_eq!(assessment.interpretation, "character_consistent_expression");
        assert_eq!(assessment.affection_nudge, 1);
        assert!((assessment.score_nudge - 0.1).abs() < 1e-6);
    }

    #[test]
    fn plain_text_stays_untouched() {
        let assessment = detect("今日は天気がいいね");
        assert!(!assessment.is_tsundere);
        assert!(assessment.confidence.abs() < 1e-6);
        assert_eq!(assessment.affection_nudge, 0);
        assert!(assessment.score_nudge.abs() < 1e-6);
        assert!(assessment.farewell.is_none());
    }
}
