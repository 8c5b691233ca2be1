//! Result types produced by the single-turn analysis stages

use crate::types::Emotion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keyword category matched by the lexical stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentTag {
    /// General positive keywords
    Positive,
    /// General negative keywords
    Negative,
    /// Concern or longing directed at the character
    Caring,
    /// Brush-offs and indifference
    Dismissive,
    /// Explicit gratitude or expressions of need
    Appreciative,
    /// Direct verbal hostility
    Hostile,
    /// Sexual content, tracked as a first-class tag for the override layer
    Sexual,
    /// Enthusiasm for the character's favorite topics
    Interest,
    /// No category matched
    Neutral,
}

/// Overall classification of a turn, derived from tags and score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    /// Sexual content present (highest priority)
    Sexual,
    /// Hostile phrasing present
    Hostile,
    /// Gratitude or need expressed
    Appreciative,
    /// Concern for the character expressed
    Caring,
    /// Shared-interest enthusiasm
    Interest,
    /// Dismissive phrasing present
    Dismissive,
    /// Positive keywords or clearly positive score
    Positive,
    /// Negative keywords or clearly negative score
    Negative,
    /// Nothing decisive
    Neutral,
}

impl InteractionType {
    /// Stable lowercase name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Sexual => "sexual",
            InteractionType::Hostile => "hostile",
            InteractionType::Appreciative => "appreciative",
            InteractionType::Caring => "caring",
            InteractionType::Interest => "interest",
            InteractionType::Dismissive => "dismissive",
            InteractionType::Positive => "positive",
            InteractionType::Negative => "negative",
            InteractionType::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable output of the lexical analysis stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Normalized sentiment score in [-1, 1]
    pub score: f32,
    /// Coarse classification of the turn
    pub interaction_type: InteractionType,
    /// Raw proposed affection change in [-10, 10], before adjustment
    pub raw_delta: i32,
    /// Keyword-based confidence in [0, 1]
    pub confidence: f32,
    /// Keywords that matched, in scan order
    pub matched_keywords: Vec<String>,
    /// Every category that contributed at least one match
    pub tags: Vec<SentimentTag>,
}

impl SentimentResult {
    /// Neutral result used for empty input and as the terminal fallback
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            interaction_type: InteractionType::Neutral,
            raw_delta: 0,
            confidence: 0.0,
            matched_keywords: Vec::new(),
            tags: vec![SentimentTag::Neutral],
        }
    }

    /// Whether a given tag was assigned
    pub fn has_tag(&self, tag: SentimentTag) -> bool {
        self.tags.contains(&tag)
    }
}

impl Default for SentimentResult {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Non-literal language classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonLiteralType {
    /// Sarcasm probability crossed the threshold
    Sarcasm,
    /// Irony probability crossed the threshold
    Irony,
    /// Both probabilities crossed the threshold
    Mixed,
}

/// Output of the contextual analysis stage for a single utterance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextualAnalysis {
    /// Highest-weighted emotion after normalization
    pub dominant_emotion: Emotion,
    /// Weight of the dominant emotion in [0, 1]
    pub emotion_confidence: f32,
    /// Full normalized emotion vector (weights sum to 1)
    pub emotion_scores: HashMap<Emotion, f32>,
    /// Intensity modifier words found in the text
    pub modifiers: Vec<String>,
    /// Topics detected from the fixed topic table
    pub topics: Vec<String>,
    /// Per-topic sentiment weight (topic name → emotion confidence)
    pub topic_sentiments: HashMap<String, f32>,
    /// Probability the utterance is sarcastic, in [0, 1]
    pub sarcasm_probability: f32,
    /// Probability the utterance is ironic, in [0, 1]
    pub irony_probability: f32,
    /// Classification when either probability crosses 0.5
    pub non_literal_type: Option<NonLiteralType>,
    /// How mixed/uncertain the non-literal reading is, in [0, 1]
    pub ambiguity: f32,
}

impl Default for ContextualAnalysis {
    fn default() -> Self {
        Self {
            dominant_emotion: Emotion::Neutral,
            emotion_confidence: 0.5,
            emotion_scores: HashMap::new(),
            modifiers: Vec::new(),
            topics: Vec::new(),
            topic_sentiments: HashMap::new(),
            sarcasm_probability: 0.0,
            irony_probability: 0.0,
            non_literal_type: None,
            ambiguity: 0.0,
        }
    }
}

/// Strength bucket for emotional intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityCategory {
    /// Intensity ≤ 0.3
    Mild,
    /// Intensity ≤ 0.6
    Moderate,
    /// Intensity ≤ 0.85
    Strong,
    /// Intensity above 0.85
    Extreme,
}

impl IntensityCategory {
    /// Buckets a continuous intensity score
    pub fn from_score(score: f32) -> Self {
        if score <= 0.3 {
            IntensityCategory::Mild
        } else if score <= 0.6 {
            IntensityCategory::Moderate
        } else if score <= 0.85 {
            IntensityCategory::Strong
        } else {
            IntensityCategory::Extreme
        }
    }

    /// Scale factor applied to score and delta for this bucket
    pub fn scale_factor(&self) -> f32 {
        match self {
            IntensityCategory::Mild => 0.7,
            IntensityCategory::Moderate => 1.0,
            IntensityCategory::Strong => 1.5,
            IntensityCategory::Extreme => 2.0,
        }
    }
}

/// Output of the emotion intensity stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntensityAnalysis {
    /// Overall intensity in [0, 1]
    pub intensity_score: f32,
    /// Bucketed category derived from the score
    pub category: IntensityCategory,
    /// Amplifying words found ("very", "とても", ...)
    pub intensifiers: Vec<String>,
    /// Diminishing words found ("slightly", "ちょっと", ...)
    pub qualifiers: Vec<String>,
    /// Confidence in the intensity reading, in [0, 1]
    pub confidence: f32,
}

impl Default for IntensityAnalysis {
    fn default() -> Self {
        Self {
            intensity_score: 0.3,
            category: IntensityCategory::Mild,
            intensifiers: Vec::new(),
            qualifiers: Vec::new(),
            confidence: 0.5,
        }
    }
}

/// Valence grouping for a detected emotional mix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionCategory {
    /// Dominated by positive-family emotions
    Positive,
    /// Dominated by negative-family emotions
    Negative,
    /// No strong valence either way
    Neutral,
    /// Conflicting positive and negative emotions of similar weight
    Ambivalent,
}

/// Output of the mixed-emotion stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixedEmotionAnalysis {
    /// Detected emotions and their weights
    pub emotions: HashMap<Emotion, f32>,
    /// Strongest detected emotion
    pub dominant_emotion: Emotion,
    /// Second-strongest emotion when more than one is present
    pub secondary_emotion: Option<Emotion>,
    /// Confidence in the dominant emotion, in [0, 1]
    pub confidence: f32,
    /// Valence grouping of the mix
    pub category: EmotionCategory,
    /// More than one emotion carries meaningful weight
    pub is_mixed: bool,
    /// Positive- and negative-family emotions are both present
    pub conflicting: bool,
    /// How many-way the mix is, in [0, 1]
    pub complexity: f32,
    /// How evenly opposed the mix is, in [0, 1]
    pub ambivalence: f32,
}

impl Default for MixedEmotionAnalysis {
    fn default() -> Self {
        Self {
            emotions: HashMap::new(),
            dominant_emotion: Emotion::Neutral,
            secondary_emotion: None,
            confidence: 0.5,
            category: EmotionCategory::Neutral,
            is_mixed: false,
            conflicting: false,
            complexity: 0.0,
            ambivalence: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_result() {
        let result = SentimentResult::neutral();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.raw_delta, 0);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.interaction_type, InteractionType::Neutral);
        assert!(result.has_tag(SentimentTag::Neutral));
    }

    #[test]
    fn test_intensity_scale_factors() {
        assert_eq!(IntensityCategory::Mild.scale_factor(), 0.7);
        assert_eq!(IntensityCategory::Moderate.scale_factor(), 1.0);
        assert_eq!(IntensityCategory::Strong.scale_factor(), 1.5);
        assert_eq!(IntensityCategory::Extreme.scale_factor(), 2.0);
    }

    #[test]
    fn test_interaction_type_serde() {
        let json = serde_json::to_string(&InteractionType::Appreciative).unwrap();
        assert_eq!(json, "\"appreciative\"");
    }

    #[test]
    fn test_contextual_default_is_neutral_placeholder() {
        let ctx = ContextualAnalysis::default();
        assert_eq!(ctx.dominant_emotion, Emotion::Neutral);
        assert_eq!(ctx.emotion_confidence, 0.5);
        assert!(ctx.non_literal_type.is_none());
    }
}
