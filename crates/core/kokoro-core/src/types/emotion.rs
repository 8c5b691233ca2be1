//! Discrete emotion model used by the contextual analysis stages
//!
//! Emotions follow Plutchik's eight primary categories. The negation handling
//! in the context analyzer maps each emotion to a fixed opposite so that a
//! negated emotion keyword ("not happy") contributes signal to the opposite
//! emotion instead of being discarded.

use serde::{Deserialize, Serialize};

/// One of Plutchik's eight primary emotions, plus a neutral placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    /// Happiness, pleasure, delight
    Joy,
    /// Confidence, faith, reliance
    Trust,
    /// Worry, anxiety, dread
    Fear,
    /// Astonishment, unexpectedness
    Surprise,
    /// Grief, loneliness, disappointment
    Sadness,
    /// Aversion, revulsion
    Disgust,
    /// Irritation, hostility, rage
    Anger,
    /// Expectation, looking forward
    Anticipation,
    /// No dominant emotional signal
    Neutral,
}

impl Emotion {
    /// The opposite emotion used for negation inversion.
    ///
    /// The pairing (joy↔sadness, trust↔disgust, fear↔anger,
    /// anticipation↔surprise) is preserved from the reference behavior for
    /// compatibility; it is intentionally not extended further.
    pub fn opposite(&self) -> Emotion {
        match self {
            Emotion::Joy => Emotion::Sadness,
            Emotion::Sadness => Emotion::Joy,
            Emotion::Trust => Emotion::Disgust,
            Emotion::Disgust => Emotion::Trust,
            Emotion::Fear => Emotion::Anger,
            Emotion::Anger => Emotion::Fear,
            Emotion::Anticipation => Emotion::Surprise,
            Emotion::Surprise => Emotion::Anticipation,
            Emotion::Neutral => Emotion::Neutral,
        }
    }

    /// Whether this emotion belongs to the positive family
    pub fn is_positive(&self) -> bool {
        matches!(self, Emotion::Joy | Emotion::Trust | Emotion::Anticipation)
    }

    /// Whether this emotion belongs to the negative family
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            Emotion::Sadness | Emotion::Anger | Emotion::Fear | Emotion::Disgust
        )
    }

    /// Stable lowercase name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Trust => "trust",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Sadness => "sadness",
            Emotion::Disgust => "disgust",
            Emotion::Anger => "anger",
            Emotion::Anticipation => "anticipation",
            Emotion::Neutral => "neutral",
        }
    }

    /// Parse the lowercase name produced by [`Emotion::as_str`]
    pub fn from_name(name: &str) -> Option<Emotion> {
        match name {
            "joy" => Some(Emotion::Joy),
            "trust" => Some(Emotion::Trust),
            "fear" => Some(Emotion::Fear),
            "surprise" => Some(Emotion::Surprise),
            "sadness" => Some(Emotion::Sadness),
            "disgust" => Some(Emotion::Disgust),
            "anger" => Some(Emotion::Anger),
            "anticipation" => Some(Emotion::Anticipation),
            "neutral" => Some(Emotion::Neutral),
            _ => None,
        }
    }

    /// Human-readable description for logs and context strings
    pub fn description(&self) -> &'static str {
        match self {
            Emotion::Joy => "happy and pleased",
            Emotion::Trust => "trusting and open",
            Emotion::Fear => "worried or anxious",
            Emotion::Surprise => "surprised",
            Emotion::Sadness => "sad or down",
            Emotion::Disgust => "put off",
            Emotion::Anger => "irritated or angry",
            Emotion::Anticipation => "looking forward to something",
            Emotion::Neutral => "neutral",
        }
    }

    /// All emotions that carry signal (everything except [`Emotion::Neutral`])
    pub fn all_signal() -> [Emotion; 8] {
        [
            Emotion::Joy,
            Emotion::Trust,
            Emotion::Fear,
            Emotion::Surprise,
            Emotion::Sadness,
            Emotion::Disgust,
            Emotion::Anger,
            Emotion::Anticipation,
        ]
    }
}

impl Default for Emotion {
    fn default() -> Self {
        Emotion::Neutral
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_are_symmetric() {
        for emotion in Emotion::all_signal() {
            assert_eq!(emotion.opposite().opposite(), emotion);
        }
        assert_eq!(Emotion::Neutral.opposite(), Emotion::Neutral);
    }

    #[test]
    fn test_family_membership() {
        assert!(Emotion::Joy.is_positive());
        assert!(Emotion::Trust.is_positive());
        assert!(Emotion::Anticipation.is_positive());
        assert!(Emotion::Sadness.is_negative());
        assert!(Emotion::Anger.is_negative());
        assert!(!Emotion::Surprise.is_positive());
        assert!(!Emotion::Surprise.is_negative());
        assert!(!Emotion::Neutral.is_negative());
    }

    #[test]
    fn test_negation_crosses_families() {
        // Every positive-family emotion negates into the negative family.
        assert!(Emotion::Joy.opposite().is_negative());
        assert!(Emotion::Trust.opposite().is_negative());
        // Anticipation is the deliberate exception: its opposite is Surprise.
        assert_eq!(Emotion::Anticipation.opposite(), Emotion::Surprise);
    }

    #[test]
    fn test_name_round_trip() {
        for emotion in Emotion::all_signal() {
            assert_eq!(Emotion::from_name(emotion.as_str()), Some(emotion));
        }
        assert_eq!(Emotion::from_name("bogus"), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Emotion::Anticipation).unwrap();
        assert_eq!(json, "\"anticipation\"");
        let back: Emotion = serde_json::from_str("\"sadness\"").unwrap();
        assert_eq!(back, Emotion::Sadness);
    }
}
