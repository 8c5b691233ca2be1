//! Relationship stages derived from the affection level

use serde::{Deserialize, Serialize};

/// One of six ordered relationship bands
///
/// A pure function of the affection level; bands are contiguous and cover
/// the full [0, 100] range with no gaps or overlaps. The lower bands are
/// deliberately narrow so early hostility thaws quickly once deltas land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStage {
    /// Levels 0-10
    Hostile,
    /// Levels 11-25
    Distant,
    /// Levels 26-45
    Cautious,
    /// Levels 46-65
    Friendly,
    /// Levels 66-85
    Warm,
    /// Levels 86-100
    Close,
}

impl RelationshipStage {
    /// All stages in band order
    pub const ALL: [RelationshipStage; 6] = [
        RelationshipStage::Hostile,
        RelationshipStage::Distant,
        RelationshipStage::Cautious,
        RelationshipStage::Friendly,
        RelationshipStage::Warm,
        RelationshipStage::Close,
    ];

    /// Map an affection level to its stage
    ///
    /// Total over the u8 range; anything above 100 falls into the top band
    /// (levels are clamped before they get here).
    pub fn from_level(level: u8) -> Self {
        match level {
            0..=10 => RelationshipStage::Hostile,
            11..=25 => RelationshipStage::Distant,
            26..=45 => RelationshipStage::Cautious,
            46..=65 => RelationshipStage::Friendly,
            66..=85 => RelationshipStage::Warm,
            _ => RelationshipStage::Close,
        }
    }

    /// Stable lowercase name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStage::Hostile => "hostile",
            RelationshipStage::Distant => "distant",
            RelationshipStage::Cautious => "cautious",
            RelationshipStage::Friendly => "friendly",
            RelationshipStage::Warm => "warm",
            RelationshipStage::Close => "close",
        }
    }

    /// Inclusive level bounds of this band
    pub fn bounds(&self) -> (u8, u8) {
        match self {
            RelationshipStage::Hostile => (0, 10),
            RelationshipStage::Distant => (11, 25),
            RelationshipStage::Cautious => (26, 45),
            RelationshipStage::Friendly => (46, 65),
            RelationshipStage::Warm => (66, 85),
            RelationshipStage::Close => (86, 100),
        }
    }

    /// Behavioral profile used for LLM context and admin display
    pub fn profile(&self) -> &'static StageProfile {
        &STAGE_PROFILES[*self as usize]
    }
}

impl std::fmt::Display for RelationshipStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive profile of one relationship stage
///
/// Feeds the LLM context builder and the admin CLI; the analysis path never
/// reads these.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StageProfile {
    /// Stage name, matching [`RelationshipStage::as_str`]
    pub name: &'static str,
    /// Relationship dynamics at this stage
    pub description: &'static str,
    /// Short behavioral traits, most salient first
    pub behavior_traits: &'static [&'static str],
}

static STAGE_PROFILES: [StageProfile; 6] = [
    StageProfile {
        name: "hostile",
        description: "Open hostility and rejection; trust is absent and most approaches are rebuffed.",
        behavior_traits: &[
            "keeps maximum distance",
            "assumes bad intent",
            "responds with hostility or silence",
        ],
    },
    StageProfile {
        name: "distant",
        description: "Cold and closed off, with only minimal room for conversation.",
        behavior_traits: &[
            "short, curt replies",
            "shows little interest",
            "deflects personal questions",
        ],
    },
    StageProfile {
        name: "cautious",
        description: "Guard is starting to drop; honest reactions slip through while distance is kept.",
        behavior_traits: &[
            "alternates between wary and candid",
            "accepts conversation reluctantly",
            "occasional flashes of interest",
        ],
    },
    StageProfile {
        name: "friendly",
        description: "Wariness is fading and straightforward exchanges are common, if still brusque.",
        behavior_traits: &[
            "engages willingly",
            "blunt but good-natured",
            "enjoys conversation while denying it",
        ],
    },
    StageProfile {
        name: "warm",
        description: "Trust is established; honest feelings surface, including moments of weakness.",
        behavior_traits: &[
            "speaks candidly",
            "shows vulnerability at times",
            "seeks reassurance",
        ],
    },
    StageProfile {
        name: "close",
        description: "Deep trust with unguarded emotional expression, including attachment and loneliness.",
        behavior_traits: &[
            "openly affectionate",
            "does not hide loneliness",
            "relies on the relationship",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_are_exact() {
        assert_eq!(RelationshipStage::from_level(0), RelationshipStage::Hostile);
        assert_eq!(RelationshipStage::from_level(10), RelationshipStage::Hostile);
        assert_eq!(RelationshipStage::from_level(11), RelationshipStage::Distant);
        assert_eq!(RelationshipStage::from_level(25), RelationshipStage::Distant);
        assert_eq!(RelationshipStage::from_level(26), RelationshipStage::Cautious);
        assert_eq!(RelationshipStage::from_level(45), RelationshipStage::Cautious);
        assert_eq!(RelationshipStage::from_level(46), RelationshipStage::Friendly);
        assert_eq!(RelationshipStage::from_level(65), RelationshipStage::Friendly);
        assert_eq!(RelationshipStage::from_level(66), RelationshipStage::Warm);
        assert_eq!(RelationshipStage::from_level(85), RelationshipStage::Warm);
        assert_eq!(RelationshipStage::from_level(86), RelationshipStage::Close);
        assert_eq!(RelationshipStage::from_level(100), RelationshipStage::Close);
    }

    #[test]
    fn test_stage_is_monotonic_in_level() {
        for level in 1..=100u8 {
            assert!(
                RelationshipStage::from_level(level) >= RelationshipStage::from_level(level - 1),
                "stage regressed between levels {} and {}",
                level - 1,
                level
            );
        }
    }

    #[test]
    fn test_bounds_cover_range_without_gaps() {
        let mut expected_start = 0u8;
        for stage in RelationshipStage::ALL {
            let (lo, hi) = stage.bounds();
            assert_eq!(lo, expected_start, "gap before {}", stage);
            for level in lo..=hi {
                assert_eq!(RelationshipStage::from_level(level), stage);
            }
            expected_start = hi.saturating_add(1);
        }
        assert_eq!(expected_start, 101);
    }

    #[test]
    fn test_profiles_line_up_with_stages() {
        for stage in RelationshipStage::ALL {
            let profile = stage.profile();
            assert_eq!(profile.name, stage.as_str());
            assert!(!profile.behavior_traits.is_empty());
        }
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&RelationshipStage::Cautious).unwrap();
        assert_eq!(json, "\"cautious\"");
        let back: RelationshipStage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RelationshipStage::Cautious);
    }
}
