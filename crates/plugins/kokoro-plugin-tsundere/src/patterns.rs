//! Fixed tables behind the persona override: contradiction-style phrase
//! families, farewell vocabulary, interjections, and weighted speech habits.
//!
//! The tables are the persona. Everything else in this crate is mechanism
//! that reads them, so tuning the character means editing this file only.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One family of surface patterns whose apparent sentiment should be
/// reinterpreted.
#[derive(Debug)]
pub struct OverridePattern {
    /// Family name recorded in detected-pattern labels.
    pub family: &'static str,
    /// How the wording should be read instead.
    pub interpretation: &'static str,
    /// Affection nudge the reinterpretation carries.
    pub affection_nudge: i32,
    /// Sentiment score nudge the reinterpretation carries.
    pub score_nudge: f32,
    /// Regex sources matched against the utterance.
    pub sources: &'static [&'static str],
}

/// The four contradiction families. Denial of affection, hostility wrapped
/// around concern, grudging thanks, and insults stacked on endearments all
/// read as closeness for this persona.
pub const OVERRIDE_PATTERNS: &[OverridePattern] = &[
    OverridePattern {
        family: "dismissive_affection",
        interpretation: "positive_despite_wording",
        affection_nudge: 2,
        score_nudge: 0.3,
        sources: &[
            r"(別に|べつに).*(好き|すき|気に入った|きにいった).*わけじゃない",
            r"(別に|べつに).*(あんた|君|きみ|お前|おまえ)のため.*じゃない",
            r"勘違いしないでよ",
            r"(感謝|かんしゃ)なんて(してない|しない|するわけない)",
            r"(褒めて|ほめて)(ない|いるわけじゃない)",
        ],
    },
    OverridePattern {
        family: "hostile_care",
        interpretation: "caring_despite_hostility",
        affection_nudge: 1,
        score_nudge: 0.2,
        sources: &[
            r"(うるさい|うっせー|黙れ).*(心配|しんぱい|大丈夫|だいじょうぶ)",
            r"(バカ|ばか|あほ).*(気をつけ|きをつけ|無理|むり|大丈夫|だいじょうぶ)",
            r"(迷惑|めいわく|邪魔|じゃま).*(手伝|てつだ|助け|たすけ)",
            r"(うざい|うるさい).*(でも|だけど|けど).*",
        ],
    },
    OverridePattern {
        family: "reluctant_gratitude",
        interpretation: "grateful_despite_reluctance",
        affection_nudge: 3,
        score_nudge: 0.4,
        sources: &[
            r"(別に|べつに).*(ありがと|感謝|かんしゃ)",
            r"(まあ|ま)(ありがと|サンキュ|さんきゅ)",
            r"(一応|いちおう)(礼|れい|ありがと|感謝|かんしゃ)",
            r"(感謝|かんしゃ)(してる|するよ).*(と思うな|とおもうな)",
        ],
    },
    OverridePattern {
        family: "insult_affection",
        interpretation: "affectionate_despite_insults",
        affection_nudge: 2,
        score_nudge: 0.3,
        sources: &[
            r"(バカ|ばか|あほ).*(好き|すき|大好き|だいすき)",
            r"(うざい|うるさい).*(でも|だけど|けど).*(好き|すき|大好き|だいすき)",
            r"(嫌い|きらい).*(わけじゃない|というわけではない)",
            r"(バカ|ばか|あほ).*(嬉しい|うれしい)",
        ],
    },
];

/// Farewell shapes that carry no exact-phrase table entry.
pub const FAREWELL_PATTERN_SOURCES: &[&str] = &[
    r"(じゃあな|じゃーな|じゃな)",
    r"(また(な|ね)|またね)",
    r"(バイバイ|ばいばい)",
    r"(さようなら|さよなら)",
    r"(またあした|また明日)",
    r"(またあとで|また後で)",
    r"(行ってくる|いってくる)",
    r"(帰る|かえる)(から|よ|わ|ね)",
];

/// Coarse shape of a farewell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FarewellKind {
    /// Throwaway goodbyes between people who expect to talk again.
    Casual,
    /// Explicit, conversation-closing goodbyes.
    Formal,
    /// Statements of leaving rather than goodbyes proper.
    Action,
}

impl FarewellKind {
    /// Snake-case form used in the LLM context bag.
    pub fn as_str(&self) -> &'static str {
        match self {
            FarewellKind::Casual => "casual",
            FarewellKind::Formal => "formal",
            FarewellKind::Action => "action",
        }
    }
}

/// Language register a farewell phrase belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CulturalRegister {
    /// Japanese phrase.
    Japanese,
    /// English phrase.
    English,
}

impl CulturalRegister {
    /// Snake-case form used in the LLM context bag.
    pub fn as_str(&self) -> &'static str {
        match self {
            CulturalRegister::Japanese => "japanese",
            CulturalRegister::English => "english",
        }
    }
}

/// Baseline tone a farewell phrase carries on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FarewellTone {
    /// No sentiment of its own.
    Neutral,
    /// Mildly warm goodbye.
    Positive,
}

/// One entry of the exact-phrase farewell table.
#[derive(Debug)]
pub struct FarewellPhrase {
    /// Surface form, matched as a lowercase substring.
    pub phrase: &'static str,
    /// Shape of the goodbye.
    pub kind: FarewellKind,
    /// Language register.
    pub register: CulturalRegister,
    /// Whether the phrase is typical for the persona's own voice.
    pub character_typical: bool,
    /// Whether the phrase signals the conversation is over.
    pub conversation_ending: bool,
    /// Baseline tone of the phrase.
    pub tone: FarewellTone,
}

/// Exact farewell vocabulary.
///
/// Entries are checked in order against the lowercased utterance; an earlier
/// short phrase shadows a longer one that contains it.
pub const FAREWELL_PHRASES: &[FarewellPhrase] = &[
    FarewellPhrase {
        phrase: "じゃあな",
        kind: FarewellKind::Casual,
        register: CulturalRegister::Japanese,
        character_typical: true,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "じゃーな",
        kind: FarewellKind::Casual,
        register: CulturalRegister::Japanese,
        character_typical: true,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "じゃな",
        kind: FarewellKind::Casual,
        register: CulturalRegister::Japanese,
        character_typical: true,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "またな",
        kind: FarewellKind::Casual,
        register: CulturalRegister::Japanese,
        character_typical: true,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "またね",
        kind: FarewellKind::Casual,
        register: CulturalRegister::Japanese,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Positive,
    },
    FarewellPhrase {
        phrase: "バイバイ",
        kind: FarewellKind::Casual,
        register: CulturalRegister::Japanese,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Positive,
    },
    FarewellPhrase {
        phrase: "ばいばい",
        kind: FarewellKind::Casual,
        register: CulturalRegister::Japanese,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Positive,
    },
    FarewellPhrase {
        phrase: "さようなら",
        kind: FarewellKind::Formal,
        register: CulturalRegister::Japanese,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "さよなら",
        kind: FarewellKind::Formal,
        register: CulturalRegister::Japanese,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "行ってくる",
        kind: FarewellKind::Action,
        register: CulturalRegister::Japanese,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "いってくる",
        kind: FarewellKind::Action,
        register: CulturalRegister::Japanese,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "帰る",
        kind: FarewellKind::Action,
        register: CulturalRegister::Japanese,
        character_typical: true,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "かえる",
        kind: FarewellKind::Action,
        register: CulturalRegister::Japanese,
        character_typical: true,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "see ya",
        kind: FarewellKind::Casual,
        register: CulturalRegister::English,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "bye",
        kind: FarewellKind::Casual,
        register: CulturalRegister::English,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "later",
        kind: FarewellKind::Casual,
        register: CulturalRegister::English,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "see you later",
        kind: FarewellKind::Casual,
        register: CulturalRegister::English,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Positive,
    },
    FarewellPhrase {
        phrase: "goodbye",
        kind: FarewellKind::Formal,
        register: CulturalRegister::English,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "farewell",
        kind: FarewellKind::Formal,
        register: CulturalRegister::English,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "i'm leaving",
        kind: FarewellKind::Action,
        register: CulturalRegister::English,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "i'm going",
        kind: FarewellKind::Action,
        register: CulturalRegister::English,
        character_typical: false,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
    FarewellPhrase {
        phrase: "i'm out",
        kind: FarewellKind::Action,
        register: CulturalRegister::English,
        character_typical: true,
        conversation_ending: true,
        tone: FarewellTone::Neutral,
    },
];

/// Interjections the persona throws around habitually. A hit neutralizes the
/// affection penalty the surface wording would otherwise earn.
pub struct Interjection {
    /// Label recorded in detected-pattern output.
    pub label: &'static str,
    /// Surface variants, matched as substrings.
    pub variants: &'static [&'static str],
}

/// Habitual interjections, checked as overrides after pattern matching.
pub const INTERJECTIONS: &[Interjection] = &[
    Interjection {
        label: "うっせー",
        variants: &["うっせー", "うるさい"],
    },
    Interjection {
        label: "バカ",
        variants: &["バカ", "ばか", "あほ"],
    },
];

/// Weighted speech habits used for voice-consistency scoring.
///
/// Weights are per-phrase confidence that the wording is the persona's own
/// voice rather than genuine hostility.
pub const SPEECH_PATTERNS: &[(&str, f32)] = &[
    ("〜だろ", 0.9),
    ("〜じゃねーか", 0.9),
    ("うっせー", 0.9),
    ("バカかよ", 0.9),
    ("チッ", 0.8),
    ("うぜぇ", 0.8),
    ("知らねーよ", 0.8),
    ("関係ねーし", 0.8),
    ("ふん", 0.7),
    ("別にいいけど", 0.7),
    ("まぁいいか", 0.7),
    ("ちょっと嬉しい", 0.6),
    ("悪くないな", 0.6),
    ("ありがと…", 0.5),
    ("寂しくなかったし", 0.5),
];

/// Compiled contradiction families, one `(pattern, regex)` pair per source.
pub static COMPILED_OVERRIDES: Lazy<Vec<(&'static OverridePattern, Regex)>> = Lazy::new(|| {
    OVERRIDE_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.sources.iter().map(move |src| (pattern, compile(src))))
        .collect()
});

/// Compiled farewell shapes.
pub static COMPILED_FAREWELLS: Lazy<Vec<Regex>> =
    Lazy::new(|| FAREWELL_PATTERN_SOURCES.iter().map(|src| compile(src)).collect());

// Table patterns are compile-time constants, so a failure here is a
// programming error caught by the table tests.
fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(err) => panic!("invalid persona pattern {pattern:?}: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tables_compile() {
        assert!(!COMPILED_OVERRIDES.is_empty());
        assert!(!COMPILED_FAREWELLS.is_empty());
        assert_eq!(
            COMPILED_OVERRIDES.len(),
            OVERRIDE_PATTERNS.iter().map(|p| p.sources.len()).sum::<usize>()
        );
    }

    #[test]
    fn families_cover_the_four_reinterpretations() {
        let families: Vec<_> = OVERRIDE_PATTERNS.iter().map(|p| p.family).collect();
        assert_eq!(
            families,
            vec![
                "dismissive_affection",
                "hostile_care",
                "reluctant_gratitude",
                "insult_affection"
            ]
        );
    }

    #[test]
    fn farewell_table_lookup_is_order_sensitive() {
        // "goodbye" contains "bye", and "bye" sits earlier in the table.
        let hit = FAREWELL_PHRASES
            .iter()
            .find(|entry| "goodbye".contains(entry.phrase))
            .unwrap();
        assert_eq!(hit.phrase, "bye");
        assert_eq!(hit.kind, FarewellKind::Casual);
    }

    #[test]
    fn dismissive_affection_matches_the_classic_denial() {
        let matched = COMPILED_OVERRIDES
            .iter()
            .any(|(p, re)| p.family == "dismissive_affection" && re.is_match("別にあんたが好きってわけじゃない"));
        assert!(matched);
    }

    #[test]
    fn speech_pattern_weights_are_probabilities() {
        for (phrase, weight) in SPEECH_PATTERNS {
            assert!(
                (0.0..=1.0).contains(weight),
                "weight out of range for {phrase}"
            );
        }
    }
}
