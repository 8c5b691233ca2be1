//! Curated bilingual (Japanese/English) keyword and pattern tables.
//!
//! Every analyzer in this crate matches against these tables rather than
//! carrying its own word lists. Weighted tables map a surface form to a
//! signed affection delta contribution; pattern families are compiled once
//! at first use and shared across sessions.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Emotion;

/// A keyword table whose entries carry a signed affection weight.
pub type WeightedLexicon = &'static [(&'static str, i8)];

/// A named family of regex source patterns.
pub type PatternFamily = (&'static str, &'static [&'static str]);

/// Warm, friendly, and complimentary expressions.
pub const POSITIVE_KEYWORDS: WeightedLexicon = &[
    ("ありがとう", 4),
    ("ありがとうございます", 5),
    ("すごい", 3),
    ("いいね", 3),
    ("よかった", 3),
    ("うれしい", 4),
    ("嬉しい", 4),
    ("楽しい", 3),
    ("面白い", 3),
    ("かわいい", 4),
    ("可愛い", 4),
    ("やさしい", 4),
    ("優しい", 4),
    ("がんばって", 3),
    ("頑張って", 3),
    ("お疲れ", 3),
    ("おつかれ", 3),
    ("すみません", 2),
    ("ごめん", 2),
    ("ごめんなさい", 3),
    ("素敵", 4),
    ("綺麗", 4),
    ("賢い", 4),
    ("頭いい", 4),
    ("好き", 5),
    ("大好き", 6),
    ("愛してる", 7),
    ("thank", 4),
    ("thanks", 4),
    ("please", 2),
    ("sorry", 2),
    ("good", 3),
    ("great", 4),
    ("awesome", 4),
    ("nice", 3),
    ("cute", 4),
    ("sweet", 3),
    ("kind", 4),
    ("wonderful", 4),
    ("amazing", 4),
    ("love", 5),
    ("like", 3),
    ("beautiful", 4),
    ("smart", 4),
    ("clever", 4),
    ("pretty", 4),
];

/// Insults and rejection. The strongest entries dominate the raw total.
pub const NEGATIVE_KEYWORDS: WeightedLexicon = &[
    ("うざい", -4),
    ("うるさい", -3),
    ("きもい", -5),
    ("だめ", -2),
    ("バカ", -3),
    ("ばか", -3),
    ("馬鹿", -3),
    ("アホ", -3),
    ("あほ", -3),
    ("やめろ", -3),
    ("黙れ", -4),
    ("いらない", -2),
    ("つまらない", -2),
    ("むかつく", -3),
    ("ムカつく", -3),
    ("しね", -8),
    ("死ね", -8),
    ("きらい", -4),
    ("嫌い", -4),
    ("くそ", -3),
    ("クソ", -3),
    ("stupid", -4),
    ("dumb", -3),
    ("shut up", -4),
    ("shutup", -4),
    ("hate", -5),
    ("annoying", -3),
    ("boring", -2),
    ("bad", -2),
    ("terrible", -3),
    ("awful", -3),
    ("disgusting", -4),
    ("gross", -3),
    ("ugly", -4),
    ("die", -8),
    ("kill", -6),
];

/// Concern for the companion's wellbeing and shared-feeling expressions.
pub const CARING_KEYWORDS: WeightedLexicon = &[
    ("大丈夫", 3),
    ("だいじょうぶ", 3),
    ("心配", 4),
    ("気をつけて", 4),
    ("お疲れさま", 4),
    ("がんばれ", 3),
    ("頑張れ", 3),
    ("応援", 4),
    ("元気", 3),
    ("体調", 3),
    ("休んで", 3),
    ("無理しないで", 4),
    ("寂しい", 4),
    ("会いたい", 5),
    ("待ってた", 4),
    ("care", 4),
    ("worry", 3),
    ("concerned", 4),
    ("take care", 4),
    ("rest", 3),
    ("health", 3),
    ("feel better", 4),
    ("support", 4),
    ("miss you", 5),
    ("waiting for you", 4),
];

/// Brush-offs. Mild weights; these erode rather than crater affection.
pub const DISMISSIVE_KEYWORDS: WeightedLexicon = &[
    ("どうでもいい", -2),
    ("しらない", -2),
    ("知らない", -2),
    ("かんけいない", -2),
    ("関係ない", -2),
    ("めんどくさい", -2),
    ("面倒", -2),
    ("つまんない", -2),
    ("whatever", -2),
    ("dont care", -2),
    ("don't care", -2),
    ("boring", -2),
    ("meh", -1),
    ("ignore", -3),
];

/// Gratitude that names the companion as valued or needed.
pub const APPRECIATIVE_KEYWORDS: WeightedLexicon = &[
    ("助かる", 4),
    ("助かった", 4),
    ("たすかる", 4),
    ("ありがたい", 5),
    ("感謝", 5),
    ("おかげで", 4),
    ("必要", 5),
    ("大切", 5),
    ("一緒", 4),
    ("appreciate", 5),
    ("grateful", 5),
    ("helpful", 4),
    ("thanks to you", 5),
    ("need you", 5),
    ("important to me", 5),
    ("together", 4),
];

/// Open aggression directed at the companion.
pub const HOSTILE_KEYWORDS: WeightedLexicon = &[
    ("ふざけるな", -5),
    ("なめるな", -5),
    ("てめー", -4),
    ("てめえ", -4),
    ("こら", -3),
    ("おい", -1),
    ("screw you", -5),
    ("damn you", -4),
    ("bastard", -5),
    ("bitch", -5),
    ("asshole", -5),
];

/// Topics the persona is enthusiastic about. Ramen ranks highest.
pub const INTEREST_KEYWORDS: WeightedLexicon = &[
    ("アニメ", 4),
    ("漫画", 4),
    ("マンガ", 4),
    ("コミック", 3),
    ("オタク", 3),
    ("声優", 3),
    ("キャラクター", 3),
    ("アニメーション", 3),
    ("ラーメン", 5),
    ("拉麺", 5),
    ("らーめん", 5),
    ("中華そば", 4),
    ("食べ物", 3),
    ("グルメ", 3),
    ("美味しい", 3),
    ("美味い", 3),
    ("うまい", 3),
    ("食事", 3),
    ("anime", 4),
    ("manga", 4),
    ("comic", 3),
    ("otaku", 3),
    ("voice actor", 3),
    ("character", 3),
    ("animation", 3),
    ("ramen", 5),
    ("noodle", 4),
    ("food", 3),
    ("delicious", 3),
    ("tasty", 3),
    ("yummy", 3),
    ("meal", 3),
];

/// Terms that mark a message as sexual content. Matching is unweighted;
/// the penalty is computed from match count and message length.
pub const SEXUAL_TERMS: &[&str] = &[
    "セックス",
    "エッチ",
    "おっぱい",
    "胸",
    "パンツ",
    "下着",
    "裸",
    "ヌード",
    "性器",
    "sex",
    "sexy",
    "nude",
    "naked",
    "breast",
    "penis",
    "vagina",
    "underwear",
];

/// Negation markers in both languages. Presence near an emotion keyword
/// flips the emotion to its opposite during context analysis.
pub const NEGATION_WORDS: &[&str] = &[
    "not",
    "no",
    "never",
    "don't",
    "doesn't",
    "didn't",
    "won't",
    "wouldn't",
    "can't",
    "couldn't",
    "ない",
    "ません",
    "なかった",
    "ませんでした",
    "ぬ",
    "ず",
];

/// Conversation topics with their trigger keywords.
pub const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "anime",
        &["anime", "manga", "otaku", "cosplay", "アニメ", "漫画", "オタク", "コスプレ"],
    ),
    (
        "food",
        &[
            "food",
            "eat",
            "restaurant",
            "cooking",
            "recipe",
            "meal",
            "dish",
            "cuisine",
            "食べ物",
            "料理",
            "レストラン",
            "食事",
            "レシピ",
            "ラーメン",
        ],
    ),
    (
        "technology",
        &[
            "computer",
            "smartphone",
            "tech",
            "software",
            "hardware",
            "app",
            "device",
            "コンピュータ",
            "スマホ",
            "テクノロジー",
            "ソフト",
            "アプリ",
        ],
    ),
    (
        "music",
        &["music", "song", "band", "concert", "album", "artist", "音楽", "歌", "バンド", "コンサート"],
    ),
    ("movies", &["movie", "film", "cinema", "actor", "director", "映画", "俳優", "監督"]),
    ("games", &["game", "gaming", "play", "player", "ゲーム", "プレイ", "プレーヤー"]),
    (
        "sports",
        &["sports", "team", "athlete", "match", "competition", "スポーツ", "チーム", "選手", "試合"],
    ),
    ("travel", &["travel", "trip", "vacation", "destination", "旅行", "旅", "休暇", "観光"]),
    ("work", &["work", "job", "office", "career", "仕事", "職場", "オフィス", "キャリア"]),
    (
        "school",
        &["school", "study", "student", "teacher", "class", "学校", "勉強", "学生", "先生", "クラス"],
    ),
    ("family", &["family", "parent", "child", "家族", "親", "子供"]),
    ("health", &["health", "healthy", "fitness", "exercise", "健康", "フィットネス", "運動"]),
    (
        "weather",
        &["weather", "rain", "sun", "cloud", "temperature", "天気", "雨", "太陽", "雲", "気温"],
    ),
];

/// Keyword sets per basic emotion.
pub const EMOTION_KEYWORDS: &[(Emotion, &[&str])] = &[
    (
        Emotion::Joy,
        &[
            "happy", "joy", "glad", "delighted", "excited", "pleased", "cheerful", "content",
            "嬉しい", "楽しい", "喜び", "うれしい", "楽しむ", "喜ぶ",
        ],
    ),
    (
        Emotion::Sadness,
        &[
            "sad", "unhappy", "disappointed", "depressed", "upset", "down", "blue", "gloomy",
            "悲しい", "寂しい", "落ち込む", "がっかり", "憂鬱",
        ],
    ),
    (
        Emotion::Anger,
        &["angry", "furious", "mad", "annoyed", "irritated", "outraged", "怒り", "腹立つ", "イライラ", "激怒"],
    ),
    (
        Emotion::Fear,
        &[
            "afraid", "scared", "terrified", "fearful", "anxious", "worried", "nervous", "怖い",
            "恐怖", "不安", "心配", "緊張",
        ],
    ),
    (
        Emotion::Disgust,
        &["disgusted", "gross", "yuck", "repulsed", "revolted", "嫌悪", "吐き気", "嫌い", "気持ち悪い"],
    ),
    (
        Emotion::Surprise,
        &["surprised", "shocked", "amazed", "astonished", "驚き", "ショック", "びっくり", "仰天"],
    ),
    (
        Emotion::Trust,
        &["trust", "believe", "faith", "confidence", "信頼", "信じる", "信用", "確信"],
    ),
    (
        Emotion::Anticipation,
        &["anticipate", "expect", "hope", "look forward", "期待", "予想", "希望"],
    ),
];

/// Richer per-emotion phrase lists used by mixed-emotion analysis.
/// Multi-word phrases are allowed; matching is substring containment.
pub const EMOTION_PHRASES: &[(Emotion, &[&str])] = &[
    (
        Emotion::Joy,
        &[
            "happy", "joyful", "delighted", "thrilled", "ecstatic", "pleased", "glad",
            "overjoyed", "elated", "cheerful", "blissful", "smile", "laugh", "love", "adore",
            "cherish", "treasure", "fond of", "嬉しい", "楽しい", "喜び", "うれしい", "楽しむ",
            "喜ぶ", "愛", "大好き", "恋",
        ],
    ),
    (
        Emotion::Trust,
        &[
            "trust", "believe in", "have faith in", "rely on", "count on", "confident in",
            "dependable", "trustworthy", "reliable", "honest", "faithful", "grateful",
            "thankful", "appreciate", "信頼", "信じる", "信用", "確信", "感謝", "ありがとう",
        ],
    ),
    (
        Emotion::Anticipation,
        &[
            "looking forward to", "excited about", "anticipate", "expect", "hope for", "await",
            "eager", "enthusiastic", "anticipation", "excited", "期待", "予想", "希望",
        ],
    ),
    (
        Emotion::Surprise,
        &[
            "surprised", "amazed", "astonished", "shocked", "stunned", "startled", "wow",
            "unexpected", "incredible", "unbelievable", "驚き", "ショック", "びっくり", "仰天",
        ],
    ),
    (
        Emotion::Sadness,
        &[
            "sad", "unhappy", "depressed", "down", "gloomy", "heartbroken", "miserable",
            "sorrowful", "grief", "melancholy", "disappointed", "upset", "distressed",
            "let down", "disheartened", "悲しい", "寂しい", "落ち込む", "がっかり", "憂鬱",
            "失望", "残念",
        ],
    ),
    (
        Emotion::Anger,
        &[
            "angry", "mad", "furious", "outraged", "irritated", "annoyed", "frustrated",
            "enraged", "irate", "livid", "resentful", "hostile", "怒り", "腹立つ", "イライラ",
            "激怒",
        ],
    ),
    (
        Emotion::Fear,
        &[
            "afraid", "scared", "frightened", "terrified", "anxious", "worried", "nervous",
            "panicked", "fearful", "apprehensive", "dread", "uneasy", "怖い", "恐怖", "不安",
            "心配", "緊張",
        ],
    ),
    (
        Emotion::Disgust,
        &[
            "disgusted", "revolted", "repulsed", "nauseated", "gross", "yuck", "sickened",
            "appalled", "loathing", "aversion", "嫌悪", "吐き気", "嫌い", "気持ち悪い",
        ],
    ),
    (
        Emotion::Neutral,
        &[
            "okay", "fine", "alright", "so-so", "indifferent", "meh", "calm", "relaxed",
            "peaceful", "tranquil", "まあまあ", "普通", "どちらでもない", "落ち着いた",
            "リラックス", "穏やか",
        ],
    ),
];

/// Words that amplify emotional intensity, with their multipliers.
pub const INTENSIFIERS: &[(&str, f32)] = &[
    ("very", 1.5),
    ("really", 1.5),
    ("extremely", 1.8),
    ("incredibly", 1.7),
    ("absolutely", 1.8),
    ("completely", 1.6),
    ("totally", 1.6),
    ("utterly", 1.7),
    ("so", 1.4),
    ("too", 1.3),
    ("deeply", 1.5),
    ("highly", 1.5),
    ("intensely", 1.7),
    ("terribly", 1.6),
    ("awfully", 1.5),
    ("exceptionally", 1.6),
    ("particularly", 1.4),
    ("especially", 1.5),
    ("remarkably", 1.5),
    ("truly", 1.4),
    ("とても", 1.5),
    ("非常に", 1.8),
    ("すごく", 1.6),
    ("かなり", 1.4),
    ("めちゃ", 1.6),
    ("めっちゃ", 1.7),
    ("超", 1.7),
    ("激", 1.8),
    ("すごい", 1.5),
    ("ものすごく", 1.7),
    ("相当", 1.5),
    ("本当に", 1.4),
    ("マジで", 1.5),
    ("完全に", 1.6),
    ("全く", 1.5),
    ("絶対に", 1.6),
];

/// Words that soften emotional intensity, with their multipliers.
pub const QUALIFIERS: &[(&str, f32)] = &[
    ("somewhat", 0.7),
    ("slightly", 0.6),
    ("a bit", 0.6),
    ("a little", 0.6),
    ("kind of", 0.7),
    ("sort of", 0.7),
    ("rather", 0.8),
    ("fairly", 0.8),
    ("pretty", 0.8),
    ("moderately", 0.8),
    ("relatively", 0.7),
    ("mildly", 0.6),
    ("partially", 0.7),
    ("barely", 0.4),
    ("hardly", 0.4),
    ("scarcely", 0.4),
    ("almost", 0.8),
    ("nearly", 0.8),
    ("少し", 0.6),
    ("ちょっと", 0.6),
    ("やや", 0.8),
    ("多少", 0.7),
    ("若干", 0.7),
    ("わずかに", 0.5),
    ("ほんの", 0.6),
    ("それほど", 0.7),
    ("そこまで", 0.7),
    ("まあまあ", 0.8),
    ("なんとなく", 0.7),
    ("どちらかといえば", 0.8),
];

/// Emotion-bearing words with their base intensity values.
pub const EMOTION_INDICATORS: &[(&str, f32)] = &[
    ("happy", 0.5),
    ("glad", 0.4),
    ("delighted", 0.6),
    ("thrilled", 0.7),
    ("excited", 0.6),
    ("overjoyed", 0.8),
    ("ecstatic", 0.8),
    ("pleased", 0.4),
    ("content", 0.3),
    ("satisfied", 0.4),
    ("grateful", 0.5),
    ("thankful", 0.5),
    ("love", 0.7),
    ("adore", 0.7),
    ("like", 0.4),
    ("enjoy", 0.5),
    ("appreciate", 0.5),
    ("sad", 0.6),
    ("unhappy", 0.5),
    ("depressed", 0.7),
    ("miserable", 0.8),
    ("devastated", 0.9),
    ("heartbroken", 0.9),
    ("disappointed", 0.6),
    ("upset", 0.6),
    ("angry", 0.7),
    ("furious", 0.9),
    ("enraged", 0.9),
    ("annoyed", 0.5),
    ("irritated", 0.6),
    ("frustrated", 0.7),
    ("afraid", 0.6),
    ("scared", 0.7),
    ("terrified", 0.9),
    ("worried", 0.6),
    ("anxious", 0.7),
    ("hate", 0.8),
    ("dislike", 0.6),
    ("disgusted", 0.7),
    ("嬉しい", 0.6),
    ("楽しい", 0.6),
    ("幸せ", 0.7),
    ("喜び", 0.6),
    ("満足", 0.5),
    ("安心", 0.5),
    ("好き", 0.6),
    ("大好き", 0.8),
    ("愛", 0.8),
    ("感謝", 0.6),
    ("ありがとう", 0.5),
    ("悲しい", 0.6),
    ("寂しい", 0.6),
    ("辛い", 0.7),
    ("苦しい", 0.7),
    ("切ない", 0.6),
    ("落ち込む", 0.6),
    ("怒り", 0.7),
    ("腹立つ", 0.7),
    ("イライラ", 0.6),
    ("ムカつく", 0.7),
    ("不安", 0.6),
    ("心配", 0.6),
    ("怖い", 0.7),
    ("恐怖", 0.8),
    ("嫌い", 0.7),
    ("憎い", 0.8),
    ("嫌悪", 0.7),
];

/// Typographic cues that raise intensity. Word repetition is handled
/// separately in the intensity detector because it needs a backreference.
pub static INTENSITY_PATTERNS: Lazy<Vec<(Regex, f32)>> = Lazy::new(|| {
    [
        (r"!{2,}", 0.2),
        (r"\?{2,}", 0.1),
        (r"[A-Z]{3,}", 0.2),
        (r"\.{3,}", 0.1),
        (r"\*\w+\*", 0.1),
        (r"_\w+_", 0.1),
        (r"[😀😁😂🤣😃😄😅😆😉😊😋😎😍😘🥰😗😙😚🙂🤗🤩🥳]", 0.2),
        (r"[😔😕🙁☹😣😖😫😩🥺😢😭😤😠😡🤬😱😨😰😥😓]", 0.2),
        (r"[💕💓💗💖💘💝💟💌]|❤", 0.2),
    ]
    .iter()
    .map(|(pat, val)| (compile(pat), *val))
    .collect()
});

const SARCASM_PATTERN_FAMILIES: &[PatternFamily] = &[
    (
        "exaggerated_positive",
        &[
            r"(?i)(so|really|very|totally|absolutely) (great|awesome|perfect|wonderful|amazing).*but",
            r"(?i)(great|awesome|perfect|wonderful|amazing).*(disaster|fail|error|wrong|broken)",
            r"(素晴らしい|最高|すごい).*(けど|でも|しかし)",
            r"(?i)(love|adore|enjoy).*(how|when).*(never|always|constantly)",
        ],
    ),
    (
        "mock_agreement",
        &[
            r"(?i)(yeah|sure|right|of course).*(right|sure|whatever)",
            r"(?i)(oh|wow|gee).*(thanks|great|helpful)",
            r"(はい|そう|もちろん).*(はいはい|そうそう)",
            r"(?i)(sure|okay|fine).*(whatever|like i care|as if)",
            r"(?i)yeah right",
        ],
    ),
    (
        "rhetorical_questions",
        &[
            r"(?i)(could|can) you (be|get) any more.+\?",
            r"(?i)(what|who) (am i|are you|are we).+\?",
            r"(?i)(seriously|really)\?.+\?",
            r"(マジ|本当に)\?.+\?",
            r"(?i)(how|why) (hard|difficult) (is it|was it|would it be) to.+\?",
        ],
    ),
    (
        "obvious_falsehood",
        &[
            r"(?i)(because|cause) that('s| is| was) (totally|definitely|obviously|clearly) (what|how|why)",
            r"(なぜなら|だって).*(明らかに|当然|もちろん)",
            r"(?i)(clearly|obviously) (i|we|they) (meant|wanted|intended) to.+",
            r"(?i)(of course|naturally) (that's|this is) (exactly|precisely) what.+",
        ],
    ),
    (
        "hyperbole",
        &[
            r"(?i)(worst|best) (thing|day|experience) (ever|in my life|of all time)",
            r"(?i)(never|always) (in|for) (my life|a million years|the history of)",
            r"(?i)(literally|actually) (dying|dead|can't even)",
            r"(史上最高|史上最悪|一生で最高|一生で最悪)",
        ],
    ),
];

const IRONY_PATTERN_FAMILIES: &[PatternFamily] = &[
    (
        "situational_irony",
        &[
            r"(?i)(just|exactly|precisely) what (i|we) (needed|wanted|expected)",
            r"(?i)(perfect|great|wonderful) timing",
            r"(ちょうど|まさに).*(欲しかった|必要だった)",
            r"(?i)(how|what) (convenient|fortunate|lucky)",
            r"(?i)(isn't|wasn't) (that|this) (convenient|fortunate|lucky)",
        ],
    ),
    (
        "dramatic_irony",
        &[
            r"(?i)(little|if only) (did|do|does) (he|she|they|you) know",
            r"(?i)(if only|i wish) (you|they|he|she) (knew|understood|realized)",
            r"(知らない|わからない).*(のに|くせに)",
            r"(?i)(they|you|he|she) (have|has) no (idea|clue) (what|that)",
            r"(?i)(they're|you're|he's|she's) (in for|about to get) a (surprise|shock)",
        ],
    ),
    (
        "verbal_irony",
        &[
            r"(?i)(how|what) (nice|lovely|wonderful|great) of (you|them|him|her)",
            r"(なんて|何て).*(素敵|素晴らしい)",
            r"(?i)(brilliant|genius|smart) (move|decision|choice)",
            r"(?i)(smooth|slick|clever) (move|operation|maneuver)",
        ],
    ),
    (
        "contrary_statements",
        &[
            r"(?i)(good|great|nice|wonderful) job.*(failing|breaking|ruining)",
            r"(?i)(bad|terrible|awful) job.*(succeeding|fixing|improving)",
            r"(良い|素晴らしい).*(失敗|壊れた|台無し)",
            r"(?i)(love|enjoy|adore) (how|when|that).*(never|always|constantly)",
            r"(?i)(hate|dislike|loathe) (how|when|that).*(always|never)",
        ],
    ),
    (
        "understated_irony",
        &[
            r"(?i)(slightly|somewhat|a bit|mildly) (inconvenient|problematic|concerning)",
            r"(?i)(minor|small|tiny) (issue|problem|inconvenience).*(catastrophic|disastrous|terrible)",
            r"(?i)(not|isn't|wasn't) (exactly|quite|really) (ideal|perfect|great)",
            r"(少し|ちょっと).*(問題|困った).*(大変|最悪|致命的)",
        ],
    ),
];

const CONTEXT_INDICATOR_FAMILIES: &[PatternFamily] = &[
    ("punctuation", &[r"!{2,}|\?{2,}", r"!+\?+|!+\.+", r"\.{3,}", r"\?!|!\?"]),
    // ALL CAPS stays case sensitive so ordinary words do not trigger it.
    ("formatting", &[r"[A-Z]{3,}", r"\*\w+\*", r"~\w+~", r"_\w+_", r#""[^"]+""#]),
    (
        "emoji_indicators",
        &[r";-?\)|;D|;P", r":-?/|:-?\|", r"🙄|🙃|😏", r"😒|😑|🤔", r"😉|🤨|🧐"],
    ),
    (
        "phrase_indicators",
        &[
            r"(?i)air quotes|so to speak|supposedly|allegedly",
            r"(?i)if you know what i mean|wink wink|nudge nudge",
            r"いわゆる|所謂|なんていうか",
            r"(?i)not to be|no offense|don't get me wrong",
            r"(?i)imagine that|fancy that|who would have thought",
        ],
    ),
    (
        "tone_markers",
        &[r"(?i)/s\b|/sarcasm|/irony", r"(?i)\(sarcasm\)|\(not\)", r"(?i)#sarcasm|#irony", r"皮肉です|冗談です"],
    ),
];

const CONTRADICTION_FAMILIES: &[PatternFamily] = &[
    (
        "sentiment_contradiction",
        &[
            r"(?i)(happy|glad|pleased|delighted).*(sad|upset|disappointed|angry)",
            r"(?i)(love|adore|enjoy).*(hate|despise|loathe)",
            r"(嬉しい|楽しい).*(悲しい|怒り|嫌い)",
        ],
    ),
    (
        "expectation_contradiction",
        &[
            r"(?i)(expected|anticipated|thought).*(surprised|shocked|amazed)",
            r"(?i)(should|would|could).*(didn't|doesn't|won't)",
            r"(予想|期待).*(驚き|衝撃)",
        ],
    ),
    (
        "value_contradiction",
        &[
            r"(?i)(important|valuable|essential).*(trivial|worthless|pointless)",
            r"(?i)(simple|easy|straightforward).*(complex|difficult|complicated)",
            r"(重要|大切).*(無意味|無価値)",
        ],
    ),
];

/// Stock phrases that are sarcastic far more often than literal.
pub const SARCASTIC_PHRASES: &[&str] = &[
    "yeah right",
    "sure thing",
    "whatever you say",
    "tell me about it",
    "big surprise",
    "shocker",
    "what a shock",
    "color me surprised",
    "i'm shocked",
    "no way",
    "you don't say",
    "who would have thought",
];

/// Japanese praise words that flip to sarcasm when a failure word co-occurs.
/// The bool marks the pair as sarcasm rather than irony.
pub const JA_SARCASM_PAIRS: &[(&str, &[&str], bool)] = &[
    ("素晴らしい", &["失敗", "ダメ", "最悪"], true),
    ("最高", &["失敗", "ダメ", "最悪"], true),
    ("すごい", &["失敗", "ダメ", "最悪"], true),
    ("なんて素敵", &["ダメ", "失敗", "最悪"], false),
];

const AMBIGUITY_FAMILIES: &[PatternFamily] = &[
    (
        "mixed_signals",
        &[
            r"(?i)(happy|glad|pleased).*(sad|upset|disappointed)",
            r"(?i)(sad|upset|disappointed).*(happy|glad|pleased)",
            r"(?i)(good|great|nice).*(bad|terrible|awful)",
            r"(?i)(bad|terrible|awful).*(good|great|nice)",
            r"(?i)(love|like).*(hate|dislike)",
            r"(?i)(hate|dislike).*(love|like)",
            r"(嬉しい|楽しい).*(悲しい|残念)",
            r"(悲しい|残念).*(嬉しい|楽しい)",
            r"(良い|素晴らしい).*(悪い|ひどい)",
            r"(悪い|ひどい).*(良い|素晴らしい)",
        ],
    ),
    (
        "hedging",
        &[
            r"(?i)(kind of|sort of|maybe|perhaps|possibly) (good|bad|nice|terrible)",
            r"(?i)(i think|i guess|i suppose|probably|might be) (good|bad|right|wrong)",
            r"(たぶん|多分|かもしれない|思う).*(良い|悪い|正しい|間違い)",
        ],
    ),
    (
        "conditional",
        &[
            r"(?i)if.*(then|would|could|might)",
            r"(?i)(would|could|might) be.*(if|unless|when)",
            r"(もし|なら|たら).*(だろう|かもしれない)",
        ],
    ),
    (
        "ambivalent",
        &[
            r"(?i)good and bad|pros and cons|mixed feelings",
            r"(?i)like.*but.*don't like|happy.*but.*sad",
            r"良い点も悪い点も|嬉しいけど悲しい",
        ],
    ),
];

/// Hedges, ambivalence markers, and soft qualifiers grouped by family.
pub const UNCERTAINTY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "hedging_words",
        &[
            "maybe", "perhaps", "possibly", "probably", "might", "could", "would", "seem",
            "appear", "guess", "think", "suppose", "assume", "not sure", "たぶん", "多分",
            "かもしれない", "思う", "考える", "推測",
        ],
    ),
    (
        "ambivalent_words",
        &[
            "mixed", "conflicted", "unsure", "ambivalent", "torn", "divided", "複雑", "矛盾",
            "迷う", "葛藤",
        ],
    ),
    (
        "uncertainty_qualifiers",
        &[
            "somewhat", "kind of", "sort of", "a bit", "slightly", "rather", "やや", "少し",
            "ちょっと", "多少",
        ],
    ),
];

const KEYWORD_CONTEXT_FAMILIES: &[PatternFamily] = &[
    (
        "negated_positive",
        &[
            r"(?i)not (good|great|nice|happy|wonderful)",
            r"(?i)don't (like|love|enjoy|appreciate)",
            r"(?i)doesn't (help|work|make sense)",
            r"(良く|楽しく|嬉しく|好き)ない",
            r"(良く|楽しく|嬉しく)なかった",
        ],
    ),
    (
        "negated_negative",
        &[
            r"(?i)not (bad|terrible|awful|sad|angry)",
            r"(?i)don't (hate|dislike|mind)",
            r"(?i)isn't (annoying|boring|stupid|useless)",
            r"(悪く|つまらなく|嫌い)ない",
            r"(悪く|つまらなく)なかった",
        ],
    ),
    (
        "sarcastic_positive",
        &[
            r"(?i)(yeah|sure|right|of course).*(right|sure|whatever)",
            r"(?i)(so|really|very|totally) (great|awesome|perfect|wonderful).*but",
            r"(?i)(great|awesome|perfect|wonderful).*disaster",
            r"(素晴らしい|最高|すごい).*(けど|でも|しかし)",
        ],
    ),
    (
        "conditional_sentiment",
        &[
            r"(?i)(would be|could be|might be) (good|great|nice)",
            r"(?i)(would be|could be|might be) (bad|terrible|awful)",
            r"(?i)if.*then.*(good|great|nice|bad|terrible)",
            r"(良い|素晴らしい|悪い|最悪)かもしれない",
            r"もし.*(なら|たら).*(良い|素晴らしい|悪い|最悪)",
        ],
    ),
];

/// Phrasings that explicitly voice two emotions at once.
pub static MIXED_EMOTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(happy|glad|pleased|excited).+(but|however|though|although).+(sad|upset|worried|angry)",
        r"(?i)(sad|upset|worried|angry).+(but|however|though|although).+(happy|glad|pleased|excited)",
        r"(?i)(love|like).+(but|however|though|although).+(hate|dislike)",
        r"(?i)(hate|dislike).+(but|however|though|although).+(love|like)",
        r"(?i)(started|began).+(happy|excited).+(then|but).+(sad|angry|upset)",
        r"(?i)(started|began).+(sad|angry|upset).+(then|but).+(happy|excited)",
        r"(?i)(happy|excited).+and.+(sad|angry|upset).+at the same time",
        r"(?i)(sad|angry|upset).+and.+(happy|excited).+at the same time",
        r"(?i)mixed feelings",
        r"(?i)conflicted",
        r"(?i)bittersweet",
        r"(嬉しい|楽しい).+(けど|でも|しかし).+(悲しい|怒り|不安)",
        r"(悲しい|怒り|不安).+(けど|でも|しかし).+(嬉しい|楽しい)",
        r"(好き).+(けど|でも|しかし).+(嫌い)",
        r"(嫌い).+(けど|でも|しかし).+(好き)",
        r"複雑な気持ち",
        r"複雑な感情",
    ]
    .iter()
    .map(|pat| compile(pat))
    .collect()
});

/// Compiled sarcasm pattern families, tagged with the family name.
pub static SARCASM_PATTERNS: Lazy<Vec<(&'static str, Regex)>> =
    Lazy::new(|| compile_families(SARCASM_PATTERN_FAMILIES));

/// Compiled irony pattern families, tagged with the family name.
pub static IRONY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> =
    Lazy::new(|| compile_families(IRONY_PATTERN_FAMILIES));

/// Compiled context indicator families (punctuation, formatting, emoji).
pub static CONTEXT_INDICATOR_PATTERNS: Lazy<Vec<(&'static str, Regex)>> =
    Lazy::new(|| compile_families(CONTEXT_INDICATOR_FAMILIES));

/// Compiled contradiction signal families.
pub static CONTRADICTION_PATTERNS: Lazy<Vec<(&'static str, Regex)>> =
    Lazy::new(|| compile_families(CONTRADICTION_FAMILIES));

/// Compiled ambiguity pattern families used by confidence scoring.
pub static AMBIGUITY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> =
    Lazy::new(|| compile_families(AMBIGUITY_FAMILIES));

/// Compiled keyword-versus-context contradiction families used by the
/// pipeline to reverse or dampen keyword sentiment.
pub static KEYWORD_CONTEXT_PATTERNS: Lazy<Vec<(&'static str, Regex)>> =
    Lazy::new(|| compile_families(KEYWORD_CONTEXT_FAMILIES));

// Table patterns are compile-time constants, so a failure here is a
// programming error caught by the lexicon tests.
fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(err) => panic!("invalid lexicon pattern {pattern:?}: {err}"),
    }
}

fn compile_families(families: &[PatternFamily]) -> Vec<(&'static str, Regex)> {
    families
        .iter()
        .flat_map(|(name, patterns)| patterns.iter().map(|pat| (*name, compile(pat))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_pattern_tables_compile() {
        assert!(!SARCASM_PATTERNS.is_empty());
        assert!(!IRONY_PATTERNS.is_empty());
        assert!(!CONTEXT_INDICATOR_PATTERNS.is_empty());
        assert!(!CONTRADICTION_PATTERNS.is_empty());
        assert!(!AMBIGUITY_PATTERNS.is_empty());
        assert!(!KEYWORD_CONTEXT_PATTERNS.is_empty());
        assert!(!MIXED_EMOTION_PATTERNS.is_empty());
        assert!(!INTENSITY_PATTERNS.is_empty());
    }

    #[test]
    fn weighted_tables_have_consistent_signs() {
        for (word, weight) in POSITIVE_KEYWORDS.iter().chain(CARING_KEYWORDS).chain(APPRECIATIVE_KEYWORDS).chain(INTEREST_KEYWORDS) {
            assert!(*weight > 0, "{word} should carry positive weight");
        }
        for (word, weight) in NEGATIVE_KEYWORDS.iter().chain(DISMISSIVE_KEYWORDS).chain(HOSTILE_KEYWORDS) {
            assert!(*weight < 0, "{word} should carry negative weight");
        }
    }

    #[test]
    fn mock_agreement_matches_stock_phrase() {
        let hit = SARCASM_PATTERNS
            .iter()
            .any(|(family, re)| *family == "mock_agreement" && re.is_match("yeah right, sure"));
        assert!(hit);
    }

    #[test]
    fn japanese_negated_positive_matches() {
        let hit = KEYWORD_CONTEXT_PATTERNS
            .iter()
            .any(|(family, re)| *family == "negated_positive" && re.is_match("楽しくない"));
        assert!(hit);
    }

    #[test]
    fn all_caps_pattern_is_case_sensitive() {
        let caps = CONTEXT_INDICATOR_PATTERNS
            .iter()
            .find(|(family, re)| *family == "formatting" && re.is_match("WOW"))
            .map(|(_, re)| re);
        assert!(caps.is_some());
        assert!(!caps.map(|re| re.is_match("wow")).unwrap_or(true));
    }
}
