//! Lexical feedback sentiment classifier
//!
//! Keyword-match classifier used only for the feedback sentiment tally.
//! Distinct from the ML prediction models: this never leaves the
//! analytics core. Positive words win over negative when both appear,
//! matching the established dashboard behavior.

use serde_json::Value;

use crate::store::Document;

pub const SENTIMENT_KEYS: &[&str] = &["positive", "neutral", "negative"];

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "awesome", "love", "happy", "fantastic",
    "wonderful", "amazing", "perfect", "superb", "outstanding", "brilliant",
    "fabulous", "terrific", "marvelous", "delightful", "pleased", "joyful",
    "ecstatic", "thrilled", "satisfied", "glad", "content", "cheerful",
    "jubilant", "elated", "grateful", "optimistic", "hopeful", "blissful",
    "radiant", "peaceful", "lucky", "fortunate", "victorious", "proud",
    "admirable", "charming", "enjoyable", "pleasant", "refreshing", "reliable",
    "valuable", "superior", "stellar", "phenomenal", "incredible",
    "exceptional", "splendid", "magnificent", "remarkable", "sublime",
    "upbeat", "vibrant", "wholesome", "worthy", "commendable", "dazzling",
    "elegant", "exhilarating", "flawless", "glorious", "heartwarming",
    "ideal", "jovial", "kind", "laudable", "majestic", "noble", "overjoyed",
    "tranquil", "valued", "wondrous", "excited", "fun", "loved", "nice",
    "positive", "sweet", "welcoming", "helpful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "terrible", "hate", "angry", "sad", "awful", "horrible",
    "disgusting", "ugly", "worst", "painful", "annoying", "appalling",
    "atrocious", "boring", "broken", "cruel", "damaged", "depressed",
    "dire", "dirty", "disappointing", "disastrous", "dreadful", "dreary",
    "fearful", "filthy", "foul", "frightening", "ghastly", "grim", "gross",
    "harmful", "harsh", "hideous", "hostile", "hurtful", "infuriating",
    "irritating", "lousy", "malicious", "mean", "messy", "nasty",
    "objectionable", "offensive", "oppressive", "pathetic", "repulsive",
    "revolting", "rotten", "scary", "sick", "sickening", "slow", "sorry",
    "stressful", "stupid", "substandard", "suspicious", "tense",
    "threatening", "unhappy", "unpleasant", "unsatisfactory", "unwanted",
    "unwelcome", "upset", "useless", "vile", "weary", "woeful", "worthless",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

/// Classify one feedback message. Substring match over the lowercased
/// text; no word hit either way means neutral.
pub fn classify(message: &str) -> Sentiment {
    let message = message.to_lowercase();
    if POSITIVE_WORDS.iter().any(|word| message.contains(word)) {
        Sentiment::Positive
    } else if NEGATIVE_WORDS.iter().any(|word| message.contains(word)) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Extractor-shaped helper for the aggregation engine.
pub fn sentiment_bucket(doc: &Document) -> Option<String> {
    let message = match doc.get("message").unwrap_or(&Value::Null) {
        Value::String(s) => s.as_str(),
        _ => "",
    };
    Some(classify(message).key().to_string())
}
