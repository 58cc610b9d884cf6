//! Data models for the flashcard scheduler

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Kind of vocabulary item on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardType {
    /// A single word
    Word,
    /// A multi-word phrase
    Phrase,
}

impl Default for CardType {
    fn default() -> Self {
        Self::Word
    }
}

/// A flashcard with a term (front) and its meaning (back), plus the
/// scheduling state the leveled-interval scheduler works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    /// Part of speech, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(rename = "type", default)]
    pub card_type: CardType,
    /// Memory strength bucket, an index into the interval table
    #[serde(default, deserialize_with = "deserialize_level")]
    pub level: u32,
    /// Epoch milliseconds before which the card is not due; 0 = due now
    #[serde(default)]
    pub next_review: i64,
    /// Epoch milliseconds of the most recent review outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<i64>,
}

/// Levels come from persisted JSON that may be corrupted. Negative values are
/// floored to 0 here; the upper bound depends on the interval table and is
/// clamped when the unit is materialized.
fn deserialize_level<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, i64::from(u32::MAX)) as u32)
}

impl Card {
    /// A freshly imported card: level 0 and immediately due
    pub fn new(id: impl Into<String>, front: impl Into<String>, back: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id: id.into(),
            front: front.into(),
            back: back.into(),
            pos: None,
            card_type,
            level: 0,
            next_review: 0,
            last_reviewed: None,
        }
    }

    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.pos = Some(pos.into());
        self
    }

    /// Check if the card is due at `now` (epoch ms)
    pub fn is_due(&self, now: i64) -> bool {
        self.next_review <= now
    }
}

/// A unit is a named collection of cards, as listed in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub name: String,
    /// Card count when the unit was registered. Not kept in sync.
    #[serde(default)]
    pub count: usize,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
}

impl Unit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, count: usize, created_at: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            count,
            created_at,
        }
    }
}

/// Restriction of the working set to one card type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Word,
    Phrase,
}

impl CategoryFilter {
    /// Fixed rotation: all -> word -> phrase -> all
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Word,
            Self::Word => Self::Phrase,
            Self::Phrase => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Word => "word",
            Self::Phrase => "phrase",
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value '{value}', expected one of: {expected}")]
pub struct ParseEnumError {
    value: String,
    expected: &'static str,
}

impl FromStr for CategoryFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "word" | "words" => Ok(Self::Word),
            "phrase" | "phrases" => Ok(Self::Phrase),
            _ => Err(ParseEnumError {
                value: s.to_string(),
                expected: "all, word, phrase",
            }),
        }
    }
}

/// Study mode of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    /// Ungated traversal; never affects scheduling state
    #[default]
    Browse,
    /// Queue-driven; outcomes move cards between levels
    Review,
}

impl StudyMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Browse => Self::Review,
            Self::Review => Self::Browse,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Browse => "browse",
            Self::Review => "review",
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "browse" | "read" => Ok(Self::Browse),
            "review" | "spell" => Ok(Self::Review),
            _ => Err(ParseEnumError {
                value: s.to_string(),
                expected: "browse, review",
            }),
        }
    }
}

/// Progress counts over the cards matching a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    pub total: usize,
    pub due: usize,
    /// Cards at or above the mastery level
    pub mastered: usize,
    pub learning: usize,
}

impl LearningStats {
    /// Mastered share of the total, in percent
    pub fn mastered_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.mastered as f64 * 100.0 / self.total as f64
    }
}

/// Running outcome counters for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub correct: u32,
    pub incorrect: u32,
}

impl SessionStats {
    pub fn record(&mut self, success: bool) {
        if success {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
    }

    pub fn reviewed(&self) -> u32 {
        self.correct + self.incorrect
    }
}
