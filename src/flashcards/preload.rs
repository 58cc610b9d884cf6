//! Built-in vocabulary units shipped with the binary

use serde::Deserialize;

use super::models::{Card, CardType};

const BUNDLED_UNITS: &str = include_str!("../../data/preloaded_units.json");

#[derive(Debug, Deserialize)]
struct RawUnit {
    id: String,
    name: String,
    prefix: String,
    #[serde(default)]
    words: Vec<RawEntry>,
    #[serde(default)]
    phrases: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    front: String,
    back: String,
    #[serde(default)]
    pos: Option<String>,
}

/// A unit whose cards are available without any persisted data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadedUnit {
    pub id: String,
    pub name: String,
    pub cards: Vec<Card>,
}

impl PreloadedUnit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cards: Vec<Card>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cards,
        }
    }
}

impl From<RawUnit> for PreloadedUnit {
    fn from(raw: RawUnit) -> Self {
        let words = raw.words.into_iter().enumerate().map(|(i, entry)| Card {
            pos: entry.pos,
            ..Card::new(format!("{}-voc-{}", raw.prefix, i), entry.front, entry.back, CardType::Word)
        });
        let phrases = raw.phrases.into_iter().enumerate().map(|(i, entry)| {
            Card::new(format!("{}-phr-{}", raw.prefix, i), entry.front, entry.back, CardType::Phrase)
        });

        Self {
            id: raw.id,
            name: raw.name,
            cards: words.chain(phrases).collect(),
        }
    }
}

/// Parse the bundled unit data. Words come first, then phrases.
pub fn bundled_units() -> Vec<PreloadedUnit> {
    match serde_json::from_str::<Vec<RawUnit>>(BUNDLED_UNITS) {
        Ok(raw) => raw.into_iter().map(PreloadedUnit::from).collect(),
        Err(e) => {
            log::error!("Failed to parse bundled units: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bundled_units_parse() {
        let units = bundled_units();
        assert_eq!(units.len(), 8);
        assert_eq!(units[0].id, "unit_grade8a_1");
        assert_eq!(units[5].name, "Grade 8A Unit 6");
    }

    #[test]
    fn test_bundled_cards_are_fresh_and_unique() {
        for unit in bundled_units() {
            assert!(!unit.cards.is_empty(), "{} has no cards", unit.id);

            let ids: HashSet<&str> = unit.cards.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids.len(), unit.cards.len(), "duplicate ids in {}", unit.id);

            assert!(unit.cards.iter().all(|c| c.level == 0 && c.next_review == 0));
        }
    }

    #[test]
    fn test_words_precede_phrases() {
        let unit = bundled_units().remove(0);
        let first = &unit.cards[0];

        assert_eq!(first.id, "u1-voc-0");
        assert_eq!(first.front, "intelligent");
        assert_eq!(first.pos.as_deref(), Some("adj."));

        let first_phrase = unit.cards.iter().position(|c| c.card_type == CardType::Phrase).unwrap();
        assert_eq!(unit.cards[first_phrase].id, "u1-phr-0");
        assert!(unit.cards[first_phrase..].iter().all(|c| c.card_type == CardType::Phrase));
    }
}
