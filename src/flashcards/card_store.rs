//! In-memory card sequence of the active unit

use super::models::Card;

/// Ordered cards of the unit that is currently materialized.
///
/// Only one unit is held at a time. Indices handed out by the scheduler are
/// valid until the next [`CardStore::load`] or [`CardStore::clear`].
#[derive(Debug, Clone, Default)]
pub struct CardStore {
    unit_id: Option<String>,
    cards: Vec<Card>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with another unit's cards
    pub fn load(&mut self, unit_id: impl Into<String>, cards: Vec<Card>) {
        self.unit_id = Some(unit_id.into());
        self.cards = cards;
    }

    pub fn clear(&mut self) {
        self.unit_id = None;
        self.cards.clear();
    }

    pub fn unit_id(&self) -> Option<&str> {
        self.unit_id.as_deref()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Position of the card with `id` in the current sequence
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.cards.iter().position(|card| card.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Overwrite the card at `index`; returns false if out of range
    pub fn replace(&mut self, index: usize, card: Card) -> bool {
        match self.cards.get_mut(index) {
            Some(slot) => {
                *slot = card;
                true
            }
            None => false,
        }
    }

    /// Rewrite every card through `f`
    pub fn map_all<F>(&mut self, f: F)
    where
        F: Fn(&Card) -> Card,
    {
        for card in self.cards.iter_mut() {
            *card = f(card);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::models::CardType;

    #[test]
    fn test_load_replace_and_lookup() {
        let mut store = CardStore::new();
        assert!(store.is_empty());
        assert_eq!(store.unit_id(), None);

        store.load(
            "unit_a",
            vec![
                Card::new("a-0", "art", "艺术", CardType::Word),
                Card::new("a-1", "all kinds of", "各种各样的", CardType::Phrase),
            ],
        );
        assert_eq!(store.unit_id(), Some("unit_a"));
        assert_eq!(store.index_of("a-1"), Some(1));
        assert_eq!(store.find("a-0").map(|c| c.front.as_str()), Some("art"));

        let mut changed = store.get(0).cloned().unwrap();
        changed.level = 3;
        assert!(store.replace(0, changed));
        assert_eq!(store.get(0).unwrap().level, 3);
        assert!(!store.replace(7, Card::new("x", "x", "x", CardType::Word)));

        store.map_all(|c| Card { level: 1, ..c.clone() });
        assert!(store.cards().iter().all(|c| c.level == 1));

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.index_of("a-1"), None);
    }
}
