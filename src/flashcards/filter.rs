//! Category filtering and cyclic navigation over a card sequence

use super::models::{Card, CardType, CategoryFilter};

/// Direction of a browse step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Check whether a card belongs to the filter's working set
pub fn matches(card: &Card, filter: CategoryFilter) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Word => card.card_type == CardType::Word,
        CategoryFilter::Phrase => card.card_type == CardType::Phrase,
    }
}

/// First card in sequence order that matches the filter
pub fn first_matching_index(cards: &[Card], filter: CategoryFilter) -> Option<usize> {
    cards.iter().position(|card| matches(card, filter))
}

/// Walk from `from` in `direction`, wrapping around, to the next matching card.
///
/// `from = None` starts just outside the sequence, so a forward walk begins at
/// index 0 and a backward walk at the last index. At most `cards.len()` steps
/// are taken; if `from` is the only match the walk lands back on it.
pub fn next_matching_index(
    cards: &[Card],
    from: Option<usize>,
    direction: Direction,
    filter: CategoryFilter,
) -> Option<usize> {
    let total = cards.len();
    if total == 0 {
        return None;
    }

    let mut index = match (from.filter(|&i| i < total), direction) {
        (Some(i), _) => i,
        (None, Direction::Forward) => total - 1,
        (None, Direction::Backward) => 0,
    };

    for _ in 0..total {
        index = match direction {
            Direction::Forward => (index + 1) % total,
            Direction::Backward => (index + total - 1) % total,
        };
        if matches(&cards[index], filter) {
            return Some(index);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed() -> Vec<Card> {
        // W P W P P
        [CardType::Word, CardType::Phrase, CardType::Word, CardType::Phrase, CardType::Phrase]
            .iter()
            .enumerate()
            .map(|(i, &t)| Card::new(format!("c{}", i), "f", "b", t))
            .collect()
    }

    #[test]
    fn test_matches() {
        let word = Card::new("w", "f", "b", CardType::Word);
        let phrase = Card::new("p", "f", "b", CardType::Phrase);

        assert!(matches(&word, CategoryFilter::All));
        assert!(matches(&phrase, CategoryFilter::All));
        assert!(matches(&word, CategoryFilter::Word));
        assert!(!matches(&phrase, CategoryFilter::Word));
        assert!(matches(&phrase, CategoryFilter::Phrase));
        assert!(!matches(&word, CategoryFilter::Phrase));
    }

    #[test]
    fn test_forward_wraps_and_skips() {
        let cards = mixed();

        assert_eq!(next_matching_index(&cards, Some(0), Direction::Forward, CategoryFilter::Word), Some(2));
        assert_eq!(next_matching_index(&cards, Some(2), Direction::Forward, CategoryFilter::Word), Some(0));
        assert_eq!(next_matching_index(&cards, Some(4), Direction::Forward, CategoryFilter::All), Some(0));
    }

    #[test]
    fn test_backward_wraps_and_skips() {
        let cards = mixed();

        assert_eq!(next_matching_index(&cards, Some(0), Direction::Backward, CategoryFilter::All), Some(4));
        assert_eq!(next_matching_index(&cards, Some(1), Direction::Backward, CategoryFilter::Phrase), Some(4));
        assert_eq!(next_matching_index(&cards, Some(2), Direction::Backward, CategoryFilter::Word), Some(0));
    }

    #[test]
    fn test_single_match_returns_itself() {
        let mut cards = mixed();
        cards.truncate(2);

        assert_eq!(next_matching_index(&cards, Some(0), Direction::Forward, CategoryFilter::Word), Some(0));
        assert_eq!(next_matching_index(&cards, Some(0), Direction::Backward, CategoryFilter::Word), Some(0));
    }

    #[test]
    fn test_no_match_terminates() {
        let cards: Vec<Card> = mixed().into_iter().filter(|c| c.card_type == CardType::Word).collect();

        assert_eq!(next_matching_index(&cards, Some(0), Direction::Forward, CategoryFilter::Phrase), None);
        assert_eq!(next_matching_index(&[], None, Direction::Forward, CategoryFilter::All), None);
    }

    #[test]
    fn test_start_outside_sequence() {
        let cards = mixed();

        assert_eq!(next_matching_index(&cards, None, Direction::Forward, CategoryFilter::All), Some(0));
        assert_eq!(next_matching_index(&cards, None, Direction::Backward, CategoryFilter::Word), Some(2));
        assert_eq!(next_matching_index(&cards, Some(99), Direction::Forward, CategoryFilter::Phrase), Some(1));
    }

    #[test]
    fn test_first_matching_index() {
        let cards = mixed();

        assert_eq!(first_matching_index(&cards, CategoryFilter::Phrase), Some(1));
        assert_eq!(first_matching_index(&cards, CategoryFilter::Word), Some(0));
        assert_eq!(first_matching_index(&[], CategoryFilter::All), None);
    }
}
