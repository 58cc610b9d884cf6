//! Leveled-interval spaced repetition
//!
//! Every card sits at an integer level. The level indexes a fixed table of
//! review intervals in minutes:
//! - success moves the card up one level, saturating at the top
//! - failure drops it back to level 0
//!
//! All functions here are pure. They take the current time as epoch
//! milliseconds and never touch storage.

use super::filter::matches;
use super::models::{Card, CategoryFilter, LearningStats};

/// Reference intervals: now, 10 minutes, 1 day, 3 days, 7 days, 14 days
pub const INTERVALS_MINUTES: [u64; 6] = [0, 10, 1440, 4320, 10080, 20160];

/// Cards at or above this level count as mastered
pub const DEFAULT_MASTERY_LEVEL: u32 = 4;

const MINUTE_MS: i64 = 60 * 1000;

/// Ordered minutes-to-next-review, indexed by level. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTable {
    minutes: Vec<u64>,
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self {
            minutes: INTERVALS_MINUTES.to_vec(),
        }
    }
}

impl IntervalTable {
    /// Build a table from minute counts; `None` if empty
    pub fn new(minutes: Vec<u64>) -> Option<Self> {
        if minutes.is_empty() {
            return None;
        }
        Some(Self { minutes })
    }

    /// Number of levels (L)
    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    /// Highest reachable level (L - 1)
    pub fn max_level(&self) -> u32 {
        (self.minutes.len() - 1) as u32
    }

    /// Interval for a level; out-of-range levels use the top interval
    pub fn minutes_for(&self, level: u32) -> u64 {
        self.minutes[clamp_level(level, self) as usize]
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.minutes
    }
}

/// Clamp a possibly corrupted level into `[0, L-1]`
pub fn clamp_level(level: u32, intervals: &IntervalTable) -> u32 {
    level.min(intervals.max_level())
}

/// Timestamp `minutes` after `now`, saturating instead of overflowing
fn offset_by_minutes(now: i64, minutes: u64) -> i64 {
    let minutes = i64::try_from(minutes).unwrap_or(i64::MAX);
    now.saturating_add(minutes.saturating_mul(MINUTE_MS))
}

/// Level a card moves to after an outcome
pub fn next_level(level: u32, success: bool, intervals: &IntervalTable) -> u32 {
    if success {
        clamp_level(level, intervals)
            .saturating_add(1)
            .min(intervals.max_level())
    } else {
        0
    }
}

/// Apply a review outcome to one card.
///
/// Only `level`, `next_review` and `last_reviewed` change; the returned card
/// is otherwise identical to `card`.
pub fn apply_review_outcome(card: &Card, success: bool, now: i64, intervals: &IntervalTable) -> Card {
    let level = next_level(card.level, success, intervals);

    Card {
        level,
        next_review: offset_by_minutes(now, intervals.minutes_for(level)),
        last_reviewed: Some(now),
        ..card.clone()
    }
}

/// Return a card to the never-reviewed state
pub fn reset_card(card: &Card) -> Card {
    Card {
        level: 0,
        next_review: 0,
        last_reviewed: None,
        ..card.clone()
    }
}

/// Indices of due cards accepted by `predicate`, lowest level first.
///
/// The sort is stable, so cards on the same level keep their sequence order.
pub fn compute_due_queue_by<F>(cards: &[Card], predicate: F, now: i64) -> Vec<usize>
where
    F: Fn(&Card) -> bool,
{
    let mut due: Vec<usize> = cards
        .iter()
        .enumerate()
        .filter(|(_, card)| card.is_due(now) && predicate(card))
        .map(|(index, _)| index)
        .collect();

    due.sort_by_key(|&index| cards[index].level);
    due
}

/// Due queue restricted to a category filter
pub fn compute_due_queue(cards: &[Card], filter: CategoryFilter, now: i64) -> Vec<usize> {
    compute_due_queue_by(cards, |card| matches(card, filter), now)
}

/// Next-review timestamps the card would get for (success, failure)
pub fn preview_next_review(card: &Card, now: i64, intervals: &IntervalTable) -> (i64, i64) {
    let pass = apply_review_outcome(card, true, now, intervals).next_review;
    let fail = apply_review_outcome(card, false, now, intervals).next_review;
    (pass, fail)
}

/// Interval in minutes the card would get for (success, failure)
pub fn preview_intervals(card: &Card, intervals: &IntervalTable) -> (u64, u64) {
    let pass = intervals.minutes_for(next_level(card.level, true, intervals));
    let fail = intervals.minutes_for(next_level(card.level, false, intervals));
    (pass, fail)
}

/// Progress counts over the cards matching `filter`
pub fn learning_stats(cards: &[Card], filter: CategoryFilter, now: i64, mastery_level: u32) -> LearningStats {
    let mut stats = LearningStats::default();

    for card in cards.iter().filter(|card| matches(card, filter)) {
        stats.total += 1;
        if card.is_due(now) {
            stats.due += 1;
        }
        if card.level >= mastery_level {
            stats.mastered += 1;
        }
    }
    stats.learning = stats.total - stats.mastered;

    stats
}

/// Format an interval in minutes to a compact label
pub fn format_interval(minutes: u64) -> String {
    const HOUR: u64 = 60;
    const DAY: u64 = 24 * HOUR;

    if minutes == 0 {
        "now".to_string()
    } else if minutes < HOUR {
        format!("{}m", minutes)
    } else if minutes < DAY {
        format!("{}h", minutes / HOUR)
    } else {
        let days = minutes / DAY;
        if days < 7 {
            format!("{}d", days)
        } else if days < 30 {
            format!("{}w", days / 7)
        } else if days < 365 {
            format!("{}mo", days / 30)
        } else {
            format!("{}y", days / 365)
        }
    }
}
