//! Study session controller
//!
//! Owns the active unit's cards and drives one review cycle over them:
//! - review mode walks the due queue; each outcome updates and persists one
//!   card, then drops the queue head
//! - browse mode cycles through the cards matching the filter and never
//!   touches scheduling state
//!
//! The controller is passive. Every transition is an explicit method call
//! that takes the current time as epoch milliseconds.

use std::collections::VecDeque;

use super::algorithm::{
    apply_review_outcome, clamp_level, compute_due_queue, learning_stats, reset_card, IntervalTable,
    DEFAULT_MASTERY_LEVEL,
};
use super::card_store::CardStore;
use super::filter::{first_matching_index, matches, next_matching_index, Direction};
use super::models::{Card, CategoryFilter, LearningStats, SessionStats, StudyMode, Unit};
use super::storage::{RegistryError, Result, UnitRegistry};
use crate::store::KeyValueStore;

/// Unit selected when nothing else is configured or remembered
pub const FALLBACK_UNIT_ID: &str = "unit_grade8a_1";

/// Settings a session starts with
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub intervals: IntervalTable,
    pub mastery_level: u32,
    pub default_unit: Option<String>,
    pub filter: CategoryFilter,
    pub mode: StudyMode,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            intervals: IntervalTable::default(),
            mastery_level: DEFAULT_MASTERY_LEVEL,
            default_unit: None,
            filter: CategoryFilter::default(),
            mode: StudyMode::default(),
        }
    }
}

pub struct StudySession<S: KeyValueStore> {
    registry: UnitRegistry<S>,
    cards: CardStore,
    intervals: IntervalTable,
    mastery_level: u32,
    mode: StudyMode,
    filter: CategoryFilter,
    /// Indices into `cards`, consumed from the front
    queue: VecDeque<usize>,
    /// Id of the card under the cursor
    current: Option<String>,
    stats: SessionStats,
}

impl<S: KeyValueStore> StudySession<S> {
    /// Initialize the registry and activate the preferred unit.
    ///
    /// Preference order: `options.default_unit`, the remembered active unit,
    /// [`FALLBACK_UNIT_ID`], then the first unit by name. With no units the
    /// session starts empty.
    pub fn open(mut registry: UnitRegistry<S>, options: SessionOptions, now: i64) -> Result<Self> {
        let units = registry.init(now)?;
        let remembered = registry.active_unit()?;

        let mut session = Self {
            registry,
            cards: CardStore::new(),
            intervals: options.intervals,
            mastery_level: options.mastery_level,
            mode: options.mode,
            filter: options.filter,
            queue: VecDeque::new(),
            current: None,
            stats: SessionStats::default(),
        };

        let candidates = options
            .default_unit
            .into_iter()
            .chain(remembered)
            .chain(std::iter::once(FALLBACK_UNIT_ID.to_string()))
            .chain(units.first().map(|u| u.id.clone()));

        for unit_id in candidates {
            if !units.iter().any(|u| u.id == unit_id) {
                continue;
            }
            match session.switch_unit(&unit_id, now) {
                Ok(()) => break,
                Err(RegistryError::UnitNotFound(id)) => {
                    log::warn!("Registered unit {} has no card data", id);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(session)
    }

    // ==================== Unit Operations ====================

    /// Materialize another unit. On error the session is left unchanged.
    pub fn switch_unit(&mut self, unit_id: &str, now: i64) -> Result<()> {
        let mut cards = self.registry.load_unit_cards(unit_id)?;
        for card in cards.iter_mut() {
            card.level = clamp_level(card.level, &self.intervals);
        }

        self.cards.load(unit_id, cards);
        if let Err(e) = self.registry.set_active_unit(Some(unit_id)) {
            log::warn!("Failed to remember active unit {}: {}", unit_id, e);
        }

        self.stats = SessionStats::default();
        self.current = None;
        self.recompute(now);

        log::info!("Loaded unit {} ({} cards, {} due)", unit_id, self.cards.len(), self.queue.len());
        Ok(())
    }

    /// Register imported cards as a new unit and switch to it
    pub fn create_unit(&mut self, name: String, cards: Vec<Card>, now: i64) -> Result<Unit> {
        let unit = self.registry.create_unit(name, cards, now)?;
        self.switch_unit(&unit.id, now)?;
        Ok(unit)
    }

    /// Delete a unit. Deleting the active unit moves the session to the
    /// registry's next unit, or empties it.
    pub fn delete_unit(&mut self, unit_id: &str, now: i64) -> Result<()> {
        let next = self.registry.delete_unit(unit_id)?;
        if self.cards.unit_id() != Some(unit_id) {
            return Ok(());
        }

        match next {
            Some(next) => {
                if let Err(e) = self.switch_unit(&next, now) {
                    log::warn!("Could not load unit {} after delete: {}", next, e);
                    self.unload();
                }
            }
            None => self.unload(),
        }
        Ok(())
    }

    fn unload(&mut self) {
        self.cards.clear();
        self.queue.clear();
        self.current = None;
        self.stats = SessionStats::default();
    }

    /// Reset every card of the active unit to the never-reviewed state
    pub fn reset_unit(&mut self, now: i64) {
        if self.cards.unit_id().is_none() {
            return;
        }

        self.cards.map_all(reset_card);
        self.persist();
        self.stats = SessionStats::default();
        self.recompute(now);
        if self.mode == StudyMode::Browse {
            self.seat_first_match();
        }
    }

    fn persist(&mut self) {
        let Some(unit_id) = self.cards.unit_id().map(str::to_string) else {
            return;
        };
        if let Err(e) = self.registry.save_unit_cards(&unit_id, self.cards.cards()) {
            log::warn!("Failed to save unit {}: {}", unit_id, e);
        }
    }

    // ==================== Mode and Filter ====================

    /// Enter a mode. Review starts on the head of a freshly computed queue;
    /// browse keeps the current card if it matches the filter. Re-entering
    /// the current mode is a no-op and keeps the pass in progress.
    pub fn set_mode(&mut self, mode: StudyMode, now: i64) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.recompute(now);
    }

    pub fn toggle_mode(&mut self, now: i64) {
        self.set_mode(self.mode.toggled(), now);
    }

    /// Change the category filter and recompute the due queue
    pub fn set_filter(&mut self, filter: CategoryFilter, now: i64) {
        self.filter = filter;
        self.recompute(now);
    }

    pub fn cycle_filter(&mut self, now: i64) {
        self.set_filter(self.filter.cycle(), now);
    }

    /// Rebuild the due queue against `now` and reseat the cursor.
    ///
    /// This is how a caught-up review pass picks up cards that became due
    /// since the queue was last computed.
    pub fn recompute(&mut self, now: i64) {
        self.queue = compute_due_queue(self.cards.cards(), self.filter, now).into();
        log::debug!("Due queue recomputed: {} of {} cards", self.queue.len(), self.cards.len());

        match self.mode {
            StudyMode::Review => self.seat_queue_head(),
            StudyMode::Browse => {
                let still_valid = self
                    .current
                    .as_deref()
                    .and_then(|id| self.cards.find(id))
                    .is_some_and(|card| matches(card, self.filter));
                if !still_valid {
                    self.seat_first_match();
                }
            }
        }
    }

    fn seat_queue_head(&mut self) {
        self.current = self
            .queue
            .front()
            .and_then(|&index| self.cards.get(index))
            .map(|card| card.id.clone());
    }

    fn seat_first_match(&mut self) {
        self.current = first_matching_index(self.cards.cards(), self.filter)
            .and_then(|index| self.cards.get(index))
            .map(|card| card.id.clone());
    }

    // ==================== Review ====================

    /// Record the outcome for the card at the head of the queue.
    ///
    /// Ignored outside review mode or when the queue is exhausted. The card
    /// is not re-queued on failure; it returns on the next recompute.
    pub fn submit_outcome(&mut self, success: bool, now: i64) -> Option<Card> {
        if self.mode != StudyMode::Review {
            return None;
        }
        let index = *self.queue.front()?;
        let card = self.cards.get(index)?;

        let updated = apply_review_outcome(card, success, now, &self.intervals);
        self.cards.replace(index, updated.clone());
        self.persist();
        self.stats.record(success);

        self.queue.pop_front();
        self.seat_queue_head();

        log::debug!(
            "Card {} {} -> level {}",
            updated.id,
            if success { "passed" } else { "failed" },
            updated.level
        );
        Some(updated)
    }

    // ==================== Browse ====================

    /// Move to the next or previous card matching the filter.
    ///
    /// Only meaningful in browse mode; in review mode the cursor stays on
    /// the queue head.
    pub fn navigate(&mut self, direction: Direction) -> Option<&Card> {
        if self.mode == StudyMode::Browse {
            let from = self.current_index();
            if let Some(index) = next_matching_index(self.cards.cards(), from, direction, self.filter) {
                self.current = self.cards.get(index).map(|card| card.id.clone());
            }
        }
        self.current_card()
    }

    // ==================== Accessors ====================

    pub fn current_card(&self) -> Option<&Card> {
        self.current.as_deref().and_then(|id| self.cards.find(id))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current.as_deref().and_then(|id| self.cards.index_of(id))
    }

    /// 1-based rank of the current card among filter matches, with the
    /// number of matches
    pub fn position(&self) -> Option<(usize, usize)> {
        let current = self.current_index()?;
        let mut rank = None;
        let mut total = 0;
        for (index, card) in self.cards.cards().iter().enumerate() {
            if matches(card, self.filter) {
                total += 1;
                if index == current {
                    rank = Some(total);
                }
            }
        }
        rank.map(|rank| (rank, total))
    }

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn queue(&self) -> &VecDeque<usize> {
        &self.queue
    }

    /// Cards left in the current review pass
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Review pass exhausted; call [`StudySession::recompute`] to reopen
    pub fn is_caught_up(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn learning_stats(&self, now: i64) -> LearningStats {
        learning_stats(self.cards.cards(), self.filter, now, self.mastery_level)
    }

    /// Whether any card of the active unit has been promoted
    pub fn has_progress(&self) -> bool {
        self.cards.cards().iter().any(|card| card.level > 0)
    }

    pub fn cards(&self) -> &[Card] {
        self.cards.cards()
    }

    pub fn intervals(&self) -> &IntervalTable {
        &self.intervals
    }

    pub fn active_unit(&self) -> Option<&str> {
        self.cards.unit_id()
    }

    pub fn units(&self) -> Result<Vec<Unit>> {
        self.registry.list_units()
    }

    pub fn registry(&self) -> &UnitRegistry<S> {
        &self.registry
    }
}
