//! Unit registry on top of a key-value store
//!
//! Keys:
//! ```text
//! flashcards_app_registry_v1      # JSON array of Unit
//! flashcards_active_unit_v1       # JSON string, id of the active unit
//! flashcards_unit_{unit-id}       # JSON array of Card
//! grade8a_unit6_flashcards_v1     # legacy single-unit blob, migrated on init
//! ```
//!
//! Blobs that fail to parse are logged and treated as absent.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Card, Unit};
use super::preload::{bundled_units, PreloadedUnit};
use crate::store::{KeyValueStore, StoreError};

pub const REGISTRY_KEY: &str = "flashcards_app_registry_v1";
pub const ACTIVE_UNIT_KEY: &str = "flashcards_active_unit_v1";
pub const LEGACY_STORAGE_KEY: &str = "grade8a_unit6_flashcards_v1";
pub const UNIT_PREFIX: &str = "flashcards_unit_";

/// Unit the legacy single-unit blob is migrated into
pub const LEGACY_UNIT_ID: &str = "unit_grade8a_6";
const LEGACY_UNIT_NAME: &str = "Grade 8A Unit 6";

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unit not found: {0}")]
    UnitNotFound(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Storage key holding a unit's cards
pub fn unit_key(unit_id: &str) -> String {
    format!("{}{}", UNIT_PREFIX, unit_id)
}

/// Catalogue of units and their persisted cards
pub struct UnitRegistry<S: KeyValueStore> {
    store: S,
    preloads: Vec<PreloadedUnit>,
}

impl<S: KeyValueStore> UnitRegistry<S> {
    /// Registry seeded with the bundled units
    pub fn new(store: S) -> Self {
        Self::with_preloads(store, bundled_units())
    }

    pub fn with_preloads(store: S, preloads: Vec<PreloadedUnit>) -> Self {
        Self { store, preloads }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn preload(&self, unit_id: &str) -> Option<&PreloadedUnit> {
        self.preloads.iter().find(|p| p.id == unit_id)
    }

    /// Read and parse a JSON blob, treating parse failures as absent
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                log::warn!("Ignoring malformed data under '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    fn write_json<T: serde::Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let content = serde_json::to_string(value)?;
        self.store.set(key, &content)?;
        Ok(())
    }

    fn save_units(&mut self, units: &[Unit]) -> Result<()> {
        self.write_json(REGISTRY_KEY, units)
    }

    // ==================== Registry Operations ====================

    /// Prepare the catalogue: migrate legacy data, register preloaded units
    /// and sort by name. Returns the resulting unit list.
    pub fn init(&mut self, now: i64) -> Result<Vec<Unit>> {
        let mut units = self.list_units()?;
        let mut changed = false;

        if units.is_empty() {
            if let Some(unit) = self.migrate_legacy(now)? {
                units.push(unit);
                changed = true;
            }
        }

        let missing: Vec<PreloadedUnit> = self
            .preloads
            .iter()
            .filter(|p| !units.iter().any(|u| u.id == p.id))
            .cloned()
            .collect();
        for preload in missing {
            let key = unit_key(&preload.id);
            if self.store.get(&key)?.is_none() {
                self.write_json(&key, &preload.cards)?;
            }
            units.push(Unit::new(preload.id, preload.name, preload.cards.len(), now));
            changed = true;
        }

        units.sort_by(|a, b| natural_cmp(&a.name, &b.name));

        if changed {
            self.save_units(&units)?;
            log::info!("Registered {} units", units.len());
        }

        Ok(units)
    }

    /// Move the pre-registry single-unit blob into its own unit
    fn migrate_legacy(&mut self, now: i64) -> Result<Option<Unit>> {
        let Some(cards) = self.read_json::<Vec<Card>>(LEGACY_STORAGE_KEY)? else {
            return Ok(None);
        };

        let key = unit_key(LEGACY_UNIT_ID);
        if self.store.get(&key)?.is_some() {
            return Ok(None);
        }

        self.write_json(&key, &cards)?;
        log::info!("Migrated {} legacy cards into {}", cards.len(), LEGACY_UNIT_ID);

        Ok(Some(Unit::new(LEGACY_UNIT_ID, LEGACY_UNIT_NAME, cards.len(), now)))
    }

    /// List all registered units
    pub fn list_units(&self) -> Result<Vec<Unit>> {
        Ok(self.read_json(REGISTRY_KEY)?.unwrap_or_default())
    }

    /// Get a specific unit record
    pub fn get_unit(&self, unit_id: &str) -> Result<Unit> {
        self.list_units()?
            .into_iter()
            .find(|u| u.id == unit_id)
            .ok_or_else(|| RegistryError::UnitNotFound(unit_id.to_string()))
    }

    /// Register a new unit from imported cards.
    ///
    /// Cards enter in the never-reviewed state whatever they carried.
    pub fn create_unit(&mut self, name: String, cards: Vec<Card>, now: i64) -> Result<Unit> {
        let cards: Vec<Card> = cards.iter().map(super::algorithm::reset_card).collect();
        let unit = Unit::new(format!("unit_{}", Uuid::new_v4().simple()), name, cards.len(), now);

        self.write_json(&unit_key(&unit.id), &cards)?;

        let mut units = self.list_units()?;
        units.push(unit.clone());
        units.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        self.save_units(&units)?;

        log::info!("Created unit '{}' with {} cards", unit.name, unit.count);
        Ok(unit)
    }

    /// Delete a unit and its cards.
    ///
    /// Returns the active unit afterwards: unchanged if another unit was
    /// active, otherwise the first remaining unit, or `None` if none remain.
    pub fn delete_unit(&mut self, unit_id: &str) -> Result<Option<String>> {
        let units = self.list_units()?;
        if !units.iter().any(|u| u.id == unit_id) {
            return Err(RegistryError::UnitNotFound(unit_id.to_string()));
        }

        let units: Vec<Unit> = units.into_iter().filter(|u| u.id != unit_id).collect();
        self.save_units(&units)?;
        self.store.remove(&unit_key(unit_id))?;

        let active = self.active_unit()?;
        let active = if active.as_deref() == Some(unit_id) || active.is_none() {
            let next = units.first().map(|u| u.id.clone());
            self.set_active_unit(next.as_deref())?;
            next
        } else {
            active
        };

        log::info!("Deleted unit {}", unit_id);
        Ok(active)
    }

    // ==================== Card Operations ====================

    /// Load a unit's cards.
    ///
    /// Persisted data wins; preloaded data is the fallback when nothing is
    /// persisted or the persisted blob is malformed.
    pub fn load_unit_cards(&self, unit_id: &str) -> Result<Vec<Card>> {
        let key = unit_key(unit_id);
        let persisted = self.store.get(&key)?;

        if let Some(raw) = persisted.as_deref() {
            match serde_json::from_str::<Vec<Card>>(raw) {
                Ok(cards) => return Ok(cards),
                Err(e) => log::warn!("Failed to load cards for {}: {}", unit_id, e),
            }
        }

        match self.preload(unit_id) {
            Some(preload) => Ok(preload.cards.clone()),
            // A blob existed but was unreadable: the unit is empty, not missing
            None if persisted.is_some() => Ok(Vec::new()),
            None => Err(RegistryError::UnitNotFound(unit_id.to_string())),
        }
    }

    /// Persist a unit's cards. The registry count is left as registered.
    pub fn save_unit_cards(&mut self, unit_id: &str, cards: &[Card]) -> Result<()> {
        self.write_json(&unit_key(unit_id), cards)
    }

    // ==================== Active Unit ====================

    pub fn active_unit(&self) -> Result<Option<String>> {
        self.read_json(ACTIVE_UNIT_KEY)
    }

    pub fn set_active_unit(&mut self, unit_id: Option<&str>) -> Result<()> {
        match unit_id {
            Some(id) => self.write_json(ACTIVE_UNIT_KEY, id),
            None => Ok(self.store.remove(ACTIVE_UNIT_KEY)?),
        }
    }
}

/// Case-insensitive comparison that orders digit runs by numeric value,
/// so "Unit 2" sorts before "Unit 10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let n = take_number(&mut left);
                let m = take_number(&mut right);
                let ord = n.trim_start_matches('0').len().cmp(&m.trim_start_matches('0').len())
                    .then_with(|| n.trim_start_matches('0').cmp(m.trim_start_matches('0')));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}
