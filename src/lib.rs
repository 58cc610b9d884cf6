//! flashdeck: a leveled-interval spaced repetition scheduler for
//! vocabulary units.

pub mod config;
pub mod flashcards;
pub mod store;

pub use config::Config;
pub use flashcards::{Card, CardType, CategoryFilter, StudyMode, StudySession, Unit, UnitRegistry};
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
