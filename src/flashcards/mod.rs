//! Flashcard units and leveled-interval spaced repetition
//!
//! This module provides:
//! - Card and unit models
//! - The scheduler (due queue, level transitions, reset)
//! - Category filtering and browse navigation
//! - The unit registry over an injected key-value store
//! - The study session controller

pub mod algorithm;
pub mod card_store;
pub mod filter;
pub mod models;
pub mod preload;
pub mod session;
pub mod storage;

pub use algorithm::{IntervalTable, INTERVALS_MINUTES};
pub use card_store::CardStore;
pub use filter::Direction;
pub use models::*;
pub use preload::PreloadedUnit;
pub use session::{SessionOptions, StudySession};
pub use storage::{RegistryError, UnitRegistry};
