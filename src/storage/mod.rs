//! Storage module for the skill tracker.
//!
//! Entity model, persisted blob shape, and the slot that holds it.

pub mod models;
pub mod schema;
pub mod slot;

pub use models::*;
pub use schema::{default_categories, PersistedState};
pub use slot::{FileSlot, MemorySlot, StateSlot};
