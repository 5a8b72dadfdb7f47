//! Skill tracker library - personal skill-learning tracker.
//!
//! This crate provides the state store for skills, categories and the
//! activity log, the derived reads (streaks, practice days, dashboard
//! statistics), and the single-slot persistence behind them.

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use store::SkillStore;
