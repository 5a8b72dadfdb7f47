//! The skill store: owned state plus every mutation and derived read.
//!
//! Operations that receive an unknown id do nothing and return nothing
//! (or an empty/false/zero read). Every mutation saves the whole state to
//! the slot; a failed save is logged and retried on the next mutation or
//! an explicit [`SkillStore::flush`].

mod activity;
mod categories;
mod milestones;
mod progress;
mod seed;
mod skills;
mod stats;
mod todos;

pub use activity::{NewActivityLog, MAX_ACTIVITY_LOGS};
pub use skills::SkillQuery;
pub use stats::{CategoryCount, SkillStats};
pub use todos::{TodoEntry, TodoQuery, TodoSort, TodoState, TodoStats};

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::StoreResult;
use crate::storage::models::{ActivityLog, Category, Skill};
use crate::storage::{PersistedState, StateSlot};

/// Single owned aggregate of skills, categories and the activity log.
pub struct SkillStore {
    state: PersistedState,
    slot: Box<dyn StateSlot>,
    clock: Box<dyn Clock>,
    dirty: bool,
}

impl SkillStore {
    /// Load state from `slot`, falling back to the built-in defaults when
    /// the slot is empty.
    pub fn open(slot: impl StateSlot + 'static, clock: impl Clock + 'static) -> StoreResult<Self> {
        let state = match slot.load()? {
            Some(state) => state,
            None => {
                info!(slot = %slot.describe(), "initializing default state");
                PersistedState::default()
            }
        };

        Ok(Self {
            state,
            slot: Box::new(slot),
            clock: Box::new(clock),
            dirty: false,
        })
    }

    /// Save the current state, surfacing any write error.
    pub fn flush(&mut self) -> StoreResult<()> {
        self.slot.save(&self.state)?;
        self.dirty = false;
        Ok(())
    }

    /// Whether the last save attempt failed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current local date according to the store's clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ========== Reads ==========

    /// All skills in insertion order.
    pub fn skills(&self) -> &[Skill] {
        &self.state.skills
    }

    /// Get a skill by ID.
    pub fn skill(&self, id: &str) -> Option<Skill> {
        self.find_skill(id).cloned()
    }

    pub fn categories(&self) -> &[Category] {
        &self.state.categories
    }

    /// Get a category by ID.
    pub fn category(&self, id: &str) -> Option<Category> {
        self.state.categories.iter().find(|c| c.id == id).cloned()
    }

    /// Activity log, newest first.
    pub fn activity_logs(&self) -> &[ActivityLog] {
        &self.state.activity_logs
    }

    /// Copy of the full persisted state.
    pub fn export_state(&self) -> PersistedState {
        self.state.clone()
    }

    /// Replace the whole state, e.g. from an exported blob.
    pub fn import_state(&mut self, state: PersistedState) {
        info!(
            skills = state.skills.len(),
            categories = state.categories.len(),
            logs = state.activity_logs.len(),
            "importing state"
        );
        self.state = state;
        self.persist();
    }

    // ========== Internals ==========

    fn find_skill(&self, id: &str) -> Option<&Skill> {
        self.state.skills.iter().find(|s| s.id == id)
    }

    /// Run `f` against the skill and refresh its `updatedAt`.
    /// Returns `None` without touching anything if the id is unknown.
    fn with_skill_mut<R>(&mut self, id: &str, f: impl FnOnce(&mut Skill) -> R) -> Option<R> {
        let now = self.clock.now();
        let skill = self.state.skills.iter_mut().find(|s| s.id == id)?;
        let result = f(skill);
        skill.updated_at = now;
        Some(result)
    }

    fn persist(&mut self) {
        match self.slot.save(&self.state) {
            Ok(()) => self.dirty = false,
            Err(err) => {
                warn!(slot = %self.slot.describe(), error = %err, "failed to save state");
                self.dirty = true;
            }
        }
    }
}

impl std::fmt::Debug for SkillStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillStore")
            .field("slot", &self.slot.describe())
            .field("skills", &self.state.skills.len())
            .field("categories", &self.state.categories.len())
            .field("activity_logs", &self.state.activity_logs.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
