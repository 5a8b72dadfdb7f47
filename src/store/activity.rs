//! Activity log recorder.

use tracing::debug;

use super::{new_id, SkillStore};
use crate::storage::models::{ActivityAction, ActivityLog};

/// The log keeps only this many most-recent entries.
pub const MAX_ACTIVITY_LOGS: usize = 100;

/// Activity entry before id and timestamp are stamped.
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub skill_id: String,
    pub action: ActivityAction,
    pub description: String,
}

impl NewActivityLog {
    pub fn new(skill_id: impl Into<String>, action: ActivityAction, description: impl Into<String>) -> Self {
        Self {
            skill_id: skill_id.into(),
            action,
            description: description.into(),
        }
    }
}

impl SkillStore {
    /// Prepend an entry to the activity log and save.
    pub fn add_activity_log(&mut self, entry: NewActivityLog) -> ActivityLog {
        let log = self.record(entry);
        self.persist();
        log
    }

    /// The `n` newest entries.
    pub fn recent_activity(&self, n: usize) -> &[ActivityLog] {
        let logs = self.activity_logs();
        &logs[..n.min(logs.len())]
    }

    /// Prepend without saving; callers persist once per operation.
    pub(super) fn record(&mut self, entry: NewActivityLog) -> ActivityLog {
        let log = ActivityLog {
            id: new_id(),
            skill_id: entry.skill_id,
            action: entry.action,
            description: entry.description,
            timestamp: self.clock.now(),
        };
        debug!(skill_id = %log.skill_id, action = %log.action, "activity");

        let logs = &mut self.state.activity_logs;
        logs.insert(0, log.clone());
        logs.truncate(MAX_ACTIVITY_LOGS);
        log
    }
}
