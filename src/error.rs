//! Error kinds for the skill tracker.
//!
//! Store operations never fail on unknown ids; they are silent no-ops.
//! These kinds are raised by the persistence layer and by callers that
//! want to report a missing skill or category to the user.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for persistence and lookup failures.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("skill not found: {0}")]
    SkillNotFound(String),

    #[error("category not found: {0}")]
    CategoryNotFound(String),

    #[error("todo not found: {todo_id} (skill {skill_id})")]
    TodoNotFound { skill_id: String, todo_id: String },

    #[error("milestone not found: {milestone_id} (skill {skill_id})")]
    MilestoneNotFound {
        skill_id: String,
        milestone_id: String,
    },

    #[error("resource not found: {resource_id} (skill {skill_id})")]
    ResourceNotFound {
        skill_id: String,
        resource_id: String,
    },

    #[error("malformed persisted state in {}: {source}", path.display())]
    MalformedState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
