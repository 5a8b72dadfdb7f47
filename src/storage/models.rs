//! Data models for the skill tracker.
//!
//! Field names serialize in camelCase so the persisted blob keeps the shape
//! of the browser version (`createdAt`, `dailyProgress`, `skillId`, ...).

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A learnable topic tracked by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    /// Unique identifier, immutable after creation.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Id of a [`Category`]. Not checked; may dangle after a category is deleted.
    #[serde(default)]
    pub category: String,
    pub status: SkillStatus,
    /// Self-reported progress, 0-100. Independent of `status`.
    #[serde(default)]
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation of the skill.
    pub updated_at: DateTime<Utc>,
    /// The browser form saves `""` when no date is picked; read as `None`.
    #[serde(
        default,
        deserialize_with = "blank_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// At most one entry per date.
    #[serde(default)]
    pub daily_progress: Vec<DailyProgress>,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

/// Position of a skill in the learning pipeline.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SkillStatus {
    #[default]
    ToLearn,
    Learning,
    Practiced,
    Mastered,
}

impl SkillStatus {
    /// All statuses in pipeline order.
    pub const ALL: [SkillStatus; 4] = [
        SkillStatus::ToLearn,
        SkillStatus::Learning,
        SkillStatus::Practiced,
        SkillStatus::Mastered,
    ];

    /// Wire token, e.g. `to-learn`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillStatus::ToLearn => "to-learn",
            SkillStatus::Learning => "learning",
            SkillStatus::Practiced => "practiced",
            SkillStatus::Mastered => "mastered",
        }
    }

    /// Human-readable column label.
    pub fn label(&self) -> &'static str {
        match self {
            SkillStatus::ToLearn => "To Learn",
            SkillStatus::Learning => "Learning",
            SkillStatus::Practiced => "Practiced",
            SkillStatus::Mastered => "Mastered",
        }
    }
}

impl fmt::Display for SkillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A checkpoint within a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Learning material attached to a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Article,
    Video,
    Book,
    Course,
    Other,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceType::Article => "article",
            ResourceType::Video => "video",
            ResourceType::Book => "book",
            ResourceType::Course => "course",
            ResourceType::Other => "other",
        };
        f.pad(s)
    }
}

/// A task scoped to a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    #[serde(
        default,
        deserialize_with = "blank_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDate>,
}

/// Todo priority. Ordering is high before low.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort rank; lower sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.pad(s)
    }
}

/// One practiced calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub practiced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Grouping for skills. Referenced by id, never owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Symbolic icon name, e.g. `Code`.
    #[serde(default)]
    pub icon: String,
    /// Display color token, e.g. `#3b82f6`.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

/// Entry in the newest-first audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    /// Referenced skill; the entry is removed when the skill is deleted.
    pub skill_id: String,
    pub action: ActivityAction,
    /// Rendered when the entry is written, never recomputed.
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
    MilestoneCompleted,
    StatusChanged,
    DailyCheckin,
    TodoCompleted,
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityAction::Created => "created",
            ActivityAction::Updated => "updated",
            ActivityAction::MilestoneCompleted => "milestone_completed",
            ActivityAction::StatusChanged => "status_changed",
            ActivityAction::DailyCheckin => "daily_checkin",
            ActivityAction::TodoCompleted => "todo_completed",
        };
        f.pad(s)
    }
}

/// Optional `YYYY-MM-DD` date where null and `""` both mean unset.
fn blank_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s.parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

// ========== Inputs ==========

/// Fields for a new skill. Id and timestamps are assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewSkill {
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: SkillStatus,
    pub progress: u8,
    pub target_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub milestones: Vec<Milestone>,
    pub resources: Vec<Resource>,
    pub daily_progress: Vec<DailyProgress>,
    pub todos: Vec<Todo>,
}

/// Partial update for a skill. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct SkillUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<SkillStatus>,
    pub progress: Option<u8>,
    /// `Some(None)` clears the target date.
    pub target_date: Option<Option<NaiveDate>>,
    pub tags: Option<Vec<String>>,
    pub milestones: Option<Vec<Milestone>>,
    pub resources: Option<Vec<Resource>>,
    pub daily_progress: Option<Vec<DailyProgress>>,
    pub todos: Option<Vec<Todo>>,
}

impl SkillUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.progress.is_none()
            && self.target_date.is_none()
            && self.tags.is_none()
            && self.milestones.is_none()
            && self.resources.is_none()
            && self.daily_progress.is_none()
            && self.todos.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTodo {
    pub title: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewMilestone {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewResource {
    pub title: String,
    pub url: String,
    pub kind: ResourceType,
}
