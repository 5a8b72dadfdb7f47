//! Skill CRUD and skill filters.

use std::collections::HashSet;

use tracing::debug;

use super::{new_id, NewActivityLog, SkillStore};
use crate::storage::models::{
    ActivityAction, DailyProgress, NewSkill, Skill, SkillStatus, SkillUpdate,
};

/// Search over skills as shown on the all-skills page.
#[derive(Debug, Clone, Default)]
pub struct SkillQuery {
    /// Case-insensitive text matched against title, description and tags.
    pub text: Option<String>,
    pub status: Option<SkillStatus>,
    pub category: Option<String>,
}

impl SkillStore {
    /// Create a skill. No validation: empty titles and unknown categories are kept.
    pub fn add_skill(&mut self, data: NewSkill) -> Skill {
        let now = self.clock.now();
        let skill = Skill {
            id: new_id(),
            title: data.title,
            description: data.description,
            category: data.category,
            status: data.status,
            progress: data.progress,
            created_at: now,
            updated_at: now,
            target_date: data.target_date,
            tags: data.tags,
            milestones: data.milestones,
            resources: data.resources,
            daily_progress: one_per_date(data.daily_progress),
            todos: data.todos,
        };
        debug!(id = %skill.id, title = %skill.title, "adding skill");

        self.state.skills.push(skill.clone());
        self.record(NewActivityLog::new(
            &skill.id,
            ActivityAction::Created,
            format!("Created skill: {}", skill.title),
        ));
        self.persist();
        skill
    }

    /// Merge `updates` into the skill.
    ///
    /// A status in `updates` always logs `status_changed`, even when it
    /// equals the current status.
    pub fn update_skill(&mut self, id: &str, updates: SkillUpdate) {
        let status = updates.status;
        let applied = self.with_skill_mut(id, |skill| apply_update(skill, updates));
        if applied.is_none() {
            debug!(id, "update_skill: unknown skill");
            return;
        }

        if let Some(status) = status {
            self.record(NewActivityLog::new(
                id,
                ActivityAction::StatusChanged,
                format!("Changed status to: {status}"),
            ));
        }
        self.persist();
    }

    /// Remove the skill, everything it owns, and its activity entries.
    pub fn delete_skill(&mut self, id: &str) {
        let before = self.state.skills.len();
        self.state.skills.retain(|s| s.id != id);
        if self.state.skills.len() == before {
            debug!(id, "delete_skill: unknown skill");
            return;
        }

        self.state.activity_logs.retain(|log| log.skill_id != id);
        debug!(id, "deleted skill");
        self.persist();
    }

    pub fn get_skills_by_category(&self, category_id: &str) -> Vec<Skill> {
        self.state
            .skills
            .iter()
            .filter(|s| s.category == category_id)
            .cloned()
            .collect()
    }

    pub fn get_skills_by_status(&self, status: SkillStatus) -> Vec<Skill> {
        self.state
            .skills
            .iter()
            .filter(|s| s.status == status)
            .cloned()
            .collect()
    }

    /// Skills matching every set field of `query`, in insertion order.
    pub fn search_skills(&self, query: &SkillQuery) -> Vec<Skill> {
        let needle = query.text.as_deref().map(str::to_lowercase);
        self.state
            .skills
            .iter()
            .filter(|s| query.status.map_or(true, |status| s.status == status))
            .filter(|s| query.category.as_deref().map_or(true, |c| s.category == c))
            .filter(|s| needle.as_deref().map_or(true, |n| matches_text(s, n)))
            .cloned()
            .collect()
    }
}

fn apply_update(skill: &mut Skill, updates: SkillUpdate) {
    let SkillUpdate {
        title,
        description,
        category,
        status,
        progress,
        target_date,
        tags,
        milestones,
        resources,
        daily_progress,
        todos,
    } = updates;

    if let Some(title) = title {
        skill.title = title;
    }
    if let Some(description) = description {
        skill.description = description;
    }
    if let Some(category) = category {
        skill.category = category;
    }
    if let Some(status) = status {
        skill.status = status;
    }
    if let Some(progress) = progress {
        skill.progress = progress;
    }
    if let Some(target_date) = target_date {
        skill.target_date = target_date;
    }
    if let Some(tags) = tags {
        skill.tags = tags;
    }
    if let Some(milestones) = milestones {
        skill.milestones = milestones;
    }
    if let Some(resources) = resources {
        skill.resources = resources;
    }
    if let Some(daily_progress) = daily_progress {
        skill.daily_progress = one_per_date(daily_progress);
    }
    if let Some(todos) = todos {
        skill.todos = todos;
    }
}

/// Drop later entries for a date already seen.
fn one_per_date(mut entries: Vec<DailyProgress>) -> Vec<DailyProgress> {
    let mut seen = HashSet::new();
    entries.retain(|p| seen.insert(p.date));
    entries
}

fn matches_text(skill: &Skill, needle: &str) -> bool {
    skill.title.to_lowercase().contains(needle)
        || skill.description.to_lowercase().contains(needle)
        || skill.tags.iter().any(|t| t.to_lowercase().contains(needle))
}
