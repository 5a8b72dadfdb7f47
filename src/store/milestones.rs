//! Milestones and resources embedded in a skill.

use tracing::debug;

use super::{new_id, NewActivityLog, SkillStore};
use crate::storage::models::{ActivityAction, Milestone, NewMilestone, NewResource, Resource};

impl SkillStore {
    pub fn add_milestone(&mut self, skill_id: &str, data: NewMilestone) -> Option<Milestone> {
        let milestone = Milestone {
            id: new_id(),
            title: data.title,
            description: data.description,
            completed: false,
            completed_at: None,
        };

        self.with_skill_mut(skill_id, |skill| skill.milestones.push(milestone.clone()))?;
        self.persist();
        Some(milestone)
    }

    /// Flip `completed`. `completedAt` is set on completion and cleared on
    /// revert; only completion is logged.
    pub fn toggle_milestone(&mut self, skill_id: &str, milestone_id: &str) {
        let now = self.clock.now();
        let Some(index) = self.milestone_index(skill_id, milestone_id) else {
            debug!(skill_id, milestone_id, "toggle_milestone: unknown milestone");
            return;
        };

        let completed = self.with_skill_mut(skill_id, |skill| {
            let milestone = &mut skill.milestones[index];
            milestone.completed = !milestone.completed;
            milestone.completed_at = milestone.completed.then_some(now);
            milestone.completed.then(|| milestone.title.clone())
        });

        if let Some(Some(title)) = completed {
            self.record(NewActivityLog::new(
                skill_id,
                ActivityAction::MilestoneCompleted,
                format!("Completed milestone: {title}"),
            ));
        }
        self.persist();
    }

    pub fn delete_milestone(&mut self, skill_id: &str, milestone_id: &str) {
        let Some(index) = self.milestone_index(skill_id, milestone_id) else {
            debug!(skill_id, milestone_id, "delete_milestone: unknown milestone");
            return;
        };
        self.with_skill_mut(skill_id, |skill| {
            skill.milestones.remove(index);
        });
        self.persist();
    }

    pub fn add_resource(&mut self, skill_id: &str, data: NewResource) -> Option<Resource> {
        let resource = Resource {
            id: new_id(),
            title: data.title,
            url: data.url,
            kind: data.kind,
        };

        self.with_skill_mut(skill_id, |skill| skill.resources.push(resource.clone()))?;
        self.persist();
        Some(resource)
    }

    pub fn delete_resource(&mut self, skill_id: &str, resource_id: &str) {
        let index = self
            .find_skill(skill_id)
            .and_then(|skill| skill.resources.iter().position(|r| r.id == resource_id));
        let Some(index) = index else {
            debug!(skill_id, resource_id, "delete_resource: unknown resource");
            return;
        };
        self.with_skill_mut(skill_id, |skill| {
            skill.resources.remove(index);
        });
        self.persist();
    }

    fn milestone_index(&self, skill_id: &str, milestone_id: &str) -> Option<usize> {
        self.find_skill(skill_id)?
            .milestones
            .iter()
            .position(|m| m.id == milestone_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::ResourceType;
    use crate::store::test_support::*;

    #[test]
    fn test_milestone_toggle_sets_and_clears_completed_at() {
        let (_slot, mut store) = store_on(day(2024, 6, 1));
        let skill = store.add_skill(new_skill("Rust"));
        let m = store
            .add_milestone(
                &skill.id,
                NewMilestone {
                    title: "Finish the book".to_string(),
                    description: String::new(),
                },
            )
            .unwrap();

        store.toggle_milestone(&skill.id, &m.id);
        let done = store.skill(&skill.id).unwrap().milestones[0].clone();
        assert!(done.completed);
        assert!(done.completed_at.is_some());
        assert_eq!(store.activity_logs()[0].action, ActivityAction::MilestoneCompleted);
        assert_eq!(store.activity_logs()[0].description, "Completed milestone: Finish the book");

        store.toggle_milestone(&skill.id, &m.id);
        let reopened = store.skill(&skill.id).unwrap().milestones[0].clone();
        assert!(!reopened.completed);
        assert!(reopened.completed_at.is_none());
        assert_eq!(store.activity_logs().len(), 2);
    }

    #[test]
    fn test_milestone_unknown_ids() {
        let (_slot, mut store) = store_on(day(2024, 6, 1));
        let skill = store.add_skill(new_skill("Rust"));
        assert!(store.add_milestone("missing", NewMilestone::default()).is_none());

        let before = store.export_state();
        store.toggle_milestone(&skill.id, "missing");
        store.delete_milestone(&skill.id, "missing");
        store.delete_resource(&skill.id, "missing");
        store.toggle_milestone("missing", "missing");
        assert_eq!(store.export_state(), before);
    }

    #[test]
    fn test_delete_milestone() {
        let (_slot, mut store) = store_on(day(2024, 6, 1));
        let skill = store.add_skill(new_skill("Rust"));
        let a = store.add_milestone(&skill.id, NewMilestone::default()).unwrap();
        let b = store.add_milestone(&skill.id, NewMilestone::default()).unwrap();

        store.delete_milestone(&skill.id, &a.id);
        let milestones = store.skill(&skill.id).unwrap().milestones;
        assert_eq!(milestones, vec![b]);
    }

    #[test]
    fn test_resources() {
        let (_slot, mut store) = store_on(day(2024, 6, 1));
        let skill = store.add_skill(new_skill("Rust"));
        let r = store
            .add_resource(
                &skill.id,
                NewResource {
                    title: "The Book".to_string(),
                    url: "https://doc.rust-lang.org/book/".to_string(),
                    kind: ResourceType::Book,
                },
            )
            .unwrap();
        assert_eq!(store.skill(&skill.id).unwrap().resources, vec![r.clone()]);

        store.delete_resource(&skill.id, &r.id);
        assert!(store.skill(&skill.id).unwrap().resources.is_empty());
    }
}
