//! Built-in sample skills for a first run.

use chrono::Duration;
use tracing::info;

use super::{new_id, SkillStore};
use crate::storage::models::{Milestone, NewSkill, Resource, ResourceType, SkillStatus};

struct SampleSkill {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    status: SkillStatus,
    progress: u8,
    target_in_days: Option<i64>,
    tags: &'static [&'static str],
    /// (title, description, completed)
    milestones: &'static [(&'static str, &'static str, bool)],
    /// (title, url, type)
    resources: &'static [(&'static str, &'static str, ResourceType)],
}

const SAMPLES: &[SampleSkill] = &[
    SampleSkill {
        title: "Learn TypeScript",
        description: "Master TypeScript for type-safe JavaScript development",
        category: "1",
        status: SkillStatus::Learning,
        progress: 45,
        target_in_days: None,
        tags: &["javascript", "typescript", "web"],
        milestones: &[
            ("Complete basic types tutorial", "Learn primitive types, interfaces, and type aliases", true),
            ("Build a TypeScript project", "Create a real-world application using TypeScript", false),
        ],
        resources: &[(
            "TypeScript Official Documentation",
            "https://www.typescriptlang.org/docs/",
            ResourceType::Article,
        )],
    },
    SampleSkill {
        title: "React Hooks",
        description: "Master React hooks including custom hooks",
        category: "2",
        status: SkillStatus::Practiced,
        progress: 75,
        target_in_days: None,
        tags: &["react", "hooks", "frontend"],
        milestones: &[
            ("Learn useState and useEffect", "Master the fundamental React hooks", true),
            ("Create custom hooks", "Build reusable custom hooks for common patterns", true),
        ],
        resources: &[],
    },
    SampleSkill {
        title: "Python Machine Learning",
        description: "Learn ML algorithms with scikit-learn and TensorFlow",
        category: "4",
        status: SkillStatus::ToLearn,
        progress: 0,
        target_in_days: Some(90),
        tags: &["python", "ml", "ai", "data-science"],
        milestones: &[("Complete ML basics course", "Understand fundamental ML concepts", false)],
        resources: &[],
    },
    SampleSkill {
        title: "Docker & Kubernetes",
        description: "Container orchestration and deployment",
        category: "5",
        status: SkillStatus::Learning,
        progress: 30,
        target_in_days: None,
        tags: &["docker", "kubernetes", "devops", "containers"],
        milestones: &[],
        resources: &[(
            "Docker Getting Started",
            "https://docs.docker.com/get-started/",
            ResourceType::Article,
        )],
    },
    SampleSkill {
        title: "UI/UX Design Principles",
        description: "Learn design thinking and user-centered design",
        category: "6",
        status: SkillStatus::ToLearn,
        progress: 10,
        target_in_days: None,
        tags: &["design", "ux", "ui"],
        milestones: &[],
        resources: &[],
    },
    SampleSkill {
        title: "Git Advanced Workflows",
        description: "Master Git branching, rebasing, and collaboration",
        category: "9",
        status: SkillStatus::Mastered,
        progress: 100,
        target_in_days: None,
        tags: &["git", "version-control", "collaboration"],
        milestones: &[
            ("Learn Git basics", "Commit, push, pull, and branch", true),
            ("Master rebasing and merging", "Handle complex merge scenarios", true),
        ],
        resources: &[],
    },
];

impl SkillStore {
    /// Add the sample skills if the store has none. Returns how many were added.
    pub fn seed_sample_data(&mut self) -> usize {
        if !self.skills().is_empty() {
            info!(existing = self.skills().len(), "skills present, not seeding");
            return 0;
        }

        let now = self.clock.now();
        let today = self.clock.today();
        for sample in SAMPLES {
            let milestones = sample
                .milestones
                .iter()
                .map(|(title, description, completed)| Milestone {
                    id: new_id(),
                    title: title.to_string(),
                    description: description.to_string(),
                    completed: *completed,
                    completed_at: completed.then_some(now),
                })
                .collect();
            let resources = sample
                .resources
                .iter()
                .map(|(title, url, kind)| Resource {
                    id: new_id(),
                    title: title.to_string(),
                    url: url.to_string(),
                    kind: *kind,
                })
                .collect();

            self.add_skill(NewSkill {
                title: sample.title.to_string(),
                description: sample.description.to_string(),
                category: sample.category.to_string(),
                status: sample.status,
                progress: sample.progress,
                target_date: sample.target_in_days.map(|days| today + Duration::days(days)),
                tags: sample.tags.iter().map(|t| t.to_string()).collect(),
                milestones,
                resources,
                ..NewSkill::default()
            });
        }

        info!(count = SAMPLES.len(), "seeded sample skills");
        SAMPLES.len()
    }
}
