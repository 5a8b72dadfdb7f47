//! Dashboard aggregates.

use std::collections::HashMap;

use serde::Serialize;

use super::SkillStore;
use crate::storage::models::SkillStatus;

/// Categories shown in the breakdown.
const MAX_CATEGORY_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillStats {
    pub total: usize,
    pub to_learn: usize,
    pub learning: usize,
    pub practiced: usize,
    pub mastered: usize,
    /// Mean progress rounded to the nearest integer; 0 with no skills.
    pub average_progress: u8,
}

impl SkillStats {
    pub fn count(&self, status: SkillStatus) -> usize {
        match status {
            SkillStatus::ToLearn => self.to_learn,
            SkillStatus::Learning => self.learning,
            SkillStatus::Practiced => self.practiced,
            SkillStatus::Mastered => self.mastered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category_id: String,
    pub name: String,
    pub color: String,
    pub count: usize,
}

impl SkillStore {
    pub fn stats(&self) -> SkillStats {
        let skills = self.skills();
        let mut stats = SkillStats {
            total: skills.len(),
            ..SkillStats::default()
        };

        let mut progress_sum: u64 = 0;
        for skill in skills {
            progress_sum += u64::from(skill.progress);
            match skill.status {
                SkillStatus::ToLearn => stats.to_learn += 1,
                SkillStatus::Learning => stats.learning += 1,
                SkillStatus::Practiced => stats.practiced += 1,
                SkillStatus::Mastered => stats.mastered += 1,
            }
        }

        if !skills.is_empty() {
            let mean = progress_sum as f64 / skills.len() as f64;
            stats.average_progress = mean.round().min(f64::from(u8::MAX)) as u8;
        }
        stats
    }

    /// Known categories with at least one skill, most populated first.
    /// Skills pointing at a deleted category are not counted.
    pub fn category_breakdown(&self) -> Vec<CategoryCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for skill in self.skills() {
            *counts.entry(skill.category.as_str()).or_default() += 1;
        }

        let mut rows: Vec<CategoryCount> = self
            .categories()
            .iter()
            .filter_map(|category| {
                let count = counts.get(category.id.as_str()).copied().unwrap_or(0);
                (count > 0).then(|| CategoryCount {
                    category_id: category.id.clone(),
                    name: category.name.clone(),
                    color: category.color.clone(),
                    count,
                })
            })
            .collect();

        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows.truncate(MAX_CATEGORY_ROWS);
        rows
    }
}
