//! Daily practice check-ins and the streak derived from them.

use chrono::NaiveDate;
use tracing::debug;

use super::{NewActivityLog, SkillStore};
use crate::storage::models::{ActivityAction, DailyProgress};

impl SkillStore {
    /// Mark `date` practiced, or unmark it if an entry already exists.
    ///
    /// Unmarking drops the entry along with its notes and is not logged.
    pub fn toggle_daily_progress(&mut self, skill_id: &str, date: NaiveDate, notes: Option<String>) {
        let outcome = self.with_skill_mut(skill_id, |skill| {
            match skill.daily_progress.iter().position(|p| p.date == date) {
                Some(index) => {
                    skill.daily_progress.remove(index);
                    None
                }
                None => {
                    skill.daily_progress.push(DailyProgress {
                        date,
                        practiced: true,
                        notes,
                    });
                    Some(skill.title.clone())
                }
            }
        });

        match outcome {
            None => debug!(skill_id, "toggle_daily_progress: unknown skill"),
            Some(None) => {
                debug!(skill_id, %date, "unmarked practice day");
                self.persist();
            }
            Some(Some(title)) => {
                self.record(NewActivityLog::new(
                    skill_id,
                    ActivityAction::DailyCheckin,
                    format!("Practiced {title} on {date}"),
                ));
                self.persist();
            }
        }
    }

    /// Whether `date` is marked practiced. False for unknown skills.
    pub fn get_daily_progress_for_date(&self, skill_id: &str, date: NaiveDate) -> bool {
        self.find_skill(skill_id).map_or(false, |skill| {
            skill
                .daily_progress
                .iter()
                .any(|p| p.date == date && p.practiced)
        })
    }

    /// Consecutive practiced days ending today or yesterday.
    pub fn get_streak(&self, skill_id: &str) -> u32 {
        self.streak_as_of(skill_id, self.clock.today())
    }

    /// Streak as seen on `today`.
    pub fn streak_as_of(&self, skill_id: &str, today: NaiveDate) -> u32 {
        let Some(skill) = self.find_skill(skill_id) else {
            return 0;
        };

        let mut dates: Vec<NaiveDate> = skill
            .daily_progress
            .iter()
            .filter(|p| p.practiced)
            .map(|p| p.date)
            .collect();
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates.dedup();

        count_streak(&dates, today)
    }

    pub fn get_total_practice_days(&self, skill_id: &str) -> usize {
        self.find_skill(skill_id).map_or(0, |skill| {
            skill.daily_progress.iter().filter(|p| p.practiced).count()
        })
    }
}

/// `dates` must be sorted newest first without duplicates.
fn count_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&latest) = dates.first() else {
        return 0;
    };

    // Anchor at today or yesterday; anything older (or in the future) means
    // the streak is already broken.
    let yesterday = today.pred_opt();
    let mut expected = if latest == today {
        today
    } else if Some(latest) == yesterday {
        latest
    } else {
        return 0;
    };

    let mut streak = 0;
    for &date in dates {
        if date != expected {
            break;
        }
        streak += 1;
        match expected.pred_opt() {
            Some(prev) => expected = prev,
            None => break,
        }
    }
    streak
}
