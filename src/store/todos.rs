//! Per-skill todos and the cross-skill todo overview.

use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::debug;

use super::{new_id, NewActivityLog, SkillStore};
use crate::storage::models::{ActivityAction, NewTodo, Priority, Todo, TodoUpdate};

/// A todo together with the skill that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoEntry {
    pub skill_id: String,
    pub skill_title: String,
    pub todo: Todo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TodoState {
    #[default]
    Active,
    Completed,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TodoSort {
    /// Earliest due date first; undated todos last.
    #[default]
    DueDate,
    /// High priority first.
    Priority,
    /// Owning skill title, alphabetical.
    Skill,
    /// Creation order.
    Created,
}

#[derive(Debug, Clone, Default)]
pub struct TodoQuery {
    pub state: TodoState,
    pub priority: Option<Priority>,
    pub skill_id: Option<String>,
    /// Case-insensitive match on the todo title or the skill title.
    pub text: Option<String>,
    pub sort: TodoSort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Open todos with high priority.
    pub high_priority: usize,
    /// Open todos whose due date is before today.
    pub overdue: usize,
}

impl SkillStore {
    /// Append a todo to the skill. Returns `None` for an unknown skill.
    pub fn add_todo(&mut self, skill_id: &str, data: NewTodo) -> Option<Todo> {
        let todo = Todo {
            id: new_id(),
            title: data.title,
            completed: false,
            completed_at: None,
            priority: data.priority,
            due_date: data.due_date,
        };

        let added = self.with_skill_mut(skill_id, |skill| {
            skill.todos.push(todo.clone());
        });
        if added.is_none() {
            debug!(skill_id, "add_todo: unknown skill");
            return None;
        }

        debug!(skill_id, todo_id = %todo.id, "added todo");
        self.persist();
        Some(todo)
    }

    /// Flip `completed`. Logs `todo_completed` only when the todo becomes complete.
    pub fn toggle_todo(&mut self, skill_id: &str, todo_id: &str) {
        let now = self.clock.now();
        let Some(index) = self.todo_index(skill_id, todo_id) else {
            debug!(skill_id, todo_id, "toggle_todo: unknown todo");
            return;
        };

        let completed = self.with_skill_mut(skill_id, |skill| {
            let todo = &mut skill.todos[index];
            todo.completed = !todo.completed;
            todo.completed_at = todo.completed.then_some(now);
            todo.completed.then(|| todo.title.clone())
        });

        if let Some(Some(title)) = completed {
            self.record(NewActivityLog::new(
                skill_id,
                ActivityAction::TodoCompleted,
                format!("Completed todo: {title}"),
            ));
        }
        self.persist();
    }

    pub fn delete_todo(&mut self, skill_id: &str, todo_id: &str) {
        let Some(index) = self.todo_index(skill_id, todo_id) else {
            debug!(skill_id, todo_id, "delete_todo: unknown todo");
            return;
        };
        self.with_skill_mut(skill_id, |skill| {
            skill.todos.remove(index);
        });
        self.persist();
    }

    pub fn update_todo(&mut self, skill_id: &str, todo_id: &str, updates: TodoUpdate) {
        let Some(index) = self.todo_index(skill_id, todo_id) else {
            debug!(skill_id, todo_id, "update_todo: unknown todo");
            return;
        };
        self.with_skill_mut(skill_id, |skill| {
            let todo = &mut skill.todos[index];
            if let Some(title) = updates.title {
                todo.title = title;
            }
            if let Some(priority) = updates.priority {
                todo.priority = priority;
            }
            if let Some(due_date) = updates.due_date {
                todo.due_date = due_date;
            }
        });
        self.persist();
    }

    /// Every todo across all skills, in skill then todo order.
    pub fn all_todos(&self) -> Vec<TodoEntry> {
        self.skills()
            .iter()
            .flat_map(|skill| {
                skill.todos.iter().map(move |todo| TodoEntry {
                    skill_id: skill.id.clone(),
                    skill_title: skill.title.clone(),
                    todo: todo.clone(),
                })
            })
            .collect()
    }

    pub fn filter_todos(&self, query: &TodoQuery) -> Vec<TodoEntry> {
        let needle = query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(str::to_lowercase);

        let mut entries: Vec<TodoEntry> = self
            .all_todos()
            .into_iter()
            .filter(|e| match query.state {
                TodoState::Active => !e.todo.completed,
                TodoState::Completed => e.todo.completed,
                TodoState::All => true,
            })
            .filter(|e| query.priority.map_or(true, |p| e.todo.priority == p))
            .filter(|e| query.skill_id.as_deref().map_or(true, |id| e.skill_id == id))
            .filter(|e| {
                needle.as_deref().map_or(true, |n| {
                    e.todo.title.to_lowercase().contains(n)
                        || e.skill_title.to_lowercase().contains(n)
                })
            })
            .collect();

        // sort_by is stable, so ties keep creation order.
        match query.sort {
            TodoSort::DueDate => entries.sort_by(|a, b| by_due_date(a.todo.due_date, b.todo.due_date)),
            TodoSort::Priority => entries.sort_by_key(|e| e.todo.priority.rank()),
            TodoSort::Skill => entries.sort_by(|a, b| a.skill_title.cmp(&b.skill_title)),
            TodoSort::Created => {}
        }
        entries
    }

    /// Todo counters as of the store clock's today.
    pub fn todo_stats(&self) -> TodoStats {
        self.todo_stats_as_of(self.clock.today())
    }

    pub fn todo_stats_as_of(&self, today: NaiveDate) -> TodoStats {
        let mut stats = TodoStats::default();
        for todo in self.skills().iter().flat_map(|s| s.todos.iter()) {
            stats.total += 1;
            if todo.completed {
                stats.completed += 1;
                continue;
            }
            stats.active += 1;
            if todo.priority == Priority::High {
                stats.high_priority += 1;
            }
            if todo.due_date.is_some_and(|due| due < today) {
                stats.overdue += 1;
            }
        }
        stats
    }

    fn todo_index(&self, skill_id: &str, todo_id: &str) -> Option<usize> {
        self.find_skill(skill_id)?
            .todos
            .iter()
            .position(|t| t.id == todo_id)
    }
}

fn by_due_date(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::test_support::*;

    fn todo(title: &str, priority: Priority, due: Option<NaiveDate>) -> NewTodo {
        NewTodo {
            title: title.to_string(),
            priority,
            due_date: due,
        }
    }

    #[test]
    fn test_add_todo() {
        let (_slot, mut store) = store_on(day(2024, 6, 1));
        let skill = store.add_skill(new_skill("Rust"));

        let added = store
            .add_todo(&skill.id, todo("Read chapter 4", Priority::High, None))
            .unwrap();

        let todos = store.skill(&skill.id).unwrap().todos;
        assert_eq!(todos, vec![added.clone()]);
        assert!(!added.completed);
        assert!(added.completed_at.is_none());
    }

    #[test]
    fn test_add_todo_unknown_skill() {
        let (_slot, mut store) = store_on(day(2024, 6, 1));
        assert!(store.add_todo("missing", NewTodo::default()).is_none());
    }

    #[test]
    fn test_todo_ops_refresh_updated_at() {
        let (slot, mut store) = store_on(day(2024, 6, 1));
        let skill = store.add_skill(new_skill("Rust"));

        let mut store = SkillStore::open(slot, FixedClock::on(day(2024, 6, 5))).unwrap();
        store.add_todo(&skill.id, NewTodo::default());
        let updated = store.skill(&skill.id).unwrap();
        assert!(updated.updated_at > skill.updated_at);
    }

    #[test]
    fn test_toggle_todo_sets_and_clears_completion() {
        let (_slot, mut store) = store_on(day(2024, 6, 1));
        let skill = store.add_skill(new_skill("Rust"));
        let t = store.add_todo(&skill.id, todo("Borrowck", Priority::Low, None)).unwrap();

        store.toggle_todo(&skill.id, &t.id);
        let done = store.skill(&skill.id).unwrap().todos[0].clone();
        assert!(done.completed);
        assert!(done.completed_at.is_some());
        assert_eq!(store.activity_logs()[0].action, ActivityAction::TodoCompleted);
        assert_eq!(store.activity_logs()[0].description, "Completed todo: Borrowck");
        assert_eq!(store.activity_logs().len(), 2);

        store.toggle_todo(&skill.id, &t.id);
        let reopened = store.skill(&skill.id).unwrap().todos[0].clone();
        assert!(!reopened.completed);
        assert!(reopened.completed_at.is_none());
        // Reverting is not logged.
        assert_eq!(store.activity_logs().len(), 2);
    }

    #[test]
    fn test_unknown_todo_is_noop() {
        let (_slot, mut store) = store_on(day(2024, 6, 1));
        let skill = store.add_skill(new_skill("Rust"));
        store.add_todo(&skill.id, NewTodo::default());
        let before = store.export_state();

        store.toggle_todo(&skill.id, "missing");
        store.delete_todo(&skill.id, "missing");
        store.update_todo(
            &skill.id,
            "missing",
            TodoUpdate {
                title: Some("x".to_string()),
                ..TodoUpdate::default()
            },
        );
        store.toggle_todo("missing", "missing");

        assert_eq!(store.export_state(), before);
    }

    #[test]
    fn test_update_and_delete_todo() {
        let (_slot, mut store) = store_on(day(2024, 6, 1));
        let skill = store.add_skill(new_skill("Rust"));
        let a = store
            .add_todo(&skill.id, todo("a", Priority::Low, Some(day(2024, 6, 9))))
            .unwrap();
        let b = store.add_todo(&skill.id, todo("b", Priority::Low, None)).unwrap();

        store.update_todo(
            &skill.id,
            &a.id,
            TodoUpdate {
                title: Some("a2".to_string()),
                priority: Some(Priority::High),
                due_date: Some(None),
            },
        );
        let todos = store.skill(&skill.id).unwrap().todos;
        assert_eq!(todos[0].title, "a2");
        assert_eq!(todos[0].priority, Priority::High);
        assert_eq!(todos[0].due_date, None);

        store.delete_todo(&skill.id, &a.id);
        let todos = store.skill(&skill.id).unwrap().todos;
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, b.id);
    }

    fn overview_store() -> SkillStore {
        let (_slot, mut store) = store_on(day(2024, 6, 10));
        let rust = store.add_skill(new_skill("Rust"));
        let art = store.add_skill(new_skill("Art"));

        store.add_todo(&rust.id, todo("undated", Priority::Medium, None));
        store.add_todo(&rust.id, todo("late", Priority::High, Some(day(2024, 6, 1))));
        let done = store
            .add_todo(&art.id, todo("sketch", Priority::High, Some(day(2024, 5, 1))))
            .unwrap();
        store.add_todo(&art.id, todo("paint", Priority::Low, Some(day(2024, 6, 20))));
        store.toggle_todo(&art.id, &done.id);
        store
    }

    fn titles(entries: &[TodoEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.todo.title.as_str()).collect()
    }

    #[test]
    fn test_all_todos_flattened_in_order() {
        let store = overview_store();
        let all = store.all_todos();
        assert_eq!(titles(&all), vec!["undated", "late", "sketch", "paint"]);
        assert_eq!(all[2].skill_title, "Art");
    }

    #[test]
    fn test_filter_todos_default_is_active_by_due_date() {
        let store = overview_store();
        let entries = store.filter_todos(&TodoQuery::default());
        assert_eq!(titles(&entries), vec!["late", "paint", "undated"]);
    }

    #[test]
    fn test_filter_todos_sorts() {
        let store = overview_store();
        let by_priority = store.filter_todos(&TodoQuery {
            state: TodoState::All,
            sort: TodoSort::Priority,
            ..TodoQuery::default()
        });
        assert_eq!(titles(&by_priority), vec!["late", "sketch", "undated", "paint"]);

        let by_skill = store.filter_todos(&TodoQuery {
            state: TodoState::All,
            sort: TodoSort::Skill,
            ..TodoQuery::default()
        });
        assert_eq!(titles(&by_skill), vec!["sketch", "paint", "undated", "late"]);
    }

    #[test]
    fn test_filter_todos_by_fields() {
        let store = overview_store();
        let completed = store.filter_todos(&TodoQuery {
            state: TodoState::Completed,
            ..TodoQuery::default()
        });
        assert_eq!(titles(&completed), vec!["sketch"]);

        let high = store.filter_todos(&TodoQuery {
            state: TodoState::All,
            priority: Some(Priority::High),
            sort: TodoSort::Created,
            ..TodoQuery::default()
        });
        assert_eq!(titles(&high), vec!["late", "sketch"]);

        let by_skill_text = store.filter_todos(&TodoQuery {
            text: Some("  ART ".to_string()),
            ..TodoQuery::default()
        });
        assert_eq!(titles(&by_skill_text), vec!["paint"]);
    }

    #[test]
    fn test_todo_stats() {
        let store = overview_store();
        assert_eq!(
            store.todo_stats(),
            TodoStats {
                total: 4,
                completed: 1,
                active: 3,
                high_priority: 1,
                overdue: 1,
            }
        );
    }
}
