//! Category CRUD. Skills referencing a deleted category are left alone.

use tracing::debug;

use super::{new_id, SkillStore};
use crate::storage::models::{Category, CategoryUpdate, NewCategory};

impl SkillStore {
    pub fn add_category(&mut self, data: NewCategory) -> Category {
        let category = Category {
            id: new_id(),
            name: data.name,
            icon: data.icon,
            color: data.color,
            description: data.description,
        };
        debug!(id = %category.id, name = %category.name, "adding category");

        self.state.categories.push(category.clone());
        self.persist();
        category
    }

    pub fn update_category(&mut self, id: &str, updates: CategoryUpdate) {
        let Some(category) = self.state.categories.iter_mut().find(|c| c.id == id) else {
            debug!(id, "update_category: unknown category");
            return;
        };

        if let Some(name) = updates.name {
            category.name = name;
        }
        if let Some(icon) = updates.icon {
            category.icon = icon;
        }
        if let Some(color) = updates.color {
            category.color = color;
        }
        if let Some(description) = updates.description {
            category.description = description;
        }
        self.persist();
    }

    pub fn delete_category(&mut self, id: &str) {
        let before = self.state.categories.len();
        self.state.categories.retain(|c| c.id != id);
        if self.state.categories.len() == before {
            debug!(id, "delete_category: unknown category");
            return;
        }
        self.persist();
    }
}
