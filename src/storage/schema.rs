//! Shape of the persisted state blob.

use serde::{Deserialize, Serialize};

use super::models::{ActivityLog, Category, Skill};

/// Whole store state, serialized to a single slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub activity_logs: Vec<ActivityLog>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            skills: Vec::new(),
            categories: default_categories(),
            activity_logs: Vec::new(),
        }
    }
}

/// Browser persistence wraps the state as `{"state": {...}, "version": N}`.
/// The version is ignored.
#[derive(Debug, Deserialize)]
struct Envelope {
    state: PersistedState,
}

impl PersistedState {
    /// Parse a blob that is either the bare state or a browser envelope.
    ///
    /// A top-level `state` key selects the envelope shape; a bad envelope is
    /// an error, never an empty bare state.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("state").is_some() {
            serde_json::from_value::<Envelope>(value).map(|envelope| envelope.state)
        } else {
            serde_json::from_value(value)
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Built-in categories used when no state has been saved yet.
pub fn default_categories() -> Vec<Category> {
    const DEFAULTS: &[(&str, &str, &str, &str, &str)] = &[
        ("1", "Programming Languages", "Code", "#3b82f6", "Learn new programming languages and syntax"),
        ("2", "Web Development", "Globe", "#10b981", "Frontend, backend, and full-stack web technologies"),
        ("3", "Mobile Development", "Smartphone", "#8b5cf6", "iOS, Android, and cross-platform development"),
        ("4", "Data Science & AI", "Brain", "#f59e0b", "Machine learning, data analysis, and AI technologies"),
        ("5", "Cloud & DevOps", "Cloud", "#06b6d4", "Cloud platforms, CI/CD, and infrastructure"),
        ("6", "Design", "Palette", "#ec4899", "UI/UX design, graphic design, and visual arts"),
        ("7", "Database", "Database", "#14b8a6", "SQL, NoSQL, and database management"),
        ("8", "Security", "Shield", "#ef4444", "Cybersecurity, encryption, and secure coding"),
        ("9", "Tools & Frameworks", "Wrench", "#6366f1", "Development tools, libraries, and frameworks"),
        ("10", "Soft Skills", "Users", "#84cc16", "Communication, leadership, and teamwork"),
    ];

    DEFAULTS
        .iter()
        .map(|(id, name, icon, color, description)| Category {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            description: description.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = PersistedState::default();
        assert!(state.skills.is_empty());
        assert!(state.activity_logs.is_empty());
        assert_eq!(state.categories.len(), 10);
        assert_eq!(state.categories[0].id, "1");
        assert_eq!(state.categories[9].name, "Soft Skills");
    }

    #[test]
    fn test_parse_bare_blob() {
        let state = PersistedState::from_json(r#"{"skills": [], "categories": [], "activityLogs": []}"#)
            .unwrap();
        assert!(state.categories.is_empty());
    }

    #[test]
    fn test_parse_browser_envelope() {
        let json = r#"{
            "state": {
                "skills": [{
                    "id": "s1",
                    "title": "Go",
                    "description": "",
                    "category": "1",
                    "status": "to-learn",
                    "progress": 0,
                    "createdAt": "2024-05-01T08:30:00.000Z",
                    "updatedAt": "2024-05-01T08:30:00.000Z",
                    "milestones": [],
                    "tags": [],
                    "resources": []
                }],
                "categories": [],
                "activityLogs": []
            },
            "version": 0
        }"#;
        let state = PersistedState::from_json(json).unwrap();
        assert_eq!(state.skills.len(), 1);
        assert_eq!(state.skills[0].title, "Go");
    }

    #[test]
    fn test_envelope_with_bad_skill_is_rejected() {
        let json = r#"{
            "state": {
                "skills": [{
                    "id": "s1",
                    "title": "Go",
                    "status": "someday",
                    "createdAt": "2024-05-01T08:30:00.000Z",
                    "updatedAt": "2024-05-01T08:30:00.000Z"
                }],
                "categories": [],
                "activityLogs": []
            },
            "version": 0
        }"#;
        assert!(PersistedState::from_json(json).is_err());
    }

    #[test]
    fn test_envelope_state_must_be_an_object() {
        assert!(PersistedState::from_json(r#"{"state": null, "version": 0}"#).is_err());
    }

    #[test]
    fn test_missing_categories_fall_back_to_defaults() {
        let state = PersistedState::from_json(r#"{"skills": []}"#).unwrap();
        assert_eq!(state.categories, default_categories());
    }

    #[test]
    fn test_malformed_blob_is_rejected() {
        assert!(PersistedState::from_json("{not json").is_err());
        assert!(PersistedState::from_json(r#"{"skills": 5}"#).is_err());
    }
}
