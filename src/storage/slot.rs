//! Persistence adapter: a single named slot holding the whole state.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use super::schema::PersistedState;
use crate::error::{StoreError, StoreResult};

/// Durable home of the serialized state.
pub trait StateSlot: Send {
    /// Load the saved state, or `None` if nothing has been saved yet.
    fn load(&self) -> StoreResult<Option<PersistedState>>;

    /// Replace the saved state with `state`.
    fn save(&mut self, state: &PersistedState) -> StoreResult<()>;

    /// Short description for log lines.
    fn describe(&self) -> String;
}

/// JSON file slot at `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Slot named `name` inside `dir`.
    pub fn new(dir: impl AsRef<Path>, name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{name}.json")),
        }
    }

    /// Get the slot path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateSlot for FileSlot {
    fn load(&self) -> StoreResult<Option<PersistedState>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no saved state");
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let state = PersistedState::from_json(&contents).map_err(|source| {
            StoreError::MalformedState {
                path: self.path.clone(),
                source,
            }
        })?;

        info!(
            path = %self.path.display(),
            skills = state.skills.len(),
            categories = state.categories.len(),
            logs = state.activity_logs.len(),
            "loaded state"
        );
        Ok(Some(state))
    }

    /// Writes to a temporary sibling and renames it over the slot so a
    /// crash never leaves a half-written file behind.
    fn save(&mut self, state: &PersistedState) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp = self.path.with_extension("json.tmp");
        let content = state.to_json()?;
        let mut f = File::create(&temp)?;
        f.write_all(content.as_bytes())?;
        f.sync_all()?;
        fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), bytes = content.len(), "saved state");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory slot. Clones share the same blob.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    blob: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with a raw blob.
    pub fn with_blob(json: impl Into<String>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(json.into()))),
        }
    }

    /// Current raw blob, if anything was saved.
    pub fn blob(&self) -> Option<String> {
        self.blob.lock().map(|guard| guard.clone()).unwrap_or(None)
    }
}

impl StateSlot for MemorySlot {
    fn load(&self) -> StoreResult<Option<PersistedState>> {
        let Some(json) = self.blob() else {
            return Ok(None);
        };
        let state = PersistedState::from_json(&json).map_err(|source| {
            StoreError::MalformedState {
                path: PathBuf::from("<memory>"),
                source,
            }
        })?;
        Ok(Some(state))
    }

    fn save(&mut self, state: &PersistedState) -> StoreResult<()> {
        let json = state.to_json()?;
        if let Ok(mut guard) = self.blob.lock() {
            *guard = Some(json);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
