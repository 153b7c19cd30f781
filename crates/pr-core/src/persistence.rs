use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{CoreError, CoreResult};
use crate::filter::FilterState;

/// Key-value style storage for [`FilterState`].
///
/// `load` returns `Ok(None)` when nothing has been saved yet. Callers treat
/// any error as "no saved state" and fall back to defaults.
pub trait FilterPersistence {
    /// Read the saved state, if any.
    fn load(&self) -> CoreResult<Option<FilterState>>;

    /// Overwrite the saved state.
    fn save(&self, state: &FilterState) -> CoreResult<()>;
}

/// Stores filter state as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Use the given file. It does not have to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> CoreError {
        CoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl FilterPersistence for JsonFilePersistence {
    fn load(&self) -> CoreResult<Option<FilterState>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn save(&self, state: &FilterState) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json).map_err(|e| self.io_err(e))
    }
}

/// In-memory persistence holding the serialized JSON text.
///
/// Clones share the same slot, so a test can keep one handle and inspect
/// what a store wrote through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryPersistence {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with raw text (which may be invalid JSON).
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(text.into()))),
        }
    }

    /// The raw text currently stored.
    pub fn text(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl FilterPersistence for MemoryPersistence {
    fn load(&self) -> CoreResult<Option<FilterState>> {
        match self.slot.borrow().as_deref() {
            Some(text) => Ok(Some(serde_json::from_str(text)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &FilterState) -> CoreResult<()> {
        let json = serde_json::to_string(state)?;
        *self.slot.borrow_mut() = Some(json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::CharacterId;

    fn sample_state() -> FilterState {
        let mut state = FilterState::default();
        state.set_character(CharacterId(1), false);
        state.set_persona(CharacterId(2), 3, false);
        state.set_persona(CharacterId(2), 0, true);
        state
    }

    #[test]
    fn file_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let p = JsonFilePersistence::new(dir.path().join("filters.json"));
        assert!(p.load().unwrap().is_none());
    }

    #[test]
    fn file_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let p = JsonFilePersistence::new(dir.path().join("nested/state/filters.json"));
        let state = sample_state();
        p.save(&state).unwrap();
        assert_eq!(p.load().unwrap(), Some(state));
    }

    #[test]
    fn file_corrupt_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");
        std::fs::write(&path, "{ not json").unwrap();
        let p = JsonFilePersistence::new(&path);
        assert!(matches!(p.load(), Err(CoreError::Json(_))));
    }

    #[test]
    fn memory_clones_share_slot() {
        let a = MemoryPersistence::new();
        let b = a.clone();
        a.save(&sample_state()).unwrap();
        assert_eq!(b.load().unwrap(), Some(sample_state()));
        assert!(b.text().unwrap().contains("\"characters\""));
    }

    #[test]
    fn memory_garbage_is_error() {
        let p = MemoryPersistence::with_text("garbage");
        assert!(p.load().is_err());
    }
}
