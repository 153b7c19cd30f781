use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::persistence::FilterPersistence;
use crate::roster::{CharacterId, Roster};

/// Which characters and personas the user has switched on or off.
///
/// Only explicit choices are stored. A missing entry means "enabled"; the
/// two accessors below are the single place that rule lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    characters: BTreeMap<CharacterId, bool>,
    #[serde(default)]
    personas: BTreeMap<CharacterId, BTreeMap<usize, bool>>,
}

impl FilterState {
    /// Whether a character is enabled. Defaults to `true`.
    pub fn is_character_enabled(&self, id: CharacterId) -> bool {
        self.characters.get(&id).copied().unwrap_or(true)
    }

    /// Whether a persona of a character is enabled. Defaults to `true`.
    pub fn is_persona_enabled(&self, id: CharacterId, index: usize) -> bool {
        self.personas
            .get(&id)
            .and_then(|m| m.get(&index))
            .copied()
            .unwrap_or(true)
    }

    /// Record an explicit choice for a character.
    pub fn set_character(&mut self, id: CharacterId, enabled: bool) {
        self.characters.insert(id, enabled);
    }

    /// Record an explicit choice for a persona.
    pub fn set_persona(&mut self, id: CharacterId, index: usize, enabled: bool) {
        self.personas.entry(id).or_default().insert(index, enabled);
    }

    /// Number of explicit entries (characters plus personas).
    pub fn entry_count(&self) -> usize {
        self.characters.len() + self.personas.values().map(BTreeMap::len).sum::<usize>()
    }

    /// Entries that point at characters or persona indices the roster does
    /// not have. Lookups never reach them, so they behave as "no opinion".
    pub fn stale_references(&self, roster: &Roster) -> Vec<StaleReference> {
        let mut stale = Vec::new();
        for id in self.characters.keys() {
            if roster.get(*id).is_none() {
                stale.push(StaleReference::Character(*id));
            }
        }
        for (id, entries) in &self.personas {
            let len = roster.get(*id).map(|c| c.personas.len());
            for index in entries.keys() {
                if len.is_none_or(|len| *index >= len) {
                    stale.push(StaleReference::Persona {
                        character: *id,
                        index: *index,
                    });
                }
            }
        }
        stale
    }
}

/// A persisted filter entry with no counterpart in the current roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReference {
    /// The character id is not in the roster.
    Character(CharacterId),
    /// The persona index is beyond the character's persona list.
    Persona {
        /// Owning character.
        character: CharacterId,
        /// Index that no longer exists.
        index: usize,
    },
}

/// Target of an invert operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvertScope {
    /// Flip every character.
    Characters,
    /// Flip every persona of one character.
    Personas(CharacterId),
}

/// Describes a mutation applied to a [`FilterStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    /// One character toggled.
    Character {
        /// Character id.
        id: CharacterId,
        /// New value.
        enabled: bool,
    },
    /// One persona toggled.
    Persona {
        /// Owning character.
        id: CharacterId,
        /// Persona index.
        index: usize,
        /// New value.
        enabled: bool,
    },
    /// Every character set to the same value.
    AllCharacters(bool),
    /// Every persona of one character set to the same value.
    AllPersonas {
        /// Owning character.
        id: CharacterId,
        /// New value.
        enabled: bool,
    },
    /// An invert was applied.
    Inverted(InvertScope),
    /// Everything re-enabled.
    Reset,
}

impl fmt::Display for FilterChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |b: &bool| if *b { "enabled" } else { "disabled" };
        match self {
            Self::Character { id, enabled } => write!(f, "character {id} {}", on_off(enabled)),
            Self::Persona { id, index, enabled } => {
                write!(f, "persona {id}/{index} {}", on_off(enabled))
            }
            Self::AllCharacters(enabled) => write!(f, "all characters {}", on_off(enabled)),
            Self::AllPersonas { id, enabled } => {
                write!(f, "all personas of {id} {}", on_off(enabled))
            }
            Self::Inverted(InvertScope::Characters) => write!(f, "characters inverted"),
            Self::Inverted(InvertScope::Personas(id)) => write!(f, "personas of {id} inverted"),
            Self::Reset => write!(f, "filters reset"),
        }
    }
}

type ChangeObserver = Box<dyn FnMut(&FilterChange)>;

/// Owns the filter state for a roster and writes every change through to
/// a persistence backend.
///
/// Persistence failures never reach the caller: they are logged and the
/// in-memory state stays authoritative, with [`FilterStore::is_dirty`]
/// reporting that the last write did not land.
pub struct FilterStore {
    roster: Arc<Roster>,
    state: FilterState,
    dirty: bool,
    persistence: Box<dyn FilterPersistence>,
    observers: Vec<ChangeObserver>,
}

impl FilterStore {
    /// Load saved state, falling back to "everything enabled" when nothing
    /// is saved or the saved data cannot be read.
    pub fn open(roster: Arc<Roster>, persistence: Box<dyn FilterPersistence>) -> Self {
        let state = match persistence.load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!("no saved filter state, starting with everything enabled");
                FilterState::default()
            }
            Err(e) => {
                warn!(error = %e, "could not read saved filter state, using defaults");
                FilterState::default()
            }
        };

        let stale = state.stale_references(&roster);
        if !stale.is_empty() {
            debug!(count = stale.len(), "ignoring filter entries not present in roster");
        }

        Self {
            roster,
            state,
            dirty: false,
            persistence,
            observers: Vec::new(),
        }
    }

    /// The roster this store filters.
    pub fn roster(&self) -> &Arc<Roster> {
        &self.roster
    }

    /// The current filter state.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Whether a change has not yet been written successfully.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Register a callback invoked after every mutation.
    pub fn on_change(&mut self, observer: impl FnMut(&FilterChange) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Whether a character is enabled.
    pub fn is_character_enabled(&self, id: CharacterId) -> bool {
        self.state.is_character_enabled(id)
    }

    /// Whether a persona is enabled.
    pub fn is_persona_enabled(&self, id: CharacterId, index: usize) -> bool {
        self.state.is_persona_enabled(id, index)
    }

    /// Enable or disable one character.
    pub fn set_character_enabled(&mut self, id: CharacterId, enabled: bool) {
        self.state.set_character(id, enabled);
        self.commit(FilterChange::Character { id, enabled });
    }

    /// Enable or disable one persona.
    pub fn set_persona_enabled(&mut self, id: CharacterId, index: usize, enabled: bool) {
        self.state.set_persona(id, index, enabled);
        self.commit(FilterChange::Persona { id, index, enabled });
    }

    /// Set every character in the roster to the same value.
    pub fn select_all(&mut self, enabled: bool) {
        for c in self.roster.characters() {
            self.state.set_character(c.id, enabled);
        }
        self.commit(FilterChange::AllCharacters(enabled));
    }

    /// Set every persona of one character to the same value. Unknown ids
    /// are ignored.
    pub fn select_all_personas(&mut self, id: CharacterId, enabled: bool) {
        let Some(count) = self.roster.get(id).map(|c| c.personas.len()) else {
            return;
        };
        for index in 0..count {
            self.state.set_persona(id, index, enabled);
        }
        self.commit(FilterChange::AllPersonas { id, enabled });
    }

    /// Flip every entry in the given scope. Unknown ids are ignored.
    pub fn invert(&mut self, scope: InvertScope) {
        match scope {
            InvertScope::Characters => {
                for c in self.roster.characters() {
                    let current = self.state.is_character_enabled(c.id);
                    self.state.set_character(c.id, !current);
                }
            }
            InvertScope::Personas(id) => {
                let Some(count) = self.roster.get(id).map(|c| c.personas.len()) else {
                    return;
                };
                for index in 0..count {
                    let current = self.state.is_persona_enabled(id, index);
                    self.state.set_persona(id, index, !current);
                }
            }
        }
        self.commit(FilterChange::Inverted(scope));
    }

    /// Explicitly enable every character and persona.
    pub fn reset(&mut self) {
        for c in self.roster.characters() {
            self.state.set_character(c.id, true);
            for index in 0..c.personas.len() {
                self.state.set_persona(c.id, index, true);
            }
        }
        self.commit(FilterChange::Reset);
    }

    /// Number of enabled characters.
    pub fn enabled_count(&self) -> usize {
        self.roster
            .characters()
            .iter()
            .filter(|c| self.state.is_character_enabled(c.id))
            .count()
    }

    /// Number of characters in the roster, the total behind
    /// [`FilterStore::enabled_count`].
    pub fn len(&self) -> usize {
        self.roster.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Number of enabled personas of one character.
    pub fn enabled_persona_count(&self, id: CharacterId) -> usize {
        self.roster.get(id).map_or(0, |c| {
            (0..c.personas.len())
                .filter(|i| self.state.is_persona_enabled(id, *i))
                .count()
        })
    }

    /// Try to write pending changes. Returns whether the store is clean.
    pub fn flush(&mut self) -> bool {
        if !self.dirty {
            return true;
        }
        match self.persistence.save(&self.state) {
            Ok(()) => {
                self.dirty = false;
                true
            }
            Err(e) => {
                warn!(error = %e, "could not save filter state");
                false
            }
        }
    }

    fn commit(&mut self, change: FilterChange) {
        self.dirty = true;
        self.flush();
        debug!(%change, "filter changed");
        for observer in &mut self.observers {
            observer(&change);
        }
    }
}
