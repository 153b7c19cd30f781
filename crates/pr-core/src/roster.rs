use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

const BUILTIN_ROSTER: &str = include_str!("../data/roster.json");

/// Stable identifier of a character in the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CharacterId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// An alternate identity of a character.
///
/// Personas carry no id of their own: they are addressed by their index in
/// the owning character's list, so reordering a roster file changes which
/// persona a persisted filter entry refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Display name.
    pub name: String,
    /// Path or URL of the persona's portrait.
    #[serde(default)]
    pub avatar: String,
}

impl Persona {
    /// Create a persona with a name and avatar reference.
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: avatar.into(),
        }
    }
}

/// A top-level playable character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Stable id.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Accent color hint, e.g. `#9370DB`.
    #[serde(default)]
    pub color: String,
    /// Path or URL of the character's default portrait.
    #[serde(default)]
    pub avatar: String,
    /// Alternate personas, addressed by index.
    #[serde(default)]
    pub personas: Vec<Persona>,
}

impl Character {
    /// Create a character with no personas.
    pub fn new(id: impl Into<CharacterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: String::new(),
            avatar: String::new(),
            personas: Vec::new(),
        }
    }

    /// Set the color hint.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Append a persona.
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.personas.push(persona);
        self
    }

    /// Persona at the given index, if any.
    pub fn persona(&self, index: usize) -> Option<&Persona> {
        self.personas.get(index)
    }
}

/// The read-only list of characters available to the roulette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    characters: Vec<Character>,
}

impl Roster {
    /// Build a roster, rejecting duplicate character ids.
    pub fn new(characters: Vec<Character>) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for c in &characters {
            if !seen.insert(c.id) {
                return Err(CoreError::DuplicateCharacter(c.id));
            }
        }
        Ok(Self { characters })
    }

    /// The roster shipped with the application.
    pub fn builtin() -> CoreResult<Self> {
        Self::from_json_str(BUILTIN_ROSTER)
    }

    /// Parse a roster from a JSON array of characters.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let characters: Vec<Character> = serde_json::from_str(json)?;
        Self::new(characters)
    }

    /// Load a roster from a JSON file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// All characters in roster order.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Look up a character by id.
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Look up a character by id, failing with [`CoreError::UnknownCharacter`].
    pub fn require(&self, id: CharacterId) -> CoreResult<&Character> {
        self.get(id).ok_or(CoreError::UnknownCharacter(id))
    }

    /// Look up a persona by owner and index.
    pub fn persona(&self, id: CharacterId, index: usize) -> CoreResult<&Persona> {
        self.require(id)?
            .persona(index)
            .ok_or(CoreError::UnknownPersona {
                character: id,
                index,
            })
    }

    /// Find a character by case-insensitive name match. An exact match wins
    /// over a substring match.
    pub fn find_by_name(&self, query: &str) -> Option<&Character> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return None;
        }
        self.characters
            .iter()
            .find(|c| c.name.to_lowercase() == q)
            .or_else(|| {
                self.characters
                    .iter()
                    .find(|c| c.name.to_lowercase().contains(&q))
            })
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether the roster has no characters.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
