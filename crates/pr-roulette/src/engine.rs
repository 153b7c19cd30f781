//! Eligibility, validation, and uniform draws.
//!
//! A character is eligible when it is enabled and at least one of its
//! personas is enabled. Eligible personas keep their roster index so a
//! filtered list never shifts names against avatars or persisted entries.

use std::fmt;

use pr_core::{CharacterId, FilterState, Persona, Roster};

use crate::error::ValidationError;
use crate::random::RandomSource;

/// A persona that passed the filters, with its index in the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligiblePersona {
    /// Index in the owning character's roster list.
    pub index: usize,
    /// The persona itself.
    pub persona: Persona,
}

/// A character that passed the filters, carrying only its enabled personas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleCharacter {
    /// Character id.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Color hint.
    pub color: String,
    /// Default portrait.
    pub avatar: String,
    /// Enabled personas in roster order. Never empty.
    pub personas: Vec<EligiblePersona>,
}

/// Output of [`compute_eligible`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligibleSet {
    characters: Vec<EligibleCharacter>,
    starved: Vec<String>,
}

impl EligibleSet {
    /// Eligible characters in roster order.
    pub fn characters(&self) -> &[EligibleCharacter] {
        &self.characters
    }

    /// Names of enabled characters left without an enabled persona.
    pub fn starved(&self) -> &[String] {
        &self.starved
    }

    /// Number of eligible characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether no character is eligible.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Take ownership of the eligible characters.
    pub fn into_characters(self) -> Vec<EligibleCharacter> {
        self.characters
    }
}

/// Filter the roster down to what the roulette may pick.
pub fn compute_eligible(roster: &Roster, filters: &FilterState) -> EligibleSet {
    let mut set = EligibleSet::default();

    for character in roster.characters() {
        if !filters.is_character_enabled(character.id) {
            continue;
        }

        let personas: Vec<EligiblePersona> = character
            .personas
            .iter()
            .enumerate()
            .filter(|(index, _)| filters.is_persona_enabled(character.id, *index))
            .map(|(index, persona)| EligiblePersona {
                index,
                persona: persona.clone(),
            })
            .collect();

        if personas.is_empty() {
            set.starved.push(character.name.clone());
            continue;
        }

        set.characters.push(EligibleCharacter {
            id: character.id,
            name: character.name.clone(),
            color: character.color.clone(),
            avatar: character.avatar.clone(),
            personas,
        });
    }

    set
}

/// Check that a selection is possible.
///
/// Enabled characters without personas are reported first, all together,
/// because fixing them may be all the user needs to do. Otherwise an empty
/// set means nothing is enabled.
pub fn validate(set: &EligibleSet) -> Result<(), ValidationError> {
    if !set.starved.is_empty() {
        return Err(ValidationError::NoPersonaForCharacter(set.starved.clone()));
    }
    if set.characters.is_empty() {
        return Err(ValidationError::NoCharacterSelected);
    }
    Ok(())
}

/// Draw one character uniformly. Returns its position in `eligible`.
pub fn draw_character<'a>(
    eligible: &'a [EligibleCharacter],
    rng: &mut dyn RandomSource,
) -> Option<(usize, &'a EligibleCharacter)> {
    if eligible.is_empty() {
        return None;
    }
    let i = rng.index(eligible.len());
    eligible.get(i).map(|c| (i, c))
}

/// Draw one of a character's eligible personas uniformly. Returns its
/// position in the eligible list (not the roster index).
pub fn draw_persona<'a>(
    character: &'a EligibleCharacter,
    rng: &mut dyn RandomSource,
) -> Option<(usize, &'a EligiblePersona)> {
    if character.personas.is_empty() {
        return None;
    }
    let i = rng.index(character.personas.len());
    character.personas.get(i).map(|p| (i, p))
}

/// A completed selection: one character and one of its personas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    /// Chosen character id.
    pub character_id: CharacterId,
    /// Chosen character name.
    pub character_name: String,
    /// Chosen character's default portrait.
    pub character_avatar: String,
    /// Chosen persona's roster index.
    pub persona_index: usize,
    /// Chosen persona.
    pub persona: Persona,
}

impl SelectionResult {
    /// Combine a character and one of its eligible personas.
    pub fn new(character: &EligibleCharacter, persona: &EligiblePersona) -> Self {
        Self {
            character_id: character.id,
            character_name: character.name.clone(),
            character_avatar: character.avatar.clone(),
            persona_index: persona.index,
            persona: persona.persona.clone(),
        }
    }
}

impl fmt::Display for SelectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.character_name, self.persona.name)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::random::SeededRandom;
    use pr_core::Character;

    fn roster() -> Roster {
        let a = Character::new(1, "A")
            .with_persona(Persona::new("a0", "a0.png"))
            .with_persona(Persona::new("a1", "a1.png"))
            .with_persona(Persona::new("a2", "a2.png"));
        let b = Character::new(2, "B")
            .with_persona(Persona::new("b0", "b0.png"))
            .with_persona(Persona::new("b1", "b1.png"));
        Roster::new(vec![a, b]).unwrap()
    }

    fn disable_everything(roster: &Roster) -> FilterState {
        let mut f = FilterState::default();
        for c in roster.characters() {
            f.set_character(c.id, false);
            for i in 0..c.personas.len() {
                f.set_persona(c.id, i, false);
            }
        }
        f
    }

    #[test]
    fn everything_disabled_means_no_character() {
        let r = roster();
        let set = compute_eligible(&r, &disable_everything(&r));
        assert!(set.is_empty());
        assert_eq!(validate(&set), Err(ValidationError::NoCharacterSelected));
    }

    #[test]
    fn defaults_make_everything_eligible() {
        let set = compute_eligible(&roster(), &FilterState::default());
        assert_eq!(set.len(), 2);
        assert_eq!(set.characters()[0].personas.len(), 3);
        assert!(validate(&set).is_ok());
    }

    #[test]
    fn starved_character_is_named_and_excluded() {
        let r = roster();
        let mut f = FilterState::default();
        f.set_persona(CharacterId(2), 0, false);
        f.set_persona(CharacterId(2), 1, false);

        let set = compute_eligible(&r, &f);
        assert_eq!(set.len(), 1);
        assert_eq!(set.characters()[0].id, CharacterId(1));
        assert_eq!(
            validate(&set),
            Err(ValidationError::NoPersonaForCharacter(vec!["B".into()]))
        );
    }

    #[test]
    fn starved_names_are_aggregated() {
        let r = roster();
        let mut f = FilterState::default();
        for (id, n) in [(1, 3), (2, 2)] {
            for i in 0..n {
                f.set_persona(CharacterId(id), i, false);
            }
        }
        let set = compute_eligible(&r, &f);
        assert_eq!(
            validate(&set),
            Err(ValidationError::NoPersonaForCharacter(vec![
                "A".into(),
                "B".into()
            ]))
        );
    }

    #[test]
    fn disabled_character_with_no_personas_is_not_starved() {
        let r = roster();
        let mut f = FilterState::default();
        f.set_character(CharacterId(2), false);
        f.set_persona(CharacterId(2), 0, false);
        f.set_persona(CharacterId(2), 1, false);
        let set = compute_eligible(&r, &f);
        assert!(set.starved().is_empty());
        assert!(validate(&set).is_ok());
    }

    #[test]
    fn persona_indices_survive_filtering() {
        let r = roster();
        let mut f = FilterState::default();
        f.set_persona(CharacterId(1), 1, false);

        let set = compute_eligible(&r, &f);
        let a = &set.characters()[0];
        let indices: Vec<_> = a.personas.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(a.personas[1].persona.name, "a2");
        assert_eq!(a.personas[1].persona.avatar, "a2.png");
    }

    #[test]
    fn draw_character_is_roughly_uniform() {
        let set = compute_eligible(&roster(), &FilterState::default());
        let mut rng = SeededRandom::new(2024);
        let trials = 10_000;
        let mut hits_a = 0;
        for _ in 0..trials {
            let (_, c) = draw_character(set.characters(), &mut rng).unwrap();
            if c.id == CharacterId(1) {
                hits_a += 1;
            }
        }
        let freq = hits_a as f64 / trials as f64;
        assert!((0.47..=0.53).contains(&freq), "frequency {freq}");
    }

    #[test]
    fn draws_on_empty_lists_are_none() {
        let mut rng = SeededRandom::new(1);
        assert!(draw_character(&[], &mut rng).is_none());
        let empty = EligibleCharacter {
            id: CharacterId(1),
            name: "A".into(),
            color: String::new(),
            avatar: String::new(),
            personas: Vec::new(),
        };
        assert!(draw_persona(&empty, &mut rng).is_none());
    }

    #[test]
    fn selection_display() {
        let set = compute_eligible(&roster(), &FilterState::default());
        let c = &set.characters()[1];
        let result = SelectionResult::new(c, &c.personas[1]);
        assert_eq!(result.to_string(), "B / b1");
        assert_eq!(result.persona_index, 1);
    }

    proptest! {
        #[test]
        fn eligible_characters_are_enabled_with_enabled_personas(
            disabled_chars in prop::collection::vec(any::<bool>(), 2),
            disabled_personas in prop::collection::vec(any::<bool>(), 5),
        ) {
            let r = roster();
            let mut f = FilterState::default();
            for (c, off) in r.characters().iter().zip(&disabled_chars) {
                f.set_character(c.id, !off);
            }
            let slots = [(1, 0), (1, 1), (1, 2), (2, 0), (2, 1)];
            for ((id, i), off) in slots.iter().zip(&disabled_personas) {
                f.set_persona(CharacterId(*id), *i, !off);
            }

            let set = compute_eligible(&r, &f);
            for c in set.characters() {
                prop_assert!(f.is_character_enabled(c.id));
                prop_assert!(!c.personas.is_empty());
                for p in &c.personas {
                    prop_assert!(f.is_persona_enabled(c.id, p.index));
                    prop_assert_eq!(&r.persona(c.id, p.index).unwrap().name, &p.persona.name);
                }
            }
            match validate(&set) {
                Ok(()) => prop_assert!(!set.is_empty() && set.starved().is_empty()),
                Err(ValidationError::NoCharacterSelected) => prop_assert!(set.is_empty()),
                Err(ValidationError::NoPersonaForCharacter(names)) => {
                    prop_assert_eq!(names.as_slice(), set.starved());
                }
            }
        }
    }
}
