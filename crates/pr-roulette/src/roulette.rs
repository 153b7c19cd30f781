//! The two-phase roulette: spin for a character, then for one of its
//! personas.
//!
//! ```text
//! Idle ──start──▶ SpinningCharacter ──stop──▶ CharacterChosen
//!                                                  │ (auto)
//!                                                  ▼
//! PersonaChosen ◀──stop── SpinningPersona ◀────────┘
//! ```
//!
//! A list of one never spins: it is selected on the spot without touching
//! the random source. Any filter change sends the machine back to `Idle`
//! and discards partial selections. Running spins are identified by a
//! generation number, so a [`SpinHandle`] from a cancelled spin can never
//! advance or settle a newer one.

use std::fmt;

use pr_core::{FilterState, Roster};
use tracing::{debug, info};

use crate::config::RouletteConfig;
use crate::engine::{
    EligibleCharacter, SelectionResult, compute_eligible, draw_character, draw_persona, validate,
};
use crate::error::{RouletteError, RouletteResult, ValidationError};
use crate::random::RandomSource;
use crate::spin::Spinner;

/// Where the roulette is in a selection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouletteState {
    /// Nothing selected, nothing spinning.
    Idle,
    /// Character reel is spinning.
    SpinningCharacter,
    /// A character is chosen; the persona spin has not started.
    CharacterChosen,
    /// Persona reel is spinning.
    SpinningPersona,
    /// A full selection is available.
    PersonaChosen,
}

impl RouletteState {
    /// Whether a reel is spinning.
    pub fn is_spinning(self) -> bool {
        matches!(self, Self::SpinningCharacter | Self::SpinningPersona)
    }
}

impl fmt::Display for RouletteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::SpinningCharacter => "spinning characters",
            Self::CharacterChosen => "a character is chosen",
            Self::SpinningPersona => "spinning personas",
            Self::PersonaChosen => "a persona is chosen",
        };
        f.write_str(s)
    }
}

/// Which reel a spin belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The character reel.
    Character,
    /// The persona reel.
    Persona,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character => f.write_str("character"),
            Self::Persona => f.write_str("persona"),
        }
    }
}

/// Identifies one running spin. Only the handle of the current spin can
/// advance the reel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinHandle {
    phase: Phase,
    generation: u64,
}

impl SpinHandle {
    /// The reel this spin drives.
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

/// What the roulette is waiting for after an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A reel is spinning; call stop to draw.
    Spinning(SpinHandle),
    /// A character is chosen and the persona spin must be started by hand.
    AwaitingPersonaSpin,
    /// The cycle finished.
    Complete(SelectionResult),
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The reel moved.
    Advanced {
        /// New reel offset.
        offset: u64,
        /// Index of the item on the center row.
        centered: usize,
    },
    /// The spin this handle belongs to is no longer running.
    Cancelled,
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouletteEvent {
    /// A reel started spinning over `len` items.
    SpinStarted {
        /// Which reel.
        phase: Phase,
        /// Number of items on it.
        len: usize,
    },
    /// A character was chosen.
    CharacterChosen {
        /// The chosen character with its eligible personas.
        character: EligibleCharacter,
        /// Whether it was the only candidate.
        auto: bool,
    },
    /// A persona was chosen, completing the selection.
    PersonaChosen {
        /// The finished selection.
        result: SelectionResult,
        /// Whether it was the only candidate.
        auto: bool,
    },
    /// A running spin was cancelled by a filter change.
    Cancelled,
    /// The selection was cleared without a spin running.
    Reset,
}

type EventObserver = Box<dyn FnMut(&RouletteEvent)>;

/// The roulette state machine.
pub struct Roulette {
    config: RouletteConfig,
    rng: Box<dyn RandomSource>,
    state: RouletteState,
    eligible: Vec<EligibleCharacter>,
    character: Option<EligibleCharacter>,
    result: Option<SelectionResult>,
    spinner: Option<Spinner>,
    generation: u64,
    observers: Vec<EventObserver>,
}

impl Roulette {
    /// Create an idle roulette drawing from `rng`.
    pub fn new(config: RouletteConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            config,
            rng,
            state: RouletteState::Idle,
            eligible: Vec::new(),
            character: None,
            result: None,
            spinner: None,
            generation: 0,
            observers: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> RouletteState {
        self.state
    }

    /// The configuration in use.
    pub fn config(&self) -> &RouletteConfig {
        &self.config
    }

    /// Characters on the character reel for the current cycle.
    pub fn eligible(&self) -> &[EligibleCharacter] {
        &self.eligible
    }

    /// The chosen character, once the character phase is over.
    pub fn chosen_character(&self) -> Option<&EligibleCharacter> {
        self.character.as_ref()
    }

    /// The finished selection, if any.
    pub fn result(&self) -> Option<&SelectionResult> {
        self.result.as_ref()
    }

    /// The active reel, if a spin is running or has just settled.
    pub fn spinner(&self) -> Option<&Spinner> {
        self.spinner.as_ref()
    }

    /// Register a callback for every [`RouletteEvent`].
    pub fn on_selection_changed(&mut self, observer: impl FnMut(&RouletteEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Begin a new cycle with a character spin.
    ///
    /// Validation failures leave the state untouched. A single eligible
    /// character is chosen immediately and the persona phase begins.
    pub fn start_character_spin(
        &mut self,
        roster: &Roster,
        filters: &FilterState,
    ) -> RouletteResult<Progress> {
        let set = compute_eligible(roster, filters);
        validate(&set)?;

        self.clear();
        self.eligible = set.into_characters();

        if self.eligible.len() == 1 {
            debug!("single eligible character, skipping character spin");
            return Ok(self.choose_character(0, true));
        }

        let handle = self.begin_spin(Phase::Character, self.eligible.len());
        self.state = RouletteState::SpinningCharacter;
        Ok(Progress::Spinning(handle))
    }

    /// Stop the character reel and draw a character.
    pub fn stop_character_spin(&mut self) -> RouletteResult<Progress> {
        self.expect_state(RouletteState::SpinningCharacter, "stop the character spin")?;
        let index = draw_character(&self.eligible, self.rng.as_mut())
            .map(|(i, _)| i)
            .ok_or(ValidationError::NoCharacterSelected)?;
        if let Some(spinner) = &mut self.spinner {
            spinner.settle(index);
        }
        Ok(self.choose_character(index, false))
    }

    /// Start (or restart) the persona reel for the chosen character.
    pub fn start_persona_spin(&mut self) -> RouletteResult<Progress> {
        match self.state {
            RouletteState::CharacterChosen | RouletteState::PersonaChosen => {}
            state => {
                return Err(RouletteError::InvalidTransition {
                    state,
                    intent: "start the persona spin",
                });
            }
        }
        self.result = None;
        Ok(self.enter_persona_phase())
    }

    /// Stop the persona reel and draw a persona.
    pub fn stop_persona_spin(&mut self) -> RouletteResult<SelectionResult> {
        self.expect_state(RouletteState::SpinningPersona, "stop the persona spin")?;
        let character = self.character.as_ref().ok_or(RouletteError::InvalidTransition {
            state: self.state,
            intent: "stop the persona spin",
        })?;
        let (slot, persona) = draw_persona(character, self.rng.as_mut()).ok_or(
            RouletteError::InvalidTransition {
                state: self.state,
                intent: "stop the persona spin",
            },
        )?;
        let result = SelectionResult::new(character, persona);
        if let Some(spinner) = &mut self.spinner {
            spinner.settle(slot);
        }
        Ok(self.complete(result, false))
    }

    /// Advance the reel belonging to `handle`.
    ///
    /// This is the cancellation point for presentation loops: once the spin
    /// is stopped or cancelled, every later tick with its handle reports
    /// [`TickOutcome::Cancelled`].
    pub fn tick(&mut self, handle: SpinHandle) -> TickOutcome {
        let phase_state = match handle.phase {
            Phase::Character => RouletteState::SpinningCharacter,
            Phase::Persona => RouletteState::SpinningPersona,
        };
        if handle.generation != self.generation || self.state != phase_state {
            return TickOutcome::Cancelled;
        }
        match &mut self.spinner {
            Some(spinner) => TickOutcome::Advanced {
                offset: spinner.advance(),
                centered: spinner.centered_index(),
            },
            None => TickOutcome::Cancelled,
        }
    }

    /// React to a filter mutation: cancel any spin and return to `Idle`.
    pub fn on_filter_changed(&mut self) {
        let was_spinning = self.state.is_spinning();
        if self.state == RouletteState::Idle && self.eligible.is_empty() {
            return;
        }
        self.clear();
        if was_spinning {
            debug!("filters changed mid-spin, spin cancelled");
            self.emit(RouletteEvent::Cancelled);
        } else {
            self.emit(RouletteEvent::Reset);
        }
    }

    /// Discard any selection and return to `Idle`.
    pub fn reset(&mut self) {
        self.clear();
        self.emit(RouletteEvent::Reset);
    }

    fn clear(&mut self) {
        self.generation += 1;
        self.state = RouletteState::Idle;
        self.eligible.clear();
        self.character = None;
        self.result = None;
        self.spinner = None;
    }

    fn expect_state(&self, expected: RouletteState, intent: &'static str) -> RouletteResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RouletteError::InvalidTransition {
                state: self.state,
                intent,
            })
        }
    }

    fn begin_spin(&mut self, phase: Phase, len: usize) -> SpinHandle {
        self.generation += 1;
        self.spinner = Some(Spinner::new(len, &self.config.spin));
        debug!(%phase, len, "spin started");
        self.emit(RouletteEvent::SpinStarted { phase, len });
        SpinHandle {
            phase,
            generation: self.generation,
        }
    }

    fn choose_character(&mut self, index: usize, auto: bool) -> Progress {
        let character = self.eligible[index].clone();
        debug!(character = %character.name, auto, "character chosen");
        self.state = RouletteState::CharacterChosen;
        self.character = Some(character.clone());
        self.emit(RouletteEvent::CharacterChosen { character, auto });

        if self.config.auto_persona_spin {
            self.enter_persona_phase()
        } else {
            Progress::AwaitingPersonaSpin
        }
    }

    fn enter_persona_phase(&mut self) -> Progress {
        let Some(character) = self.character.clone() else {
            self.state = RouletteState::Idle;
            return Progress::AwaitingPersonaSpin;
        };

        if character.personas.len() == 1 {
            debug!(character = %character.name, "single eligible persona, skipping persona spin");
            let result = SelectionResult::new(&character, &character.personas[0]);
            return Progress::Complete(self.complete(result, true));
        }

        let handle = self.begin_spin(Phase::Persona, character.personas.len());
        self.state = RouletteState::SpinningPersona;
        Progress::Spinning(handle)
    }

    fn complete(&mut self, result: SelectionResult, auto: bool) -> SelectionResult {
        info!(selection = %result, "selection complete");
        self.state = RouletteState::PersonaChosen;
        self.result = Some(result.clone());
        self.emit(RouletteEvent::PersonaChosen {
            result: result.clone(),
            auto,
        });
        result
    }

    fn emit(&mut self, event: RouletteEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}
