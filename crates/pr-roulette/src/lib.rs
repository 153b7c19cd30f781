//! Selection engine and roulette state machine for Persona Roulette.
//!
//! Computes the eligible characters and personas from a roster and its
//! filter state, draws from them with a cryptographically strong random
//! source, and drives the two-phase spin (character, then persona) with
//! cooperative cancellation. A [`Session`] bundles everything a front end
//! needs: filters, the roulette, a stopwatch, local records, and reveals.

pub mod config;
pub mod engine;
pub mod error;
pub mod random;
pub mod records;
pub mod reveal;
pub mod roulette;
pub mod session;
pub mod spin;
pub mod timer;

pub use config::{RouletteConfig, SpinConfig};
pub use engine::{
    EligibleCharacter, EligiblePersona, EligibleSet, SelectionResult, compute_eligible,
    draw_character, draw_persona, validate,
};
pub use error::{RouletteError, RouletteResult, ValidationError};
pub use random::{RandomSource, SecureRandom, SeededRandom};
pub use records::{Record, RecordBook, RecordSubject, parse_duration};
pub use reveal::RevealTable;
pub use roulette::{
    Phase, Progress, Roulette, RouletteEvent, RouletteState, SpinHandle, TickOutcome,
};
pub use session::Session;
pub use spin::Spinner;
pub use timer::{Stopwatch, format_hms};
