//! Core types for Persona Roulette: the character roster, per-character and
//! per-persona filter state, and the persistence boundary for that state.
//!
//! This crate knows nothing about randomness or spinning. It answers one
//! question: which characters and personas are currently enabled.

/// Error types used throughout the crate.
pub mod error;
/// Filter state, the filter store, and change notifications.
pub mod filter;
/// Persistence backends for filter state.
pub mod persistence;
/// Characters, personas, and the roster that owns them.
pub mod roster;

/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export filter types.
pub use filter::{FilterChange, FilterState, FilterStore, InvertScope, StaleReference};
/// Re-export persistence types.
pub use persistence::{FilterPersistence, JsonFilePersistence, MemoryPersistence};
/// Re-export roster types.
pub use roster::{Character, CharacterId, Persona, Roster};
