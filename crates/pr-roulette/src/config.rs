//! Configuration for the roulette engine and its spin reels.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Geometry and pacing of a spinning reel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// Milliseconds between ticks.
    pub tick_ms: u64,
    /// Offset advanced per tick.
    pub speed: u64,
    /// Height of one reel item.
    pub item_height: u64,
    /// Fewest rows a reel shows.
    pub min_visible_rows: u64,
    /// Most rows a reel shows.
    pub max_visible_rows: u64,
    /// How many copies of the list make up one loop of the reel.
    pub loop_multiplier: u64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            tick_ms: 10,
            speed: 150,
            item_height: 64,
            min_visible_rows: 3,
            max_visible_rows: 5,
            loop_multiplier: 5,
        }
    }
}

impl SpinConfig {
    /// Time between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Configuration for a [`crate::Roulette`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouletteConfig {
    /// Seed for reproducible draws. `None` uses the OS random source.
    pub seed: Option<u64>,
    /// Start the persona spin as soon as a character is chosen.
    pub auto_persona_spin: bool,
    /// Reel geometry.
    pub spin: SpinConfig,
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            seed: None,
            auto_persona_spin: true,
            spin: SpinConfig::default(),
        }
    }
}

impl RouletteConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose whether the persona spin starts automatically.
    pub fn with_auto_persona_spin(mut self, auto: bool) -> Self {
        self.auto_persona_spin = auto;
        self
    }

    /// Replace the reel geometry. Row bounds are normalized so that
    /// `1 <= min <= max`.
    pub fn with_spin(mut self, mut spin: SpinConfig) -> Self {
        spin.min_visible_rows = spin.min_visible_rows.max(1);
        spin.max_visible_rows = spin.max_visible_rows.max(spin.min_visible_rows);
        self.spin = spin;
        self
    }
}
