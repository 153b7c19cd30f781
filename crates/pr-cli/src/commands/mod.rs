pub mod filter;
pub mod play;
pub mod records;
pub mod roster;
pub mod show;
pub mod spin;

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use pr_core::{FilterStore, JsonFilePersistence, Roster};
use pr_roulette::{
    RandomSource, RecordBook, Roulette, RouletteConfig, SecureRandom, SeededRandom, Session,
};

use crate::settings::Settings;

const FILTERS_FILE: &str = "filters.json";
const RECORDS_FILE: &str = "records.json";

/// Resolved roster, state location, and engine settings for one command.
pub struct Context {
    pub roster: Arc<Roster>,
    pub state_dir: PathBuf,
    pub config: RouletteConfig,
}

impl Context {
    /// Command-line values override file settings.
    pub fn new(
        state_dir: Option<PathBuf>,
        roster: Option<PathBuf>,
        settings: Settings,
    ) -> Result<Self, String> {
        let roster_path = roster.or(settings.roster);
        let roster = match &roster_path {
            Some(path) => Roster::load(path).map_err(|e| format!("cannot load roster: {e}"))?,
            None => Roster::builtin().map_err(|e| format!("built-in roster is broken: {e}"))?,
        };
        if roster.is_empty() {
            return Err("the roster has no characters".into());
        }

        let state_dir = state_dir
            .or(settings.state_dir)
            .unwrap_or_else(Settings::default_state_dir);
        tracing::debug!(state_dir = %state_dir.display(), characters = roster.len(), "context ready");

        Ok(Self {
            roster: Arc::new(roster),
            state_dir,
            config: settings.roulette,
        })
    }

    pub fn filters_path(&self) -> PathBuf {
        self.state_dir.join(FILTERS_FILE)
    }

    pub fn open_filters(&self) -> FilterStore {
        FilterStore::open(
            self.roster.clone(),
            Box::new(JsonFilePersistence::new(self.filters_path())),
        )
    }

    pub fn open_records(&self) -> RecordBook {
        RecordBook::open(self.state_dir.join(RECORDS_FILE))
    }

    /// A full session. `seed` overrides the configured seed.
    pub fn session(&self, seed: Option<u64>) -> Session {
        let rng = random_source(seed.or(self.config.seed));
        let roulette = Roulette::new(self.config.clone(), rng);
        Session::new(self.open_filters(), roulette, self.open_records())
    }
}

fn random_source(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(SecureRandom::new()),
    }
}

/// Warn when the last filter change could not be written.
fn warn_if_unsaved(ctx: &Context, filters: &FilterStore) {
    if filters.is_dirty() {
        eprintln!(
            "  {} could not save filters to {}",
            "warning:".yellow(),
            ctx.filters_path().display()
        );
    }
}
