//! CLI frontend for Persona Roulette.

mod commands;
mod logging;
mod settings;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::Context;
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "roulette",
    about = "Persona Roulette: draw a random character and persona",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory for saved filters and records
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Roster JSON file to use instead of the built-in roster
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    fn enabled(self) -> bool {
        matches!(self, Switch::On)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List characters and how many of their personas are enabled
    Roster,

    /// Show one character and its personas
    Show {
        /// Character id or name (case-insensitive)
        character: String,
    },

    /// Enable a character, or one of its personas
    Enable {
        /// Character id
        id: u32,

        /// Persona index instead of the whole character
        #[arg(short, long)]
        persona: Option<usize>,
    },

    /// Disable a character, or one of its personas
    Disable {
        /// Character id
        id: u32,

        /// Persona index instead of the whole character
        #[arg(short, long)]
        persona: Option<usize>,
    },

    /// Enable or disable every character, or every persona of one
    All {
        /// on or off
        #[arg(value_enum)]
        switch: Switch,

        /// Apply to the personas of this character
        #[arg(short, long)]
        character: Option<u32>,
    },

    /// Invert the character selection, or the personas of one character
    Invert {
        /// Invert the personas of this character
        #[arg(short, long)]
        character: Option<u32>,
    },

    /// Enable every character and persona
    Reset,

    /// Draw a character and a persona
    Spin {
        /// RNG seed for a reproducible draw
        #[arg(short, long)]
        seed: Option<u64>,

        /// Show the spinning reels
        #[arg(short, long)]
        animate: bool,
    },

    /// Start an interactive session
    Play {
        /// RNG seed for reproducible draws
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Show saved records, fastest first
    Records,

    /// Save a run time (HH:MM:SS, MM:SS or seconds)
    Record {
        /// Run time
        time: String,

        /// Note stored with the record
        #[arg(short, long, default_value = "")]
        comment: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let (settings, settings_path) = Settings::load(cli.config.as_deref())?;
    logging::init(&settings.log_level, cli.verbose);
    if let Some(path) = &settings_path {
        tracing::debug!(path = %path.display(), "settings loaded");
    }

    let ctx = Context::new(cli.state_dir, cli.roster, settings)?;

    match cli.command {
        Commands::Roster => commands::roster::run(&ctx),
        Commands::Show { character } => commands::show::run(&ctx, &character),
        Commands::Enable { id, persona } => commands::filter::toggle(&ctx, id, persona, true),
        Commands::Disable { id, persona } => commands::filter::toggle(&ctx, id, persona, false),
        Commands::All { switch, character } => {
            commands::filter::all(&ctx, switch.enabled(), character)
        }
        Commands::Invert { character } => commands::filter::invert(&ctx, character),
        Commands::Reset => commands::filter::reset(&ctx),
        Commands::Spin { seed, animate } => commands::spin::run(&ctx, seed, animate),
        Commands::Play { seed } => commands::play::run(&ctx, seed),
        Commands::Records => commands::records::list(&ctx),
        Commands::Record { time, comment } => commands::records::add(&ctx, &time, &comment),
    }
}
