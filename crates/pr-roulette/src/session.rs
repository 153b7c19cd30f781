//! The session context a front end drives.
//!
//! `Session` owns the filter store, the roulette, the stopwatch, and the
//! record book. Filter intents go through it so that every mutation also
//! reaches the roulette and cancels a spin in progress. The same intents
//! are offered as a small line-command language through
//! [`Session::process`].

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pr_core::{CharacterId, FilterStore, InvertScope, Roster};

use crate::engine::SelectionResult;
use crate::error::{RouletteError, RouletteResult};
use crate::records::{Record, RecordBook};
use crate::reveal::RevealTable;
use crate::roulette::{Phase, Progress, Roulette, RouletteState, SpinHandle, TickOutcome};
use crate::timer::{Stopwatch, format_hms};

/// Everything needed to filter, spin, time, and record.
pub struct Session {
    roster: Arc<Roster>,
    filters: FilterStore,
    roulette: Roulette,
    stopwatch: Stopwatch,
    records: RecordBook,
    reveals: RevealTable,
}

impl Session {
    /// Build a session over an opened filter store. Uses the built-in
    /// reveal table.
    pub fn new(filters: FilterStore, roulette: Roulette, records: RecordBook) -> Self {
        Self {
            roster: filters.roster().clone(),
            filters,
            roulette,
            stopwatch: Stopwatch::new(),
            records,
            reveals: RevealTable::builtin(),
        }
    }

    /// Replace the reveal table.
    pub fn with_reveals(mut self, reveals: RevealTable) -> Self {
        self.reveals = reveals;
        self
    }

    /// The roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The filter store.
    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    /// The roulette.
    pub fn roulette(&self) -> &Roulette {
        &self.roulette
    }

    /// Mutable access to the roulette, for registering observers.
    pub fn roulette_mut(&mut self) -> &mut Roulette {
        &mut self.roulette
    }

    /// The stopwatch.
    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    /// The record book.
    pub fn records(&self) -> &RecordBook {
        &self.records
    }

    /// The finished selection, if any.
    pub fn selection(&self) -> Option<&SelectionResult> {
        self.roulette.result()
    }

    /// Reveal asset for the finished selection, if it has one.
    pub fn reveal(&self) -> Option<&str> {
        self.selection().and_then(|s| self.reveals.lookup(s))
    }

    // -- Roulette intents --

    /// Start a new cycle.
    pub fn start_character_spin(&mut self) -> RouletteResult<Progress> {
        self.roulette
            .start_character_spin(&self.roster, self.filters.state())
    }

    /// Stop the character reel.
    pub fn stop_character_spin(&mut self) -> RouletteResult<Progress> {
        self.roulette.stop_character_spin()
    }

    /// Start or re-roll the persona reel.
    pub fn start_persona_spin(&mut self) -> RouletteResult<Progress> {
        self.roulette.start_persona_spin()
    }

    /// Stop the persona reel.
    pub fn stop_persona_spin(&mut self) -> RouletteResult<SelectionResult> {
        self.roulette.stop_persona_spin()
    }

    /// Advance a running spin.
    pub fn tick(&mut self, handle: SpinHandle) -> TickOutcome {
        self.roulette.tick(handle)
    }

    // -- Filter intents --

    /// Enable or disable one character.
    pub fn toggle_character(&mut self, id: CharacterId, enabled: bool) -> RouletteResult<()> {
        self.roster.require(id)?;
        self.filters.set_character_enabled(id, enabled);
        self.roulette.on_filter_changed();
        Ok(())
    }

    /// Enable or disable every character.
    pub fn toggle_all_characters(&mut self, enabled: bool) {
        self.filters.select_all(enabled);
        self.roulette.on_filter_changed();
    }

    /// Flip every character.
    pub fn invert_characters(&mut self) {
        self.filters.invert(InvertScope::Characters);
        self.roulette.on_filter_changed();
    }

    /// Enable or disable one persona.
    pub fn toggle_persona(
        &mut self,
        id: CharacterId,
        index: usize,
        enabled: bool,
    ) -> RouletteResult<()> {
        self.roster.persona(id, index)?;
        self.filters.set_persona_enabled(id, index, enabled);
        self.roulette.on_filter_changed();
        Ok(())
    }

    /// Enable or disable every persona of one character.
    pub fn toggle_all_personas(&mut self, id: CharacterId, enabled: bool) -> RouletteResult<()> {
        self.roster.require(id)?;
        self.filters.select_all_personas(id, enabled);
        self.roulette.on_filter_changed();
        Ok(())
    }

    /// Flip every persona of one character.
    pub fn invert_personas(&mut self, id: CharacterId) -> RouletteResult<()> {
        self.roster.require(id)?;
        self.filters.invert(InvertScope::Personas(id));
        self.roulette.on_filter_changed();
        Ok(())
    }

    /// Enable everything.
    pub fn reset_filters(&mut self) {
        self.filters.reset();
        self.roulette.on_filter_changed();
    }

    // -- Timer and records --

    /// Start the stopwatch from zero.
    pub fn start_timer(&mut self, now: DateTime<Utc>) -> RouletteResult<()> {
        self.stopwatch.start(now)
    }

    /// Pause the stopwatch.
    pub fn pause_timer(&mut self, now: DateTime<Utc>) -> RouletteResult<()> {
        self.stopwatch.pause(now)
    }

    /// Resume the stopwatch.
    pub fn resume_timer(&mut self, now: DateTime<Utc>) -> RouletteResult<()> {
        self.stopwatch.resume(now)
    }

    /// Stop and clear the stopwatch.
    pub fn reset_timer(&mut self) {
        self.stopwatch.reset();
    }

    /// Save the stopwatch time with the current selection.
    pub fn save_record(&mut self, comment: &str, now: DateTime<Utc>) -> RouletteResult<Record> {
        let seconds = self.stopwatch.elapsed_seconds(now);
        let record = Record::new(seconds, comment.trim(), now, self.roulette.result());
        self.records.add(record).cloned()
    }

    // -- Line commands --

    /// Process a line of user input and return a response.
    pub fn process(&mut self, input: &str) -> RouletteResult<String> {
        self.process_at(input, Utc::now())
    }

    /// Like [`Session::process`], with an explicit clock for timer commands.
    pub fn process_at(&mut self, input: &str, now: DateTime<Utc>) -> RouletteResult<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");

        match cmd.as_str() {
            "start" | "spin" => self.do_start(),
            "stop" => self.do_stop(rest),
            "persona" => {
                let progress = self.start_persona_spin()?;
                Ok(self.describe(progress))
            }
            "enable" | "on" => self.do_toggle(rest, true),
            "disable" | "off" => self.do_toggle(rest, false),
            "all" => self.do_all(rest),
            "invert" => self.do_invert(rest),
            "reset" => {
                let cancelled = self.roulette.state().is_spinning();
                self.reset_filters();
                Ok(with_cancel_note("All characters and personas enabled.", cancelled))
            }
            "filters" | "roster" if rest.is_empty() => Ok(self.do_filters()),
            "filters" | "roster" => self.do_roster_entry(rest),
            "status" => Ok(self.do_status(now)),
            "timer" => self.do_timer(rest, now),
            "save" => {
                let record = self.save_record(rest, now)?;
                Ok(format!("Record saved: {}", record.time()))
            }
            "records" => Ok(self.do_records()),
            "help" => Ok(HELP.to_string()),
            "quit" | "q" => Ok("Goodbye!".to_string()),
            _ => Err(RouletteError::UnknownCommand(cmd)),
        }
    }

    fn do_start(&mut self) -> RouletteResult<String> {
        let progress = self.start_character_spin()?;
        Ok(self.describe(progress))
    }

    fn do_stop(&mut self, rest: &str) -> RouletteResult<String> {
        match (rest.to_lowercase().as_str(), self.roulette.state()) {
            ("persona", _) | ("", RouletteState::SpinningPersona) => {
                let result = self.stop_persona_spin()?;
                Ok(self.describe(Progress::Complete(result)))
            }
            ("" | "character", _) => {
                let progress = self.stop_character_spin()?;
                Ok(self.describe(progress))
            }
            (other, _) => Err(RouletteError::InvalidCommand(format!(
                "stop {other} (use: stop, stop character, stop persona)"
            ))),
        }
    }

    fn do_toggle(&mut self, rest: &str, enabled: bool) -> RouletteResult<String> {
        let cancelled = self.roulette.state().is_spinning();
        let verb = if enabled { "enabled" } else { "disabled" };
        let (id, index) = parse_target(rest)?;
        let message = match index {
            Some(index) => {
                self.toggle_persona(id, index, enabled)?;
                let persona = self.roster.persona(id, index)?;
                format!("{} {verb}.", persona.name)
            }
            None => {
                self.toggle_character(id, enabled)?;
                format!("{} {verb}.", self.character_name(id))
            }
        };
        Ok(with_cancel_note(&message, cancelled))
    }

    fn do_all(&mut self, rest: &str) -> RouletteResult<String> {
        let cancelled = self.roulette.state().is_spinning();
        let mut words = rest.split_whitespace();
        let enabled = match words.next().map(str::to_lowercase).as_deref() {
            Some("on") => true,
            Some("off") => false,
            _ => {
                return Err(RouletteError::InvalidCommand(
                    "usage: all on|off [character id]".to_string(),
                ));
            }
        };
        let verb = if enabled { "enabled" } else { "disabled" };
        let message = match words.next() {
            Some(id) => {
                let id = parse_id(id)?;
                self.toggle_all_personas(id, enabled)?;
                format!("All personas of {} {verb}.", self.character_name(id))
            }
            None => {
                self.toggle_all_characters(enabled);
                format!("All characters {verb}.")
            }
        };
        Ok(with_cancel_note(&message, cancelled))
    }

    fn do_invert(&mut self, rest: &str) -> RouletteResult<String> {
        let cancelled = self.roulette.state().is_spinning();
        let message = if rest.is_empty() {
            self.invert_characters();
            "Character selection inverted.".to_string()
        } else {
            let id = parse_id(rest)?;
            self.invert_personas(id)?;
            format!("Personas of {} inverted.", self.character_name(id))
        };
        Ok(with_cancel_note(&message, cancelled))
    }

    fn do_timer(&mut self, rest: &str, now: DateTime<Utc>) -> RouletteResult<String> {
        match rest.to_lowercase().as_str() {
            "start" => {
                self.start_timer(now)?;
                Ok("Timer started.".to_string())
            }
            "pause" => {
                self.pause_timer(now)?;
                Ok(format!(
                    "Timer paused at {}.",
                    format_hms(self.stopwatch.elapsed_seconds(now))
                ))
            }
            "resume" => {
                self.resume_timer(now)?;
                Ok("Timer running.".to_string())
            }
            "reset" => {
                self.reset_timer();
                Ok("Timer reset.".to_string())
            }
            "" => Ok(format!(
                "Timer: {}",
                format_hms(self.stopwatch.elapsed_seconds(now))
            )),
            other => Err(RouletteError::InvalidCommand(format!(
                "timer {other} (use: start, pause, resume, reset)"
            ))),
        }
    }

    fn do_filters(&self) -> String {
        let mut out = format!(
            "Characters enabled: {}/{}\n",
            self.filters.enabled_count(),
            self.filters.len()
        );
        for c in self.roster.characters() {
            let _ = writeln!(
                out,
                "  {} {:>2}  {:<14} personas {}/{}",
                mark(self.filters.is_character_enabled(c.id)),
                c.id,
                c.name,
                self.filters.enabled_persona_count(c.id),
                c.personas.len()
            );
        }
        out.trim_end().to_string()
    }

    fn do_roster_entry(&self, rest: &str) -> RouletteResult<String> {
        let character = match rest.parse::<u32>() {
            Ok(id) => self.roster.require(CharacterId(id))?,
            Err(_) => self
                .roster
                .find_by_name(rest)
                .ok_or_else(|| RouletteError::InvalidCommand(format!("no character named '{rest}'")))?,
        };
        let mut out = format!(
            "{} {} (#{})\n",
            mark(self.filters.is_character_enabled(character.id)),
            character.name,
            character.id
        );
        for (index, persona) in character.personas.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {} {index}  {}",
                mark(self.filters.is_persona_enabled(character.id, index)),
                persona.name
            );
        }
        Ok(out.trim_end().to_string())
    }

    fn do_status(&self, now: DateTime<Utc>) -> String {
        let mut out = format!("Roulette: {}\n", self.roulette.state());
        if let Some(result) = self.selection() {
            let _ = writeln!(out, "Selection: {result}");
        } else if let Some(character) = self.roulette.chosen_character() {
            let _ = writeln!(out, "Character: {}", character.name);
        }
        let _ = writeln!(
            out,
            "Characters enabled: {}/{}",
            self.filters.enabled_count(),
            self.roster.len()
        );
        let timer_state = if self.stopwatch.is_running() {
            "running"
        } else {
            "stopped"
        };
        let _ = writeln!(
            out,
            "Timer: {} ({timer_state})",
            format_hms(self.stopwatch.elapsed_seconds(now))
        );
        let _ = write!(out, "Records: {}", self.records.len());
        if self.filters.is_dirty() {
            out.push_str("\nFilters not saved (storage unavailable)");
        }
        out
    }

    fn do_records(&self) -> String {
        if self.records.is_empty() {
            return "No records yet.".to_string();
        }
        let mut out = String::from("Records:\n");
        for (rank, record) in self.records.ranked().iter().enumerate() {
            let who = match (&record.character, &record.persona) {
                (Some(c), Some(p)) => format!("{} / {}", c.name, p.name),
                (Some(c), None) => c.name.clone(),
                _ => "-".to_string(),
            };
            let _ = write!(out, "  {:>2}. {}  {who}", rank + 1, record.time());
            if !record.comment.is_empty() {
                let _ = write!(out, "  \"{}\"", record.comment);
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }

    fn describe(&self, progress: Progress) -> String {
        let mut out = String::new();
        if let Some(character) = self.roulette.chosen_character() {
            let _ = writeln!(out, "Character: {}", character.name);
        }
        match progress {
            Progress::Spinning(handle) => match handle.phase() {
                Phase::Character => {
                    let _ = write!(
                        out,
                        "Spinning {} characters... (type 'stop')",
                        self.roulette.eligible().len()
                    );
                }
                Phase::Persona => {
                    let count = self
                        .roulette
                        .chosen_character()
                        .map_or(0, |c| c.personas.len());
                    let _ = write!(out, "Spinning {count} personas... (type 'stop')");
                }
            },
            Progress::AwaitingPersonaSpin => {
                out.push_str("Type 'persona' to spin for a persona.");
            }
            Progress::Complete(result) => {
                let _ = write!(out, "Persona: {}", result.persona.name);
                if let Some(asset) = self.reveals.lookup(&result) {
                    let _ = write!(out, "\nSpecial reveal: {asset}");
                }
            }
        }
        out
    }

    fn character_name(&self, id: CharacterId) -> String {
        self.roster
            .get(id)
            .map_or_else(|| id.to_string(), |c| c.name.clone())
    }
}

const HELP: &str = "\
Commands:
  start                         Spin for a character
  stop [character|persona]      Stop the spinning reel
  persona                       Spin (again) for a persona
  enable <id>[/<index>]         Enable a character or one of its personas
  disable <id>[/<index>]        Disable a character or one of its personas
  all on|off [id]               Set every character, or every persona of one
  invert [id]                   Invert characters, or the personas of one
  reset                         Enable everything
  filters                       Show character filters
  roster <id|name>              Show one character's personas
  status                        Show session status
  timer [start|pause|resume|reset]
  save [comment]                Save the timer as a record
  records                       Show records, fastest first
  help                          Show this help
  quit                          Exit";

fn mark(enabled: bool) -> &'static str {
    if enabled { "[x]" } else { "[ ]" }
}

fn with_cancel_note(message: &str, cancelled: bool) -> String {
    if cancelled {
        format!("{message} (spin cancelled)")
    } else {
        message.to_string()
    }
}

fn parse_id(input: &str) -> RouletteResult<CharacterId> {
    input
        .trim()
        .parse::<u32>()
        .map(CharacterId)
        .map_err(|_| RouletteError::InvalidCommand(format!("'{input}' is not a character id")))
}

/// Parse `<id>` or `<id>/<index>`.
fn parse_target(input: &str) -> RouletteResult<(CharacterId, Option<usize>)> {
    if input.is_empty() {
        return Err(RouletteError::InvalidCommand(
            "usage: enable|disable <id>[/<index>]".to_string(),
        ));
    }
    match input.split_once('/') {
        Some((id, index)) => {
            let index = index.trim().parse::<usize>().map_err(|_| {
                RouletteError::InvalidCommand(format!("'{index}' is not a persona index"))
            })?;
            Ok((parse_id(id)?, Some(index)))
        }
        None => Ok((parse_id(input)?, None)),
    }
}
