//! Local ranking of timed runs.
//!
//! Records live in a JSON array file. A missing or unreadable file starts an
//! empty book; the user only loses history, never the ability to play.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pr_core::CoreError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::SelectionResult;
use crate::error::{RouletteError, RouletteResult};
use crate::timer::format_hms;

/// Name and portrait of a recorded character or persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSubject {
    /// Display name.
    pub name: String,
    /// Portrait reference.
    pub avatar: String,
}

/// One timed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Run time in whole seconds.
    pub seconds: u64,
    /// Free-form note.
    #[serde(default)]
    pub comment: String,
    /// When the record was saved.
    pub recorded_at: DateTime<Utc>,
    /// Character played, if a selection was made.
    #[serde(default)]
    pub character: Option<RecordSubject>,
    /// Persona played, if a selection was made.
    #[serde(default)]
    pub persona: Option<RecordSubject>,
}

impl Record {
    /// A record for `selection`, or a bare time when there is none.
    pub fn new(
        seconds: u64,
        comment: impl Into<String>,
        recorded_at: DateTime<Utc>,
        selection: Option<&SelectionResult>,
    ) -> Self {
        Self {
            seconds,
            comment: comment.into(),
            recorded_at,
            // The character is pictured in the persona's portrait when it has one.
            character: selection.map(|s| RecordSubject {
                name: s.character_name.clone(),
                avatar: if s.persona.avatar.is_empty() {
                    s.character_avatar.clone()
                } else {
                    s.persona.avatar.clone()
                },
            }),
            persona: selection.map(|s| RecordSubject {
                name: s.persona.name.clone(),
                avatar: s.persona.avatar.clone(),
            }),
        }
    }

    /// Run time as `HH:MM:SS`.
    pub fn time(&self) -> String {
        format_hms(self.seconds)
    }
}

/// Saved records, optionally backed by a file.
#[derive(Debug, Default)]
pub struct RecordBook {
    records: Vec<Record>,
    path: Option<PathBuf>,
}

impl RecordBook {
    /// A book that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the book stored at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match read_records(&path) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read records, starting empty");
                Vec::new()
            }
        };
        debug!(count = records.len(), "records loaded");
        Self {
            records,
            path: Some(path),
        }
    }

    /// Save a record. Zero-second runs are rejected. If the file cannot be
    /// written the record is not kept.
    pub fn add(&mut self, record: Record) -> RouletteResult<&Record> {
        if record.seconds == 0 {
            return Err(RouletteError::EmptyRecord);
        }
        self.records.push(record);
        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }
        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records fastest first, ties broken by date.
    pub fn ranked(&self) -> Vec<&Record> {
        let mut ranked: Vec<&Record> = self.records.iter().collect();
        ranked.sort_by(|a, b| {
            a.seconds
                .cmp(&b.seconds)
                .then(a.recorded_at.cmp(&b.recorded_at))
        });
        ranked
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record is saved.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn save(&self) -> RouletteResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| CoreError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.records).map_err(CoreError::from)?;
        fs::write(path, json).map_err(io_err)?;
        Ok(())
    }
}

fn read_records(path: &Path) -> Result<Vec<Record>, CoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(CoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    Ok(serde_json::from_str(&text)?)
}

/// Parse `HH:MM:SS`, `MM:SS` or plain seconds.
pub fn parse_duration(input: &str) -> RouletteResult<u64> {
    let invalid = || RouletteError::InvalidDuration(input.to_string());
    let parts = input
        .trim()
        .split(':')
        .map(|p| p.trim().parse::<u64>().map_err(|_| invalid()))
        .collect::<RouletteResult<Vec<u64>>>()?;

    match parts.as_slice() {
        [s] => Ok(*s),
        [m, s] if *s < 60 => Ok(m * 60 + s),
        [h, m, s] if *m < 60 && *s < 60 => Ok(h * 3600 + m * 60 + s),
        _ => Err(invalid()),
    }
}
