//! Integration tests for the pr-cli command-line interface.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Create a temp directory with a two-character roster and empty settings.
fn test_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("roster.json"),
        r##"[
  {
    "id": 2,
    "name": "Faust",
    "color": "#4169E1",
    "personas": [
      { "name": "LCB Sinner", "avatar": "faust.jpg" },
      { "name": "黑兽-卯魁首", "avatar": "faust-mao.webp" }
    ]
  },
  {
    "id": 8,
    "name": "Ishmael",
    "color": "#FF8C00",
    "personas": [
      { "name": "LCB Sinner", "avatar": "ishmael.jpg" },
      { "name": "Pequod Captain", "avatar": "ishmael-pequod.webp" },
      { "name": "Zwei Assoc. South Section 4", "avatar": "ishmael-zwei.webp" }
    ]
  }
]"##,
    )
    .unwrap();
    fs::write(dir.path().join("roulette.toml"), "").unwrap();
    dir
}

/// A command running in `dir` with its roster and a private state directory.
fn roulette(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("roulette").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .arg("--roster")
        .arg(dir.join("roster.json"))
        .arg("--state-dir")
        .arg(dir.join("state"));
    cmd
}

// ---------------------------------------------------------------------------
// roster / show
// ---------------------------------------------------------------------------

#[test]
fn roster_lists_characters() {
    let dir = test_dir();
    roulette(dir.path())
        .arg("roster")
        .assert()
        .success()
        .stdout(predicate::str::contains("Faust"))
        .stdout(predicate::str::contains("Ishmael"))
        .stdout(predicate::str::contains("3/3"))
        .stdout(predicate::str::contains("2/2 characters enabled"));
}

#[test]
fn builtin_roster_is_used_by_default() {
    let dir = test_dir();
    let mut cmd = Command::cargo_bin("roulette").unwrap();
    cmd.current_dir(dir.path())
        .arg("--state-dir")
        .arg(dir.path().join("state"))
        .arg("roster")
        .assert()
        .success()
        .stdout(predicate::str::contains("Yi Sang"))
        .stdout(predicate::str::contains("Outis"))
        .stdout(predicate::str::contains("12/12 characters enabled"));
}

#[test]
fn show_by_name_and_id() {
    let dir = test_dir();
    roulette(dir.path())
        .args(["show", "ishm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ishmael"))
        .stdout(predicate::str::contains("Pequod Captain"));

    roulette(dir.path())
        .args(["show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("黑兽-卯魁首"));
}

#[test]
fn show_unknown_character_fails() {
    let dir = test_dir();
    roulette(dir.path())
        .args(["show", "Vergilius"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no character matching 'Vergilius'"));
}

// ---------------------------------------------------------------------------
// filters
// ---------------------------------------------------------------------------

#[test]
fn disable_persists_between_runs() {
    let dir = test_dir();
    roulette(dir.path())
        .args(["disable", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ishmael"));

    assert!(dir.path().join("state").join("filters.json").exists());

    roulette(dir.path())
        .arg("roster")
        .assert()
        .success()
        .stdout(predicate::str::contains("1/2 characters enabled"));
}

#[test]
fn disable_persona() {
    let dir = test_dir();
    roulette(dir.path())
        .args(["disable", "8", "--persona", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pequod Captain"));

    roulette(dir.path())
        .arg("roster")
        .assert()
        .success()
        .stdout(predicate::str::contains("2/3"));
}

#[test]
fn unknown_ids_fail() {
    let dir = test_dir();
    roulette(dir.path())
        .args(["enable", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown character: 99"));

    roulette(dir.path())
        .args(["disable", "2", "--persona", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no persona at index 5"));
}

#[test]
fn invert_and_reset() {
    let dir = test_dir();
    roulette(dir.path()).args(["disable", "2"]).assert().success();

    roulette(dir.path())
        .arg("invert")
        .assert()
        .success()
        .stdout(predicate::str::contains("1/2 characters enabled"));

    roulette(dir.path())
        .args(["show", "ishmael"])
        .assert()
        .success()
        .stdout(predicate::str::contains("disabled"));

    roulette(dir.path()).args(["all", "off"]).assert().success();
    roulette(dir.path()).arg("reset").assert().success();
    roulette(dir.path())
        .arg("roster")
        .assert()
        .success()
        .stdout(predicate::str::contains("2/2 characters enabled"));
}

// ---------------------------------------------------------------------------
// spin
// ---------------------------------------------------------------------------

#[test]
fn spin_with_seed() {
    let dir = test_dir();
    roulette(dir.path())
        .args(["spin", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Character:"))
        .stdout(predicate::str::contains("Persona:"));
}

#[test]
fn spin_is_reproducible_with_seed() {
    let dir = test_dir();
    let first = roulette(dir.path())
        .args(["spin", "--seed", "42"])
        .output()
        .unwrap();
    let second = roulette(dir.path())
        .args(["spin", "--seed", "42"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn spin_single_choice_shows_reveal() {
    let dir = test_dir();
    roulette(dir.path()).args(["disable", "8"]).assert().success();
    roulette(dir.path())
        .args(["disable", "2", "--persona", "0"])
        .assert()
        .success();

    roulette(dir.path())
        .arg("spin")
        .assert()
        .success()
        .stdout(predicate::str::contains("Faust"))
        .stdout(predicate::str::contains("黑兽-卯魁首"))
        .stdout(predicate::str::contains("faust_mao_kui_shou.mp4"));
}

#[test]
fn spin_with_nothing_enabled_fails() {
    let dir = test_dir();
    roulette(dir.path()).args(["all", "off"]).assert().success();
    roulette(dir.path())
        .arg("spin")
        .assert()
        .failure()
        .stderr(predicate::str::contains("select at least one character"));
}

#[test]
fn spin_names_characters_without_personas() {
    let dir = test_dir();
    roulette(dir.path())
        .args(["all", "off", "--character", "8"])
        .assert()
        .success();
    roulette(dir.path())
        .arg("spin")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "select at least one persona for: Ishmael",
        ));
}

#[test]
fn spin_animated() {
    let dir = test_dir();
    fs::write(
        dir.path().join("roulette.toml"),
        "[roulette.spin]\ntick_ms = 0\n",
    )
    .unwrap();
    roulette(dir.path())
        .args(["spin", "--seed", "3", "--animate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Persona:"));
}

#[test]
fn spin_survives_oversized_reel_settings() {
    let dir = test_dir();
    fs::write(
        dir.path().join("roulette.toml"),
        "[roulette.spin]\nitem_height = 9223372036854775807\nloop_multiplier = 9223372036854775807\nspeed = 9223372036854775807\ntick_ms = 0\n",
    )
    .unwrap();
    roulette(dir.path())
        .args(["spin", "--seed", "11", "--animate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Persona:"));
}

// ---------------------------------------------------------------------------
// records
// ---------------------------------------------------------------------------

#[test]
fn record_and_list() {
    let dir = test_dir();
    roulette(dir.path())
        .args(["record", "1:30", "--comment", "first try"])
        .assert()
        .success()
        .stdout(predicate::str::contains("00:01:30"));
    roulette(dir.path())
        .args(["record", "45"])
        .assert()
        .success();

    roulette(dir.path())
        .arg("records")
        .assert()
        .success()
        .stdout(predicate::str::contains("00:00:45"))
        .stdout(predicate::str::contains("first try"))
        .stdout(predicate::str::contains("2 records"));
}

#[test]
fn records_empty() {
    let dir = test_dir();
    roulette(dir.path())
        .arg("records")
        .assert()
        .success()
        .stdout(predicate::str::contains("No records yet."));
}

#[test]
fn record_rejects_zero_and_garbage() {
    let dir = test_dir();
    roulette(dir.path())
        .args(["record", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("finish a timed run"));
    roulette(dir.path())
        .args(["record", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid duration"));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_session() {
    let dir = test_dir();
    roulette(dir.path())
        .args(["play", "--seed", "5"])
        .write_stdin("start\nstop\nstop\nstatus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Spinning 2 characters"))
        .stdout(predicate::str::contains("Persona:"))
        .stdout(predicate::str::contains("a persona is chosen"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn play_filter_change_cancels_spin() {
    let dir = test_dir();
    roulette(dir.path())
        .arg("play")
        .write_stdin("start\ndisable 8/1\nstop\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(spin cancelled)"))
        .stdout(predicate::str::contains("cannot stop the character spin while idle"));
}

// ---------------------------------------------------------------------------
// settings
// ---------------------------------------------------------------------------

#[test]
fn missing_config_file_fails() {
    let dir = test_dir();
    roulette(dir.path())
        .args(["--config", "nowhere.toml", "roster"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("settings file not found"));
}

#[test]
fn invalid_config_file_fails() {
    let dir = test_dir();
    fs::write(dir.path().join("roulette.toml"), "log_level = [").unwrap();
    roulette(dir.path())
        .arg("roster")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid settings"));
}

#[test]
fn settings_can_disable_auto_persona_spin() {
    let dir = test_dir();
    fs::write(
        dir.path().join("roulette.toml"),
        "[roulette]\nauto_persona_spin = false\n",
    )
    .unwrap();
    roulette(dir.path())
        .arg("play")
        .write_stdin("start\nstop\npersona\nstop\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Type 'persona'"))
        .stdout(predicate::str::contains("Persona:"));
}
