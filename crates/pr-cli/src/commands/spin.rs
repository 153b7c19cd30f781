use std::io::{self, Write};
use std::thread;

use colored::Colorize;
use pr_roulette::{Phase, Progress, SelectionResult, Session, SpinHandle, TickOutcome};

use super::Context;

/// Ticks shown per reel when animating.
const ANIMATION_TICKS: u32 = 60;

pub fn run(ctx: &Context, seed: Option<u64>, animate: bool) -> Result<(), String> {
    let mut session = ctx.session(seed);
    let result = spin_to_completion(&mut session, animate)?;

    println!("  {} {}", "Character:".bold(), result.character_name);
    println!("  {} {}", "Persona:".bold(), result.persona.name.cyan());
    if let Some(asset) = session.reveal() {
        println!("  {} {asset}", "Special reveal:".magenta().bold());
    }
    Ok(())
}

/// Drive both phases until a selection is made.
fn spin_to_completion(session: &mut Session, animate: bool) -> Result<SelectionResult, String> {
    let mut progress = session.start_character_spin().map_err(|e| e.to_string())?;

    loop {
        progress = match progress {
            Progress::Spinning(handle) => {
                if animate {
                    animate_reel(session, handle)?;
                }
                match handle.phase() {
                    Phase::Character => session.stop_character_spin(),
                    Phase::Persona => session.stop_persona_spin().map(Progress::Complete),
                }
                .map_err(|e| e.to_string())?
            }
            Progress::AwaitingPersonaSpin => {
                session.start_persona_spin().map_err(|e| e.to_string())?
            }
            Progress::Complete(result) => return Ok(result),
        };
    }
}

fn animate_reel(session: &mut Session, handle: SpinHandle) -> Result<(), String> {
    let interval = session.roulette().config().spin.tick_interval();
    let mut out = io::stdout();

    for _ in 0..ANIMATION_TICKS {
        let TickOutcome::Advanced { centered, .. } = session.tick(handle) else {
            break;
        };
        let label = reel_label(session, handle.phase(), centered);
        print!("\r  {label:<60}");
        out.flush().map_err(|e| e.to_string())?;
        thread::sleep(interval);
    }
    print!("\r{:<64}\r", "");
    out.flush().map_err(|e| e.to_string())
}

fn reel_label(session: &Session, phase: Phase, index: usize) -> String {
    let roulette = session.roulette();
    match phase {
        Phase::Character => roulette
            .eligible()
            .get(index)
            .map(|c| c.name.clone())
            .unwrap_or_default(),
        Phase::Persona => roulette
            .chosen_character()
            .and_then(|c| c.personas.get(index))
            .map(|p| p.persona.name.clone())
            .unwrap_or_default(),
    }
}
