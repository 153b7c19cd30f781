use std::io::{self, BufRead, Write};

use colored::Colorize;

use super::{Context, warn_if_unsaved};

pub fn run(ctx: &Context, seed: Option<u64>) -> Result<(), String> {
    let mut session = ctx.session(seed);

    session
        .roulette_mut()
        .on_selection_changed(|event| tracing::debug!(?event, "roulette event"));

    println!("  {} Persona Roulette", "Starting".bold());
    println!(
        "  {} characters, {} enabled",
        session.roster().len(),
        session.filters().enabled_count()
    );
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match session.process(input) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
                    break;
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
    }

    warn_if_unsaved(ctx, session.filters());
    Ok(())
}
