use colored::Colorize;
use pr_core::CharacterId;

use super::{Context, warn_if_unsaved};

pub fn toggle(ctx: &Context, id: u32, persona: Option<usize>, enabled: bool) -> Result<(), String> {
    let mut session = ctx.session(None);
    let id = CharacterId(id);

    let name = match persona {
        Some(index) => {
            session
                .toggle_persona(id, index, enabled)
                .map_err(|e| e.to_string())?;
            session
                .roster()
                .persona(id, index)
                .map(|p| p.name.clone())
                .map_err(|e| e.to_string())?
        }
        None => {
            session
                .toggle_character(id, enabled)
                .map_err(|e| e.to_string())?;
            character_name(ctx, id)
        }
    };

    println!("  {} {name}", verb(enabled));
    warn_if_unsaved(ctx, session.filters());
    Ok(())
}

pub fn all(ctx: &Context, enabled: bool, character: Option<u32>) -> Result<(), String> {
    let mut session = ctx.session(None);

    match character {
        Some(id) => {
            let id = CharacterId(id);
            session
                .toggle_all_personas(id, enabled)
                .map_err(|e| e.to_string())?;
            println!(
                "  {} all personas of {}",
                verb(enabled),
                character_name(ctx, id)
            );
        }
        None => {
            session.toggle_all_characters(enabled);
            println!("  {} all characters", verb(enabled));
        }
    }

    warn_if_unsaved(ctx, session.filters());
    Ok(())
}

pub fn invert(ctx: &Context, character: Option<u32>) -> Result<(), String> {
    let mut session = ctx.session(None);

    match character {
        Some(id) => {
            let id = CharacterId(id);
            session.invert_personas(id).map_err(|e| e.to_string())?;
            println!("  {} personas of {}", "Inverted".bold(), character_name(ctx, id));
        }
        None => {
            session.invert_characters();
            println!("  {} character selection", "Inverted".bold());
        }
    }

    let filters = session.filters();
    println!(
        "  {}/{} characters enabled",
        filters.enabled_count(),
        ctx.roster.len()
    );
    warn_if_unsaved(ctx, filters);
    Ok(())
}

pub fn reset(ctx: &Context) -> Result<(), String> {
    let mut session = ctx.session(None);
    session.reset_filters();
    println!("  {} every character and persona", "Enabled".green().bold());
    warn_if_unsaved(ctx, session.filters());
    Ok(())
}

fn verb(enabled: bool) -> colored::ColoredString {
    if enabled {
        "Enabled".green().bold()
    } else {
        "Disabled".red().bold()
    }
}

fn character_name(ctx: &Context, id: CharacterId) -> String {
    ctx.roster
        .get(id)
        .map_or_else(|| id.to_string(), |c| c.name.clone())
}
