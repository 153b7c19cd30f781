use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use pr_core::{Character, CharacterId};

use super::Context;

pub fn run(ctx: &Context, query: &str) -> Result<(), String> {
    let character = find(ctx, query)?;
    let filters = ctx.open_filters();

    let status = if filters.is_character_enabled(character.id) {
        "enabled".green()
    } else {
        "disabled".red()
    };
    println!("  {} (#{}, {status})", character.name.bold(), character.id);
    if !character.color.is_empty() {
        println!("  Color:  {}", character.color);
    }
    if !character.avatar.is_empty() {
        println!("  Avatar: {}", character.avatar);
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Persona", "Enabled"]);
    for (index, persona) in character.personas.iter().enumerate() {
        let enabled = if filters.is_persona_enabled(character.id, index) {
            "yes"
        } else {
            "no"
        };
        table.add_row(vec![index.to_string(), persona.name.clone(), enabled.to_string()]);
    }
    println!("{table}");

    Ok(())
}

fn find<'a>(ctx: &'a Context, query: &str) -> Result<&'a Character, String> {
    let found = match query.trim().parse::<u32>() {
        Ok(id) => ctx.roster.get(CharacterId(id)),
        Err(_) => ctx.roster.find_by_name(query),
    };
    found.ok_or_else(|| format!("no character matching '{query}'"))
}
