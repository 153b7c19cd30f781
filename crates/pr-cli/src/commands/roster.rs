use comfy_table::{ContentArrangement, Table};

use super::Context;

pub fn run(ctx: &Context) -> Result<(), String> {
    let filters = ctx.open_filters();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Enabled", "Personas"]);

    for c in ctx.roster.characters() {
        let enabled = if filters.is_character_enabled(c.id) {
            "yes"
        } else {
            "no"
        };
        table.add_row(vec![
            c.id.to_string(),
            c.name.clone(),
            enabled.to_string(),
            format!("{}/{}", filters.enabled_persona_count(c.id), c.personas.len()),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {}/{} characters enabled",
        filters.enabled_count(),
        ctx.roster.len()
    );

    Ok(())
}
