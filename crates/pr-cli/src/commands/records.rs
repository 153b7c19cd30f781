use chrono::Utc;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use pr_roulette::{Record, RecordSubject, parse_duration};

use super::Context;

pub fn list(ctx: &Context) -> Result<(), String> {
    let book = ctx.open_records();

    if book.is_empty() {
        println!("  No records yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Rank", "Time", "Character", "Persona", "Comment", "Date"]);

    for (rank, record) in book.ranked().iter().enumerate() {
        let name = |s: &Option<RecordSubject>| {
            s.as_ref().map_or_else(|| "-".to_string(), |s| s.name.clone())
        };
        table.add_row(vec![
            (rank + 1).to_string(),
            record.time(),
            name(&record.character),
            name(&record.persona),
            record.comment.clone(),
            record.recorded_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} records", book.len());

    Ok(())
}

pub fn add(ctx: &Context, time: &str, comment: &str) -> Result<(), String> {
    let seconds = parse_duration(time).map_err(|e| e.to_string())?;
    let mut book = ctx.open_records();
    let record = book
        .add(Record::new(seconds, comment.trim(), Utc::now(), None))
        .map_err(|e| e.to_string())?;
    println!("  {} {}", "Saved record".green().bold(), record.time());
    Ok(())
}
