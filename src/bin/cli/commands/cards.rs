use anyhow::{bail, Context, Result};
use chrono::Utc;

use flashdeck_lib::flashcards::algorithm::retrievability_at;

use crate::app::App;
use crate::render::terminal::{schedule_label, truncate};
use crate::OutputFormat;

pub fn run_list(app: &App, set_name: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let set = app.find_set(set_name)?;
    let cards = app.cards_with_state(&set)?;
    let now = Utc::now();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No cards in {}.", set.name);
                return Ok(());
            }

            let id_width = cards.iter().map(|c| c.card.id.len()).max().unwrap_or(2).max(2);

            println!("{:<iw$}  {:<40}  {:>5}  {:>5}  {:>6}  {}",
                "ID", "Front", "Stab.", "Diff.", "Recall", "Schedule",
                iw = id_width);
            println!("{}", "\u{2500}".repeat(id_width + 78));

            for entry in &cards {
                let (stability, difficulty, recall) = match &entry.state {
                    Some(s) if !s.is_new() => (
                        format!("{:.1}", s.stability),
                        format!("{:.1}", s.difficulty),
                        format!("{:.0}%", retrievability_at(s, now) * 100.0),
                    ),
                    _ => ("-".to_string(), "-".to_string(), "-".to_string()),
                };
                println!("{:<iw$}  {:<40}  {:>5}  {:>5}  {:>6}  {}",
                    entry.card.id,
                    truncate(&entry.card.front, 40),
                    stability,
                    difficulty,
                    recall,
                    schedule_label(entry.state.as_ref(), now, use_color),
                    iw = id_width);
            }

            println!("\n{} cards", cards.len());
        }
    }

    Ok(())
}

pub fn run_add(app: &App, set_name: &str, front: String, back: String, format: &OutputFormat) -> Result<()> {
    if front.trim().is_empty() || back.trim().is_empty() {
        bail!("Both front and back of a card need text");
    }

    let set = app.find_set(set_name)?;
    let card = app
        .storage
        .add_card(&set.file_name, front, back)
        .context("Failed to add card")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            println!("Added card to {}", set.name);
            println!("  ID: {}", card.id);
        }
    }

    Ok(())
}

pub fn run_edit(
    app: &App,
    set_name: &str,
    card_id: &str,
    front: Option<String>,
    back: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    if front.is_none() && back.is_none() {
        bail!("Nothing to change: pass --front and/or --back");
    }

    let set = app.find_set(set_name)?;
    let mut card = app.find_card(&set, card_id)?;

    if let Some(new_front) = front {
        card.front = new_front;
    }
    if let Some(new_back) = back {
        card.back = new_back;
    }

    app.storage
        .update_card(&set.file_name, &card)
        .context("Failed to update card")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            println!("Updated card {}", card.id);
        }
    }

    Ok(())
}

pub fn run_remove(app: &App, set_name: &str, card_id: &str, format: &OutputFormat) -> Result<()> {
    let set = app.find_set(set_name)?;
    let card = app.find_card(&set, card_id)?;

    app.storage
        .delete_card(&set.file_name, &card.id)
        .context("Failed to delete card")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "deleted": card.id });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deleted card {} \"{}\"", card.id, truncate(&card.front, 40));
        }
    }

    Ok(())
}
