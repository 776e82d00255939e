use anyhow::{Context, Result};
use chrono::Utc;

use flashdeck_lib::flashcards::algorithm::format_interval;
use flashdeck_lib::flashcards::Rating;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    set_name: &str,
    card_id: &str,
    rating: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let rating: Rating = rating.parse()?;
    let set = app.find_set(set_name)?;
    let card = app.find_card(&set, card_id)?;

    let now = Utc::now();
    let state = app
        .storage
        .submit_review(&set.file_name, &card.id, rating, now, &app.settings)
        .context("Failed to record review")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        OutputFormat::Plain => {
            let days = (state.next_review - now).num_days() as f64;
            println!("Reviewed {} as {}", card.id, paint(rating.as_str(), Color::BOLD, use_color));
            println!("  Stability:  {:.2} days", state.stability);
            println!("  Difficulty: {:.2}", state.difficulty);
            println!(
                "  Next review in {} ({})",
                format_interval(days),
                state.next_review.format("%Y-%m-%d %H:%M UTC")
            );
        }
    }

    Ok(())
}
