use anyhow::Result;
use chrono::Utc;

use flashdeck_lib::flashcards::compute_stats;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, set_name: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let (label, sets) = match set_name {
        Some(name) => {
            let set = app.find_set(name)?;
            (set.name.clone(), vec![set])
        }
        None => ("all sets".to_string(), app.list_sets()?),
    };

    let mut cards = Vec::new();
    for set in &sets {
        cards.extend(app.cards_with_state(set)?);
    }

    let stats = compute_stats(&cards, app.settings.scheduler_enabled, Utc::now());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("{}", paint(&format!("Statistics for {}", label), Color::BOLD, use_color));
            if !app.settings.scheduler_enabled {
                println!("  Cards:            {}", stats.total_cards_learned);
                println!("{}", paint("  Enable the scheduler for review statistics.", Color::DIM, use_color));
                return Ok(());
            }

            println!("  Studied today:    {}", stats.cards_studied_today);
            println!("    new:            {}", stats.new_cards_today);
            println!("    reviews:        {}", stats.reviews_today);
            println!("  Retention:        {:.1}%", stats.average_retention * 100.0);
            println!("  Learned:          {}", stats.total_cards_learned);
            println!("    mature:         {}", stats.mature_cards);
            println!("    young:          {}", stats.young_cards);
            println!("  Streak:           {} day(s)", stats.streak_days);
        }
    }

    Ok(())
}
