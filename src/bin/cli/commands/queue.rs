use anyhow::Result;
use chrono::Utc;

use flashdeck_lib::flashcards::{build_queue, CardWithState};

use crate::app::App;
use crate::render::terminal::{paint, truncate, Color};
use crate::OutputFormat;

pub fn run(app: &App, set_name: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let set = app.find_set(set_name)?;
    let cards = app.cards_with_state(&set)?;
    let queue = build_queue(&cards, &app.settings, Utc::now());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&queue)?);
        }
        OutputFormat::Plain => {
            if !app.settings.scheduler_enabled {
                println!("{}", paint("Scheduler disabled: all cards are studied in order.", Color::DIM, use_color));
            }

            print_pool("New", &queue.new_cards, use_color);
            print_pool("Review", &queue.review_cards, use_color);

            println!("\n{} cards to study in {}", queue.total_due, set.name);
        }
    }

    Ok(())
}

fn print_pool(title: &str, cards: &[CardWithState], use_color: bool) {
    println!("{}", paint(&format!("{} ({})", title, cards.len()), Color::BOLD, use_color));
    for entry in cards {
        println!("  {}  {}", paint(&entry.card.id, Color::GRAY, use_color), truncate(&entry.card.front, 60));
    }
}
