use anyhow::{Context, Result};

use flashdeck_lib::flashcards::{FlashcardStorage, SettingsUpdate, StudySettings};

use crate::app::App;
use crate::OutputFormat;

fn print_settings(settings: &StudySettings, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(settings)?);
        }
        OutputFormat::Plain => {
            let scheduler = if settings.scheduler_enabled { "on" } else { "off" };
            println!("Scheduler:          {}", scheduler);
            println!("Desired retention:  {:.0}%", settings.desired_retention * 100.0);
            println!("New cards per day:  {}", settings.new_cards_per_day);
            println!("Reviews per day:    {}", settings.max_reviews_per_day);
            println!("Timebox:            {} min", settings.timebox_minutes);
        }
    }
    Ok(())
}

pub fn run_show(app: &App, format: &OutputFormat) -> Result<()> {
    print_settings(&app.settings, format)
}

pub fn run_set(storage: &FlashcardStorage, update: &SettingsUpdate, format: &OutputFormat) -> Result<()> {
    let settings = storage
        .update_settings(update)
        .context("Failed to save settings")?;
    print_settings(&settings, format)
}
