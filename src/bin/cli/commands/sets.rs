use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run_init(data_dir: Option<PathBuf>, from: Option<&Path>, format: &OutputFormat) -> Result<()> {
    let storage = App::open_storage(data_dir)?;

    let copied = match from {
        Some(source) => storage
            .init_from(source)
            .context(format!("Failed to seed from {}", source.display()))?,
        None => {
            storage.init().context("Failed to initialize data directory")?;
            0
        }
    };

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "dataDir": storage.base_path().to_string_lossy(),
                "copied": copied,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Data directory: {}", storage.base_path().display());
            if from.is_some() {
                println!("Copied {} file(s)", copied);
            }
        }
    }

    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let sets = app.list_sets()?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = sets.iter().map(|set| {
                serde_json::json!({
                    "fileName": set.file_name,
                    "name": set.name,
                    "description": set.description,
                    "cardCount": set.cards.len(),
                })
            }).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if sets.is_empty() {
                println!("No card sets. Create one with `flashdeck new-set <file-name>`.");
                return Ok(());
            }

            for set in &sets {
                println!(
                    "{} {} ({} cards)",
                    paint(&set.name, Color::BOLD, use_color),
                    paint(&format!("[{}]", set.file_name), Color::GRAY, use_color),
                    set.cards.len()
                );
                if let Some(description) = &set.description {
                    println!("    {}", description);
                }
            }
        }
    }

    Ok(())
}

pub fn run_create(
    app: &App,
    file_name: &str,
    name: Option<String>,
    description: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let name = name.unwrap_or_else(|| file_name.to_string());
    let set = app
        .storage
        .create_set(file_name, name, description)
        .context("Failed to create set")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "fileName": set.file_name,
                "name": set.name,
                "description": set.description,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Created set \"{}\" ({}.json)", set.name, set.file_name);
        }
    }

    Ok(())
}
