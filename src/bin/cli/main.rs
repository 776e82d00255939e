mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "flashdeck", about = "Flashcard study with spaced repetition", version)]
struct Cli {
    /// Data directory holding the manifest, sets and schedules
    #[arg(long, global = true, env = "FLASHDECK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Create the data directory, optionally seeding it from another directory
    Init {
        /// Directory whose files are copied when no manifest exists yet
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// List card sets
    Sets,

    /// Create a new card set
    NewSet {
        /// File name for the set (stored as <file-name>.json)
        file_name: String,
        /// Display name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// List cards in a set with their schedule
    Cards {
        /// Set name (case-insensitive prefix match)
        set: String,
    },

    /// Add a card to a set
    Add {
        set: String,
        front: String,
        /// Answer text (use "-" to read from stdin)
        back: Option<String>,
    },

    /// Edit a card's front or back
    Edit {
        set: String,
        /// Card ID (unique prefix is enough)
        card: String,
        #[arg(long)]
        front: Option<String>,
        #[arg(long)]
        back: Option<String>,
    },

    /// Delete a card and its review history
    Rm {
        set: String,
        card: String,
    },

    /// Show today's study queue for a set
    Queue {
        set: String,
    },

    /// Record a review for a single card
    Review {
        set: String,
        card: String,
        /// again, hard or good (or 1, 2, 3)
        rating: String,
    },

    /// Run an interactive study session
    Study {
        set: String,
        /// Stop after this many cards
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show study statistics
    Stats {
        /// Limit to one set
        set: Option<String>,
    },

    /// Show or change study settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the current settings
    Show,

    /// Change one or more settings
    Set {
        /// Enable spaced-repetition scheduling (true/false)
        #[arg(long)]
        scheduler: Option<bool>,
        /// Desired retention between 0.70 and 0.97
        #[arg(long)]
        retention: Option<f64>,
        #[arg(long)]
        new_per_day: Option<u32>,
        #[arg(long)]
        reviews_per_day: Option<u32>,
        /// Study session length in minutes
        #[arg(long)]
        timebox: Option<u32>,
    },
}

/// Read content from stdin if piped, or resolve "-" as stdin
fn resolve_content(content: Option<String>) -> Option<String> {
    match content.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
            Some(buf.trim_end().to_string())
        }
        Some(_) => content,
        None => {
            if !stdin_is_tty() {
                let mut buf = String::new();
                std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
                let buf = buf.trim_end().to_string();
                if buf.is_empty() { None } else { Some(buf) }
            } else {
                None
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let data_dir = cli.data_dir;

    match cli.command {
        Command::Init { from } => {
            commands::sets::run_init(data_dir, from.as_deref(), &cli.format)?;
        }
        Command::Sets => {
            let app = app::App::new(data_dir)?;
            commands::sets::run_list(&app, &cli.format, use_color)?;
        }
        Command::NewSet { file_name, name, description } => {
            let app = app::App::new(data_dir)?;
            commands::sets::run_create(&app, &file_name, name, description, &cli.format)?;
        }
        Command::Cards { set } => {
            let app = app::App::new(data_dir)?;
            commands::cards::run_list(&app, &set, &cli.format, use_color)?;
        }
        Command::Add { set, front, back } => {
            let app = app::App::new(data_dir)?;
            let back = resolve_content(back)
                .ok_or_else(|| anyhow::anyhow!("Missing answer text for the back of the card"))?;
            commands::cards::run_add(&app, &set, front, back, &cli.format)?;
        }
        Command::Edit { set, card, front, back } => {
            let app = app::App::new(data_dir)?;
            commands::cards::run_edit(&app, &set, &card, front, back, &cli.format)?;
        }
        Command::Rm { set, card } => {
            let app = app::App::new(data_dir)?;
            commands::cards::run_remove(&app, &set, &card, &cli.format)?;
        }
        Command::Queue { set } => {
            let app = app::App::new(data_dir)?;
            commands::queue::run(&app, &set, &cli.format, use_color)?;
        }
        Command::Review { set, card, rating } => {
            let app = app::App::new(data_dir)?;
            commands::review::run(&app, &set, &card, &rating, &cli.format, use_color)?;
        }
        Command::Study { set, limit } => {
            let app = app::App::new(data_dir)?;
            commands::study::run(&app, &set, limit, use_color)?;
        }
        Command::Stats { set } => {
            let app = app::App::new(data_dir)?;
            commands::stats::run(&app, set.as_deref(), &cli.format, use_color)?;
        }
        Command::Settings(subcmd) => {
            match subcmd {
                SettingsCommand::Show => {
                    let app = app::App::new(data_dir)?;
                    commands::settings::run_show(&app, &cli.format)?;
                }
                SettingsCommand::Set {
                    scheduler,
                    retention,
                    new_per_day,
                    reviews_per_day,
                    timebox,
                } => {
                    let update = flashdeck_lib::flashcards::SettingsUpdate {
                        scheduler_enabled: scheduler,
                        desired_retention: retention,
                        new_cards_per_day: new_per_day,
                        max_reviews_per_day: reviews_per_day,
                        timebox_minutes: timebox,
                    };
                    // Bypasses App so an out-of-range settings file can be repaired
                    let storage = app::App::open_storage(data_dir)?;
                    commands::settings::run_set(&storage, &update, &cli.format)?;
                }
            }
        }
    }

    Ok(())
}

/// Check if stdin is a terminal (not piped)
fn stdin_is_tty() -> bool {
    unsafe { libc_isatty(0) != 0 }
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
