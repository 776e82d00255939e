use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;

use flashdeck_lib::flashcards::algorithm::{format_interval, preview_intervals};
use flashdeck_lib::flashcards::{build_queue, Rating, ScheduleState};

use crate::app::App;
use crate::render::terminal::{paint, render_face, Color};

/// Print `message` and read one line; `None` on end of input
fn prompt(message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn is_quit(input: &str) -> bool {
    matches!(input, "q" | "quit")
}

/// Ask for a rating until one is given; `None` means the user quit
fn ask_rating(previews: [i64; 3], use_color: bool) -> Result<Option<Rating>> {
    let options: Vec<String> = Rating::ALL
        .iter()
        .zip(previews)
        .enumerate()
        .map(|(i, (rating, days))| {
            format!(
                "[{}] {} {}",
                i + 1,
                rating,
                paint(&format!("({})", format_interval(days as f64)), Color::GRAY, use_color)
            )
        })
        .collect();
    let message = format!("{}  > ", options.join("  "));

    loop {
        let Some(input) = prompt(&message)? else {
            return Ok(None);
        };
        if is_quit(&input) {
            return Ok(None);
        }
        match input.parse::<Rating>() {
            Ok(rating) => return Ok(Some(rating)),
            Err(e) => println!("{}", paint(&e.to_string(), Color::RED, use_color)),
        }
    }
}

pub fn run(app: &App, set_name: &str, limit: Option<usize>, use_color: bool) -> Result<()> {
    let set = app.find_set(set_name)?;
    let settings = &app.settings;
    let cards = app.cards_with_state(&set)?;
    let queue = build_queue(&cards, settings, Utc::now());

    if queue.total_due == 0 {
        println!("Nothing to study in {} right now.", set.name);
        return Ok(());
    }

    let session = queue.into_session();
    let total = limit.map_or(session.len(), |l| l.min(session.len()));
    let timebox = Duration::from_secs(u64::from(settings.timebox_minutes) * 60);
    let started = Instant::now();

    println!(
        "{}: {} cards, {} minute timebox. Enter q to stop.\n",
        paint(&set.name, Color::BOLD, use_color),
        total,
        settings.timebox_minutes
    );

    let mut studied = 0;
    let mut correct = 0;

    for (index, entry) in session.into_iter().take(total).enumerate() {
        if started.elapsed() >= timebox {
            println!("{}", paint("Timebox reached.", Color::YELLOW, use_color));
            break;
        }

        println!("{}", paint(&format!("Card {}/{}", index + 1, total), Color::GRAY, use_color));
        println!("{}", render_face("Front", &entry.card.front, Color::CYAN, use_color));

        match prompt("\nPress Enter to show the answer ")? {
            Some(input) if !is_quit(&input) => {}
            _ => break,
        }
        println!("{}\n", render_face("Back", &entry.card.back, Color::GREEN, use_color));

        if !settings.scheduler_enabled {
            studied += 1;
            continue;
        }

        let now = Utc::now();
        let state = entry
            .state
            .unwrap_or_else(|| ScheduleState::new(entry.card.id.clone(), now));
        let Some(rating) = ask_rating(preview_intervals(&state, now, settings), use_color)? else {
            break;
        };

        let updated = app
            .storage
            .submit_review(&set.file_name, &entry.card.id, rating, now, settings)
            .context("Failed to save review")?;

        studied += 1;
        if rating.is_correct() {
            correct += 1;
        }

        let days = (updated.next_review - now).num_days() as f64;
        println!("{}\n", paint(&format!("Next review in {}", format_interval(days)), Color::DIM, use_color));
    }

    println!("Studied {} card(s) in {} min", studied, started.elapsed().as_secs() / 60);
    if settings.scheduler_enabled && studied > 0 {
        println!("Recalled {}/{}", correct, studied);
    }

    Ok(())
}
