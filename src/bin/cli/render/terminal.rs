use chrono::{DateTime, Utc};

use flashdeck_lib::flashcards::algorithm::format_interval;
use flashdeck_lib::flashcards::ScheduleState;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in a color code when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Shorten to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let kept: String = single_line.chars().take(max.saturating_sub(1)).collect();
    format!("{}\u{2026}", kept)
}

/// Render one side of a card, word-wrapped and indented
pub fn render_face(label: &str, text: &str, color: &str, use_color: bool) -> String {
    let mut lines = vec![paint(label, Color::BOLD, use_color)];
    for line in wrap_lines(text, "  ", 80) {
        lines.push(paint(&line, color, use_color));
    }
    lines.join("\n")
}

/// Short schedule description: "new", "due", or time until due
pub fn schedule_label(state: Option<&ScheduleState>, now: DateTime<Utc>, use_color: bool) -> String {
    match state {
        None => paint("new", Color::BLUE, use_color),
        Some(s) if s.is_new() => paint("new", Color::BLUE, use_color),
        Some(s) if s.is_due(now) => paint("due", Color::YELLOW, use_color),
        Some(s) => {
            let days = (s.next_review - now).num_seconds() as f64 / 86_400.0;
            paint(&format!("in {}", format_interval(days)), Color::GRAY, use_color)
        }
    }
}

fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let effective_width = max_width.saturating_sub(prefix.len());

    for line in text.lines() {
        if line.chars().count() <= effective_width {
            lines.push(format!("{}{}", prefix, line));
        } else {
            // Simple word wrap
            let mut current_line = String::new();
            for word in line.split_whitespace() {
                if current_line.is_empty() {
                    current_line = word.to_string();
                } else if current_line.chars().count() + 1 + word.chars().count() <= effective_width {
                    current_line.push(' ');
                    current_line.push_str(word);
                } else {
                    lines.push(format!("{}{}", prefix, current_line));
                    current_line = word.to_string();
                }
            }
            if !current_line.is_empty() {
                lines.push(format!("{}{}", prefix, current_line));
            }
        }
    }

    if lines.is_empty() && !text.is_empty() {
        lines.push(format!("{}{}", prefix, text));
    }

    lines
}
