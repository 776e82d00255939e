//! FSRS memory model
//!
//! Estimates how well a card is remembered from its review history and
//! schedules the next review for the moment recall probability is expected
//! to fall to the desired retention.
//!
//! Ratings:
//! - again: failed to recall (a lapse)
//! - hard: recalled with serious difficulty
//! - good: recalled

use chrono::{DateTime, Duration, Utc};

use super::models::{Rating, ReviewRecord, ScheduleState, StudySettings};

/// FSRS-5 default weights
pub const DEFAULT_WEIGHTS: [f64; 19] = [
    0.4872, 1.4003, 3.1145, 15.4896, 7.2180, 0.8975, 0.9209, 0.0363, 1.629, 0.1342, 1.0166,
    2.1174, 0.0839, 0.3204, 1.4676, 0.219, 2.8237, 0.2975, 0.9508,
];

/// Upper bound for stability, in days (100 years)
pub const MAX_INTERVAL: f64 = 36500.0;

/// Lower bound for stability after any review
pub const MIN_STABILITY: f64 = 0.01;

pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Retrievability reached after exactly `stability` days
const STABILITY_RECALL: f64 = 0.9;

const SECONDS_PER_DAY: f64 = 86_400.0;

const W: &[f64; 19] = &DEFAULT_WEIGHTS;

/// Fractional days elapsed between two instants
fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY
}

/// Recall probability after `days` with the given stability
pub fn retrievability(stability: f64, days: f64) -> f64 {
    if days <= 0.0 {
        return 1.0;
    }
    STABILITY_RECALL.powf(days / stability)
}

/// Recall probability of a card at `now`; 1 for cards never reviewed
pub fn retrievability_at(state: &ScheduleState, now: DateTime<Utc>) -> f64 {
    match state.last_reviewed {
        Some(last) if !state.is_new() => retrievability(state.stability, days_between(last, now)),
        _ => 1.0,
    }
}

fn next_difficulty(difficulty: f64, rating: Rating) -> f64 {
    let adjusted = match rating {
        Rating::Again => difficulty + W[6],
        Rating::Hard => difficulty + W[7],
        Rating::Good => difficulty - W[8],
    };
    adjusted.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

fn initial_stability(rating: Rating) -> f64 {
    match rating {
        Rating::Again => W[0],
        Rating::Hard => W[1],
        Rating::Good => W[2],
    }
}

/// Stability after a lapse; the more overdue the failure, the larger the penalty
fn lapse_stability(difficulty: f64, stability: f64, retrievability: f64) -> f64 {
    W[11]
        * difficulty.powf(-W[12])
        * ((stability + 1.0).powf(W[13]) - 1.0)
        * (W[14] * (1.0 - retrievability)).exp()
}

/// Stability after a successful recall
fn recall_stability(difficulty: f64, stability: f64, retrievability: f64, rating: Rating) -> f64 {
    let rating_factor = match rating {
        Rating::Hard => W[15],
        _ => W[16],
    };

    stability
        * (1.0
            + W[8].exp()
                * (11.0 - difficulty)
                * stability.powf(-W[9])
                * (((1.0 - retrievability) * W[10]).exp() - 1.0)
                * rating_factor)
}

fn next_stability(
    stability: f64,
    difficulty: f64,
    retrievability: f64,
    rating: Rating,
    is_new: bool,
) -> f64 {
    let raw = if is_new {
        initial_stability(rating)
    } else if rating == Rating::Again {
        lapse_stability(difficulty, stability, retrievability)
    } else {
        recall_stability(difficulty, stability, retrievability, rating)
    };

    if raw.is_nan() {
        return MIN_STABILITY;
    }
    raw.clamp(MIN_STABILITY, MAX_INTERVAL)
}

/// Days until recall probability falls to `desired_retention`, at least one
pub fn next_interval(stability: f64, desired_retention: f64) -> i64 {
    if stability <= 0.0 {
        return 1;
    }
    let interval = stability * desired_retention.ln() / STABILITY_RECALL.ln();
    (interval.round() as i64).max(1)
}

/// Apply a review to a card's state and return the updated state.
///
/// Deterministic in its inputs. The incoming state is assumed to be within
/// range; see [`ScheduleState::validate`] for a checked precondition.
pub fn apply_review(
    state: &ScheduleState,
    rating: Rating,
    now: DateTime<Utc>,
    settings: &StudySettings,
) -> ScheduleState {
    let is_new = state.is_new();

    let days_since_review = state
        .last_reviewed
        .map_or(0.0, |last| days_between(last, now));

    let current_retrievability = if is_new {
        1.0
    } else {
        retrievability(state.stability, days_since_review)
    };

    let new_difficulty = next_difficulty(state.difficulty, rating);
    let new_stability = next_stability(
        state.stability,
        state.difficulty,
        current_retrievability,
        rating,
        is_new,
    );

    let interval = next_interval(new_stability, settings.desired_retention);
    let next_review = now + Duration::days(interval);

    log::debug!(
        "Reviewed card {} as {}: stability {:.2} -> {:.2}, difficulty {:.2} -> {:.2}, next in {}d",
        state.card_id,
        rating,
        state.stability,
        new_stability,
        state.difficulty,
        new_difficulty,
        interval
    );

    let mut review_history = state.review_history.clone();
    review_history.push(ReviewRecord {
        date: now,
        rating,
        previous_interval: days_since_review.round() as i64,
        new_stability,
        new_difficulty,
    });

    ScheduleState {
        card_id: state.card_id.clone(),
        difficulty: new_difficulty,
        stability: new_stability,
        retrievability: current_retrievability,
        last_reviewed: Some(now),
        review_count: state.review_count + 1,
        next_review,
        review_history,
    }
}

/// Calculate the interval each rating would give, in rating order
/// (again, hard, good). Used to label the answer buttons.
pub fn preview_intervals(
    state: &ScheduleState,
    now: DateTime<Utc>,
    settings: &StudySettings,
) -> [i64; 3] {
    Rating::ALL.map(|rating| {
        let next = apply_review(state, rating, now, settings);
        (next.next_review - now).num_days()
    })
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: f64) -> String {
    if days < 1.0 {
        "< 1 day".to_string()
    } else if days == 1.0 {
        "1 day".to_string()
    } else if days < 30.0 {
        format!("{} days", days.round())
    } else if days < 365.0 {
        let months = (days / 30.0).round();
        format!("{} month{}", months, if months > 1.0 { "s" } else { "" })
    } else {
        let years = (days / 365.0).round();
        format!("{} year{}", years, if years > 1.0 { "s" } else { "" })
    }
}
