//! Study queue selection
//!
//! Picks which cards to study today: new cards up to the daily new-card cap
//! and due cards up to the daily review cap. Caps are counted per calendar
//! day of `now`, not over a rolling 24 hours.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::models::{CardWithState, ScheduleState, StudySettings};

/// Cards selected for a study session
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyQueue {
    pub new_cards: Vec<CardWithState>,
    pub review_cards: Vec<CardWithState>,
    pub total_due: usize,
}

impl StudyQueue {
    /// New cards first, then reviews
    pub fn into_session(self) -> Vec<CardWithState> {
        let mut cards = self.new_cards;
        cards.extend(self.review_cards);
        cards
    }
}

/// What was already studied on the current day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyActivity {
    pub studied: usize,
    /// Cards whose first ever review happened today
    pub new_cards: usize,
    pub reviews: usize,
}

fn reviewed_on(state: &ScheduleState, day: NaiveDate) -> bool {
    state
        .last_reviewed
        .map_or(false, |last| last.date_naive() == day)
}

/// Count today's activity from the schedule states
pub fn daily_activity(cards: &[CardWithState], now: DateTime<Utc>) -> DailyActivity {
    let today = now.date_naive();
    let mut activity = DailyActivity::default();

    for state in cards.iter().filter_map(|c| c.state.as_ref()) {
        if !reviewed_on(state, today) {
            continue;
        }
        activity.studied += 1;
        match state.review_history.len() {
            1 => activity.new_cards += 1,
            n if n > 1 => activity.reviews += 1,
            _ => {}
        }
    }

    activity
}

/// Build today's study queue. Input order is preserved within each pool.
pub fn build_queue(
    cards: &[CardWithState],
    settings: &StudySettings,
    now: DateTime<Utc>,
) -> StudyQueue {
    if !settings.scheduler_enabled {
        return StudyQueue {
            new_cards: cards.to_vec(),
            review_cards: Vec::new(),
            total_due: cards.len(),
        };
    }

    let today = daily_activity(cards, now);
    let new_budget = (settings.new_cards_per_day as usize).saturating_sub(today.new_cards);
    let review_budget = (settings.max_reviews_per_day as usize).saturating_sub(today.reviews);

    let new_cards: Vec<CardWithState> = cards
        .iter()
        .filter(|c| c.is_new())
        .take(new_budget)
        .cloned()
        .collect();

    let review_cards: Vec<CardWithState> = cards
        .iter()
        .filter(|c| c.is_due(now))
        .take(review_budget)
        .cloned()
        .collect();

    log::debug!(
        "Study queue: {} new ({} left today), {} reviews ({} left today)",
        new_cards.len(),
        new_budget,
        review_cards.len(),
        review_budget
    );

    let total_due = new_cards.len() + review_cards.len();
    StudyQueue {
        new_cards,
        review_cards,
        total_due,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::algorithm::apply_review;
    use crate::flashcards::models::{Card, Rating};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 14, 0, 0).unwrap()
    }

    fn enabled() -> StudySettings {
        StudySettings {
            scheduler_enabled: true,
            ..Default::default()
        }
    }

    fn card(id: &str) -> Card {
        Card::new(id.to_string(), format!("front {}", id), format!("back {}", id))
    }

    fn new_cards(count: usize) -> Vec<CardWithState> {
        (0..count)
            .map(|i| CardWithState {
                card: card(&format!("c{}", i)),
                state: None,
            })
            .collect()
    }

    /// A card reviewed `reviews` times, the last review at `last`
    fn reviewed(id: &str, reviews: usize, last: DateTime<Utc>) -> CardWithState {
        let mut state = ScheduleState::new(id, last);
        for i in 0..reviews {
            let at = last - Duration::days((reviews - 1 - i) as i64);
            state = apply_review(&state, Rating::Good, at, &enabled());
        }
        CardWithState {
            card: card(id),
            state: Some(state),
        }
    }

    #[test]
    fn test_disabled_returns_everything_as_new() {
        let mut cards = new_cards(4);
        cards.push(reviewed("r", 2, now() - Duration::days(40)));

        let settings = StudySettings::default();
        let queue = build_queue(&cards, &settings, now());

        assert_eq!(queue.new_cards.len(), 5);
        assert!(queue.review_cards.is_empty());
        assert_eq!(queue.total_due, 5);
    }

    #[test]
    fn test_new_card_cap() {
        let cards = new_cards(5);
        let settings = StudySettings {
            new_cards_per_day: 2,
            ..enabled()
        };

        let queue = build_queue(&cards, &settings, now());

        assert_eq!(queue.new_cards.len(), 2);
        assert_eq!(queue.new_cards[0].card.id, "c0");
        assert_eq!(queue.new_cards[1].card.id, "c1");
        assert_eq!(queue.total_due, 2);
    }

    #[test]
    fn test_new_cards_studied_today_reduce_budget() {
        let mut cards = vec![reviewed("first", 1, now() - Duration::hours(2))];
        cards.extend(new_cards(5));
        let settings = StudySettings {
            new_cards_per_day: 3,
            ..enabled()
        };

        let queue = build_queue(&cards, &settings, now());

        assert_eq!(queue.new_cards.len(), 2);
        assert!(queue.new_cards.iter().all(|c| c.card.id != "first"));
    }

    #[test]
    fn test_card_without_state_is_never_a_review() {
        let cards = new_cards(3);
        let queue = build_queue(&cards, &enabled(), now() + Duration::days(365));
        assert!(queue.review_cards.is_empty());
        assert_eq!(queue.new_cards.len(), 3);
    }

    #[test]
    fn test_due_cards_and_review_cap() {
        let cards = vec![
            reviewed("due1", 2, now() - Duration::days(400)),
            reviewed("not-due", 1, now() - Duration::hours(1)),
            reviewed("due2", 3, now() - Duration::days(500)),
            reviewed("due3", 2, now() - Duration::days(450)),
        ];
        let settings = StudySettings {
            max_reviews_per_day: 2,
            ..enabled()
        };

        let queue = build_queue(&cards, &settings, now());
        let ids: Vec<_> = queue.review_cards.iter().map(|c| c.card.id.as_str()).collect();

        assert_eq!(ids, vec!["due1", "due2"]);
        assert!(queue.new_cards.is_empty());
        assert_eq!(queue.total_due, 2);
    }

    #[test]
    fn test_due_exactly_at_next_review() {
        let entry = reviewed("edge", 1, now() - Duration::days(30));
        let due_at = entry.state.as_ref().unwrap().next_review;
        let cards = vec![entry];

        let before = build_queue(&cards, &enabled(), due_at - Duration::seconds(1));
        let at = build_queue(&cards, &enabled(), due_at);

        assert!(before.review_cards.is_empty());
        assert_eq!(at.review_cards.len(), 1);
    }

    #[test]
    fn test_reviews_today_reduce_budget() {
        let cards = vec![
            reviewed("done-today", 3, now() - Duration::hours(3)),
            reviewed("due", 2, now() - Duration::days(400)),
        ];
        let settings = StudySettings {
            max_reviews_per_day: 1,
            ..enabled()
        };

        let queue = build_queue(&cards, &settings, now());
        assert!(queue.review_cards.is_empty());
    }

    #[test]
    fn test_daily_activity_uses_calendar_day() {
        let midnight = Utc.with_ymd_and_hms(2025, 5, 20, 0, 0, 0).unwrap();
        let cards = vec![
            reviewed("yesterday", 1, midnight - Duration::minutes(1)),
            reviewed("today-new", 1, midnight + Duration::minutes(1)),
            reviewed("today-review", 2, midnight + Duration::hours(1)),
        ];

        let activity = daily_activity(&cards, now());
        assert_eq!(
            activity,
            DailyActivity {
                studied: 2,
                new_cards: 1,
                reviews: 1,
            }
        );
    }

    #[test]
    fn test_build_queue_is_repeatable() {
        let mut cards = new_cards(3);
        cards.push(reviewed("due", 2, now() - Duration::days(400)));

        let first = build_queue(&cards, &enabled(), now());
        let second = build_queue(&cards, &enabled(), now());

        let ids = |q: &StudyQueue| {
            q.new_cards
                .iter()
                .chain(&q.review_cards)
                .map(|c| c.card.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first.total_due, second.total_due);
    }

    #[test]
    fn test_into_session_order() {
        let mut cards = new_cards(1);
        cards.push(reviewed("due", 2, now() - Duration::days(400)));

        let session = build_queue(&cards, &enabled(), now()).into_session();
        assert_eq!(session[0].card.id, "c0");
        assert_eq!(session[1].card.id, "due");
    }
}
