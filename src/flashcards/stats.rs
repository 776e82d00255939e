//! Study statistics derived from schedule states

use chrono::{DateTime, Utc};

use super::models::{CardWithState, StudyStats};
use super::queue::daily_activity;

/// Stability (days) above which a card counts as mature
pub const MATURE_STABILITY: f64 = 21.0;

/// Compute statistics over a set of cards.
///
/// With the scheduler disabled every card counts as learned and the other
/// counters stay at zero. The streak only reports whether anything was
/// studied today (0 or 1).
pub fn compute_stats(
    cards: &[CardWithState],
    scheduler_enabled: bool,
    now: DateTime<Utc>,
) -> StudyStats {
    if !scheduler_enabled {
        return StudyStats {
            total_cards_learned: cards.len(),
            ..Default::default()
        };
    }

    let today = daily_activity(cards, now);
    let states: Vec<_> = cards.iter().filter_map(|c| c.state.as_ref()).collect();

    let total_reviews: usize = states.iter().map(|s| s.review_history.len()).sum();
    let correct_reviews = states
        .iter()
        .flat_map(|s| &s.review_history)
        .filter(|r| r.rating.is_correct())
        .count();

    let average_retention = if total_reviews > 0 {
        correct_reviews as f64 / total_reviews as f64
    } else {
        0.0
    };

    let learned = states.iter().filter(|s| !s.is_new());

    StudyStats {
        cards_studied_today: today.studied,
        new_cards_today: today.new_cards,
        reviews_today: today.reviews,
        average_retention,
        streak_days: u32::from(today.studied > 0),
        total_cards_learned: learned.clone().count(),
        mature_cards: states
            .iter()
            .filter(|s| s.stability > MATURE_STABILITY)
            .count(),
        young_cards: learned
            .filter(|s| s.stability <= MATURE_STABILITY)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::algorithm::apply_review;
    use crate::flashcards::models::{Card, Rating, ScheduleState, StudySettings};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 2, 18, 30, 0).unwrap()
    }

    fn entry(id: &str, state: Option<ScheduleState>) -> CardWithState {
        CardWithState {
            card: Card::new(id.to_string(), "q".to_string(), "a".to_string()),
            state,
        }
    }

    fn review(state: ScheduleState, rating: Rating, at: DateTime<Utc>) -> ScheduleState {
        let settings = StudySettings {
            scheduler_enabled: true,
            ..Default::default()
        };
        apply_review(&state, rating, at, &settings)
    }

    #[test]
    fn test_disabled_counts_all_cards_learned() {
        let cards = vec![entry("a", None), entry("b", None), entry("c", None)];
        let stats = compute_stats(&cards, false, now());
        assert_eq!(
            stats,
            StudyStats {
                total_cards_learned: 3,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_no_reviews() {
        let cards = vec![
            entry("a", None),
            entry("b", Some(ScheduleState::new("b", now()))),
        ];
        let stats = compute_stats(&cards, true, now());

        assert_eq!(stats.average_retention, 0.0);
        assert_eq!(stats.mature_cards, 0);
        assert_eq!(stats.young_cards, 0);
        assert_eq!(stats.total_cards_learned, 0);
        assert_eq!(stats.streak_days, 0);
    }

    #[test]
    fn test_retention_and_today_counts() {
        let start = now() - Duration::days(10);

        let mut first = ScheduleState::new("a", start);
        first = review(first, Rating::Good, start);
        first = review(first, Rating::Again, start + Duration::days(4));
        first = review(first, Rating::Good, now() - Duration::hours(1));

        let fresh = review(ScheduleState::new("b", now()), Rating::Hard, now() - Duration::hours(2));

        let cards = vec![entry("a", Some(first)), entry("b", Some(fresh)), entry("c", None)];
        let stats = compute_stats(&cards, true, now());

        assert!((stats.average_retention - 0.75).abs() < 1e-12);
        assert_eq!(stats.cards_studied_today, 2);
        assert_eq!(stats.new_cards_today, 1);
        assert_eq!(stats.reviews_today, 1);
        assert_eq!(stats.streak_days, 1);
        assert_eq!(stats.total_cards_learned, 2);
        assert_eq!(stats.young_cards + stats.mature_cards, 2);
    }

    #[test]
    fn test_maturity_buckets() {
        let mut mature = review(ScheduleState::new("m", now()), Rating::Good, now() - Duration::days(90));
        mature.stability = 40.0;
        let mut young = review(ScheduleState::new("y", now()), Rating::Good, now() - Duration::days(90));
        young.stability = MATURE_STABILITY;

        let cards = vec![entry("m", Some(mature)), entry("y", Some(young))];
        let stats = compute_stats(&cards, true, now());

        assert_eq!(stats.mature_cards, 1);
        assert_eq!(stats.young_cards, 1);
        assert_eq!(stats.cards_studied_today, 0);
        assert_eq!(stats.streak_days, 0);
        assert_eq!(stats.average_retention, 1.0);
    }
}
