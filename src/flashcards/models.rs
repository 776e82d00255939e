//! Data models for the flashcard system

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{FlashcardError, Result};

/// Difficulty assigned to a card before its first review
pub const INITIAL_DIFFICULTY: f64 = 5.0;

/// A flashcard with question (front) and answer (back)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
}

impl Card {
    pub fn new(id: String, front: String, back: String) -> Self {
        Self { id, front, back }
    }
}

/// A named collection of cards stored in its own file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardSet {
    /// File stem the set is stored under; not part of the file body
    #[serde(skip)]
    pub file_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl FlashcardSet {
    pub fn new(file_name: String, name: String, description: Option<String>) -> Self {
        Self {
            file_name,
            name,
            description,
            cards: Vec::new(),
        }
    }

    pub fn find_card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }
}

/// List of set file names available in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashcardManifest {
    #[serde(default)]
    pub files: Vec<String>,
}

/// Answer given for a card during review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Failed to recall
    Again,
    /// Recalled with serious difficulty
    Hard,
    /// Recalled
    Good,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Again, Rating::Hard, Rating::Good];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
        }
    }

    /// Whether the review counts as a successful recall
    pub fn is_correct(&self) -> bool {
        *self != Rating::Again
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = FlashcardError;

    /// Accepts the rating name or the button number (1 = again, 2 = hard, 3 = good)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "again" | "1" => Ok(Rating::Again),
            "hard" | "2" => Ok(Rating::Hard),
            "good" | "3" => Ok(Rating::Good),
            other => Err(FlashcardError::InvalidRating(other.to_string())),
        }
    }
}

/// A record of a single review, appended to the card's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub date: DateTime<Utc>,
    pub rating: Rating,
    /// Whole days elapsed since the prior review (0 for the first)
    pub previous_interval: i64,
    pub new_stability: f64,
    pub new_difficulty: f64,
}

/// Memory-model scheduling state for a single card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleState {
    pub card_id: String,
    /// 1-10 scale, starts at 5
    pub difficulty: f64,
    /// Days until recall probability drops to 90%
    pub stability: f64,
    /// Recall probability at the last computation
    pub retrievability: f64,
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_count: u32,
    pub next_review: DateTime<Utc>,
    #[serde(default)]
    pub review_history: Vec<ReviewRecord>,
}

impl ScheduleState {
    /// Fresh state for a card that has never been reviewed, studiable immediately
    pub fn new(card_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            card_id: card_id.into(),
            difficulty: INITIAL_DIFFICULTY,
            stability: 0.0,
            retrievability: 1.0,
            last_reviewed: None,
            review_count: 0,
            next_review: now,
            review_history: Vec::new(),
        }
    }

    /// Never reviewed
    pub fn is_new(&self) -> bool {
        self.review_count == 0
    }

    /// Reviewed at least once and past its scheduled time
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_new() && now >= self.next_review
    }

    /// Check the ranges the memory model relies on
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| -> Result<()> {
            Err(FlashcardError::InvalidState {
                card_id: self.card_id.clone(),
                reason,
            })
        };

        if !(1.0..=10.0).contains(&self.difficulty) {
            return invalid(format!("difficulty {} outside [1, 10]", self.difficulty));
        }
        if !self.stability.is_finite() || self.stability < 0.0 {
            return invalid(format!("stability {} is negative or not finite", self.stability));
        }
        if !(0.0..=1.0).contains(&self.retrievability) {
            return invalid(format!(
                "retrievability {} outside [0, 1]",
                self.retrievability
            ));
        }
        if self.review_history.len() != self.review_count as usize {
            return invalid(format!(
                "review history has {} entries but review count is {}",
                self.review_history.len(),
                self.review_count
            ));
        }
        if self.review_count > 0 && self.last_reviewed.is_none() {
            return invalid("reviewed card has no last review date".to_string());
        }

        Ok(())
    }
}

/// Schedule states of one set, keyed by card ID
pub type ScheduleMap = BTreeMap<String, ScheduleState>;

/// Body of a `<set>-fsrs.json` file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleFile {
    #[serde(default)]
    pub cards: ScheduleMap,
}

/// A card paired with its schedule state, if it has one
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardWithState {
    pub card: Card,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ScheduleState>,
}

impl CardWithState {
    /// A card without state, or with zero reviews
    pub fn is_new(&self) -> bool {
        self.state.as_ref().map_or(true, ScheduleState::is_new)
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.state.as_ref().map_or(false, |s| s.is_due(now))
    }
}

/// Pair every card with its entry in `states`, keeping card order
pub fn attach_states(cards: &[Card], states: &ScheduleMap) -> Vec<CardWithState> {
    cards
        .iter()
        .map(|card| CardWithState {
            card: card.clone(),
            state: states.get(&card.id).cloned(),
        })
        .collect()
}

/// User-editable study configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudySettings {
    /// When off, cards are studied sequentially without scheduling
    #[serde(alias = "fsrsEnabled")]
    pub scheduler_enabled: bool,
    /// Target recall probability at review time (0.70 - 0.97)
    pub desired_retention: f64,
    pub new_cards_per_day: u32,
    pub max_reviews_per_day: u32,
    /// Session length hint
    pub timebox_minutes: u32,
}

pub const MIN_DESIRED_RETENTION: f64 = 0.70;
pub const MAX_DESIRED_RETENTION: f64 = 0.97;

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            scheduler_enabled: false,
            desired_retention: 0.87,
            new_cards_per_day: 20,
            max_reviews_per_day: 150,
            timebox_minutes: 30,
        }
    }
}

impl StudySettings {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_DESIRED_RETENTION..=MAX_DESIRED_RETENTION).contains(&self.desired_retention) {
            return Err(FlashcardError::InvalidSettings(format!(
                "desired retention {} outside [{}, {}]",
                self.desired_retention, MIN_DESIRED_RETENTION, MAX_DESIRED_RETENTION
            )));
        }
        if self.new_cards_per_day == 0 {
            return Err(FlashcardError::InvalidSettings(
                "new cards per day must be positive".to_string(),
            ));
        }
        if self.max_reviews_per_day == 0 {
            return Err(FlashcardError::InvalidSettings(
                "max reviews per day must be positive".to_string(),
            ));
        }
        if self.timebox_minutes == 0 {
            return Err(FlashcardError::InvalidSettings(
                "timebox must be at least one minute".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial settings change; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub scheduler_enabled: Option<bool>,
    pub desired_retention: Option<f64>,
    pub new_cards_per_day: Option<u32>,
    pub max_reviews_per_day: Option<u32>,
    pub timebox_minutes: Option<u32>,
}

impl StudySettings {
    pub fn merged(&self, update: &SettingsUpdate) -> Self {
        Self {
            scheduler_enabled: update.scheduler_enabled.unwrap_or(self.scheduler_enabled),
            desired_retention: update.desired_retention.unwrap_or(self.desired_retention),
            new_cards_per_day: update.new_cards_per_day.unwrap_or(self.new_cards_per_day),
            max_reviews_per_day: update
                .max_reviews_per_day
                .unwrap_or(self.max_reviews_per_day),
            timebox_minutes: update.timebox_minutes.unwrap_or(self.timebox_minutes),
        }
    }
}

/// Study statistics for a set of cards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub cards_studied_today: usize,
    pub new_cards_today: usize,
    pub reviews_today: usize,
    pub average_retention: f64,
    pub streak_days: u32,
    pub total_cards_learned: usize,
    /// Cards with stability above 21 days
    pub mature_cards: usize,
    /// Reviewed cards with stability of 21 days or less
    pub young_cards: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_rating_parse() {
        assert_eq!("again".parse::<Rating>().unwrap(), Rating::Again);
        assert_eq!(" Good ".parse::<Rating>().unwrap(), Rating::Good);
        assert_eq!("2".parse::<Rating>().unwrap(), Rating::Hard);
        assert!(matches!(
            "easy".parse::<Rating>(),
            Err(FlashcardError::InvalidRating(_))
        ));
    }

    #[test]
    fn test_new_state_defaults() {
        let state = ScheduleState::new("c1", now());
        assert_eq!(state.difficulty, INITIAL_DIFFICULTY);
        assert_eq!(state.stability, 0.0);
        assert_eq!(state.retrievability, 1.0);
        assert!(state.is_new());
        assert!(!state.is_due(now()));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut state = ScheduleState::new("c1", now());
        state.difficulty = 11.0;
        assert!(state.validate().is_err());

        let mut state = ScheduleState::new("c1", now());
        state.stability = -1.0;
        assert!(state.validate().is_err());

        let mut state = ScheduleState::new("c1", now());
        state.review_count = 2;
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_settings_validation() {
        assert!(StudySettings::default().validate().is_ok());

        let settings = StudySettings {
            desired_retention: 0.99,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = StudySettings {
            new_cards_per_day: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_partial_json_uses_defaults() {
        let settings: StudySettings =
            serde_json::from_str(r#"{"fsrsEnabled": true, "newCardsPerDay": 5}"#).unwrap();
        assert!(settings.scheduler_enabled);
        assert_eq!(settings.new_cards_per_day, 5);
        assert_eq!(settings.max_reviews_per_day, 150);
        assert_eq!(settings.desired_retention, 0.87);
    }

    #[test]
    fn test_schedule_state_json_shape() {
        let state = ScheduleState::new("set-1", now());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["cardId"], "set-1");
        assert!(json["lastReviewed"].is_null());
        assert_eq!(json["reviewHistory"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_attach_states_keeps_order() {
        let cards = vec![
            Card::new("a".into(), "1".into(), "one".into()),
            Card::new("b".into(), "2".into(), "two".into()),
        ];
        let mut states = ScheduleMap::new();
        states.insert("b".into(), ScheduleState::new("b", now()));

        let joined = attach_states(&cards, &states);
        assert_eq!(joined[0].card.id, "a");
        assert!(joined[0].state.is_none());
        assert!(joined[1].state.is_some());
        assert!(joined.iter().all(CardWithState::is_new));
    }
}
