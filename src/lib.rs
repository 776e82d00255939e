//! Flashdeck: flashcard sets with FSRS-based spaced repetition.
//!
//! The scheduling core ([`flashcards::algorithm`], [`flashcards::queue`],
//! [`flashcards::stats`]) is pure and takes the current time as a parameter;
//! [`flashcards::storage`] persists sets, schedules and settings as JSON files.

pub mod flashcards;
