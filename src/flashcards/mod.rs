//! Flashcard study and spaced repetition for Flashdeck
//!
//! This module provides:
//! - Card sets stored as flat JSON files with a manifest
//! - FSRS memory model for scheduling reviews
//! - Daily study queue selection
//! - Study statistics

pub mod algorithm;
pub mod error;
pub mod models;
pub mod queue;
pub mod stats;
pub mod storage;

pub use error::{FlashcardError, Result};
pub use models::*;
pub use queue::{build_queue, StudyQueue};
pub use stats::compute_stats;
pub use storage::FlashcardStorage;
