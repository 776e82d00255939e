use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use flashdeck_lib::flashcards::{
    Card, CardWithState, FlashcardSet, FlashcardStorage, StudySettings,
};

/// Shared application state for CLI commands
pub struct App {
    pub storage: FlashcardStorage,
    pub settings: StudySettings,
}

impl App {
    /// Initialize from the given data directory, or the default one
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let storage = Self::open_storage(data_dir)?;
        let settings = storage
            .load_settings()
            .context("Failed to load study settings")?;

        Ok(Self { storage, settings })
    }

    pub fn open_storage(data_dir: Option<PathBuf>) -> Result<FlashcardStorage> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => FlashcardStorage::default_data_dir()
                .context("Failed to get data directory")?,
        };
        log::debug!("Using data directory {}", data_dir.display());
        Ok(FlashcardStorage::new(data_dir))
    }

    pub fn list_sets(&self) -> Result<Vec<FlashcardSet>> {
        self.storage.list_sets().context("Failed to list sets")
    }

    /// Find a set by file name or display name (case-insensitive prefix match)
    pub fn find_set(&self, name: &str) -> Result<FlashcardSet> {
        let sets = self.list_sets()?;
        let name_lower = name.to_lowercase();

        // Exact match first
        if let Some(set) = sets.iter().find(|s| {
            s.file_name.to_lowercase() == name_lower || s.name.to_lowercase() == name_lower
        }) {
            return Ok(set.clone());
        }

        // Prefix match
        let matches: Vec<&FlashcardSet> = sets.iter()
            .filter(|s| {
                s.file_name.to_lowercase().starts_with(&name_lower)
                    || s.name.to_lowercase().starts_with(&name_lower)
            })
            .collect();

        match matches.len() {
            0 => bail!("No set matching '{}'. Available sets:\n{}", name,
                sets.iter().map(|s| format!("  - {} ({})", s.name, s.file_name)).collect::<Vec<_>>().join("\n")),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous set name '{}'. Matches:\n{}", name,
                matches.iter().map(|s| format!("  - {} ({})", s.name, s.file_name)).collect::<Vec<_>>().join("\n")),
        }
    }

    /// Find a card in a set by ID (unique prefix match)
    pub fn find_card(&self, set: &FlashcardSet, card_id: &str) -> Result<Card> {
        if let Some(card) = set.find_card(card_id) {
            return Ok(card.clone());
        }

        let matches: Vec<&Card> = set.cards.iter()
            .filter(|c| c.id.starts_with(card_id))
            .collect();

        match matches.len() {
            0 => bail!("No card '{}' in set {}", card_id, set.name),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous card ID '{}'. Matches:\n{}", card_id,
                matches.iter().map(|c| format!("  - {}", c.id)).collect::<Vec<_>>().join("\n")),
        }
    }

    /// Cards of a set joined with their schedule states
    pub fn cards_with_state(&self, set: &FlashcardSet) -> Result<Vec<CardWithState>> {
        self.storage
            .cards_with_state(&set.file_name)
            .context(format!("Failed to load schedules for {}", set.name))
    }
}
