//! Storage operations for flashcards
//!
//! Directory structure:
//! ```text
//! <data-dir>/
//! ├── manifest.json          # {"files": [...]} list of set file names
//! ├── settings.json          # Study settings
//! ├── {file-name}.json       # Card set: name, description, cards
//! └── {file-name}-fsrs.json  # Schedule states of the set, keyed by card ID
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::algorithm::apply_review;
use super::error::{FlashcardError, Result};
use super::models::*;

const MANIFEST_FILE: &str = "manifest.json";
const SETTINGS_FILE: &str = "settings.json";
const SCHEDULE_SUFFIX: &str = "-fsrs";

/// Reject names that could escape the data directory
pub fn validate_file_name(file_name: &str) -> Result<()> {
    if file_name.trim().is_empty()
        || file_name.contains("..")
        || file_name.contains('/')
        || file_name.contains('\\')
    {
        return Err(FlashcardError::InvalidFileName(file_name.to_string()));
    }
    Ok(())
}

/// Set names whose file would collide with the manifest or settings file
fn is_reserved_name(file_name: &str) -> bool {
    [MANIFEST_FILE, SETTINGS_FILE]
        .iter()
        .any(|reserved| reserved.strip_suffix(".json") == Some(file_name))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Storage manager for flashcard sets, schedules and settings
pub struct FlashcardStorage {
    base_path: PathBuf,
}

impl FlashcardStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("flashdeck"))
            .ok_or(FlashcardError::DataDirNotFound)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn manifest_path(&self) -> PathBuf {
        self.base_path.join(MANIFEST_FILE)
    }

    fn settings_path(&self) -> PathBuf {
        self.base_path.join(SETTINGS_FILE)
    }

    /// Get the path for a set file
    fn set_path(&self, file_name: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", file_name))
    }

    /// Get the path for a set's schedule states
    fn schedule_path(&self, file_name: &str) -> PathBuf {
        self.base_path
            .join(format!("{}{}.json", file_name, SCHEDULE_SUFFIX))
    }

    /// Create the data directory with an empty manifest
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;

        let manifest_path = self.manifest_path();
        if !manifest_path.exists() {
            write_json(&manifest_path, &FlashcardManifest::default())?;
            log::info!("Created empty manifest in {}", self.base_path.display());
        }

        Ok(())
    }

    /// Seed an uninitialized data directory from `source`.
    ///
    /// Copies every file in `source` unless a manifest already exists, in
    /// which case nothing is touched. Returns the number of files copied.
    pub fn init_from(&self, source: &Path) -> Result<usize> {
        if self.manifest_path().exists() {
            log::info!("Flashcards already initialized, skipping");
            return Ok(0);
        }

        fs::create_dir_all(&self.base_path)?;

        let mut copied = 0;
        if source.is_dir() {
            for entry in fs::read_dir(source)? {
                let entry = entry?;
                let path = entry.path();
                if path.is_file() {
                    fs::copy(&path, self.base_path.join(entry.file_name()))?;
                    log::info!("Copied {}", entry.file_name().to_string_lossy());
                    copied += 1;
                }
            }
        } else {
            log::warn!("Seed directory {} not found", source.display());
        }

        // Seed without a manifest still leaves a usable directory
        self.init()?;
        Ok(copied)
    }

    // ==================== Manifest Operations ====================

    pub fn load_manifest(&self) -> Result<FlashcardManifest> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(FlashcardManifest::default());
        }

        let content = fs::read_to_string(&path)?;
        let manifest: FlashcardManifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    fn save_manifest(&self, manifest: &FlashcardManifest) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        write_json(&self.manifest_path(), manifest)
    }

    // ==================== Set Operations ====================

    /// List all sets in manifest order. Sets that fail to load are skipped.
    pub fn list_sets(&self) -> Result<Vec<FlashcardSet>> {
        let manifest = self.load_manifest()?;

        let mut sets = Vec::new();
        for file_name in &manifest.files {
            match self.get_set(file_name) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    log::warn!("Failed to load set {}: {}", file_name, e);
                }
            }
        }

        Ok(sets)
    }

    /// Get a specific set
    pub fn get_set(&self, file_name: &str) -> Result<FlashcardSet> {
        validate_file_name(file_name)?;

        let path = self.set_path(file_name);
        if !path.exists() {
            return Err(FlashcardError::SetNotFound(file_name.to_string()));
        }

        let content = fs::read_to_string(&path)?;
        let mut set: FlashcardSet = serde_json::from_str(&content)?;
        set.file_name = file_name.to_string();
        Ok(set)
    }

    /// Create a new, empty set and register it in the manifest
    pub fn create_set(
        &self,
        file_name: &str,
        name: String,
        description: Option<String>,
    ) -> Result<FlashcardSet> {
        validate_file_name(file_name)?;
        if file_name.ends_with(SCHEDULE_SUFFIX) || is_reserved_name(file_name) {
            return Err(FlashcardError::InvalidFileName(file_name.to_string()));
        }

        let mut manifest = self.load_manifest()?;
        if manifest.files.iter().any(|f| f == file_name) || self.set_path(file_name).exists() {
            return Err(FlashcardError::SetExists(file_name.to_string()));
        }

        let set = FlashcardSet::new(file_name.to_string(), name, description);
        self.save_set(&set)?;

        manifest.files.push(file_name.to_string());
        self.save_manifest(&manifest)?;

        log::info!("Created set {}", file_name);
        Ok(set)
    }

    /// Write a set to its file
    pub fn save_set(&self, set: &FlashcardSet) -> Result<()> {
        validate_file_name(&set.file_name)?;
        fs::create_dir_all(&self.base_path)?;
        write_json(&self.set_path(&set.file_name), set)
    }

    // ==================== Card Operations ====================

    /// Append a new card to a set
    pub fn add_card(&self, file_name: &str, front: String, back: String) -> Result<Card> {
        let mut set = self.get_set(file_name)?;

        let id = format!("{}-{}", file_name, Uuid::new_v4().simple());
        let card = Card::new(id, front, back);
        set.cards.push(card.clone());
        self.save_set(&set)?;

        Ok(card)
    }

    /// Replace a card's content, keeping its position
    pub fn update_card(&self, file_name: &str, card: &Card) -> Result<()> {
        let mut set = self.get_set(file_name)?;
        let existing = set
            .cards
            .iter_mut()
            .find(|c| c.id == card.id)
            .ok_or_else(|| FlashcardError::CardNotFound(card.id.clone()))?;

        *existing = card.clone();
        self.save_set(&set)
    }

    /// Delete a card and its schedule state
    pub fn delete_card(&self, file_name: &str, card_id: &str) -> Result<()> {
        let mut set = self.get_set(file_name)?;
        let before = set.cards.len();
        set.cards.retain(|c| c.id != card_id);
        if set.cards.len() == before {
            return Err(FlashcardError::CardNotFound(card_id.to_string()));
        }
        self.save_set(&set)?;

        let mut states = self.load_schedules(file_name)?;
        if states.remove(card_id).is_some() {
            self.save_schedules(file_name, &states)?;
        }

        Ok(())
    }

    // ==================== Schedule Operations ====================

    /// Load the schedule states of a set; a missing file means no states
    pub fn load_schedules(&self, file_name: &str) -> Result<ScheduleMap> {
        validate_file_name(file_name)?;

        let path = self.schedule_path(file_name);
        if !path.exists() {
            return Ok(ScheduleMap::new());
        }

        let content = fs::read_to_string(&path)?;
        let file: ScheduleFile = serde_json::from_str(&content)?;
        Ok(file.cards)
    }

    pub fn save_schedules(&self, file_name: &str, states: &ScheduleMap) -> Result<()> {
        validate_file_name(file_name)?;
        fs::create_dir_all(&self.base_path)?;

        let file = ScheduleFile {
            cards: states.clone(),
        };
        write_json(&self.schedule_path(file_name), &file)?;

        log::debug!("Saved {} schedule states for set {}", states.len(), file_name);
        Ok(())
    }

    /// All cards of a set paired with their schedule states
    pub fn cards_with_state(&self, file_name: &str) -> Result<Vec<CardWithState>> {
        let set = self.get_set(file_name)?;
        let states = self.load_schedules(file_name)?;
        Ok(attach_states(&set.cards, &states))
    }

    // ==================== Review Operations ====================

    /// Review a card and persist its new schedule state immediately
    pub fn submit_review(
        &self,
        file_name: &str,
        card_id: &str,
        rating: Rating,
        now: DateTime<Utc>,
        settings: &StudySettings,
    ) -> Result<ScheduleState> {
        if !settings.scheduler_enabled {
            return Err(FlashcardError::SchedulerDisabled);
        }
        settings.validate()?;

        let set = self.get_set(file_name)?;
        if set.find_card(card_id).is_none() {
            return Err(FlashcardError::CardNotFound(card_id.to_string()));
        }

        let mut states = self.load_schedules(file_name)?;
        let current = states
            .get(card_id)
            .cloned()
            .unwrap_or_else(|| ScheduleState::new(card_id, now));
        current.validate()?;

        let updated = apply_review(&current, rating, now, settings);
        states.insert(card_id.to_string(), updated.clone());
        self.save_schedules(file_name, &states)?;

        log::info!(
            "Card {} reviewed as {}; next review {}",
            card_id,
            rating,
            updated.next_review.to_rfc3339()
        );

        Ok(updated)
    }

    // ==================== Settings Operations ====================

    fn read_settings(&self) -> Result<StudySettings> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(StudySettings::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: StudySettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Load study settings; missing file or fields fall back to defaults.
    /// Out-of-range values in the file are reported as `InvalidSettings`.
    pub fn load_settings(&self) -> Result<StudySettings> {
        let settings = self.read_settings()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &StudySettings) -> Result<()> {
        settings.validate()?;
        fs::create_dir_all(&self.base_path)?;
        write_json(&self.settings_path(), settings)
    }

    /// Apply a partial change to the stored settings
    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<StudySettings> {
        // Unvalidated read so a bad file can be repaired by an update
        let settings = self.read_settings()?.merged(update);
        self.save_settings(&settings)?;
        Ok(settings)
    }
}
