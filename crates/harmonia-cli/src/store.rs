//! JSON event store and TOML configuration for the CLI.
//!
//! The CLI plays the persistence collaborator's role: it owns the file
//! formats, the engine only ever sees the event set. The store is a
//! single JSON document holding the raw completion events (each with
//! the offset the client reported at action time) and the achievement
//! log that keeps `achieved_at` stamps stable across evaluations.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use harmonia_core::milestones::AchievementLog;
use harmonia_core::progress::{CompletionEvent, ProgressLedger};
use harmonia_core::Diagnostic;

/// Environment variable overriding the store location (used by tests).
pub const STORE_PATH_ENV: &str = "HARMONIA_STORE";

/// One persisted event plus the UTC offset the client reported when it
/// was recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    #[serde(flatten)]
    pub event: CompletionEvent,
    pub offset_minutes: Option<i32>,
}

/// The CLI's on-disk state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventStore {
    pub user_id: String,
    pub events: Vec<StoredEvent>,
    #[serde(default)]
    pub achievements: AchievementLog,
}

impl Default for EventStore {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            events: Vec::new(),
            achievements: AchievementLog::new(),
        }
    }
}

impl EventStore {
    /// Load the store, or start empty if the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Persist the store, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Rebuild the progress ledger from the stored event set.
    pub fn ledger(&self) -> (ProgressLedger, Vec<Diagnostic>) {
        ProgressLedger::from_events(
            self.user_id.clone(),
            self.events
                .iter()
                .map(|stored| (stored.event.clone(), stored.offset_minutes)),
        )
    }
}

/// CLI configuration, loaded from `harmonia/config.toml` under the
/// platform config directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Store file location; overrides the platform default
    pub store_path: Option<PathBuf>,
    /// This client's UTC offset in minutes, used when a command does not
    /// pass `--offset`
    pub offset_minutes: Option<i32>,
}

impl CliConfig {
    pub fn load() -> Self {
        let Some(path) = config_file_path() else {
            return Self::default();
        };
        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("warning: ignoring malformed config {}: {err}", path.display());
                Self::default()
            }
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("harmonia").join("config.toml"))
}

/// Resolve the store path: environment override, then config, then the
/// platform data directory.
pub fn store_path(config: &CliConfig) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(path) = std::env::var(STORE_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = &config.store_path {
        return Ok(path.clone());
    }
    let data_dir = dirs::data_dir().ok_or("could not determine platform data directory")?;
    Ok(data_dir.join("harmonia").join("store.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use harmonia_core::progress::Category;
    use uuid::Uuid;

    fn sample_store() -> EventStore {
        EventStore {
            user_id: "local".to_string(),
            events: vec![StoredEvent {
                event: CompletionEvent {
                    user_id: "local".to_string(),
                    category: Category::Mind,
                    occurred_at: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
                    routine_id: Uuid::new_v4(),
                },
                offset_minutes: Some(60),
            }],
            achievements: AchievementLog::new(),
        }
    }

    #[test]
    fn test_missing_file_loads_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::load(&dir.path().join("nope.json")).unwrap();
        assert!(store.events.is_empty());
        assert_eq!(store.user_id, "local");
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let store = sample_store();
        store.save(&path).unwrap();

        let reloaded = EventStore::load(&path).unwrap();
        assert_eq!(reloaded.events.len(), 1);
        assert_eq!(reloaded.events[0].offset_minutes, Some(60));
    }

    #[test]
    fn test_ledger_rebuild_from_store() {
        let store = sample_store();
        let (ledger, diagnostics) = store.ledger();
        assert_eq!(ledger.total_routines(), 1);
        assert!(diagnostics.is_empty());
    }
}
