//! File codecs for the two durable harvest artifacts: pagination state and
//! the channel URL registry.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use harvest_core::{ChannelRegistry, HarvestState, KeywordProgress};
use harvest_engine::{write_atomic, PersistError};
use harvest_logging::harvest_warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// On-disk shape of one keyword's progress, kept separate from the core type
/// so the file format can evolve independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedProgress {
    last_page_token: Option<String>,
    fetched_count: u64,
    completed: bool,
}

/// Locations of the state and output artifacts, with load/save for both.
#[derive(Debug, Clone)]
pub struct HarvestFiles {
    state_path: PathBuf,
    output_path: PathBuf,
}

impl HarvestFiles {
    pub fn new(state_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            state_path,
            output_path,
        }
    }

    /// Loads pagination state; a missing, unreadable or corrupt file yields
    /// empty state so a partial prior write never blocks a run.
    pub fn load_state(&self) -> HarvestState {
        let content = match fs::read_to_string(&self.state_path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return HarvestState::new();
            }
            Err(err) => {
                harvest_warn!("failed to read state file {:?}: {}", self.state_path, err);
                return HarvestState::new();
            }
        };

        let persisted: BTreeMap<String, PersistedProgress> = match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(err) => {
                harvest_warn!("failed to parse state file {:?}: {}", self.state_path, err);
                return HarvestState::new();
            }
        };

        persisted
            .into_iter()
            .map(|(keyword, progress)| {
                (
                    keyword,
                    KeywordProgress {
                        last_page_token: progress.last_page_token,
                        fetched_count: progress.fetched_count,
                        completed: progress.completed,
                    },
                )
            })
            .collect()
    }

    /// Writes the full state atomically, keys in map order.
    pub fn save_state(&self, state: &HarvestState) -> Result<(), StoreError> {
        let persisted: BTreeMap<&str, PersistedProgress> = state
            .iter()
            .map(|(keyword, progress)| {
                (
                    keyword.as_str(),
                    PersistedProgress {
                        last_page_token: progress.last_page_token.clone(),
                        fetched_count: progress.fetched_count,
                        completed: progress.completed,
                    },
                )
            })
            .collect();

        let content = serde_json::to_string_pretty(&persisted)?;
        write_atomic(&self.state_path, &content)?;
        Ok(())
    }

    /// Loads previously discovered channel URLs; blank lines are ignored.
    pub fn load_channels(&self) -> ChannelRegistry {
        let content = match fs::read_to_string(&self.output_path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return ChannelRegistry::new();
            }
            Err(err) => {
                harvest_warn!("failed to read output file {:?}: {}", self.output_path, err);
                return ChannelRegistry::new();
            }
        };

        ChannelRegistry::from_urls(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(ToOwned::to_owned),
        )
    }

    /// Writes the registry atomically, one URL per line, sorted.
    pub fn save_channels(&self, registry: &ChannelRegistry) -> Result<(), StoreError> {
        let mut content = String::new();
        for url in registry.iter() {
            content.push_str(url);
            content.push('\n');
        }
        write_atomic(&self.output_path, &content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn files_in(temp: &TempDir) -> HarvestFiles {
        HarvestFiles::new(
            temp.path().join("state.json"),
            temp.path().join("channels.txt"),
        )
    }

    fn sample_state() -> HarvestState {
        let mut state = HarvestState::new();
        state.insert(
            "bitcoin".to_string(),
            KeywordProgress {
                last_page_token: Some("PAGE2".to_string()),
                fetched_count: 50,
                completed: false,
            },
        );
        state.insert(
            "ethereum".to_string(),
            KeywordProgress {
                last_page_token: None,
                fetched_count: 12,
                completed: true,
            },
        );
        state
    }

    #[test]
    fn state_round_trip_preserves_progress() {
        let temp = TempDir::new().unwrap();
        let files = files_in(&temp);
        let state = sample_state();

        files.save_state(&state).unwrap();
        assert_eq!(files.load_state(), state);
    }

    #[test]
    fn state_saves_are_byte_stable() {
        let temp = TempDir::new().unwrap();
        let files = files_in(&temp);
        let state = sample_state();

        files.save_state(&state).unwrap();
        let first = fs::read(temp.path().join("state.json")).unwrap();
        files.save_state(&state).unwrap();
        let second = fs::read(temp.path().join("state.json")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn missing_state_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        assert!(files_in(&temp).load_state().is_empty());
    }

    #[test]
    fn corrupt_state_file_loads_empty() {
        harvest_logging::initialize_for_tests();
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("state.json"), "{truncated").unwrap();

        assert!(files_in(&temp).load_state().is_empty());
    }

    #[test]
    fn channels_round_trip_sorted_and_deduplicated() {
        let temp = TempDir::new().unwrap();
        let files = files_in(&temp);

        let mut registry = ChannelRegistry::new();
        registry.insert_channel("UCzzz");
        registry.insert_channel("UCaaa");
        registry.insert_channel("UCzzz");

        files.save_channels(&registry).unwrap();
        let written = fs::read_to_string(temp.path().join("channels.txt")).unwrap();
        assert_eq!(
            written,
            "https://www.youtube.com/channel/UCaaa\nhttps://www.youtube.com/channel/UCzzz\n"
        );

        assert_eq!(files.load_channels(), registry);
    }

    #[test]
    fn blank_lines_in_output_file_are_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("channels.txt"),
            "\nhttps://www.youtube.com/channel/UCaaa\n\n  \n",
        )
        .unwrap();

        let registry = files_in(&temp).load_channels();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("https://www.youtube.com/channel/UCaaa"));
    }
}
