//! Save snapshots of engine progress.
//!
//! Progress is a small JSON document rewritten after every state-changing
//! turn. Writes go to a temp file first and are renamed into place, so an
//! interrupted session never leaves a corrupt save behind. Restoring is
//! tolerant: ids that no longer exist in the loaded catalog are skipped with
//! a warning, since quest content may change between sessions.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::game::errors::GameError;

/// Serialized engine progress. Completion flags are monotonic, so replaying
/// a snapshot onto a fresh catalog only ever flips flags false→true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveState {
    #[serde(default)]
    pub active_quest_id: Option<String>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub completed_quests: Vec<String>,
    /// (quest id, objective id) pairs for sequential quests.
    #[serde(default)]
    pub completed_objectives: Vec<(String, String)>,
    /// Gated quests whose prerequisite bundle has already passed.
    #[serde(default)]
    pub started_gates: Vec<String>,
    pub saved_at: DateTime<Utc>,
}

impl SaveState {
    /// Read a snapshot if one exists. A corrupt or unreadable file degrades
    /// to a fresh start rather than aborting the session.
    pub fn load<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return None;
        }
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("could not read save file {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(save) => Some(save),
            Err(e) => {
                warn!(
                    "save file {} is corrupt, starting fresh: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }

    /// Write the snapshot atomically: serialize to `<path>.tmp`, then rename
    /// over the previous save.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), GameError> {
        let path = path.as_ref();
        let tmp = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(self).map_err(|e| GameError::SaveFailed {
            file: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        fs::write(&tmp, json).map_err(|e| GameError::SaveFailed {
            file: path.to_path_buf(),
            source: e,
        })?;
        fs::rename(&tmp, path).map_err(|e| GameError::SaveFailed {
            file: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }
}
