//! Snapshot persistence for promotions
//!
//! Two JSON documents under the data directory: the current snapshot
//! (replaced wholesale each cycle) and a bounded history log of
//! `{timestamp, promotions}` entries. Storage failures never fail a
//! pipeline cycle: a read failure degrades to an empty previous snapshot,
//! a write failure is logged and the in-memory result stands.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::{error, info};

use crate::domain::promotion::Promotion;

const CURRENT_PROMOTIONS_FILE: &str = "current_promotions.json";
const PROMOTION_HISTORY_FILE: &str = "promotion_history.json";

/// Maximum history entries retained; oldest evicted first on overflow.
pub const HISTORY_CAPACITY: usize = 100;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored document at {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One append-only history record: the full snapshot observed at one cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub promotions: Vec<Promotion>,
}

/// File-backed snapshot store rooted at a data directory.
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn current_path(&self) -> PathBuf {
        self.data_dir.join(CURRENT_PROMOTIONS_FILE)
    }

    fn history_path(&self) -> PathBuf {
        self.data_dir.join(PROMOTION_HISTORY_FILE)
    }

    async fn ensure_data_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir).await.map_err(|source| StorageError::Io {
            path: self.data_dir.clone(),
            source,
        })
    }

    /// Load the previous snapshot. A missing file is a fresh start; any
    /// other failure is logged and also degrades to an empty snapshot so
    /// the cycle proceeds.
    pub async fn load_current(&self) -> Vec<Promotion> {
        match self.read_json::<Vec<Promotion>>(&self.current_path()).await {
            Ok(Some(promotions)) => promotions,
            Ok(None) => {
                info!("No existing promotions file found, starting fresh");
                Vec::new()
            }
            Err(e) => {
                error!("Error loading current promotions: {}", e);
                Vec::new()
            }
        }
    }

    /// Replace the current snapshot wholesale.
    pub async fn save_current(&self, promotions: &[Promotion]) -> Result<(), StorageError> {
        self.ensure_data_dir().await?;
        self.write_json(&self.current_path(), &promotions).await?;
        info!("Saved {} promotions to storage", promotions.len());
        Ok(())
    }

    /// Append one history entry, evicting the oldest entries beyond
    /// [`HISTORY_CAPACITY`].
    pub async fn append_history(&self, promotions: &[Promotion]) -> Result<(), StorageError> {
        self.ensure_data_dir().await?;

        let mut history = match self.read_json::<Vec<HistoryEntry>>(&self.history_path()).await {
            Ok(Some(history)) => history,
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Error loading promotion history: {}", e);
                Vec::new()
            }
        };

        history.push(HistoryEntry {
            timestamp: Utc::now(),
            promotions: promotions.to_vec(),
        });
        if history.len() > HISTORY_CAPACITY {
            let excess = history.len() - HISTORY_CAPACITY;
            history.drain(..excess);
        }

        self.write_json(&self.history_path(), &history).await?;
        info!("Added promotions to history ({} entries)", history.len());
        Ok(())
    }

    /// Read the stored history, newest entry last.
    pub async fn load_history(&self) -> Vec<HistoryEntry> {
        match self.read_json::<Vec<HistoryEntry>>(&self.history_path()).await {
            Ok(Some(history)) => history,
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Error loading promotion history: {}", e);
                Vec::new()
            }
        }
    }

    /// `Ok(None)` when the file does not exist yet.
    async fn read_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &Path,
    ) -> Result<Option<T>, StorageError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let value = serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(value))
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).await.map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
