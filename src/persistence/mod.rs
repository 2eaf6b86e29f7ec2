//! Saved arena persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic writes (tmp → save)
//! - Corruption detection with empty-grid fallback

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::grid::{GridSnapshot, LifeGrid};

/// Current envelope format version
pub const SAVE_VERSION: u32 = 1;

/// Errors raised while saving or loading an arena
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version {0}")]
    Version(u32),
    #[error("corrupt save data: {0}")]
    Corrupt(String),
}

/// On-disk form of a grid snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SaveEnvelope {
    version: u32,
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl SaveEnvelope {
    fn wrap(snapshot: &GridSnapshot) -> Self {
        Self {
            version: SAVE_VERSION,
            width: snapshot.width(),
            height: snapshot.height(),
            cells: snapshot.cells().to_vec(),
        }
    }

    fn into_snapshot(self) -> Result<GridSnapshot, PersistenceError> {
        if self.version != SAVE_VERSION {
            return Err(PersistenceError::Version(self.version));
        }
        let (width, height, len) = (self.width, self.height, self.cells.len());
        GridSnapshot::from_cells(width, height, self.cells).ok_or_else(|| {
            PersistenceError::Corrupt(format!("{width}x{height} grid with {len} cells"))
        })
    }
}

/// Storage for the last locked-in arena
pub trait GridStore {
    fn save(&mut self, snapshot: &GridSnapshot) -> Result<(), PersistenceError>;

    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<GridSnapshot>, PersistenceError>;

    fn clear(&mut self) -> Result<(), PersistenceError>;
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub const DEFAULT_PATH: &'static str = "saved_grid.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl GridStore for FileStore {
    fn save(&mut self, snapshot: &GridSnapshot) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&SaveEnvelope::wrap(snapshot))?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!(
            "Arena saved to {} ({}x{})",
            self.path.display(),
            snapshot.width(),
            snapshot.height()
        );
        Ok(())
    }

    fn load(&self) -> Result<Option<GridSnapshot>, PersistenceError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let envelope: SaveEnvelope = serde_json::from_str(&json)?;
        envelope.into_snapshot().map(Some)
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Saved arena cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, round-trips through the same envelope as [`FileStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text as if it had been saved
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
        }
    }
}

impl GridStore for MemoryStore {
    fn save(&mut self, snapshot: &GridSnapshot) -> Result<(), PersistenceError> {
        self.json = Some(serde_json::to_string(&SaveEnvelope::wrap(snapshot))?);
        Ok(())
    }

    fn load(&self) -> Result<Option<GridSnapshot>, PersistenceError> {
        match &self.json {
            Some(json) => {
                let envelope: SaveEnvelope = serde_json::from_str(json)?;
                envelope.into_snapshot().map(Some)
            }
            None => Ok(None),
        }
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        self.json = None;
        Ok(())
    }
}

/// Load the saved arena into a fresh grid, or an empty grid if that fails
pub fn load_or_empty(store: &dyn GridStore, width: u32, height: u32, max_health: u8) -> LifeGrid {
    let mut grid = LifeGrid::new(width, height, max_health);
    match store.load() {
        Ok(Some(snapshot)) => {
            if grid.restore(&snapshot) {
                log::info!("Loaded saved arena ({} live cells)", grid.population());
            }
        }
        Ok(None) => log::warn!("No saved arena found, starting empty"),
        Err(e) => log::warn!("Could not load saved arena ({e}), starting empty"),
    }
    grid
}
