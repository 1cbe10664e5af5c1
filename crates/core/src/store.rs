//! High score persistence
//!
//! The high score is the only thing that survives a session. It lives under
//! a fixed key ([`HIGH_SCORE_KEY`]) in a small key-value store. The session
//! treats every storage failure as non-fatal: it logs and carries on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::HIGH_SCORE_KEY;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("high score file is not a JSON object: {0}")]
    Format(#[from] serde_json::Error),
}

/// Durable storage for the high score
pub trait ScoreStore {
    /// Stored high score; `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<u32>, StoreError>;

    fn save(&mut self, high_score: u32) -> Result<(), StoreError>;
}

/// Volatile store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(high_score: u32) -> Self {
        Self {
            value: Some(high_score),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        Ok(self.value)
    }

    fn save(&mut self, high_score: u32) -> Result<(), StoreError> {
        self.value = Some(high_score);
        Ok(())
    }
}

/// JSON object file; the high score is one key, other keys are preserved.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        let Some(map) = self.read_map()? else {
            return Ok(None);
        };
        Ok(map
            .get(HIGH_SCORE_KEY)
            .and_then(Value::as_u64)
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX)))
    }

    fn save(&mut self, high_score: u32) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking the write.
        let mut map = self.read_map().ok().flatten().unwrap_or_default();
        map.insert(HIGH_SCORE_KEY.to_string(), Value::from(high_score));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(map))?)?;
        Ok(())
    }
}
