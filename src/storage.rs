//! Saved plan persistence
//!
//! Stores the raw plan fields only. A saved plan that no longer validates
//! (or no longer parses) is discarded on load and treated as absent.

use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::plan::{RawPlan, RetirementPlan};

/// Directory under the user data dir holding saved plans
pub const STORE_DIR_NAME: &str = "retirement-planner";

/// File name of the saved plan
pub const STORE_FILE_NAME: &str = "plan.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No user data directory available")]
    NoDataDir,
}

/// Key-value style save/load of one raw plan
pub trait PlanStore {
    fn save(&self, plan: &RawPlan) -> Result<(), StorageError>;

    /// Saved raw plan, if any
    fn load(&self) -> Result<Option<RawPlan>, StorageError>;

    fn clear(&self) -> Result<(), StorageError>;

    /// Saved plan re-validated; invalid or unreadable plans are cleared
    fn load_validated(&self) -> Result<Option<RetirementPlan>, StorageError> {
        let raw = match self.load() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(StorageError::Json(e)) => {
                warn!("Discarding unreadable saved plan: {}", e);
                self.clear()?;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match raw.validate() {
            Ok(plan) => {
                info!("Loaded saved plan");
                Ok(Some(plan))
            }
            Err(errors) => {
                warn!("Discarding saved plan that fails validation: {}", errors);
                self.clear()?;
                Ok(None)
            }
        }
    }
}

/// Plan stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/retirement-planner/plan.json`
    pub fn default_location() -> Result<Self, StorageError> {
        let dir = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
        Ok(Self::new(dir.join(STORE_DIR_NAME).join(STORE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlanStore for JsonFileStore {
    fn save(&self, plan: &RawPlan) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(plan)?)?;
        debug!("save: wrote {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<RawPlan>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("clear: removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
