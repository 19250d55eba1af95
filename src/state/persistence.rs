use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::document::Document;
use crate::util::time;

/// Errors that can occur while saving or loading a project
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize project: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write project: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read project file: {0}")]
    ReadError(String),

    #[error("Invalid project data: {0}")]
    InvalidProject(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// On-disk form of a project. History, selection and viewport are not saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectFile {
    /// Version of the application that wrote the file
    pub version: String,
    /// Seconds since the UNIX epoch
    #[serde(default)]
    pub saved_at: u64,
    pub document: Document,
}

impl ProjectFile {
    pub fn new(document: &Document) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: time::timestamp_secs(),
            document: document.clone(),
        }
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a project and checks the document's structural invariants
    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        let file: Self = serde_json::from_str(json)?;
        if file.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Project version {} differs from current version {}",
                file.version,
                env!("CARGO_PKG_VERSION")
            );
        }
        file.document
            .check_invariants()
            .map_err(PersistenceError::InvalidProject)?;
        Ok(file)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> PersistenceResult<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_json()?)?;
        log::info!("Saved project to {}", path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| PersistenceError::ReadError(e.to_string()))?;
        let file = Self::from_json(&json)?;
        log::info!("Loaded project from {}", path.display());
        Ok(file)
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}
