use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::error::HrmResult;
use crate::model::employee::Employee;

/// Durable home of the session identity: one JSON file
#[derive(Debug, Clone)]
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, user: &Employee) -> HrmResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// A missing or unreadable file both mean "no session"
    pub fn load(&self) -> Option<Employee> {
        let json = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "discarding unreadable session file");
                None
            }
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Idempotent
    pub fn clear(&self) -> HrmResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
