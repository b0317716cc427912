//! Runtime configuration and the startup seed document

use crate::db::ClassroomDbManager;
use crate::timetable::{ClassroomError, Section};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Server settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// SQLite file, or `:memory:`
    pub database_path: String,
    /// Optional seed document applied when the store is empty
    pub seed_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from process environment variables
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for unset keys
    ///
    /// # Returns
    /// * `Err` - if a set value cannot be parsed (e.g. a non-numeric `PORT`)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            host: try_load(&lookup, "HOST", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "5000")?,
            database_path: try_load(&lookup, "DATABASE_PATH", "classrooms.db")?,
            seed_path: lookup("SEED_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value {raw:?}: {e}"))
}

/// Projector registration for one room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectorSeed {
    pub room: String,
    #[serde(default = "default_true")]
    pub projector: bool,
}

fn default_true() -> bool {
    true
}

/// Campus data written into an empty store at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub allocated_rooms: Vec<String>,
    #[serde(default)]
    pub projector_rooms: Vec<ProjectorSeed>,
    #[serde(default)]
    pub classrooms: Vec<Section>,
}

impl SeedData {
    /// Reads a seed document from a JSON file
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse seed file {}", path.display()))
    }

    /// Writes the seed into `db`, replacing room lists and upserting each section
    pub fn apply(&self, db: &ClassroomDbManager) -> Result<(), ClassroomError> {
        if !self.allocated_rooms.is_empty() {
            db.set_allocated_rooms(&self.allocated_rooms)?;
        }
        for entry in &self.projector_rooms {
            db.set_projector_room(&entry.room, entry.projector)?;
        }
        for section in &self.classrooms {
            db.insert_section(section)?;
        }

        info!(
            "Seeded {} allocated rooms, {} projector entries, {} sections",
            self.allocated_rooms.len(),
            self.projector_rooms.len(),
            self.classrooms.len()
        );
        Ok(())
    }
}
