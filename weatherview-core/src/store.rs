//! Persistence of the last successfully queried city.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::Config;

pub trait CityStore: Send + Sync + Debug {
    /// The remembered city, if any. Blank values count as none.
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, city: &str) -> Result<()>;
}

impl<T: CityStore + ?Sized> CityStore for Arc<T> {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn save(&self, city: &str) -> Result<()> {
        (**self).save(city)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    last_city: Option<String>,
}

/// Keeps the last city in `state.toml` under the platform data directory.
#[derive(Debug, Clone)]
pub struct FileCityStore {
    path: PathBuf,
}

impl FileCityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self> {
        let dirs = Config::project_dirs()?;
        Ok(Self::new(dirs.data_dir().join("state.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CityStore for FileCityStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        let state: StateFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;

        Ok(state.last_city.filter(|c| !c.trim().is_empty()))
    }

    fn save(&self, city: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let state = StateFile { last_city: Some(city.to_string()) };
        let toml = toml::to_string_pretty(&state).context("Failed to serialize state to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        Ok(())
    }
}

/// In-process store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryCityStore {
    city: Mutex<Option<String>>,
}

impl MemoryCityStore {
    pub fn with_city(city: impl Into<String>) -> Self {
        Self { city: Mutex::new(Some(city.into())) }
    }
}

impl CityStore for MemoryCityStore {
    fn load(&self) -> Result<Option<String>> {
        let guard = self.city.lock().map_err(|_| anyhow::anyhow!("city store lock poisoned"))?;
        Ok(guard.clone().filter(|c| !c.trim().is_empty()))
    }

    fn save(&self, city: &str) -> Result<()> {
        let mut guard =
            self.city.lock().map_err(|_| anyhow::anyhow!("city store lock poisoned"))?;
        *guard = Some(city.to_string());
        Ok(())
    }
}
