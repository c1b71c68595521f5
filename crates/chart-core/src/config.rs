// File: crates/chart-core/src/config.rs
// Summary: Persisted user preferences (the `apiUrl` key) behind a storage trait.
// Notes:
// - Whether storage exists is decided once, by the `Environment` passed in at
//   construction. A server-side config has no storage: reads miss, writes no-op.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ChartResult;

pub const API_URL_KEY: &str = "apiUrl";
pub const DEFAULT_API_URL: &str = "http://localhost:8086";

/// Runtime capability, decided once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    /// Interactive client with preference storage.
    Client,
    /// Headless/server rendering; no preference storage.
    Server,
}

/// Key-value preference storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> ChartResult<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> { self.values.get(key).cloned() }
    fn set(&mut self, key: &str, value: &str) -> ChartResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as a flat JSON object in one file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> ChartResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path { &self.path }

    fn flush(&self) -> ChartResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> { self.values.get(key).cloned() }
    fn set(&mut self, key: &str, value: &str) -> ChartResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Read-mostly preference cache over an optional store.
pub struct UserConfig {
    store: Option<Box<dyn PreferenceStore>>,
    values: HashMap<String, String>,
}

impl UserConfig {
    /// Build the config and register `apiUrl` with its default.
    pub fn new(env: Environment, store: impl PreferenceStore + 'static) -> ChartResult<Self> {
        let store: Option<Box<dyn PreferenceStore>> = match env {
            Environment::Client => Some(Box::new(store)),
            Environment::Server => None,
        };
        let mut cfg = Self { store, values: HashMap::new() };
        cfg.register(API_URL_KEY, DEFAULT_API_URL)?;
        Ok(cfg)
    }

    /// Load `key` from storage, writing `default` back when it is absent or empty.
    pub fn register(&mut self, key: &str, default: &str) -> ChartResult<()> {
        let Some(store) = self.store.as_mut() else { return Ok(()) };
        let value = match store.get(key) {
            Some(v) if !v.is_empty() => v,
            _ => {
                debug!(key, default, "initializing preference");
                store.set(key, default)?;
                default.to_string()
            }
        };
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> { self.values.get(key).map(String::as_str) }

    pub fn set(&mut self, key: &str, value: &str) -> ChartResult<()> {
        let Some(store) = self.store.as_mut() else { return Ok(()) };
        store.set(key, value)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    pub fn api_url(&self) -> Option<&str> { self.get(API_URL_KEY) }

    pub fn has_storage(&self) -> bool { self.store.is_some() }
}
