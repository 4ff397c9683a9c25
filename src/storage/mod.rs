// SPDX-License-Identifier: PMPL-1.0-or-later

//! Persistent storage helpers: the language preference store and
//! timestamped exports of rendered dashboards.

use crate::report::OutputFormat;
use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Key under which the language preference is persisted.
pub const LANGUAGE_KEY: &str = "preferredLanguage";

/// Environment variable overriding the preference file location.
pub const PREFS_ENV: &str = "DASHBIND_PREFS";

/// Opaque key-value capability standing in for browser local storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as a flat JSON object of strings on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$DASHBIND_PREFS`, else `.dashbind/preferences.json`.
    pub fn default_location() -> PathBuf {
        std::env::var_os(PREFS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".dashbind").join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Map<String, Value> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Map::new(),
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            _ => {
                warn!(path = %self.path.display(), "ignoring unreadable preference file");
                Map::new()
            }
        }
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read()
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read();
        map.insert(key.to_string(), Value::String(value.to_string()));
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let payload = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, payload)
            .with_context(|| format!("writing preferences {}", self.path.display()))?;
        Ok(())
    }
}

/// Write a rendered dashboard to `directory` under a timestamped name.
pub fn persist_render(
    content: &str,
    directory: &Path,
    dashboard: &str,
    format: OutputFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(directory)
        .with_context(|| format!("creating {}", directory.display()))?;
    let timestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
    let path = directory.join(format!("{}-{}.{}", dashboard, timestamp, format.extension()));
    fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
