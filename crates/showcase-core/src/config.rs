//! TOML-based application configuration.
//!
//! Stores:
//! - Timer durations for the four presentation-round slots
//! - Which persistence backend to open
//! - The signed-in user's profile (uid, name, role)
//!
//! Configuration is stored at `~/.config/showcase/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::model::{Role, TimerSlot, UserProfile};
use crate::store::{data_dir, BackendKind};

/// Timer durations in whole seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersConfig {
    #[serde(default = "default_presentation_secs")]
    pub presentation: u64,
    #[serde(default = "default_student_feedback_secs")]
    pub student_feedback: u64,
    #[serde(default = "default_lecturer_feedback_secs")]
    pub lecturer_feedback: u64,
    #[serde(default = "default_reflection_secs")]
    pub reflection: u64,
}

/// Persistence backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
}

/// The signed-in user. Role gates teacher-only commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_uid")]
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/showcase/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timers: TimersConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

fn default_presentation_secs() -> u64 {
    180
}
fn default_student_feedback_secs() -> u64 {
    30
}
fn default_lecturer_feedback_secs() -> u64 {
    30
}
fn default_reflection_secs() -> u64 {
    45
}
fn default_backend() -> BackendKind {
    BackendKind::Sqlite
}
fn default_uid() -> String {
    "local-teacher".to_string()
}
fn default_role() -> Role {
    Role::Teacher
}

impl Default for TimersConfig {
    fn default() -> Self {
        Self {
            presentation: default_presentation_secs(),
            student_feedback: default_student_feedback_secs(),
            lecturer_feedback: default_lecturer_feedback_secs(),
            reflection: default_reflection_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            uid: default_uid(),
            name: String::new(),
            role: default_role(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timers: TimersConfig::default(),
            storage: StorageConfig::default(),
            profile: ProfileConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: "~/.config/showcase".into(),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Configured duration for a timer slot.
    pub fn duration_for(&self, slot: TimerSlot) -> u64 {
        match slot {
            TimerSlot::Presentation => self.timers.presentation,
            TimerSlot::StudentFeedback => self.timers.student_feedback,
            TimerSlot::LecturerFeedback => self.timers.lecturer_feedback,
            TimerSlot::Reflection => self.timers.reflection,
        }
    }

    /// The signed-in user's profile.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            uid: self.profile.uid.clone(),
            name: self.profile.name.clone(),
            role: self.profile.role,
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = toml::Value::try_from(self).ok()?;
        let leaf = lookup(&value, key)?;
        Some(match leaf {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Set a config value by key and persist. Returns an error if the key
    /// is unknown or the value cannot be parsed for the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut doc = toml::Value::try_from(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        set_path(&mut doc, key, value)?;
        *self = doc.try_into().map_err(|e: toml::de::Error| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;
        self.save()
    }
}

fn lookup<'a>(root: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    if key.is_empty() {
        return None;
    }
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_path(root: &mut toml::Value, key: &str, raw: &str) -> Result<(), ConfigError> {
    let Some((parent_path, leaf)) = split_leaf(key) else {
        return Err(ConfigError::UnknownKey(key.to_string()));
    };

    let parent = match parent_path {
        Some(path) => lookup_mut(root, path).ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?,
        None => root,
    };
    let table = parent
        .as_table_mut()
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    let existing = table
        .get(leaf)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    let parse_err = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    let new_value = match existing {
        toml::Value::Boolean(_) => {
            toml::Value::Boolean(raw.parse().map_err(|_| parse_err(format!("'{raw}' is not a bool")))?)
        }
        toml::Value::Integer(_) => {
            toml::Value::Integer(raw.parse().map_err(|_| parse_err(format!("'{raw}' is not an integer")))?)
        }
        toml::Value::Float(_) => {
            toml::Value::Float(raw.parse().map_err(|_| parse_err(format!("'{raw}' is not a number")))?)
        }
        _ => toml::Value::String(raw.to_string()),
    };
    table.insert(leaf.to_string(), new_value);
    Ok(())
}

fn lookup_mut<'a>(root: &'a mut toml::Value, key: &str) -> Option<&'a mut toml::Value> {
    let mut current = root;
    for part in key.split('.') {
        current = current.get_mut(part)?;
    }
    Some(current)
}

fn split_leaf(key: &str) -> Option<(Option<&str>, &str)> {
    if key.is_empty() {
        return None;
    }
    match key.rsplit_once('.') {
        Some((parent, leaf)) if !parent.is_empty() && !leaf.is_empty() => {
            Some((Some(parent), leaf))
        }
        None => Some((None, key)),
        _ => None,
    }
}
