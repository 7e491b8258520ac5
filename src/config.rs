use anyhow::{Context, Result, bail};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".HabitLogger";
const SETTINGS_FILE: &str = "appSettings.json";
const DEFAULT_DB_FILE: &str = "habits.db";
const DATA_SOURCE_KEYS: [&str; 3] = ["data source", "datasource", "filename"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub connection_string: String,
}

impl Config {
    /// `./appSettings.json` wins over the per-user settings file.
    pub fn settings_path() -> PathBuf {
        let local = PathBuf::from(SETTINGS_FILE);
        if local.exists() {
            local
        } else {
            default_root_dir().join(SETTINGS_FILE)
        }
    }

    pub fn default_connection_string() -> String {
        format!("Data Source=~/{APP_DIR}/{DEFAULT_DB_FILE}")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;
        set_mode_600(path)?;

        Ok(())
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        parse_connection_string(&self.connection_string)
    }
}

/// Accepts a bare SQLite path or an ADO-style `Data Source=...;` string.
pub fn parse_connection_string(raw: &str) -> Result<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("Connection string is empty");
    }

    if !trimmed.contains('=') {
        return Ok(expand_home(trimmed));
    }

    trimmed
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| {
            let key = key.trim().to_ascii_lowercase();
            DATA_SOURCE_KEYS.contains(&key.as_str())
        })
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(expand_home)
        .with_context(|| format!("Connection string has no Data Source: {trimmed}"))
}

pub fn expand_home(raw: &str) -> PathBuf {
    raw.strip_prefix("~/")
        .and_then(|stripped| home_dir().map(|home| home.join(stripped)))
        .unwrap_or_else(|| PathBuf::from(raw))
}

fn default_root_dir() -> PathBuf {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn set_mode_600(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to set file permissions: {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_connection_string};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn bare_path_is_used_as_is() {
        let path = parse_connection_string("habits.db").expect("path");
        assert_eq!(path, PathBuf::from("habits.db"));
    }

    #[test]
    fn data_source_key_is_case_insensitive() {
        let path = parse_connection_string("Mode=ReadWriteCreate; data source = /tmp/h.db ;")
            .expect("path");
        assert_eq!(path, PathBuf::from("/tmp/h.db"));
    }

    #[test]
    fn missing_data_source_is_rejected() {
        assert!(parse_connection_string("Mode=Memory").is_err());
        assert!(parse_connection_string("Data Source=").is_err());
        assert!(parse_connection_string("   ").is_err());
    }

    #[test]
    fn settings_round_trip_through_camel_case_key() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("appSettings.json");
        let config = Config {
            connection_string: "Data Source=habits.db".to_string(),
        };

        config.save_to(&path).expect("save");
        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.contains("\"connectionString\""));

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.database_path().expect("path"), PathBuf::from("habits.db"));
    }

    #[test]
    fn settings_without_key_load_as_empty() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("appSettings.json");
        fs::write(&path, "{}").expect("write");

        let loaded = Config::load_from(&path).expect("load");
        assert!(loaded.connection_string.is_empty());
        assert!(loaded.database_path().is_err());
    }
}
