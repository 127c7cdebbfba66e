//! Configuration management.
//!
//! A small TOML file with two sections: `[game]` for content and save
//! locations plus the mentor's display name, `[logging]` for the log file
//! and level. Every field has a sensible default so a missing section, or a
//! missing file entirely (`shellquest init` writes one), never blocks play.
//!
//! ```toml
//! [game]
//! quest_dir = "quests"
//! save_file = "save.json"
//! mentor_name = "Cypher"
//!
//! [logging]
//! file = "shellquest.log"
//! level = "info"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_quest_dir")]
    pub quest_dir: String,
    #[serde(default = "default_save_file")]
    pub save_file: String,
    #[serde(default = "default_mentor_name")]
    pub mentor_name: String,
}

fn default_quest_dir() -> String {
    "quests".to_string()
}

fn default_save_file() -> String {
    "save.json".to_string()
}

fn default_mentor_name() -> String {
    "Cypher".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log file path; when set, the interactive session logs only here so
    /// the prompt stays clean.
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_file() -> Option<String> {
    Some("shellquest.log".to_string())
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            quest_dir: default_quest_dir(),
            save_file: default_save_file(),
            mentor_name: default_mentor_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("could not parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file if present, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.game.quest_dir.trim().is_empty() {
            return Err(anyhow!("game.quest_dir must not be empty"));
        }
        if self.game.save_file.trim().is_empty() {
            return Err(anyhow!("game.save_file must not be empty"));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        match self.logging.level.to_lowercase().as_str() {
            "off" => Ok(log::LevelFilter::Off),
            "error" => Ok(log::LevelFilter::Error),
            "warn" => Ok(log::LevelFilter::Warn),
            "info" => Ok(log::LevelFilter::Info),
            "debug" => Ok(log::LevelFilter::Debug),
            "trace" => Ok(log::LevelFilter::Trace),
            other => Err(anyhow!("unknown logging.level '{}'", other)),
        }
    }

    /// Write a default config file. Refuses to overwrite an existing one.
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(anyhow!("config file {} already exists", path.display()));
        }
        let contents = toml::to_string_pretty(&Config::default())?;
        fs::write(path, contents)
            .with_context(|| format!("could not write config file {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_round_trips_through_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        Config::create_default(&path).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.game.quest_dir, "quests");
        assert_eq!(config.game.mentor_name, "Cypher");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn create_default_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        Config::create_default(&path).unwrap();
        assert!(Config::create_default(&path).is_err());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.game.save_file, "save.json");
        assert!(config.logging.file.is_some());
    }

    #[test]
    fn bad_level_is_rejected() {
        let config: Config = toml::from_str(
            r#"
            [logging]
            level = "shouting"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(dir.path().join("config.toml")).unwrap();
        assert_eq!(config.game.quest_dir, "quests");
    }
}
