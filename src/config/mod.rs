use crate::cli::Args;
use crate::core::error::AgentError;
use crate::providers::openai;
use crate::services::{weather, wiki};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
pub const WEATHER_KEY_VAR: &str = "OPENWEATHER_API_KEY";

fn default_timeout_secs() -> u64 {
    60
}

/// Settings resolved once at startup and handed to component constructors.
///
/// Precedence, lowest first: `~/.pchat/config.yaml`, environment (including a
/// `.env` file), command-line flags. Missing API keys are not an error here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub weather_api_key: Option<String>,
    pub weather_base_url: String,
    pub wiki_base_url: String,
    pub database_path: Option<PathBuf>,
    pub save_dir: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: openai::DEFAULT_MODEL.to_string(),
            openai_api_key: None,
            openai_base_url: openai::DEFAULT_BASE_URL.to_string(),
            weather_api_key: None,
            weather_base_url: weather::DEFAULT_BASE_URL.to_string(),
            wiki_base_url: wiki::DEFAULT_BASE_URL.to_string(),
            database_path: None,
            save_dir: None,
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pchat")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn input_history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    /// Loads `path`, writing a default file there first if none exists.
    pub fn load(path: &Path) -> Result<Config, AgentError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            if contents.trim().is_empty() {
                return Ok(Config::default());
            }
            return serde_yml::from_str::<Config>(&contents)
                .map_err(|e| AgentError::Config(format!("Parse {}: {}", path.display(), e)));
        }

        let config = Config::default();
        if let Err(e) = config.save(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default config");
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), AgentError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    /// Full resolution: file, then environment, then flags.
    pub fn resolve(args: &Args) -> Result<Config, AgentError> {
        let path = args.config.clone().unwrap_or_else(Self::config_path);
        let mut config = Self::load(&path)?;
        config.apply_env(|name| std::env::var(name).ok());
        config.apply_args(args);
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(OPENAI_KEY_VAR).filter(|k| !k.is_empty()) {
            self.openai_api_key = Some(key);
        }
        if let Some(key) = lookup(WEATHER_KEY_VAR).filter(|k| !k.is_empty()) {
            self.weather_api_key = Some(key);
        }
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(model) = &args.model {
            self.model = model.clone();
        }
        if let Some(db) = &args.db {
            self.database_path = Some(db.clone());
        }
        if let Some(dir) = &args.save_dir {
            self.save_dir = Some(dir.clone());
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("assistant.db"))
    }

    /// Where `/save` writes; the working directory unless configured.
    pub fn save_dir(&self) -> PathBuf {
        self.save_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
