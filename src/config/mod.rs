use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variables that override values from the config file.
pub mod env_vars {
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const CALENDAR_ACCESS_TOKEN: &str = "GOOGLE_CALENDAR_ACCESS_TOKEN";
    pub const PORT: &str = "MEETPREP_PORT";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub calendar: CalendarConfig,
    pub llm: LlmConfig,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin, which is what the
    /// browser extension needs.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub api_base: String,
    pub calendar_id: String,
    pub access_token: Option<String>,
    /// How far back keyword searches look, in days.
    pub lookback_days: i64,
    /// How far ahead keyword searches look, in days.
    pub lookahead_days: i64,
    /// Offset used to turn a bare date into a day window, e.g. "+02:00".
    pub utc_offset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_iterations: usize,
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/calendar/v3".to_string(),
            calendar_id: "primary".to_string(),
            access_token: None,
            lookback_days: 30,
            lookahead_days: 90,
            utc_offset: "+00:00".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
            max_tokens: None,
            timeout_seconds: 120,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            verbose: true,
        }
    }
}

impl Config {
    /// Load the config file, creating it with defaults when missing, then
    /// apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Overlay values from the environment. Takes a lookup function so tests
    /// do not have to mutate the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(env_vars::OPENAI_API_KEY).filter(|v| !v.is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(token) = lookup(env_vars::CALENDAR_ACCESS_TOKEN).filter(|v| !v.is_empty()) {
            self.calendar.access_token = Some(token);
        }
        if let Some(port) = lookup(env_vars::PORT) {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid {}: {}", env_vars::PORT, port),
            }
        }
    }

    /// Copy of the config with secrets replaced, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.llm.api_key = copy.llm.api_key.as_ref().map(|_| "********".to_string());
        copy.calendar.access_token = copy
            .calendar
            .access_token
            .as_ref()
            .map(|_| "********".to_string());
        copy
    }

    pub fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}
