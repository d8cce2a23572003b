use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::summarize::{self, GeminiClient};
use crate::youtube::{self, YouTubeCaptions};

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_LANG: &str = "en";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub model: Option<String>,
    pub language: Option<String>,
    pub bind: Option<String>,
    pub transcript_base_url: Option<String>,
    pub generative_base_url: Option<String>,
}

impl Config {
    /// Load config from `path` (usually ~/.config/ytsum/config.toml) if it exists
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}

/// Everything a request needs, resolved once at start-up and read-only afterwards
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub language: String,
    pub bind: String,
    pub transcript_base_url: String,
    pub generative_base_url: String,
}

impl Settings {
    /// Combine the config file with the credential from the environment.
    ///
    /// Fails with [`crate::Error::Configuration`] when the credential is missing or blank.
    pub fn resolve(config: Config, api_key: Option<String>) -> crate::Result<Self> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                crate::Error::Configuration(format!("{API_KEY_VAR} is not set (add it to the environment or a .env file)"))
            })?;

        Ok(Settings {
            api_key,
            model: config.model.unwrap_or_else(|| summarize::DEFAULT_MODEL.to_string()),
            language: config.language.unwrap_or_else(|| DEFAULT_LANG.to_string()),
            bind: config.bind.unwrap_or_else(|| DEFAULT_BIND.to_string()),
            transcript_base_url: config
                .transcript_base_url
                .unwrap_or_else(|| youtube::DEFAULT_BASE_URL.to_string()),
            generative_base_url: config
                .generative_base_url
                .unwrap_or_else(|| summarize::DEFAULT_BASE_URL.to_string()),
        })
    }

    /// Read the credential from the process environment (after loading `.env`)
    pub fn from_env(config: Config) -> crate::Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) => debug!("No .env loaded: {e}"),
        }
        Self::resolve(config, std::env::var(API_KEY_VAR).ok())
    }

    pub fn transcript_provider(&self, client: reqwest::Client) -> YouTubeCaptions {
        YouTubeCaptions::new(client, &self.language).with_base_url(&self.transcript_base_url)
    }

    pub fn summarizer(&self, client: reqwest::Client) -> GeminiClient {
        GeminiClient::new(client, &self.api_key, &self.model).with_base_url(&self.generative_base_url)
    }
}
