use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::render::FontOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// YouTube Data API configuration
    pub youtube: YoutubeConfig,

    /// Generative model configuration
    pub gemini: GeminiConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    /// Data API v3 key (YOUTUBE_API_KEY overrides)
    pub api_key: String,

    /// Caption language requested from the transcript endpoint
    pub caption_language: String,

    /// Upper bound on videos fetched per channel lookup
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Generative-language API key (GEMINI_API_KEY overrides)
    pub api_key: String,

    /// Model name used for rewrites
    pub model: String,

    /// Generation cap passed with every request
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Delay between transcript fetches, in seconds
    pub request_delay_secs: u64,

    /// Optional external font assets for the renderers
    pub fonts: FontOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube: YoutubeConfig {
                api_key: String::new(),
                caption_language: "en".to_string(),
                max_results: 25,
            },
            gemini: GeminiConfig {
                api_key: String::new(),
                model: "gemini-pro-latest".to_string(),
                max_output_tokens: 65536,
            },
            app: AppConfig {
                request_delay_secs: 1,
                fonts: FontOptions::default(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default, then apply env
    /// overrides for the two API keys.
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content =
                fs_err::read_to_string(&config_path).context("Failed to read config file")?;

            serde_yaml::from_str(&content).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save().await?;
            config
        };

        if let Ok(key) = std::env::var("YOUTUBE_API_KEY") {
            config.youtube.api_key = key;
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.gemini.api_key = key;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("transcript-press").join("config.yaml"))
    }

    /// Check the keys a channel run needs. The model key is only required
    /// when the chosen rewrite style will actually call the model.
    pub fn validate_for_run(&self, needs_model: bool) -> Result<()> {
        if self.youtube.api_key.is_empty() {
            anyhow::bail!(
                "YouTube API key not configured. Set YOUTUBE_API_KEY or edit {}",
                Self::config_path()?.display()
            );
        }

        if needs_model && self.gemini.api_key.is_empty() {
            anyhow::bail!(
                "Gemini API key not configured. Set GEMINI_API_KEY or edit {}",
                Self::config_path()?.display()
            );
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!(
            "  YouTube API Key: {}",
            if self.youtube.api_key.is_empty() {
                "(not set)"
            } else {
                "(set)"
            }
        );
        println!("  Caption Language: {}", self.youtube.caption_language);
        println!("  Max Results: {}", self.youtube.max_results);
        println!(
            "  Gemini API Key: {}",
            if self.gemini.api_key.is_empty() {
                "(not set)"
            } else {
                "(set)"
            }
        );
        println!("  Model: {}", self.gemini.model);
        println!("  Request Delay: {}s", self.app.request_delay_secs);
        if let Some(regular) = &self.app.fonts.regular {
            println!("  Font (regular): {}", regular.display());
        }
        if let Some(bold) = &self.app.fonts.bold {
            println!("  Font (bold): {}", bold.display());
        }
    }

    /// Interactive configuration setup
    pub async fn interactive_setup(&self) -> Result<()> {
        println!("Interactive configuration setup coming soon!");
        println!("For now, please edit the config file manually:");
        println!("  {}", Self::config_path()?.display());
        Ok(())
    }
}
