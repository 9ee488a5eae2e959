//! Wayfarer configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main Wayfarer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Itinerary (generative text) service
    pub itinerary: ItineraryConfig,

    /// Flight search service
    pub flights: FlightsConfig,

    /// Follow-up chat settings
    pub chat: ChatConfig,

    /// Local storage locations
    pub storage: StorageConfig,

    /// Prompt template overrides
    pub prompts: PromptsConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .wayfarer.yml
        let local_config = PathBuf::from(".wayfarer.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/wayfarer/wayfarer.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("wayfarer").join("wayfarer.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Itinerary service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItineraryConfig {
    /// Provider name ("gemini" or "anthropic")
    pub provider: String,

    /// Model identifier (provider default when unset)
    pub model: Option<String>,

    /// API base URL (provider default when unset)
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for ItineraryConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: None,
            base_url: None,
            max_tokens: 8192,
            temperature: 0.7,
            timeout_ms: 120_000,
        }
    }
}

impl ItineraryConfig {
    /// Fill provider defaults for model and base URL
    pub fn resolve(&self) -> Result<ResolvedItineraryConfig> {
        let (default_model, default_base_url) = match self.provider.as_str() {
            "gemini" => ("gemini-1.5-flash", "https://generativelanguage.googleapis.com"),
            "anthropic" => ("claude-sonnet-4-20250514", "https://api.anthropic.com"),
            other => {
                return Err(eyre::eyre!(
                    "Unknown itinerary provider: '{}'. Supported: gemini, anthropic",
                    other
                ));
            }
        };

        Ok(ResolvedItineraryConfig {
            provider: self.provider.clone(),
            model: self.model.clone().unwrap_or_else(|| default_model.to_string()),
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| default_base_url.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout_ms: self.timeout_ms,
        })
    }
}

/// Itinerary service configuration with provider defaults applied
#[derive(Debug, Clone)]
pub struct ResolvedItineraryConfig {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
}

/// Flight search service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightsConfig {
    /// Search endpoint
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Search engine name passed upstream
    pub engine: String,

    /// Currency for prices
    pub currency: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Serve the synthetic dataset when the request never reaches the service
    #[serde(rename = "fallback-on-transport-error")]
    pub fallback_on_transport_error: bool,
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://serpapi.com/search.json".to_string(),
            engine: "google_flights".to_string(),
            currency: "USD".to_string(),
            timeout_ms: 30_000,
            fallback_on_transport_error: false,
        }
    }
}

/// Follow-up chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Longest itinerary (in characters) embedded in a follow-up prompt; 0 = unlimited
    #[serde(rename = "max-itinerary-chars")]
    pub max_itinerary_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_itinerary_chars: 24_000,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Credential file
    #[serde(rename = "keystore-path")]
    pub keystore_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            keystore_path: keystore::FileKeyStore::default_path(),
        }
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory searched for `{name}.pmt` overrides before the embedded templates
    pub dir: Option<PathBuf>,
}
