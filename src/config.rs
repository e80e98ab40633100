use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::core::strategy::ScoringStrategy;

/// Errors that can occur while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    #[validate(nested)]
    pub scoring: ScoringSettings,
    #[validate(nested)]
    pub oracle: OracleSettings,
    #[validate(nested)]
    pub similarity: SimilaritySettings,
    #[validate(nested)]
    pub enrichment: EnrichmentSettings,
    #[validate(nested)]
    pub matching: MatchingSettings,
    #[validate(nested)]
    pub output: OutputSettings,
    #[validate(nested)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ScoringSettings {
    pub strategy: ScoringStrategy,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct OracleSettings {
    #[validate(length(min = 1))]
    pub endpoint: String,
    pub api_key: Option<String>,
    #[validate(length(min = 1))]
    pub model: String,
    #[validate(range(min = 1))]
    pub max_tokens: u32,
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com".to_string(),
            api_key: None,
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            timeout_secs: 60,
        }
    }
}

/// Backend for the ideal-type text similarity factor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityProvider {
    #[default]
    Lexical,
    Embeddings,
    Disabled,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct SimilaritySettings {
    pub provider: SimilarityProvider,
    #[validate(length(min = 1))]
    pub endpoint: String,
    pub api_key: Option<String>,
    #[validate(length(min = 1))]
    pub model: String,
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
    #[validate(range(min = 1))]
    pub cache_size: u64,
}

impl Default for SimilaritySettings {
    fn default() -> Self {
        Self {
            provider: SimilarityProvider::default(),
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "text-embedding-3-small".to_string(),
            timeout_secs: 30,
            cache_size: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct EnrichmentSettings {
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct MatchingSettings {
    /// Pairs scored at once; collaborator rate limits apply in oracle mode
    #[validate(range(min = 1, max = 256))]
    pub concurrency: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self { concurrency: 8 }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct OutputSettings {
    /// Full JSON report
    pub path: PathBuf,
    /// One spreadsheet row per match
    pub csv_path: PathBuf,
    pub top_n: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("matches.json"),
            csv_path: PathBuf::from("matches.csv"),
            top_n: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    #[validate(length(min = 1))]
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with COHORT__)
    pub fn load() -> Result<Self, SettingsError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));
        Self::finish(builder.add_source(environment()).build()?)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let builder = Config::builder().add_source(File::from(path.as_ref()));
        Self::finish(builder.add_source(environment()).build()?)
    }

    fn finish(config: Config) -> Result<Self, SettingsError> {
        let settings: Settings = substitute_env_vars(config)?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

/// e.g. COHORT__SCORING__STRATEGY=oracle -> scoring.strategy
fn environment() -> Environment {
    Environment::with_prefix("COHORT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Pick up API keys from their conventional variables
///
/// A key set through the prefixed variables or a config file wins.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let conventional = [
        ("oracle.api_key", "ANTHROPIC_API_KEY"),
        ("similarity.api_key", "EMBEDDINGS_API_KEY"),
        ("enrichment.api_key", "ENRICHMENT_API_KEY"),
    ];

    let mut builder = Config::builder().add_source(settings.clone());
    for (key, var) in conventional {
        if settings.get_string(key).is_ok() {
            continue;
        }
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
