use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language codes used when the CLI asks for "all"
    #[serde(default = "default_language_codes")]
    pub language_codes: Vec<String>,

    /// Directory (relative to the project root) holding translated text files
    #[serde(default = "default_translations_dir")]
    pub translations_dir: PathBuf,

    /// Directory (relative to the project root) holding translated images
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    /// Directory names skipped while walking the source tree
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,

    /// File extensions treated as markdown
    #[serde(default = "default_markdown_extensions")]
    pub markdown_extensions: Vec<String>,

    /// File extensions treated as notebooks
    #[serde(default = "default_notebook_extensions")]
    pub notebook_extensions: Vec<String>,

    /// File extensions treated as images
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// Number of concurrent workers for image batches
    #[serde(default = "default_parallel_workers")]
    pub parallel_workers: usize,

    /// Pause in milliseconds between consecutive text translation requests
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Text translation backend
    #[serde(default)]
    pub llm: LlmConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// OpenAI-compatible chat completion backend settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LlmConfig {
    /// Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default)]
    pub temperature: f32,

    /// Nucleus sampling mass
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Maximum tokens generated per chunk
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum markdown characters sent in one prompt
    #[serde(default = "default_max_chars_per_chunk")]
    pub max_chars_per_chunk: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: String::new(),
            temperature: 0.0,
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            max_chars_per_chunk: default_max_chars_per_chunk(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language_codes() -> Vec<String> {
    ["es", "fr", "de", "ja", "ko", "pt", "zh"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_translations_dir() -> PathBuf {
    PathBuf::from("translations")
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("translated_images")
}

fn default_excluded_dirs() -> Vec<String> {
    [".git", ".github", "node_modules", "target", ".venv", "venv", "__pycache__", ".ipynb_checkpoints"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_markdown_extensions() -> Vec<String> {
    vec![".md".to_string()]
}

fn default_notebook_extensions() -> Vec<String> {
    vec![".ipynb".to_string()]
}

fn default_image_extensions() -> Vec<String> {
    vec![".png".to_string(), ".jpg".to_string(), ".jpeg".to_string()]
}

fn default_parallel_workers() -> usize {
    5
}

fn default_request_delay_ms() -> u64 {
    1000 // one request per second against the text backend
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_top_p() -> f32 {
    0.8
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_chars_per_chunk() -> usize {
    6000
}

impl Config {
    /// Load the configuration from a JSON file, writing the defaults first when
    /// the file does not exist yet
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.language_codes.is_empty() {
            return Err(ConfigError::NoLanguages);
        }
        for code in &self.language_codes {
            crate::language_utils::validate_language_code(code)?;
        }
        if self.parallel_workers == 0 {
            return Err(ConfigError::InvalidSetting("parallel_workers must be at least 1".to_string()));
        }
        if self.llm.max_chars_per_chunk == 0 {
            return Err(ConfigError::InvalidSetting("llm.max_chars_per_chunk must be at least 1".to_string()));
        }
        if self.translations_dir.as_os_str().is_empty() || self.image_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidSetting("output directories cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Check the credentials needed by the text backend
    pub fn validate_credentials(&self) -> Result<(), ConfigError> {
        if self.llm.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredentials(
                "an API key is required for the text translation backend".to_string(),
            ));
        }
        if url::Url::parse(&self.llm.endpoint).is_err() {
            return Err(ConfigError::InvalidSetting(format!("invalid endpoint: {}", self.llm.endpoint)));
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language_codes: default_language_codes(),
            translations_dir: default_translations_dir(),
            image_dir: default_image_dir(),
            excluded_dirs: default_excluded_dirs(),
            markdown_extensions: default_markdown_extensions(),
            notebook_extensions: default_notebook_extensions(),
            image_extensions: default_image_extensions(),
            parallel_workers: default_parallel_workers(),
            request_delay_ms: default_request_delay_ms(),
            llm: LlmConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
