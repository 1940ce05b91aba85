//! Configuration management for md2html.
//!
//! Reads a JSON (or TOML) configuration file with serde. Without an explicit
//! path, `config.json` next to the executable is used, then `md2html.json` or
//! `md2html.toml` in the current directory or one of its parents.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support `${VAR}` and `${VAR:-default}`. Expanded fields:
//! - `s3.endpoint`
//! - `s3.bucket`
//! - `s3.accessKey`
//! - `s3.secretKey`
//! - `custom.baseUrl`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file expected next to the executable.
const EXECUTABLE_CONFIG_FILENAME: &str = "config.json";

/// Config files searched in the current directory and its parents.
const PROJECT_CONFIG_FILENAMES: [&str; 2] = ["md2html.json", "md2html.toml"];

/// Output directory used when neither CLI nor config name one.
const DEFAULT_OUTPUT_DIR: &str = "output";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Object storage configuration. Upload is skipped when absent.
    pub s3: Option<S3Config>,
    /// Public URL and output settings.
    pub custom: CustomConfig,
    /// Markdown engine flags.
    pub render: RenderConfig,
    /// HTML page shell settings.
    pub page: PageConfig,

    /// Resolved output directory (set after loading).
    #[serde(skip)]
    pub output_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// S3-compatible object storage configuration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Config {
    /// Storage host, optionally with an `http://` or `https://` prefix.
    pub endpoint: String,
    /// Storage port.
    pub port: u16,
    /// Bucket name.
    pub bucket: String,
    /// Access key ID.
    pub access_key: String,
    /// Secret access key.
    pub secret_key: String,
    /// Signing region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Whether to connect over HTTPS.
    #[serde(default, rename = "useSSL", alias = "useSsl")]
    pub use_ssl: bool,
}

fn default_region() -> String {
    "us-east-1".to_owned()
}

/// Public URL and output settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomConfig {
    /// Public base URL of the bucket (e.g., `https://cdn.example.com`).
    pub base_url: String,
    /// Path appended to the base URL before the object key.
    pub path: String,
    /// Output directory, relative to the config file.
    pub output_dir: Option<String>,
}

/// Markdown engine flags.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// GitHub Flavored Markdown extensions.
    pub gfm: bool,
    /// Typographic quotes and dashes.
    pub smart_punctuation: bool,
    /// `{#id .class}` heading attributes.
    pub heading_attributes: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            smart_punctuation: false,
            heading_attributes: true,
        }
    }
}

/// HTML page shell settings.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    /// highlight.js version loaded from the CDN.
    pub highlight_version: String,
    /// highlight.js theme stylesheet.
    pub highlight_theme: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            highlight_version: "11.9.0".to_owned(),
            highlight_theme: "default".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`s3.secretKey`").
        field: String,
        /// Error message (e.g., "${`S3_SECRET`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise looks for
    /// `config.json` next to the executable, then searches the current
    /// directory and its parents. Falls back to defaults when nothing is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output_dir) = &settings.output_dir {
            self.output_dir.clone_from(output_dir);
        }
    }

    /// Get the S3 configuration, required for uploading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the `s3` section is missing.
    pub fn require_s3(&self) -> Result<&S3Config, ConfigError> {
        self.s3
            .as_ref()
            .ok_or_else(|| ConfigError::Validation("s3 section required in config".into()))
    }

    /// Find a config file next to the executable or in the project tree.
    fn discover_config() -> Option<PathBuf> {
        if let Some(candidate) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(EXECUTABLE_CONFIG_FILENAME)))
            .filter(|candidate| candidate.exists())
        {
            return Some(candidate);
        }

        let mut current = std::env::current_dir().ok()?;
        loop {
            for name in PROJECT_CONFIG_FILENAMES {
                let candidate = current.join(name);
                if candidate.exists() {
                    return Some(candidate);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            output_dir: base.join(DEFAULT_OUTPUT_DIR),
            ..Self::default()
        }
    }

    /// Parse configuration text, choosing the format from the file extension.
    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Ok(toml::from_str(content)?)
        } else {
            Ok(serde_json::from_str(content)?)
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content, path)?;

        // Expand environment variables before validation
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_s3()?;
        self.validate_custom()?;
        Ok(())
    }

    /// Validate S3 configuration.
    fn validate_s3(&self) -> Result<(), ConfigError> {
        let Some(s3) = &self.s3 else {
            return Ok(());
        };

        require_non_empty(&s3.endpoint, "s3.endpoint")?;
        require_non_empty(&s3.bucket, "s3.bucket")?;
        require_non_empty(&s3.region, "s3.region")?;
        if s3.port == 0 {
            return Err(ConfigError::Validation("s3.port cannot be 0".to_owned()));
        }

        Ok(())
    }

    /// Validate public URL settings.
    fn validate_custom(&self) -> Result<(), ConfigError> {
        // An empty base URL is allowed; upload then reports the bare object key
        if !self.custom.base_url.is_empty() {
            require_http_url(&self.custom.base_url, "custom.baseUrl")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut s3) = self.s3 {
            s3.endpoint = expand::expand_env(&s3.endpoint, "s3.endpoint")?;
            s3.bucket = expand::expand_env(&s3.bucket, "s3.bucket")?;
            s3.access_key = expand::expand_env(&s3.access_key, "s3.accessKey")?;
            s3.secret_key = expand::expand_env(&s3.secret_key, "s3.secretKey")?;
        }
        self.custom.base_url = expand::expand_env(&self.custom.base_url, "custom.baseUrl")?;
        Ok(())
    }

    /// Resolve the output directory against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let output_dir = self
            .custom
            .output_dir
            .as_deref()
            .filter(|dir| !dir.is_empty())
            .unwrap_or(DEFAULT_OUTPUT_DIR);
        self.output_dir = config_dir.join(output_dir);
    }
}
