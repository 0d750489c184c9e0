use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::pricing::{parse_decimal, toml_decimal, PricingConfig, PricingField, PricingOverrides};

pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["landscape.toml", "config/landscape.toml"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub pricing: PricingConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub pricing: PricingOverrides,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("pricing.{key} in `{path}` is not a number: `{value}`")]
    InvalidPricingValue { path: PathBuf, key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl AppConfig {
    /// defaults < file < environment < explicit overrides, then validation.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let maybe_path = resolve_config_path(options.config_path.as_deref());
        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(&path, patch)?;
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATHS[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, path: &Path, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        if let Some(pricing) = patch.pricing {
            for (key, raw) in &pricing {
                let Some(field) = PricingField::from_key(key) else {
                    debug!(
                        event_name = "config.pricing.unknown_key",
                        key = key.as_str(),
                        path = %path.display(),
                        "unknown pricing key in config file ignored"
                    );
                    continue;
                };
                let value = toml_decimal(raw).ok_or_else(|| ConfigError::InvalidPricingValue {
                    path: path.to_path_buf(),
                    key: key.clone(),
                    value: raw.to_string(),
                })?;
                self.pricing.set(field, value);
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let log_level =
            read_env("LANDSCAPE_LOGGING_LEVEL").or_else(|| read_env("LANDSCAPE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }

        let log_format =
            read_env("LANDSCAPE_LOGGING_FORMAT").or_else(|| read_env("LANDSCAPE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        for field in PricingField::ALL {
            let key = field.env_key();
            if let Some(value) = read_env(key) {
                self.pricing.set(field, parse_env_decimal(key, &value)?);
            }
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        for (field, value) in overrides.pricing.iter() {
            self.pricing.set(field, value);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_pricing(&self.pricing)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// The explicit path when it exists, otherwise the first default location
/// present in the working directory.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    DEFAULT_CONFIG_PATHS.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    let interpolated = interpolate_env_vars(&raw)?;

    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_pricing(pricing: &PricingConfig) -> Result<(), ConfigError> {
    for field in PricingField::ALL {
        if pricing.get(field) < Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "pricing.{} must not be negative",
                field.key()
            )));
        }
    }

    if pricing.crew_size < Decimal::ONE {
        return Err(ConfigError::Validation(
            "pricing.crewSize must be at least 1".to_string(),
        ));
    }

    for field in [PricingField::TaxRate, PricingField::Waste] {
        if pricing.get(field) > Decimal::ONE {
            return Err(ConfigError::Validation(format!(
                "pricing.{} is a fraction and must not exceed 1 (e.g. 0.0825 for 8.25%)",
                field.key()
            )));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    parse_decimal(value).ok_or_else(|| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    logging: Option<LoggingPatch>,
    pricing: Option<toml::Table>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
