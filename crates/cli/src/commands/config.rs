use std::env;
use std::fs;
use std::path::Path;

use landscape_core::config::{resolve_config_path, AppConfig, LoadOptions};
use landscape_core::pricing::PricingField;
use toml::Value;

pub fn run(config_path: Option<&Path>) -> String {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["LANDSCAPE_LOGGING_LEVEL", "LANDSCAPE_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        config.logging.format.as_str(),
        source("logging.format", &["LANDSCAPE_LOGGING_FORMAT", "LANDSCAPE_LOG_FORMAT"]),
    ));

    for field in PricingField::ALL {
        let key_path = format!("pricing.{}", field.key());
        lines.push(render_line(
            &key_path,
            &config.pricing.get(field).to_string(),
            source(&key_path, &[field.env_key()]),
        ));
    }

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let from_env = env_keys
        .iter()
        .find(|env_key| env::var(env_key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = from_env {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
