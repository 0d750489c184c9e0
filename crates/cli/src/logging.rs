use anyhow::{anyhow, Result};
use landscape_core::config::{LogFormat, LoggingConfig};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. Output goes to stderr so estimates on
/// stdout stay machine-readable.
///
/// `RUST_LOG`, when set, replaces the configured level.
pub fn init(logging: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter(&logging.level))
        .with_writer(std::io::stderr);

    let installed = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|error| anyhow!("could not install log subscriber: {error}"))
}

pub fn parse_level(raw: &str) -> Level {
    raw.trim().parse::<Level>().unwrap_or(Level::INFO)
}

fn filter(configured_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_level(configured_level).as_str().to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::{filter, parse_level};

    #[test]
    fn unknown_levels_fall_back_to_info() {
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level(" DEBUG "), Level::DEBUG);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }

    #[test]
    fn configured_level_drives_the_filter_without_rust_log() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        assert!(filter("warn").to_string().eq_ignore_ascii_case("warn"));
        assert!(filter("chatty").to_string().eq_ignore_ascii_case("info"));
    }
}
