//! Log output for the Folio API.

use std::str::FromStr;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose debug output is on unless `RUST_LOG` says otherwise.
const FOLIO_CRATES: [&str; 3] = ["folio_api", "folio_core", "folio_infra"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, for local development.
    #[default]
    Pretty,
    /// One line per event, for container logs read by humans.
    Compact,
    /// Structured, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// Reported on the startup line so shipped logs can be told apart
    /// when several deployments share a sink.
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            service_name: "folio-api".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Reads `LOG_FORMAT` and `SERVICE_NAME`. An unknown format falls back
    /// to pretty output.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            format: std::env::var("LOG_FORMAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.format),
            service_name: std::env::var("SERVICE_NAME")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.service_name),
        }
    }
}

fn default_directives() -> String {
    std::iter::once("info".to_string())
        .chain(FOLIO_CRATES.iter().map(|c| format!("{c}=debug")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_telemetry(config: &TelemetryConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives()));
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
        LogFormat::Compact => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }

    tracing::info!(
        service = %config.service_name,
        format = ?config.format,
        version = env!("CARGO_PKG_VERSION"),
        "Logging initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" compact ".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_default_directives_cover_workspace_crates() {
        let directives = default_directives();
        assert!(directives.starts_with("info,"));
        for krate in FOLIO_CRATES {
            assert!(directives.contains(&format!("{krate}=debug")));
        }
        assert!(EnvFilter::try_new(&directives).is_ok());
    }
}
