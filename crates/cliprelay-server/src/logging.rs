//! Logging configuration and initialization.
//!
//! Structured logging with presets (production, verbose, debug, trace,
//! quiet), per-target overrides via `--log target=level`, text or JSON
//! output, and `RUST_LOG` fallback.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: '{}'. Use 'text' or 'json'.", s)),
        }
    }
}

/// Logging preset levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Production: connection lifecycle and failures only
    #[default]
    Production,
    /// Verbose: per-action operational detail
    Verbose,
    /// Debug: roster resolution detail
    Debug,
    /// Trace: everything
    Trace,
    /// Quiet: warnings and errors only
    Quiet,
}

/// Logging configuration built from CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
    /// Per-target filter directives, e.g. `cliprelay::roster=debug`.
    pub overrides: Vec<String>,
    pub format: LogFormat,
}

impl LogConfig {
    pub fn from_cli(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        log_overrides: Vec<String>,
        format: LogFormat,
    ) -> Self {
        let preset = if quiet {
            LogPreset::Quiet
        } else if trace {
            LogPreset::Trace
        } else if debug {
            LogPreset::Debug
        } else if verbose {
            LogPreset::Verbose
        } else {
            LogPreset::Production
        };

        // "roster=debug" becomes "cliprelay::roster=debug"; full targets
        // and tower_http pass through untouched.
        let mut overrides = Vec::new();
        for override_str in log_overrides {
            for part in override_str.split(',') {
                let Some((target, level)) = part.split_once('=') else {
                    continue;
                };
                let target = target.trim();
                let full_target = if target.starts_with("cliprelay::") || target == "tower_http" {
                    target.to_string()
                } else {
                    format!("cliprelay::{}", target)
                };
                overrides.push(format!("{}={}", full_target, level.trim()));
            }
        }

        Self {
            preset,
            overrides,
            format,
        }
    }

    /// Build an EnvFilter from this configuration. `RUST_LOG` wins outright.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }

        let mut directives: Vec<String> = match self.preset {
            LogPreset::Production => vec![
                "cliprelay::startup=info".into(),
                "cliprelay::ws=info".into(),
                "cliprelay::api=info".into(),
                "cliprelay::router=info".into(),
                "cliprelay::roster=warn".into(),
                "tower_http=warn".into(),
            ],
            LogPreset::Verbose => vec!["cliprelay=info".into(), "tower_http=info".into()],
            LogPreset::Debug => vec!["cliprelay=debug".into(), "tower_http=debug".into()],
            LogPreset::Trace => vec!["cliprelay=trace".into(), "tower_http=trace".into()],
            LogPreset::Quiet => vec!["cliprelay=warn".into(), "tower_http=error".into()],
        };

        directives.extend(self.overrides.iter().cloned());

        let filter_str = directives.join(",");
        EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the tracing subscriber with the given configuration.
pub fn init(config: &LogConfig) {
    let filter = config.build_filter();

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("invalid".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_preset_priority() {
        let config = LogConfig::from_cli(true, true, true, true, vec![], LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Quiet);

        let config = LogConfig::from_cli(true, true, true, false, vec![], LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Trace);

        let config = LogConfig::from_cli(true, false, false, false, vec![], LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Verbose);

        let config = LogConfig::from_cli(false, false, false, false, vec![], LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Production);
    }

    #[test]
    fn test_override_target_normalization() {
        let config = LogConfig::from_cli(
            false,
            false,
            false,
            false,
            vec!["roster=debug".into(), "cliprelay::ws=trace,tower_http=info".into()],
            LogFormat::Text,
        );

        assert_eq!(
            config.overrides,
            vec![
                "cliprelay::roster=debug",
                "cliprelay::ws=trace",
                "tower_http=info"
            ]
        );
    }
}
