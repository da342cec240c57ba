use std::sync::Once;

use log::LevelFilter;

/// Crates whose per-frame chatter drowns out batch rebuild records.
const NOISY_CRATES: &[(&str, LevelFilter)] = &[
    ("wgpu_core", LevelFilter::Warn),
    ("wgpu_hal", LevelFilter::Warn),
    ("naga", LevelFilter::Warn),
];

/// How `init_logging` builds the `env_logger` backend.
///
/// Filter precedence: `filter` if set, then `RUST_LOG`, then `level` with
/// the GPU stack capped at `warn`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directive string such as `"circlemap_engine::geometry=trace"`.
    pub filter: Option<String>,
    pub level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
    pub timestamps: bool,
}

impl LoggingConfig {
    /// Batch lifecycle at `debug`, no timestamps. Suits the studio and ad-hoc runs.
    pub fn verbose() -> Self {
        Self { level: LevelFilter::Debug, timestamps: false, ..Self::default() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
            timestamps: true,
        }
    }
}

fn builder(config: &LoggingConfig) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();

    match config.filter.clone().or_else(|| std::env::var("RUST_LOG").ok()) {
        Some(directives) => {
            builder.parse_filters(&directives);
        }
        None => {
            builder.filter_level(config.level);
            for &(module, cap) in NOISY_CRATES {
                builder.filter_module(module, cap.min(config.level));
            }
        }
    }

    builder.write_style(config.write_style);
    if !config.timestamps {
        builder.format_timestamp(None);
    }
    builder
}

static INIT: Once = Once::new();

/// Installs the `env_logger` backend on first call; later calls do nothing.
///
/// Returns `false` if a different logger already owns the `log` facade.
pub fn init_logging(config: LoggingConfig) -> bool {
    let mut installed = false;
    INIT.call_once(|| match builder(&config).try_init() {
        Ok(()) => {
            installed = true;
            log::debug!("circlemap logging at {}", config.level);
        }
        Err(err) => eprintln!("circlemap: keeping existing logger ({err})"),
    });
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_drops_timestamps_and_raises_level() {
        let config = LoggingConfig::verbose();
        assert_eq!(config.level, LevelFilter::Debug);
        assert!(!config.timestamps);
        assert!(config.filter.is_none());
    }

    #[test]
    fn explicit_filter_wins_over_level() {
        let config = LoggingConfig {
            filter: Some("circlemap_engine=trace".into()),
            level: LevelFilter::Error,
            ..LoggingConfig::default()
        };
        assert_eq!(builder(&config).build().filter(), LevelFilter::Trace);
    }

    #[test]
    fn second_init_is_ignored() {
        init_logging(LoggingConfig::default());
        assert!(!init_logging(LoggingConfig::verbose()));
    }
}
