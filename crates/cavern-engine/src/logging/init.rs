use std::sync::Once;

/// Default filter when neither the config nor `RUST_LOG` provide one.
///
/// wgpu is chatty at info level; keep it at warn.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "cavern_engine=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Millisecond timestamps instead of seconds.
    pub precise_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            precise_timestamps: false,
        }
    }
}

static INIT: Once = Once::new();

/// Resolves the filter string: explicit config, then `RUST_LOG`, then the default.
pub fn resolve_filter(config: &LoggingConfig) -> String {
    config
        .env_filter
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
}

/// Initializes the global logger once.
///
/// Idempotent; subsequent calls are ignored. A logger installed by someone
/// else (e.g. a test harness) is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(&config);
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        if config.precise_timestamps {
            builder.format_timestamp_millis();
        }

        if builder.try_init().is_err() {
            log::warn!("a global logger is already installed; keeping it");
            return;
        }

        log::debug!("logging initialized ({filter})");
    });
}
