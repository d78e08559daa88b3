use std::sync::Once;

/// Logger configuration for embedders.
///
/// `filter` overrides `RUST_LOG` and follows the `env_logger` filter syntax
/// (e.g. "info" or "rigel_engine::device=debug"). `write_style` controls
/// ANSI coloring.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Idempotent; call it early in `main`.
///
/// Precedence: `config.filter`, then `RUST_LOG`, then `info`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match config.filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => builder.parse_filters(&filter),
            None => builder.filter_level(log::LevelFilter::Info),
        };
        builder.write_style(config.write_style).init();

        log::debug!("logging initialized");
    });
}
