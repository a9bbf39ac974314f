//! Logging and tracing initialization.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Environment variable holding filter directives. Checked before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "TILEBAKE_LOG";

const FALLBACK_LEVEL: &str = "info";

/// Initialize the tracing subscriber with the given configuration.
///
/// Logs go to stderr so stdout stays free for command output. `verbose`
/// raises the configured level to `debug`; directives from the environment
/// still take precedence.
pub fn init_logging(config: &LoggingConfig, verbose: bool) {
    let env_directives = std::env::var(LOG_ENV_VAR)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .ok();
    let env_filter = build_filter(env_directives.as_deref(), config, verbose);

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(verbose)
            .without_time()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}

fn build_filter(env_directives: Option<&str>, config: &LoggingConfig, verbose: bool) -> EnvFilter {
    if let Some(filter) = env_directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
    {
        return filter;
    }

    let level = if verbose { "debug" } else { config.level.as_str() };
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}
