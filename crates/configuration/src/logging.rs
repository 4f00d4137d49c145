use crate::error::ConfigError;
use crate::settings::LoggingConfig;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_PREFIX: &str = "vaultline.log";

/// Installs the global `tracing` subscriber.
///
/// A bare level such as `debug` is widened with quieter defaults for the HTTP and
/// RPC transport crates; a directive string containing `,` or `=` is used as-is.
/// The returned guard must be held for the lifetime of the process when file
/// logging is enabled, otherwise buffered lines are lost on exit.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter_spec = filter_spec(&config.level);
    let filter = build_filter(&filter_spec)?;

    let console = if config.json {
        fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(false)
            .boxed()
    } else {
        fmt::layer().with_target(true).compact().boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    tracing::info!(
        filter = %filter_spec,
        format = if config.json { "json" } else { "compact" },
        file = ?config.directory,
        "Logging initialized"
    );
    Ok(guard)
}

fn build_filter(spec: &str) -> Result<EnvFilter, ConfigError> {
    EnvFilter::from_str(spec)
        .map_err(|e| ConfigError::Logging(format!("invalid `[logging] level` {spec:?}: {e}")))
}

fn filter_spec(level: &str) -> String {
    let normalized = level.trim();
    if normalized.contains(',') || normalized.contains('=') {
        normalized.to_string()
    } else {
        format!(
            "{normalized},h2=info,hyper=info,reqwest=info,solana_rpc_client=warn,solana_client=warn"
        )
    }
}
