use std::path::Path;

use anyhow::{Context as _, Result};
use pq_core::config::AppConfig;
use tracing_appender::{
	non_blocking::{NonBlocking, WorkerGuard},
	rolling,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE_NAME: &str = "plaques.log";

/// `RUST_LOG` wins over the configured level. The returned guard flushes the
/// log file when dropped, so it has to live as long as `main`.
pub fn init(config: &AppConfig, log_to_file: bool) -> Result<Option<WorkerGuard>> {
	let filter = match EnvFilter::try_from_default_env() {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(&config.log_level)
			.with_context(|| format!("invalid log level '{}'", config.log_level))?,
	};

	let (file_layer, guard) = if log_to_file || config.log_to_file {
		let (writer, guard) = file_writer(&config.logs_dir())?;
		(Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
	} else {
		(None, None)
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_writer(std::io::stderr))
		.with(file_layer)
		.init();

	Ok(guard)
}

fn file_writer(logs_dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
	std::fs::create_dir_all(logs_dir)
		.with_context(|| format!("failed to create {}", logs_dir.display()))?;

	Ok(tracing_appender::non_blocking(rolling::never(
		logs_dir,
		LOG_FILE_NAME,
	)))
}
