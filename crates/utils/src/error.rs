use std::{fmt::Display, path::Path};

use thiserror::Error;
use tracing::error;

/// Report an error with tracing, discarding the result
pub fn report_error<T>(res: &Result<T, impl Display>, context: &str) {
	if let Err(e) = res {
		error!(%context, "{e:#}");
	}
}

/// File I/O error that includes the path that caused the error
#[derive(Error, Debug)]
pub struct FileIOError {
	pub path: Box<Path>,
	#[source]
	pub source: std::io::Error,
	pub maybe_context: Option<String>,
}

impl Display for FileIOError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"file I/O error{}: {}; path: '{}'",
			self.maybe_context
				.as_ref()
				.map(|ctx| format!(" ({ctx})"))
				.unwrap_or_default(),
			self.source,
			self.path.display()
		)
	}
}

impl FileIOError {
	pub fn from_std_io_err(path: impl AsRef<Path>, source: std::io::Error) -> Self {
		Self {
			path: path.as_ref().into(),
			source,
			maybe_context: None,
		}
	}

	pub fn from_std_io_err_with_msg(
		path: impl AsRef<Path>,
		source: std::io::Error,
		msg: impl Into<String>,
	) -> Self {
		Self {
			path: path.as_ref().into(),
			source,
			maybe_context: Some(msg.into()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tracing_test::traced_test;

	#[test]
	fn display_includes_context_and_path() {
		let err = FileIOError::from_std_io_err_with_msg(
			"/tmp/plaque_data.json",
			std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
			"loading dataset",
		);

		let rendered = err.to_string();
		assert!(rendered.contains("(loading dataset)"));
		assert!(rendered.contains("/tmp/plaque_data.json"));
		assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
	}

	#[traced_test]
	#[test]
	fn report_error_logs_failures() {
		let res: Result<(), String> = Err("boom".to_string());
		report_error(&res, "saving session");
		assert!(logs_contain("boom"));
	}
}
