use std::path::Path;
use thiserror::Error;

/// Core watcher error types
///
/// These cover startup, configuration and subscription failures. Per-file
/// relocation failures are reported through [`crate::relocator::RelocateError`]
/// and never surface here.
#[derive(Error, Debug)]
pub enum WatcherError {
	#[error("Notify error: {0}")]
	Notify(#[from] notify::Error),

	#[error("Invalid filename pattern: {0}")]
	Pattern(#[from] regex::Error),

	#[error("Invalid path: {path} - {reason}")]
	InvalidPath { path: String, reason: String },

	#[error("Failed to create destination directory {path}: {source}")]
	DestinationUnavailable {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read source directory {path}: {source}")]
	SourceUnreadable {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error(
		"Configuration error: {parameter} - {reason} (expected: {expected}, actual: {actual})"
	)]
	ConfigurationError {
		parameter: String,
		reason: String,
		expected: String,
		actual: String,
	},

	#[error("Watch task failed: {0}")]
	TaskJoin(#[from] tokio::task::JoinError),
}

impl WatcherError {
	/// Check if this error should stop the process before any watching begins
	pub fn is_fatal(&self) -> bool {
		match self {
			WatcherError::InvalidPath { .. }
			| WatcherError::DestinationUnavailable { .. }
			| WatcherError::SourceUnreadable { .. }
			| WatcherError::ConfigurationError { .. }
			| WatcherError::Pattern(_) => true,
			WatcherError::Notify(_) | WatcherError::TaskJoin(_) => false,
		}
	}

	/// Check if this error is related to configuration issues
	pub fn is_configuration_error(&self) -> bool {
		matches!(
			self,
			WatcherError::ConfigurationError { .. }
				| WatcherError::InvalidPath { .. }
				| WatcherError::Pattern(_)
		)
	}

	/// Get error category for logging
	pub fn category(&self) -> &'static str {
		match self {
			WatcherError::Notify(_) => "notify",
			WatcherError::Pattern(_) => "configuration",
			WatcherError::InvalidPath { .. } => "configuration",
			WatcherError::DestinationUnavailable { .. } => "filesystem",
			WatcherError::SourceUnreadable { .. } => "filesystem",
			WatcherError::ConfigurationError { .. } => "configuration",
			WatcherError::TaskJoin(_) => "shutdown",
		}
	}

	pub fn invalid_path(path: &Path, reason: &str) -> Self {
		WatcherError::InvalidPath {
			path: path.display().to_string(),
			reason: reason.to_string(),
		}
	}

	/// Create a configuration error
	pub fn configuration_error(
		parameter: &str, reason: &str, expected: &str, actual: &str,
	) -> Self {
		WatcherError::ConfigurationError {
			parameter: parameter.to_string(),
			reason: reason.to_string(),
			expected: expected.to_string(),
			actual: actual.to_string(),
		}
	}
}

pub type Result<T> = std::result::Result<T, WatcherError>;

#[cfg(test)]
mod tests {
	use super::*;
	use std::io;
	use std::path::PathBuf;

	#[test]
	fn test_error_messages() {
		let invalid = WatcherError::invalid_path(&PathBuf::from("/missing"), "does not exist");
		assert!(invalid.to_string().contains("/missing"));
		assert!(invalid.to_string().contains("does not exist"));

		let dest = WatcherError::DestinationUnavailable {
			path: "/dest".to_string(),
			source: io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
		};
		assert!(dest.to_string().contains("/dest"));
		assert!(dest.to_string().contains("access denied"));
	}

	#[test]
	fn test_from_conversions() {
		let notify_err = notify::Error::generic("boom");
		let watcher_err: WatcherError = notify_err.into();
		match watcher_err {
			WatcherError::Notify(_) => (),
			other => panic!("Expected Notify error variant, got {other:?}"),
		}

		let regex_err = regex::Regex::new("(").unwrap_err();
		let watcher_err: WatcherError = regex_err.into();
		assert!(watcher_err.is_configuration_error());
	}

	#[test]
	fn test_error_categorization() {
		let config_error =
			WatcherError::configuration_error("dedup_window", "too large", "< 30s", "45s");
		assert!(config_error.is_fatal());
		assert!(config_error.is_configuration_error());
		assert_eq!(config_error.category(), "configuration");

		let notify_error = WatcherError::Notify(notify::Error::generic("inotify limit"));
		assert!(!notify_error.is_fatal());
		assert_eq!(notify_error.category(), "notify");

		let unreadable = WatcherError::SourceUnreadable {
			path: "/src".to_string(),
			source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
		};
		assert!(unreadable.is_fatal());
		assert_eq!(unreadable.category(), "filesystem");
	}
}
