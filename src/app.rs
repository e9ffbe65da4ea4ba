//! Startup sequence shared by the binary and the end-to-end tests

use crate::error::{Result, WatcherError};
use crate::pattern::ScreenshotPattern;
use crate::processor::FileProcessor;
use crate::scanner::{process_existing_files, ScanSummary};
use crate::watcher::{
	FolderWatcher, WatchExit, WatcherConfig, DEFAULT_CLEANUP_INTERVAL, DEFAULT_DEDUP_WINDOW,
	DEFAULT_SETTLE_DELAY,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone)]
pub struct AppOptions {
	pub source_dir: PathBuf,
	pub dest_dir: PathBuf,
	pub dry_run: bool,
	pub watch: bool,
	/// Overrides the built-in screenshot pattern
	pub pattern: Option<String>,
	pub dedup_window: Duration,
	pub cleanup_interval: Duration,
	pub settle_delay: Duration,
}

impl AppOptions {
	pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
		Self {
			source_dir: source_dir.into(),
			dest_dir: dest_dir.into(),
			dry_run: false,
			watch: false,
			pattern: None,
			dedup_window: DEFAULT_DEDUP_WINDOW,
			cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
			settle_delay: DEFAULT_SETTLE_DELAY,
		}
	}

	pub fn watcher_config(&self) -> WatcherConfig {
		WatcherConfig {
			path: self.source_dir.clone(),
			dedup_window: self.dedup_window,
			cleanup_interval: self.cleanup_interval,
			settle_delay: self.settle_delay,
		}
	}
}

/// What a run did before returning
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
	pub scan: ScanSummary,
	pub watch_exit: Option<WatchExit>,
}

/// Check the source directory and create the destination unless in dry-run mode
pub fn prepare_directories(options: &AppOptions) -> Result<()> {
	if !options.source_dir.is_dir() {
		return Err(WatcherError::invalid_path(
			&options.source_dir,
			"source folder does not exist or is not a directory",
		));
	}

	if !options.dry_run && !options.dest_dir.is_dir() {
		create_destination(&options.dest_dir)?;
	}
	Ok(())
}

fn create_destination(path: &Path) -> Result<()> {
	std::fs::create_dir_all(path).map_err(|source| WatcherError::DestinationUnavailable {
		path: path.display().to_string(),
		source,
	})?;
	info!("Created destination folder {}", path.display());
	Ok(())
}

/// Validate, scan the source once, then watch it until `cancel` fires if requested.
///
/// A watch subscription failure is logged by the loop and reported through
/// [`RunReport::watch_exit`]; it is not an error.
pub async fn run(options: AppOptions, cancel: CancellationToken) -> Result<RunReport> {
	if options.dry_run {
		info!("Running in dry run mode");
	}

	let config = options.watcher_config();
	config.validate()?;
	prepare_directories(&options)?;

	let pattern = match &options.pattern {
		Some(custom) => ScreenshotPattern::with_pattern(custom)?,
		None => ScreenshotPattern::new()?,
	};
	let processor = FileProcessor::new(
		&options.source_dir,
		&options.dest_dir,
		options.dry_run,
		Arc::new(pattern),
	);

	let scan = process_existing_files(&processor)?;

	let watch_exit = if options.watch {
		let mut watcher = FolderWatcher::new(config, processor);
		Some(watcher.run(cancel, None).await)
	} else {
		None
	};

	Ok(RunReport { scan, watch_exit })
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn test_missing_source_is_fatal() {
		let temp_dir = TempDir::new().unwrap();
		let options = AppOptions::new(temp_dir.path().join("nope"), temp_dir.path().join("dest"));

		let err = prepare_directories(&options).unwrap_err();
		assert!(matches!(err, WatcherError::InvalidPath { .. }));
		assert!(!temp_dir.path().join("dest").exists());
	}

	#[test]
	fn test_source_file_is_not_a_directory() {
		let temp_dir = TempDir::new().unwrap();
		let file = temp_dir.path().join("file.txt");
		std::fs::write(&file, "x").unwrap();
		let options = AppOptions::new(&file, temp_dir.path().join("dest"));

		assert!(prepare_directories(&options).is_err());
	}

	#[test]
	fn test_destination_created_recursively() {
		let temp_dir = TempDir::new().unwrap();
		let dest = temp_dir.path().join("a").join("b").join("c");
		let options = AppOptions::new(temp_dir.path(), &dest);

		prepare_directories(&options).unwrap();
		assert!(dest.is_dir());
	}

	#[test]
	fn test_dry_run_does_not_create_destination() {
		let temp_dir = TempDir::new().unwrap();
		let dest = temp_dir.path().join("dest");
		let options = AppOptions { dry_run: true, ..AppOptions::new(temp_dir.path(), &dest) };

		prepare_directories(&options).unwrap();
		assert!(!dest.exists());
	}

	#[test]
	fn test_watcher_config_from_options() {
		let options = AppOptions {
			settle_delay: Duration::from_millis(250),
			..AppOptions::new("/src", "/dest")
		};
		let config = options.watcher_config();
		assert_eq!(config.path, PathBuf::from("/src"));
		assert_eq!(config.dedup_window, DEFAULT_DEDUP_WINDOW);
		assert_eq!(config.cleanup_interval, DEFAULT_CLEANUP_INTERVAL);
		assert_eq!(config.settle_delay, Duration::from_millis(250));
		assert!(config.validate().is_ok());
	}
}
