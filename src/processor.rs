//! Per-file processing shared by the startup scan and the watch loop

use crate::pattern::FileMatcher;
use crate::relocator::{RelocateError, Relocator, RenameRelocator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// What happened to a single filename
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
	/// Name did not match; nothing was touched or logged
	NotMatched,
	/// Dry-run: the move was reported but not performed
	DryRun,
	Moved,
	/// The source disappeared before it could be moved
	SourceMissing,
	Failed(RelocateError),
}

impl ProcessOutcome {
	pub fn is_match(&self) -> bool {
		!matches!(self, ProcessOutcome::NotMatched)
	}
}

/// Combines a [`FileMatcher`] and a [`Relocator`] for one source/destination pair
#[derive(Clone)]
pub struct FileProcessor {
	source_dir: PathBuf,
	dest_dir: PathBuf,
	dry_run: bool,
	matcher: Arc<dyn FileMatcher>,
	relocator: Arc<dyn Relocator>,
}

impl FileProcessor {
	pub fn new(
		source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>, dry_run: bool,
		matcher: Arc<dyn FileMatcher>,
	) -> Self {
		Self {
			source_dir: source_dir.into(),
			dest_dir: dest_dir.into(),
			dry_run,
			matcher,
			relocator: Arc::new(RenameRelocator),
		}
	}

	/// Replace the default rename-based relocator
	pub fn with_relocator(mut self, relocator: Arc<dyn Relocator>) -> Self {
		self.relocator = relocator;
		self
	}

	pub fn source_dir(&self) -> &Path {
		&self.source_dir
	}

	/// Process one bare filename found in the source directory.
	///
	/// Failures are logged and returned as an outcome; they are never retried
	/// and never propagated as errors.
	pub fn process(&self, filename: &str) -> ProcessOutcome {
		if !self.matcher.is_match(filename) {
			return ProcessOutcome::NotMatched;
		}

		let src_path = self.source_dir.join(filename);
		let dest_path = self.dest_dir.join(filename);

		if self.dry_run {
			info!(
				"[DRY RUN] Would move {} to {}",
				filename,
				self.dest_dir.display()
			);
			return ProcessOutcome::DryRun;
		}

		if let Ok(false) = src_path.try_exists() {
			warn!("Source file does not exist: {}", src_path.display());
			return ProcessOutcome::SourceMissing;
		}

		match self.relocator.relocate(&src_path, &dest_path) {
			Ok(()) => {
				info!("Moved {} to {}", filename, self.dest_dir.display());
				ProcessOutcome::Moved
			}
			Err(e) => {
				error!(
					category = e.category(),
					"Failed to move file {}: {} (src: {}, dest: {})",
					filename,
					e,
					src_path.display(),
					dest_path.display()
				);
				ProcessOutcome::Failed(e)
			}
		}
	}
}

impl std::fmt::Debug for FileProcessor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FileProcessor")
			.field("source_dir", &self.source_dir)
			.field("dest_dir", &self.dest_dir)
			.field("dry_run", &self.dry_run)
			.finish_non_exhaustive()
	}
}
