//! One-shot pass over files already present in the source directory

use crate::error::{Result, WatcherError};
use crate::processor::{FileProcessor, ProcessOutcome};
use tracing::{debug, info};

/// Tally of outcomes from a startup scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
	pub files_seen: usize,
	pub directories_skipped: usize,
	pub moved: usize,
	pub dry_run: usize,
	pub missing: usize,
	pub failed: usize,
}

impl ScanSummary {
	fn record(&mut self, outcome: &ProcessOutcome) {
		self.files_seen += 1;
		match outcome {
			ProcessOutcome::NotMatched => {}
			ProcessOutcome::DryRun => self.dry_run += 1,
			ProcessOutcome::Moved => self.moved += 1,
			ProcessOutcome::SourceMissing => self.missing += 1,
			ProcessOutcome::Failed(_) => self.failed += 1,
		}
	}

	pub fn matched(&self) -> usize {
		self.moved + self.dry_run + self.missing + self.failed
	}
}

/// Feed every regular entry of the processor's source directory through it.
///
/// Failing to list the directory is fatal; per-file failures are not.
pub fn process_existing_files(processor: &FileProcessor) -> Result<ScanSummary> {
	let source_dir = processor.source_dir();
	let unreadable = |source| WatcherError::SourceUnreadable {
		path: source_dir.display().to_string(),
		source,
	};

	let mut summary = ScanSummary::default();
	for entry in std::fs::read_dir(source_dir).map_err(unreadable)? {
		let entry = entry.map_err(unreadable)?;
		let name = entry.file_name().to_string_lossy().into_owned();

		if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
			debug!("Skipping directory {}", name);
			summary.directories_skipped += 1;
			continue;
		}

		let outcome = processor.process(&name);
		summary.record(&outcome);
	}

	info!(
		"Startup scan of {} complete: {} files, {} matched, {} moved",
		source_dir.display(),
		summary.files_seen,
		summary.matched(),
		summary.moved
	);
	Ok(summary)
}
