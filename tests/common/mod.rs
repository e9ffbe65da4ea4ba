//! Common test utilities for the screenshot-watcher library

#![allow(dead_code)]

use screenshot_watcher::{FileProcessor, ScreenshotPattern};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const SCREEN_SHOT: &str = "Screen Shot 2020-06-21 at 4.21.35 PM.png";
pub const SCREENSHOT: &str = "Screenshot 2025-03-29 at 11.16.20 PM.png";
pub const NOT_A_SCREENSHOT: &str = "not-a-screenshot.png";

/// Source and destination scratch directories
pub struct Folders {
	pub src: TempDir,
	pub dest: TempDir,
}

impl Folders {
	pub fn new() -> Self {
		Self {
			src: TempDir::new().expect("Failed to create temp src dir"),
			dest: TempDir::new().expect("Failed to create temp dest dir"),
		}
	}

	pub fn src_file(&self, name: &str) -> PathBuf {
		self.src.path().join(name)
	}

	pub fn dest_file(&self, name: &str) -> PathBuf {
		self.dest.path().join(name)
	}

	pub fn processor(&self, dry_run: bool) -> FileProcessor {
		FileProcessor::new(
			self.src.path(),
			self.dest.path(),
			dry_run,
			Arc::new(ScreenshotPattern::new().expect("built-in pattern compiles")),
		)
	}
}

/// Create a test file with content
pub fn create_test_file(path: &Path, content: &str) -> std::io::Result<()> {
	std::fs::write(path, content)
}

/// Wait for a short duration to allow the watcher to attach
pub async fn wait_for_watcher() {
	tokio::time::sleep(std::time::Duration::from_millis(200)).await;
}
