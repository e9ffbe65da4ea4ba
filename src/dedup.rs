//! Suppression of repeated creation notifications for the same filename

use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Filename -> last-seen table owned by a single watch loop.
///
/// Every method that needs the clock takes `now` explicitly.
#[derive(Debug)]
pub struct DedupTable {
	entries: HashMap<String, Instant>,
	window: Duration,
	cleanup_interval: Duration,
	last_cleanup: Instant,
}

impl DedupTable {
	pub fn new(window: Duration, cleanup_interval: Duration, now: Instant) -> Self {
		Self {
			entries: HashMap::new(),
			window,
			cleanup_interval,
			last_cleanup: now,
		}
	}

	/// Returns `false` if `filename` was recorded less than one window ago.
	/// Otherwise records `now` for it and returns `true`.
	pub fn check_and_record(&mut self, filename: &str, now: Instant) -> bool {
		if let Some(last_seen) = self.entries.get(filename) {
			if now.saturating_duration_since(*last_seen) < self.window {
				return false;
			}
		}
		self.entries.insert(filename.to_string(), now);
		true
	}

	/// Sweep the table if more than one cleanup interval has passed since the
	/// last sweep. Returns the number of evicted entries.
	pub fn maybe_cleanup(&mut self, now: Instant) -> usize {
		if now.saturating_duration_since(self.last_cleanup) <= self.cleanup_interval {
			return 0;
		}
		self.sweep(now)
	}

	/// Drop every entry older than the window and record the sweep time
	pub fn sweep(&mut self, now: Instant) -> usize {
		let before = self.entries.len();
		let window = self.window;
		self.entries
			.retain(|_, last_seen| now.saturating_duration_since(*last_seen) <= window);
		self.last_cleanup = now;

		let evicted = before - self.entries.len();
		if evicted > 0 {
			debug!(
				"Dedup sweep evicted {} entries ({} remain)",
				evicted,
				self.entries.len()
			);
		}
		evicted
	}

	pub fn contains(&self, filename: &str) -> bool {
		self.entries.contains_key(filename)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn last_cleanup(&self) -> Instant {
		self.last_cleanup
	}
}
