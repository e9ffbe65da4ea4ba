//! Filename classification
//!
//! The watcher only needs a yes/no answer for a bare filename. [`FileMatcher`]
//! is that seam; [`ScreenshotPattern`] is the stock implementation for macOS
//! screen captures, and any `Fn(&str) -> bool` closure works as well.

use crate::error::Result;
use regex::Regex;

/// macOS screenshot names, e.g. `Screen Shot 2020-06-21 at 4.21.35 PM.png`.
/// Newer releases put U+202F (narrow no-break space) before the meridiem.
/// Digits are ASCII only.
pub const SCREENSHOT_PATTERN: &str =
	r"^(Screen Shot|Screenshot) [0-9]{4}-[0-9]{2}-[0-9]{2} at [0-9]{1,2}\.[0-9]{2}\.[0-9]{2}[\s\x{202F}]*(AM|PM)\.png$";

/// Decides whether a filename should be relocated
pub trait FileMatcher: Send + Sync {
	fn is_match(&self, filename: &str) -> bool;
}

impl<F> FileMatcher for F
where F: Fn(&str) -> bool + Send + Sync
{
	fn is_match(&self, filename: &str) -> bool {
		self(filename)
	}
}

#[derive(Debug, Clone)]
pub struct ScreenshotPattern {
	regex: Regex,
}

impl ScreenshotPattern {
	pub fn new() -> Result<Self> {
		Self::with_pattern(SCREENSHOT_PATTERN)
	}

	/// Build a matcher from a caller-supplied regular expression
	pub fn with_pattern(pattern: &str) -> Result<Self> {
		Ok(Self { regex: Regex::new(pattern)? })
	}
}

impl FileMatcher for ScreenshotPattern {
	fn is_match(&self, filename: &str) -> bool {
		self.regex.is_match(filename)
	}
}
