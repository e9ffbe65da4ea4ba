//! File relocation and its error taxonomy

use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelocateError {
	#[error("source not found: {detail}")]
	NotFound { detail: String },

	#[error("permission denied: {detail}")]
	PermissionDenied { detail: String },

	#[error("cross-device move: {detail}")]
	CrossDevice { detail: String },

	#[error("move failed: {detail}")]
	Other { detail: String },
}

impl RelocateError {
	/// Classify an I/O error returned by a rename
	pub fn from_io(err: &io::Error) -> Self {
		let detail = err.to_string();
		if is_cross_device(err) {
			return RelocateError::CrossDevice { detail };
		}
		match err.kind() {
			io::ErrorKind::NotFound => RelocateError::NotFound { detail },
			io::ErrorKind::PermissionDenied => RelocateError::PermissionDenied { detail },
			_ => RelocateError::Other { detail },
		}
	}

	/// Get error category for logging
	pub fn category(&self) -> &'static str {
		match self {
			RelocateError::NotFound { .. } => "not_found",
			RelocateError::PermissionDenied { .. } => "permission",
			RelocateError::CrossDevice { .. } => "cross_device",
			RelocateError::Other { .. } => "other",
		}
	}
}

#[cfg(unix)]
fn is_cross_device(err: &io::Error) -> bool {
	err.raw_os_error() == Some(nix::errno::Errno::EXDEV as i32)
}

#[cfg(not(unix))]
fn is_cross_device(err: &io::Error) -> bool {
	// ERROR_NOT_SAME_DEVICE
	cfg!(windows) && err.raw_os_error() == Some(17)
}

/// Moves a file from one path to another
pub trait Relocator: Send + Sync {
	fn relocate(&self, from: &Path, to: &Path) -> Result<(), RelocateError>;
}

/// Single-attempt rename on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameRelocator;

impl Relocator for RenameRelocator {
	fn relocate(&self, from: &Path, to: &Path) -> Result<(), RelocateError> {
		std::fs::rename(from, to).map_err(|e| RelocateError::from_io(&e))
	}
}
