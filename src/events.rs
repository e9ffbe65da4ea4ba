use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventType {
	Create,
	Modify,
	Remove,
	Rename,
	Other(String),
}

impl From<notify::EventKind> for EventType {
	fn from(kind: notify::EventKind) -> Self {
		match kind {
			notify::EventKind::Create(_) => EventType::Create,
			// an entry renamed into the watched directory is a new file there
			notify::EventKind::Modify(notify::event::ModifyKind::Name(
				notify::event::RenameMode::To,
			)) => EventType::Create,
			notify::EventKind::Modify(notify::event::ModifyKind::Name(_)) => EventType::Rename,
			notify::EventKind::Modify(_) => EventType::Modify,
			notify::EventKind::Remove(_) => EventType::Remove,
			notify::EventKind::Access(_) => EventType::Other("Access".to_string()),
			notify::EventKind::Other => EventType::Other("Unknown".to_string()),
			_ => EventType::Other(format!("{kind:?}")),
		}
	}
}

/// A single change notification for one path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
	pub id: Uuid,
	pub event_type: EventType,
	pub path: PathBuf,
	pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
	pub fn new(event_type: EventType, path: impl Into<PathBuf>) -> Self {
		Self {
			id: Uuid::new_v4(),
			event_type,
			path: path.into(),
			timestamp: Utc::now(),
		}
	}

	pub fn is_create(&self) -> bool {
		self.event_type == EventType::Create
	}

	/// Last path segment, used as the deduplication key
	pub fn file_name(&self) -> Option<String> {
		self.path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
	}

	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(self)
	}
}
