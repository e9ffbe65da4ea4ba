//! Moves screen-capture files from a source folder into a destination folder,
//! once at startup and then continuously while watching the source.

pub mod app;
mod dedup;
mod error;
mod events;
pub mod pattern;
mod processor;
pub mod relocator;
pub mod scanner;
mod watcher;

pub use dedup::DedupTable;
pub use error::{Result, WatcherError};
pub use events::{ChangeEvent, EventType};
pub use pattern::{FileMatcher, ScreenshotPattern};
pub use processor::{FileProcessor, ProcessOutcome};
pub use relocator::{RelocateError, Relocator, RenameRelocator};
pub use watcher::{
	start, ChannelFeed, ChannelSource, FolderWatcher, NotificationSource, NotifySource,
	Subscription, WatchExit, WatchState, WatcherConfig, WatcherHandle,
};
